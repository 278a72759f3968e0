//! Parse error handling for TeX fragments
//!
//! A [`ParseError`] is produced while compiling a single math fragment. It
//! never aborts a pipeline invocation: the session turns it into an in-place
//! error indicator for that fragment and carries on with the rest.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::types::SourceLocation;

/// Error raised while compiling one math fragment.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("TeX parse error: {kind}{context}")]
pub struct ParseError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<ParseErrorKind>,
    /// The start position inside the fragment source
    pub position: Option<usize>,
    /// The length of affected text
    pub length: Option<usize>,
    /// Additional context to render alongside the error.
    context: ParseErrorContext,
}

impl ParseError {
    /// Create a new ParseError with the given kind
    pub fn new<T: Into<ParseErrorKind>>(kind: T) -> Self {
        Self::from_kind(kind.into(), ParseErrorContext::None, None, None)
    }

    /// Create a new ParseError with context from a token or parse node
    pub fn with_token<T: Into<ParseErrorKind>>(kind: T, token: &dyn ErrorLocationProvider) -> Self {
        let mut position = None;
        let mut length = None;
        let context = token.loc().filter(|loc| loc.start() <= loc.end()).map_or(
            ParseErrorContext::None,
            |loc| {
                position = Some(loc.start());
                length = Some(loc.end().saturating_sub(loc.start()));
                ParseErrorContext::Location(loc.clone())
            },
        );

        Self::from_kind(kind.into(), context, position, length)
    }

    fn from_kind(
        kind: ParseErrorKind,
        context: ParseErrorContext,
        position: Option<usize>,
        length: Option<usize>,
    ) -> Self {
        Self {
            kind: Box::new(kind),
            position,
            length,
            context,
        }
    }

    /// Message shown by the error indicator, without the location context.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Describes the specific reason for a [`ParseError`].
#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Extra close brace or missing open brace")]
    ExtraCloseBrace,
    #[error("Missing close brace")]
    MissingCloseBrace,
    #[error("Double exponent: use braces to clarify")]
    DoubleSuperscript,
    #[error("Double subscripts: use braces to clarify")]
    DoubleSubscript,
    #[error("Undefined control sequence {name}")]
    UndefinedControlSequence { name: String },
    #[error("Missing argument for {name}")]
    MissingArgument { name: String },
    #[error(r"\begin{{{begin}}} ended with \end{{{end}}}")]
    MismatchedEnvironment { begin: String, end: String },
    #[error("Unknown environment '{name}'")]
    UnknownEnvironment { name: String },
    #[error(r"Missing \end{{{name}}}")]
    MissingEnd { name: String },
    #[error(r"Extra \right")]
    ExtraRight,
    #[error(r"Missing \right")]
    MissingRight,
    #[error("Missing or unrecognized delimiter for {name}")]
    MissingDelimiter { name: String },
    #[error("Misplaced {token}")]
    UnexpectedAlignment { token: String },
    #[error("Missing open brace for {name}")]
    MissingOpenBrace { name: String },
    #[error("Invalid color '{color}'")]
    InvalidColor { color: String },
    #[error("Expression nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
enum ParseErrorContext {
    None,
    Location(SourceLocation),
}

impl fmt::Display for ParseErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Location(SourceLocation { input, start, end }) => {
                let input_len = input.len();
                if *start == input_len {
                    write!(f, " at end of input: ")?;
                } else {
                    write!(f, " at position {}: ", start + 1)?;
                }

                let prefix_start = adjust_char_boundary(input, start.saturating_sub(15), false);
                if prefix_start > 0 {
                    write!(f, "\u{2026}")?;
                }
                write!(f, "{}", &input[prefix_start..*start])?;
                if end > start {
                    for c in input[*start..*end].chars() {
                        write!(f, "{c}\u{0332}")?;
                    }
                }
                let suffix_end = adjust_char_boundary(input, (*end + 15).min(input_len), true);
                if suffix_end < input_len {
                    write!(f, "{}\u{2026}", &input[*end..suffix_end])
                } else {
                    write!(f, "{}", &input[*end..])
                }
            }
        }
    }
}

const fn adjust_char_boundary(input: &str, mut index: usize, forward: bool) -> usize {
    if forward {
        while index < input.len() && !input.is_char_boundary(index) {
            index += 1;
        }
    } else {
        while index > 0 && !input.is_char_boundary(index) {
            index -= 1;
        }
    }
    index
}

/// Trait for types that can provide error location information for ParseError
pub trait ErrorLocationProvider {
    /// Get the source location if available
    fn loc(&self) -> Option<&SourceLocation>;
}

impl<T: ErrorLocationProvider> ErrorLocationProvider for Option<T> {
    fn loc(&self) -> Option<&SourceLocation> {
        self.as_ref()?.loc()
    }
}
