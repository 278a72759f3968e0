//! Internal representation of a compiled fragment.

use strum::{Display, IntoStaticStr};

use crate::types::{ErrorLocationProvider, SourceLocation};

/// Spacing class of an operator-like atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Family {
    /// Ordinary symbol
    Ord,
    /// Binary operator (`+`, `\times`)
    Bin,
    /// Relation (`=`, `\le`)
    Rel,
    /// Opening delimiter
    Open,
    /// Closing delimiter
    Close,
    /// Punctuation
    Punct,
}

/// Mathematical alphabet a symbol is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Variant {
    /// Upright
    #[default]
    Normal,
    /// Math italic, the default for single-letter identifiers
    Italic,
    /// Bold upright
    Bold,
    /// Bold italic (`\boldsymbol`)
    BoldItalic,
    /// Blackboard bold (`\mathbb`)
    DoubleStruck,
    /// Calligraphic (`\mathcal`)
    Calligraphic,
    /// Fraktur (`\mathfrak`)
    Fraktur,
    /// Sans serif (`\mathsf`)
    SansSerif,
    /// Typewriter (`\mathtt`)
    Monospace,
}

impl Variant {
    /// Class hook selecting the font of the variant.
    #[must_use]
    pub const fn font_class(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Italic => Some("TEX-I"),
            Self::Bold => Some("TEX-B"),
            Self::BoldItalic => Some("TEX-BI"),
            Self::DoubleStruck => Some("TEX-A"),
            Self::Calligraphic => Some("TEX-C"),
            Self::Fraktur => Some("TEX-FR"),
            Self::SansSerif => Some("TEX-SS"),
            Self::Monospace => Some("TEX-T"),
        }
    }

    /// The bold counterpart, used by `\boldsymbol`.
    #[must_use]
    pub const fn bold(self) -> Self {
        match self {
            Self::Italic | Self::BoldItalic => Self::BoldItalic,
            _ => Self::Bold,
        }
    }
}

/// Size of a generalized fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FracStyle {
    /// Follows the surrounding style
    Auto,
    /// Forced display size (`\dfrac`)
    Display,
    /// Forced text size (`\tfrac`)
    Text,
}

/// Strike-through notation of the cancel package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Notation {
    /// `\cancel`
    UpDiagonalStrike,
    /// `\bcancel`
    DownDiagonalStrike,
    /// `\xcancel`
    #[strum(serialize = "updiagonalstrike downdiagonalstrike")]
    Cross,
    /// `\boxed`
    #[strum(serialize = "box")]
    Box,
}

/// One node of a compiled fragment.
///
/// Every node carries the location of the source it was parsed from, so that
/// later stages can point back into the fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    /// Identifier, number or other ordinary symbol
    Ord {
        /// Symbol text
        text: String,
        /// Alphabet
        variant: Variant,
        /// Whether the symbol is a number (`12.5`)
        number: bool,
        /// Source span
        loc: SourceLocation,
    },
    /// Operator-like atom: binary operator, relation, delimiter or punctuation
    Atom {
        /// Spacing class
        family: Family,
        /// Symbol text
        text: String,
        /// Delimiter size multiplier (`\big` and friends)
        size: Option<f64>,
        /// Source span
        loc: SourceLocation,
    },
    /// Large or named operator (`\sum`, `\lim`, `\operatorname{…}`)
    Op {
        /// Symbol or name
        text: String,
        /// Whether `text` is a word rather than a symbol
        named: bool,
        /// Whether scripts go above and below in display mode
        limits: bool,
        /// Source span
        loc: SourceLocation,
    },
    /// Text-mode content (`\text{…}`)
    Text {
        /// Literal text
        text: String,
        /// Alphabet
        variant: Variant,
        /// Source span
        loc: SourceLocation,
    },
    /// Braced group, or the whole fragment
    Group {
        /// Contents
        body: Vec<ParseNode>,
        /// Source span
        loc: SourceLocation,
    },
    /// Base with optional super- and subscript
    SupSub {
        /// Nucleus; `None` for `^2` at the start of a group
        base: Option<Box<ParseNode>>,
        /// Superscript
        sup: Option<Box<ParseNode>>,
        /// Subscript
        sub: Option<Box<ParseNode>>,
        /// Source span
        loc: SourceLocation,
    },
    /// Fraction or binomial
    Frac {
        /// Numerator
        numer: Box<ParseNode>,
        /// Denominator
        denom: Box<ParseNode>,
        /// Whether a fraction bar is drawn (false for `\binom`)
        bar: bool,
        /// Size
        style: FracStyle,
        /// Source span
        loc: SourceLocation,
    },
    /// Square or n-th root
    Sqrt {
        /// Radicand
        body: Box<ParseNode>,
        /// Root index (`\sqrt[3]{x}`)
        index: Option<Box<ParseNode>>,
        /// Source span
        loc: SourceLocation,
    },
    /// Accent above a base (`\hat`, `\overline`)
    Accent {
        /// Accent character
        accent: String,
        /// Whether the accent stretches to the base's width
        stretchy: bool,
        /// Accented base
        base: Box<ParseNode>,
        /// Source span
        loc: SourceLocation,
    },
    /// Alphabet change (`\mathbf{…}`)
    Font {
        /// Alphabet applied to the body
        variant: Variant,
        /// Contents
        body: Box<ParseNode>,
        /// Source span
        loc: SourceLocation,
    },
    /// `\left … \right` pair
    LeftRight {
        /// Opening delimiter text (empty for `.`)
        left: String,
        /// Closing delimiter text (empty for `.`)
        right: String,
        /// Contents
        body: Vec<ParseNode>,
        /// Source span
        loc: SourceLocation,
    },
    /// Horizontal space in em, or a forced line break
    Space {
        /// Width in em
        width: f64,
        /// Whether this is `\\` outside an environment
        line_break: bool,
        /// Source span
        loc: SourceLocation,
    },
    /// `\begin{name} … \end{name}` block
    Environment {
        /// Environment name
        name: String,
        /// Fence on the left (`(` for `pmatrix`, `{` for `cases`)
        left: Option<&'static str>,
        /// Fence on the right
        right: Option<&'static str>,
        /// Rows of cells of nodes
        rows: Vec<Vec<Vec<ParseNode>>>,
        /// Source span
        loc: SourceLocation,
    },
    /// Colored content
    Color {
        /// CSS color
        color: String,
        /// Contents
        body: Vec<ParseNode>,
        /// Source span
        loc: SourceLocation,
    },
    /// Enclosed or struck-through content
    Enclose {
        /// Notation
        notation: Notation,
        /// Contents
        body: Box<ParseNode>,
        /// Source span
        loc: SourceLocation,
    },
}

impl ParseNode {
    /// Source span of the node.
    #[must_use]
    pub const fn loc(&self) -> &SourceLocation {
        match self {
            Self::Ord { loc, .. }
            | Self::Atom { loc, .. }
            | Self::Op { loc, .. }
            | Self::Text { loc, .. }
            | Self::Group { loc, .. }
            | Self::SupSub { loc, .. }
            | Self::Frac { loc, .. }
            | Self::Sqrt { loc, .. }
            | Self::Accent { loc, .. }
            | Self::Font { loc, .. }
            | Self::LeftRight { loc, .. }
            | Self::Space { loc, .. }
            | Self::Environment { loc, .. }
            | Self::Color { loc, .. }
            | Self::Enclose { loc, .. } => loc,
        }
    }
}

impl ErrorLocationProvider for ParseNode {
    fn loc(&self) -> Option<&SourceLocation> {
        Some(Self::loc(self))
    }
}
