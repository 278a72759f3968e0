//! Tokenizer for TeX math source.
//!
//! Produces control words (`\alpha`), control symbols (`\{`, `\\`), single
//! characters and collapsed whitespace. `%` comments run to the end of the
//! line and are dropped.

use alloc::sync::Arc;

use crate::types::{ErrorLocationProvider, SourceLocation};

/// A lexed token with its location in the fragment source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text. Control sequences keep their backslash; whitespace runs
    /// are a single space.
    pub text: String,
    /// Source span
    pub loc: SourceLocation,
}

impl Token {
    /// Whether this token is a control word or symbol.
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.text.len() > 1 && self.text.starts_with('\\')
    }

    /// Name of a control sequence, without the backslash.
    #[must_use]
    pub fn control_name(&self) -> Option<&str> {
        self.is_control().then(|| &self.text[1..])
    }

    /// Whether this token is collapsed whitespace.
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.text == " "
    }
}

impl ErrorLocationProvider for Token {
    fn loc(&self) -> Option<&SourceLocation> {
        Some(&self.loc)
    }
}

/// Streaming tokenizer over one fragment.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Arc<str>,
    pos: usize,
}

impl Lexer {
    /// Creates a lexer at the start of `input`.
    #[must_use]
    pub const fn new(input: Arc<str>) -> Self {
        Self { input, pos: 0 }
    }

    /// Shared fragment source.
    #[must_use]
    pub const fn input(&self) -> &Arc<str> {
        &self.input
    }

    /// A zero-width location at the current position.
    #[must_use]
    pub fn here(&self) -> SourceLocation {
        SourceLocation::new(Arc::clone(&self.input), self.pos, self.pos)
    }

    /// Returns the next token, or `None` at the end of the input.
    pub fn lex(&mut self) -> Option<Token> {
        loop {
            let rest = &self.input[self.pos..];
            let first = rest.chars().next()?;
            let start = self.pos;

            let len = match first {
                '%' => {
                    self.pos += rest.find('\n').map_or(rest.len(), |end| end + 1);
                    continue;
                }
                ' ' | '\t' | '\r' | '\n' => {
                    let len = rest.len()
                        - rest
                            .trim_start_matches([' ', '\t', '\r', '\n'])
                            .len();
                    self.pos += len;
                    return Some(self.token(" ".to_owned(), start));
                }
                '\\' => control_len(rest),
                _ => first.len_utf8(),
            };

            self.pos += len;
            let mut text = rest[..len].to_owned();
            // `\ ` followed by more whitespace is still one control space.
            if text
                .strip_prefix('\\')
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(char::is_whitespace))
            {
                text = "\\ ".to_owned();
            }
            return Some(self.token(text, start));
        }
    }

    fn token(&self, text: String, start: usize) -> Token {
        Token {
            text,
            loc: SourceLocation::new(Arc::clone(&self.input), start, self.pos),
        }
    }

    /// Reads raw source up to the matching close brace, for arguments that
    /// are not math (environment names, colors, text). Expects the opening
    /// brace to be consumed already. Returns `None` when the brace is never
    /// closed.
    pub fn raw_group(&mut self) -> Option<(String, SourceLocation)> {
        let rest = &self.input[self.pos..];
        let mut depth = 0usize;
        let mut chars = rest.char_indices();
        while let Some((index, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '{' => depth += 1,
                '}' if depth == 0 => {
                    let start = self.pos;
                    let text = rest[..index].to_owned();
                    self.pos += index + 1;
                    let loc = SourceLocation::new(Arc::clone(&self.input), start, start + index);
                    return Some((text, loc));
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        None
    }
}

/// Length of the control sequence at the start of `rest` (which begins with
/// a backslash).
fn control_len(rest: &str) -> usize {
    let body = &rest[1..];
    let letters = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    if letters > 0 {
        return 1 + letters;
    }
    match body.chars().next() {
        Some(c) if c.is_whitespace() => {
            1 + body.len()
                - body
                    .trim_start_matches([' ', '\t', '\r', '\n'])
                    .len()
        }
        Some(c) => 1 + c.len_utf8(),
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        let mut lexer = Lexer::new(Arc::from(input));
        core::iter::from_fn(|| lexer.lex()).map(|t| t.text).collect()
    }

    #[test]
    fn control_words_and_symbols() {
        assert_eq!(
            texts(r"\alpha_1\{\\ x"),
            [r"\alpha", "_", "1", r"\{", r"\\", " ", "x"]
        );
    }

    #[test]
    fn whitespace_collapses_and_comments_vanish() {
        assert_eq!(texts("a  \n b % note\nc"), ["a", " ", "b", " ", "c"]);
        assert_eq!(texts("a\\  b"), ["a", "\\ ", "b"]);
    }

    #[test]
    fn multibyte_characters_are_single_tokens() {
        assert_eq!(
            texts("\u{3B1}+\u{B2}\u{2192}\u{E9}"),
            ["\u{3B1}", "+", "\u{B2}", "\u{2192}", "\u{E9}"]
        );
    }

    #[test]
    fn locations_are_byte_offsets() {
        let mut lexer = Lexer::new(Arc::from("\u{3B1}\\beta"));
        let alpha = lexer.lex().unwrap();
        let beta = lexer.lex().unwrap();
        assert_eq!((alpha.loc.start, alpha.loc.end), (0, 2));
        assert_eq!((beta.loc.start, beta.loc.end), (2, 7));
        assert!(beta.is_control());
        assert_eq!(beta.control_name(), Some("beta"));
    }

    #[test]
    fn raw_groups_balance_braces() {
        let mut lexer = Lexer::new(Arc::from("{a{b}\\}c}d"));
        assert_eq!(lexer.lex().unwrap().text, "{");
        let (text, loc) = lexer.raw_group().unwrap();
        assert_eq!(text, "a{b}\\}c");
        assert_eq!((loc.start, loc.end), (1, 8));
        assert_eq!(lexer.lex().unwrap().text, "d");
    }
}
