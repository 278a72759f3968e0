//! Recursive-descent parser turning one fragment into a [`ParseNode`] tree.

use alloc::sync::Arc;
use core::mem;

use crate::input::lexer::{Lexer, Token};
use crate::input::packages::{self, Command};
use crate::input::parse_node::{Family, ParseNode, Variant};
use crate::types::{PackageSet, ParseError, ParseErrorKind, SourceLocation};

/// Deepest group nesting accepted before giving up.
const MAX_DEPTH: usize = 100;

/// Tokens that end the expression being parsed instead of being consumed.
#[derive(Debug, Clone, Copy, Default)]
struct Breaks {
    brace: bool,
    bracket: bool,
    cell: bool,
    right: bool,
}

impl Breaks {
    const TOP: Self = Self {
        brace: false,
        bracket: false,
        cell: false,
        right: false,
    };
    const GROUP: Self = Self {
        brace: true,
        ..Self::TOP
    };
    const OPTIONAL: Self = Self {
        bracket: true,
        ..Self::TOP
    };
    const CELL: Self = Self {
        cell: true,
        ..Self::TOP
    };
    const LEFT_RIGHT: Self = Self {
        right: true,
        ..Self::TOP
    };
}

/// Parses `source` with the control sequences of `packages`.
///
/// The result is a [`ParseNode::Group`] spanning the whole fragment.
///
/// ```
/// use mathdoc::input::{ParseNode, parse};
/// use mathdoc::types::PackageSet;
///
/// let tree = parse(r"\frac{a}{b}", PackageSet::all()).unwrap();
/// let ParseNode::Group { body, .. } = tree else { unreachable!() };
/// assert!(matches!(body[0], ParseNode::Frac { bar: true, .. }));
/// ```
pub fn parse(source: &str, packages: PackageSet) -> Result<ParseNode, ParseError> {
    let input: Arc<str> = Arc::from(source);
    let mut parser = Parser {
        lexer: Lexer::new(Arc::clone(&input)),
        peeked: None,
        packages,
        depth: 0,
    };
    let body = parser.parse_expression(Breaks::TOP)?;
    Ok(ParseNode::Group {
        body,
        loc: SourceLocation::new(input, 0, source.len()),
    })
}

struct Parser {
    lexer: Lexer,
    peeked: Option<Option<Token>>,
    packages: PackageSet,
    depth: usize,
}

impl Parser {
    fn peek(&mut self) -> Option<&Token> {
        let lexer = &mut self.lexer;
        self.peeked.get_or_insert_with(|| lexer.lex()).as_ref()
    }

    fn next(&mut self) -> Option<Token> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.lex(),
        }
    }

    fn unget(&mut self, token: Token) {
        self.peeked = Some(Some(token));
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(Token::is_space) {
            self.next();
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::with_token(kind, &self.lexer.here())
    }

    fn parse_expression(&mut self, breaks: Breaks) -> Result<Vec<ParseNode>, ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error_here(ParseErrorKind::TooDeep));
        }
        let result = self.parse_expression_inner(breaks);
        self.depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self, breaks: Breaks) -> Result<Vec<ParseNode>, ParseError> {
        let mut body = Vec::new();
        loop {
            self.skip_spaces();
            let Some(token) = self.next() else {
                break;
            };
            let ends = match token.text.as_str() {
                "}" => breaks.brace,
                "]" => breaks.bracket,
                "&" | r"\\" | r"\end" => breaks.cell,
                r"\right" => breaks.right,
                _ => false,
            };
            if ends {
                self.unget(token);
                break;
            }

            match token.text.as_str() {
                "}" => return Err(ParseError::with_token(ParseErrorKind::ExtraCloseBrace, &token)),
                "&" => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnexpectedAlignment {
                            token: token.text.clone(),
                        },
                        &token,
                    ));
                }
                "^" | "_" => self.parse_script(&mut body, &token)?,
                "'" => self.parse_primes(&mut body, &token)?,
                r"\\" => body.push(ParseNode::Space {
                    width: 0.0,
                    line_break: true,
                    loc: token.loc,
                }),
                _ => match token.control_name().map(|name| packages::command(name, self.packages)) {
                    Some(Some(Command::Limits(limits))) => {
                        if let Some(ParseNode::Op { limits: slot, .. }) = body.last_mut() {
                            *slot = limits;
                        }
                    }
                    Some(Some(Command::Color)) => {
                        let (color, color_loc) = self.parse_color(&token)?;
                        let rest = self.parse_expression(breaks)?;
                        let end = rest.last().map_or(color_loc, |node| node.loc().clone());
                        body.push(ParseNode::Color {
                            color,
                            body: rest,
                            loc: token.loc.range(&end),
                        });
                    }
                    _ => body.push(self.parse_atom(token)?),
                },
            }
        }
        Ok(body)
    }

    /// Attaches a `^` or `_` argument to the last node of `body`.
    fn parse_script(&mut self, body: &mut Vec<ParseNode>, token: &Token) -> Result<(), ParseError> {
        let script = self.parse_argument(&token.text)?;
        let superscript = token.text == "^";
        Self::attach_script(body, token, script, superscript)
    }

    fn parse_primes(&mut self, body: &mut Vec<ParseNode>, token: &Token) -> Result<(), ParseError> {
        let mut text = String::from("\u{2032}");
        let mut end = token.loc.clone();
        while self.peek().is_some_and(|next| next.text == "'") {
            if let Some(prime) = self.next() {
                text.push('\u{2032}');
                end = prime.loc;
            }
        }
        let loc = token.loc.range(&end);
        let primes = ParseNode::Ord {
            text,
            variant: Variant::Normal,
            number: false,
            loc,
        };
        Self::attach_script(body, token, primes, true)
    }

    fn attach_script(
        body: &mut Vec<ParseNode>,
        token: &Token,
        script: ParseNode,
        superscript: bool,
    ) -> Result<(), ParseError> {
        let (base, mut sup, mut sub, start) = match body.pop() {
            Some(ParseNode::SupSub {
                base,
                sup,
                sub,
                loc,
            }) => (base, sup, sub, loc),
            Some(node) => {
                let loc = node.loc().clone();
                (Some(Box::new(node)), None, None, loc)
            }
            None => (None, None, None, token.loc.clone()),
        };
        let loc = start.range(script.loc());
        let slot = if superscript { &mut sup } else { &mut sub };
        if slot.is_some() {
            let kind = if superscript {
                ParseErrorKind::DoubleSuperscript
            } else {
                ParseErrorKind::DoubleSubscript
            };
            return Err(ParseError::with_token(kind, token));
        }
        *slot = Some(Box::new(script));
        body.push(ParseNode::SupSub {
            base,
            sup,
            sub,
            loc,
        });
        Ok(())
    }

    /// A braced group or a single token.
    fn parse_argument(&mut self, name: &str) -> Result<ParseNode, ParseError> {
        self.skip_spaces();
        let missing = || ParseErrorKind::MissingArgument {
            name: name.to_owned(),
        };
        let Some(token) = self.next() else {
            return Err(self.error_here(missing()));
        };
        match token.text.as_str() {
            "{" => self.parse_group(token),
            "}" | "&" | "^" | "_" | r"\\" | r"\end" | r"\right" => {
                Err(ParseError::with_token(missing(), &token))
            }
            _ => self.parse_atom(token),
        }
    }

    fn parse_group(&mut self, open: Token) -> Result<ParseNode, ParseError> {
        let body = self.parse_expression(Breaks::GROUP)?;
        match self.next() {
            Some(close) if close.text == "}" => Ok(ParseNode::Group {
                body,
                loc: open.loc.range(&close.loc),
            }),
            _ => Err(self.error_here(ParseErrorKind::MissingCloseBrace)),
        }
    }

    /// A brace-delimited argument taken as raw source.
    fn parse_raw_argument(&mut self, name: &str) -> Result<(String, SourceLocation), ParseError> {
        self.skip_spaces();
        match self.next() {
            Some(open) if open.text == "{" => self
                .lexer
                .raw_group()
                .ok_or_else(|| self.error_here(ParseErrorKind::MissingCloseBrace)),
            Some(token) => Err(ParseError::with_token(
                ParseErrorKind::MissingOpenBrace {
                    name: name.to_owned(),
                },
                &token,
            )),
            None => Err(self.error_here(ParseErrorKind::MissingArgument {
                name: name.to_owned(),
            })),
        }
    }

    fn parse_color(&mut self, token: &Token) -> Result<(String, SourceLocation), ParseError> {
        let (color, loc) = self.parse_raw_argument(&token.text)?;
        let color = color.trim().to_owned();
        if !packages::is_valid_color(&color) {
            return Err(ParseError::with_token(ParseErrorKind::InvalidColor { color }, &loc));
        }
        Ok((color, loc))
    }

    fn parse_delimiter(&mut self, name: &str) -> Result<(&'static str, SourceLocation), ParseError> {
        self.skip_spaces();
        let missing = || ParseErrorKind::MissingDelimiter {
            name: name.to_owned(),
        };
        let Some(token) = self.next() else {
            return Err(self.error_here(missing()));
        };
        packages::delimiter(&token.text)
            .map(|delim| (delim, token.loc.clone()))
            .ok_or_else(|| ParseError::with_token(missing(), &token))
    }

    fn parse_atom(&mut self, token: Token) -> Result<ParseNode, ParseError> {
        if let Some(name) = token.control_name() {
            let Some(command) = packages::command(name, self.packages) else {
                return Err(ParseError::with_token(
                    ParseErrorKind::UndefinedControlSequence {
                        name: token.text.clone(),
                    },
                    &token,
                ));
            };
            return self.parse_command(token, command);
        }

        let Some(ch) = token.text.chars().next() else {
            return Err(ParseError::with_token(ParseErrorKind::ExtraCloseBrace, &token));
        };
        let atom = |family: Family, text: &str, loc: SourceLocation| ParseNode::Atom {
            family,
            text: text.to_owned(),
            size: None,
            loc,
        };
        let loc = token.loc.clone();
        Ok(match ch {
            '{' => return self.parse_group(token),
            '~' => ParseNode::Space {
                width: 0.25,
                line_break: false,
                loc,
            },
            '0'..='9' => self.parse_number(token),
            '+' => atom(Family::Bin, "+", loc),
            '-' => atom(Family::Bin, "\u{2212}", loc),
            '*' => atom(Family::Bin, "\u{2217}", loc),
            '=' | '<' | '>' | ':' => atom(Family::Rel, &token.text, loc),
            ',' | ';' => atom(Family::Punct, &token.text, loc),
            '(' | '[' => atom(Family::Open, &token.text, loc),
            ')' | ']' => atom(Family::Close, &token.text, loc),
            _ => ParseNode::Ord {
                variant: if ch.is_alphabetic() {
                    Variant::Italic
                } else {
                    Variant::Normal
                },
                text: token.text,
                number: false,
                loc,
            },
        })
    }

    /// Digits with an optional decimal part become one number.
    fn parse_number(&mut self, first: Token) -> ParseNode {
        let mut text = first.text;
        let mut end = first.loc.clone();
        let mut seen_point = false;
        while let Some(next) = self.peek() {
            let digit = next.text.len() == 1 && next.text.as_bytes()[0].is_ascii_digit();
            let point = next.text == "." && !seen_point;
            if !(digit || point) {
                break;
            }
            seen_point |= point;
            if let Some(token) = self.next() {
                text.push_str(&token.text);
                end = token.loc;
            }
        }
        ParseNode::Ord {
            text,
            variant: Variant::Normal,
            number: true,
            loc: first.loc.range(&end),
        }
    }

    fn parse_command(&mut self, token: Token, command: Command) -> Result<ParseNode, ParseError> {
        let name = token.text.as_str();
        let loc = token.loc.clone();
        let node = match command {
            Command::Symbol(Family::Ord, text) => ParseNode::Ord {
                text: text.to_owned(),
                variant: Variant::Normal,
                number: false,
                loc,
            },
            Command::Symbol(family, text) => ParseNode::Atom {
                family,
                text: text.to_owned(),
                size: None,
                loc,
            },
            Command::Letter(text) => ParseNode::Ord {
                text: text.to_owned(),
                variant: if text.chars().all(char::is_lowercase) {
                    Variant::Italic
                } else {
                    Variant::Normal
                },
                number: false,
                loc,
            },
            Command::LargeOp(text, limits) => ParseNode::Op {
                text: text.to_owned(),
                named: false,
                limits,
                loc,
            },
            Command::NamedOp(text, limits) => ParseNode::Op {
                text: text.to_owned(),
                named: true,
                limits,
                loc,
            },
            Command::Limits(_) => ParseNode::Group {
                body: Vec::new(),
                loc,
            },
            Command::Frac(style) | Command::Binom(style) => {
                let numer = self.parse_argument(name)?;
                let denom = self.parse_argument(name)?;
                ParseNode::Frac {
                    loc: loc.range(denom.loc()),
                    numer: Box::new(numer),
                    denom: Box::new(denom),
                    bar: matches!(command, Command::Frac(_)),
                    style,
                }
            }
            Command::Sqrt => {
                self.skip_spaces();
                let index = if self.peek().is_some_and(|next| next.text == "[") {
                    let open = self.next();
                    let body = self.parse_expression(Breaks::OPTIONAL)?;
                    match self.next() {
                        Some(close) if close.text == "]" => Some(Box::new(ParseNode::Group {
                            body,
                            loc: open.map_or_else(|| close.loc.clone(), |open| open.loc).range(&close.loc),
                        })),
                        _ => {
                            return Err(self.error_here(ParseErrorKind::MissingDelimiter {
                                name: "]".to_owned(),
                            }));
                        }
                    }
                } else {
                    None
                };
                let body = self.parse_argument(name)?;
                ParseNode::Sqrt {
                    loc: loc.range(body.loc()),
                    body: Box::new(body),
                    index,
                }
            }
            Command::Accent(accent, stretchy) => {
                let base = self.parse_argument(name)?;
                ParseNode::Accent {
                    loc: loc.range(base.loc()),
                    accent: accent.to_owned(),
                    stretchy,
                    base: Box::new(base),
                }
            }
            Command::Font(variant) => {
                let body = self.parse_argument(name)?;
                ParseNode::Font {
                    loc: loc.range(body.loc()),
                    variant,
                    body: Box::new(body),
                }
            }
            Command::BoldSymbol => {
                let body = self.parse_argument(name)?;
                ParseNode::Font {
                    loc: loc.range(body.loc()),
                    variant: Variant::BoldItalic,
                    body: Box::new(body),
                }
            }
            Command::Text(variant) => {
                self.skip_spaces();
                let (text, end) = if self.peek().is_some_and(|next| next.text == "{") {
                    self.next();
                    let (raw, raw_loc) = self
                        .lexer
                        .raw_group()
                        .ok_or_else(|| self.error_here(ParseErrorKind::MissingCloseBrace))?;
                    (unescape_text(&raw), raw_loc)
                } else {
                    let arg = self.next().ok_or_else(|| {
                        self.error_here(ParseErrorKind::MissingArgument {
                            name: name.to_owned(),
                        })
                    })?;
                    (unescape_text(&arg.text), arg.loc)
                };
                ParseNode::Text {
                    text,
                    variant,
                    loc: loc.range(&end),
                }
            }
            Command::OperatorName => {
                let limits = self.peek().is_some_and(|next| next.text == "*");
                if limits {
                    self.next();
                }
                let (text, end) = self.parse_raw_argument(name)?;
                ParseNode::Op {
                    text: unescape_text(text.trim()),
                    named: true,
                    limits,
                    loc: loc.range(&end),
                }
            }
            Command::Color => {
                return Err(ParseError::with_token(
                    ParseErrorKind::MissingArgument {
                        name: name.to_owned(),
                    },
                    &token,
                ));
            }
            Command::TextColor => {
                let (color, _) = self.parse_color(&token)?;
                let body = self.parse_argument(name)?;
                ParseNode::Color {
                    loc: loc.range(body.loc()),
                    color,
                    body: vec![body],
                }
            }
            Command::Left => {
                let (left, _) = self.parse_delimiter(name)?;
                let body = self.parse_expression(Breaks::LEFT_RIGHT)?;
                match self.next() {
                    Some(right) if right.text == r"\right" => {
                        let (delim, end) = self.parse_delimiter(&right.text)?;
                        ParseNode::LeftRight {
                            left: left.to_owned(),
                            right: delim.to_owned(),
                            body,
                            loc: loc.range(&end),
                        }
                    }
                    _ => return Err(ParseError::with_token(ParseErrorKind::MissingRight, &token)),
                }
            }
            Command::Right => {
                return Err(ParseError::with_token(ParseErrorKind::ExtraRight, &token));
            }
            Command::Sized(size, family) => {
                let (delim, end) = self.parse_delimiter(name)?;
                ParseNode::Atom {
                    family,
                    text: delim.to_owned(),
                    size: Some(size),
                    loc: loc.range(&end),
                }
            }
            Command::Space(width) => ParseNode::Space {
                width,
                line_break: false,
                loc,
            },
            Command::Begin => return self.parse_environment(token),
            Command::End => {
                return Err(ParseError::with_token(
                    ParseErrorKind::UnexpectedAlignment {
                        token: token.text.clone(),
                    },
                    &token,
                ));
            }
            Command::Enclose(notation) => {
                let body = self.parse_argument(name)?;
                ParseNode::Enclose {
                    loc: loc.range(body.loc()),
                    notation,
                    body: Box::new(body),
                }
            }
            Command::Fence(left, right) => {
                let body = self.parse_argument(name)?;
                ParseNode::LeftRight {
                    loc: loc.range(body.loc()),
                    left: left.to_owned(),
                    right: right.to_owned(),
                    body: vec![body],
                }
            }
        };
        Ok(node)
    }

    fn parse_environment(&mut self, begin: Token) -> Result<ParseNode, ParseError> {
        let (name, name_loc) = self.parse_raw_argument(&begin.text)?;
        let name = name.trim().to_owned();
        let Some(spec) = packages::environment(&name, self.packages) else {
            return Err(ParseError::with_token(
                ParseErrorKind::UnknownEnvironment { name },
                &name_loc,
            ));
        };
        if spec.columns_argument {
            self.parse_raw_argument(&name)?;
        }

        let mut rows = Vec::new();
        let mut row = Vec::new();
        loop {
            let cell = self.parse_expression(Breaks::CELL)?;
            row.push(cell);
            match self.next() {
                Some(token) if token.text == "&" => {}
                Some(token) if token.text == r"\\" => rows.push(mem::take(&mut row)),
                Some(token) if token.text == r"\end" => {
                    self.unget(token);
                    break;
                }
                _ => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::MissingEnd { name },
                        &begin,
                    ));
                }
            }
        }
        // A trailing `\\` leaves one empty cell behind.
        if !(row.len() == 1 && row[0].is_empty() && !rows.is_empty()) {
            rows.push(row);
        }

        let end = self.next().ok_or_else(|| {
            self.error_here(ParseErrorKind::MissingEnd { name: name.clone() })
        })?;
        let (end_name, end_loc) = self.parse_raw_argument(&end.text)?;
        if end_name.trim() != name {
            return Err(ParseError::with_token(
                ParseErrorKind::MismatchedEnvironment {
                    begin: name,
                    end: end_name.trim().to_owned(),
                },
                &end_loc,
            ));
        }
        Ok(ParseNode::Environment {
            name,
            left: spec.left,
            right: spec.right,
            rows,
            loc: begin.loc.range(&end_loc),
        })
    }
}

/// Replaces text-mode escapes (`\$`, `\{`, `~`) with the characters they
/// stand for; other control sequences are kept literally.
fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped @ ('$' | '%' | '&' | '#' | '_' | '{' | '}' | ' ')) => out.push(escaped),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '~' => out.push('\u{A0}'),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(source: &str) -> Vec<ParseNode> {
        match parse(source, PackageSet::all()) {
            Ok(ParseNode::Group { body, .. }) => body,
            other => panic!("unexpected parse result {other:?}"),
        }
    }

    fn error(source: &str) -> ParseErrorKind {
        *parse(source, PackageSet::all()).unwrap_err().kind
    }

    #[test]
    fn numbers_and_identifiers() {
        let nodes = body("x+12.5");
        assert!(matches!(
            &nodes[0],
            ParseNode::Ord { text, variant: Variant::Italic, number: false, .. } if text == "x"
        ));
        assert!(matches!(&nodes[1], ParseNode::Atom { family: Family::Bin, .. }));
        assert!(matches!(
            &nodes[2],
            ParseNode::Ord { text, number: true, .. } if text == "12.5"
        ));
    }

    #[test]
    fn scripts_attach_to_the_previous_node() {
        let nodes = body("x_i^2");
        assert_eq!(nodes.len(), 1);
        let ParseNode::SupSub { base, sup, sub, loc } = &nodes[0] else {
            panic!("expected scripts");
        };
        assert!(base.is_some() && sup.is_some() && sub.is_some());
        assert_eq!(loc.text(), "x_i^2");
    }

    #[test]
    fn double_scripts_are_errors() {
        assert_eq!(error("x^1^2"), ParseErrorKind::DoubleSuperscript);
        assert_eq!(error("x_1_2"), ParseErrorKind::DoubleSubscript);
        assert!(body("{x^1}^2").len() == 1);
    }

    #[test]
    fn brace_errors() {
        assert_eq!(error("{x"), ParseErrorKind::MissingCloseBrace);
        assert_eq!(error("x}"), ParseErrorKind::ExtraCloseBrace);
        assert_eq!(
            error(r"\frac{a}"),
            ParseErrorKind::MissingArgument {
                name: r"\frac".to_owned()
            }
        );
    }

    #[test]
    fn undefined_and_package_gated_commands() {
        assert_eq!(
            error(r"\foo"),
            ParseErrorKind::UndefinedControlSequence {
                name: r"\foo".to_owned()
            }
        );
        let err = parse(r"\dfrac12", PackageSet::base()).unwrap_err();
        assert!(matches!(
            *err.kind,
            ParseErrorKind::UndefinedControlSequence { .. }
        ));
        assert_eq!(err.position, Some(0));
    }

    #[test]
    fn left_right_pairs() {
        let nodes = body(r"\left( \frac{1}{2} \right.");
        assert!(matches!(
            &nodes[0],
            ParseNode::LeftRight { left, right, .. } if left == "(" && right.is_empty()
        ));
        assert_eq!(error(r"\left( x"), ParseErrorKind::MissingRight);
        assert_eq!(error(r"x \right)"), ParseErrorKind::ExtraRight);
        assert!(matches!(
            error(r"\left\foo x\right)"),
            ParseErrorKind::MissingDelimiter { .. }
        ));
    }

    #[test]
    fn environments_split_rows_and_cells() {
        let nodes = body(r"\begin{pmatrix} a & b \\ c & d \\ \end{pmatrix}");
        let ParseNode::Environment {
            name, rows, left, ..
        } = &nodes[0]
        else {
            panic!("expected environment");
        };
        assert_eq!(name, "pmatrix");
        assert_eq!(*left, Some("("));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn environment_errors() {
        assert_eq!(
            error(r"\begin{matrix} a \end{cases}"),
            ParseErrorKind::MismatchedEnvironment {
                begin: "matrix".to_owned(),
                end: "cases".to_owned()
            }
        );
        assert_eq!(
            error(r"\begin{nope} a \end{nope}"),
            ParseErrorKind::UnknownEnvironment {
                name: "nope".to_owned()
            }
        );
        assert_eq!(
            error(r"\begin{matrix} a"),
            ParseErrorKind::MissingEnd {
                name: "matrix".to_owned()
            }
        );
        assert!(matches!(error("a & b"), ParseErrorKind::UnexpectedAlignment { .. }));
    }

    #[test]
    fn color_switch_covers_the_rest_of_the_group() {
        let nodes = body(r"a {\color{red} b c} d");
        let ParseNode::Group { body: inner, .. } = &nodes[1] else {
            panic!("expected group");
        };
        assert!(matches!(
            &inner[0],
            ParseNode::Color { color, body, .. } if color == "red" && body.len() == 2
        ));
        assert!(matches!(
            error(r"\color{nocolor} x"),
            ParseErrorKind::InvalidColor { .. }
        ));
    }

    #[test]
    fn text_arguments_keep_spaces_and_unescape() {
        let nodes = body(r"\text{a \$5 bill}");
        assert!(matches!(
            &nodes[0],
            ParseNode::Text { text, .. } if text == "a $5 bill"
        ));
    }

    #[test]
    fn sqrt_with_index_and_primes() {
        let nodes = body(r"\sqrt[3]{x} f''");
        assert!(matches!(&nodes[0], ParseNode::Sqrt { index: Some(_), .. }));
        assert!(matches!(
            &nodes[1],
            ParseNode::SupSub { sup: Some(sup), .. }
                if matches!(sup.as_ref(), ParseNode::Ord { text, .. } if text == "\u{2032}\u{2032}")
        ));
    }

    #[test]
    fn limits_apply_to_the_previous_operator() {
        let nodes = body(r"\int\limits_0^1");
        assert!(matches!(
            &nodes[0],
            ParseNode::SupSub { base: Some(base), .. }
                if matches!(base.as_ref(), ParseNode::Op { limits: true, .. })
        ));
    }

    #[test]
    fn runaway_nesting_is_rejected() {
        let source = "{".repeat(MAX_DEPTH + 1) + &"}".repeat(MAX_DEPTH + 1);
        assert_eq!(error(&source), ParseErrorKind::TooDeep);
    }
}
