//! Locates math fragments inside a run of document text.

use crate::types::{MathMode, TexConfig};

/// How a fragment was recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// Between an open and a close delimiter
    Delimited {
        /// Opening delimiter
        open: String,
        /// Closing delimiter
        close: String,
    },
    /// A `\begin{name}…\end{name}` block
    Environment {
        /// Environment name
        name: String,
    },
    /// An escaped delimiter character (`\$`), to be shown literally
    Escaped,
}

/// One fragment found in a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathMatch {
    /// Byte offset of the first delimiter character
    pub start: usize,
    /// Byte offset just past the last delimiter character
    pub end: usize,
    /// Math source without delimiters. Environments keep their `\begin` and
    /// `\end`; escapes hold the literal character.
    pub source: String,
    /// Inline or display
    pub mode: MathMode,
    /// How the fragment was recognised
    pub kind: MatchKind,
}

#[derive(Debug, Clone)]
enum StartKind {
    Open { close: String, mode: MathMode },
    Begin,
    Escape,
}

#[derive(Debug, Clone)]
struct StartPattern {
    text: String,
    kind: StartKind,
}

/// Delimiter scanner built from a [`TexConfig`].
#[derive(Debug, Clone)]
pub struct MathFinder {
    patterns: Vec<StartPattern>,
}

const BEGIN: &str = r"\begin{";
const ESCAPED_DOLLAR: &str = r"\$";

impl MathFinder {
    /// Builds the start patterns, longest first.
    #[must_use]
    pub fn new(config: &TexConfig) -> Self {
        let mut patterns: Vec<StartPattern> = config
            .delimiters()
            .map(|(delim, mode)| StartPattern {
                text: delim.open.clone(),
                kind: StartKind::Open {
                    close: delim.close.clone(),
                    mode,
                },
            })
            .collect();
        if config.process_environments {
            patterns.push(StartPattern {
                text: BEGIN.to_owned(),
                kind: StartKind::Begin,
            });
        }
        if config.process_escapes {
            patterns.push(StartPattern {
                text: ESCAPED_DOLLAR.to_owned(),
                kind: StartKind::Escape,
            });
        }
        patterns.retain(|pattern| !pattern.text.is_empty());
        patterns.sort_by(|a, b| b.text.len().cmp(&a.text.len()));
        Self { patterns }
    }

    /// Finds every fragment of `text`, in order. Fragments never overlap.
    ///
    /// ```
    /// use mathdoc::input::MathFinder;
    /// use mathdoc::types::TexConfig;
    ///
    /// let finder = MathFinder::new(&TexConfig::default());
    /// let found = finder.find(r"Let $x$ and \[y\].");
    /// assert_eq!(found.len(), 2);
    /// assert_eq!(found[0].source, "x");
    /// assert_eq!(found[1].source, "y");
    /// ```
    #[must_use]
    pub fn find(&self, text: &str) -> Vec<MathMatch> {
        let mut found = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            let Some(pattern) = self
                .patterns
                .iter()
                .find(|pattern| rest.starts_with(&pattern.text))
            else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            };
            let after_open = pos + pattern.text.len();
            match &pattern.kind {
                StartKind::Escape => {
                    found.push(MathMatch {
                        start: pos,
                        end: after_open,
                        source: "$".to_owned(),
                        mode: MathMode::Inline,
                        kind: MatchKind::Escaped,
                    });
                    pos = after_open;
                }
                StartKind::Open { close, mode } => {
                    match find_close(text, after_open, close) {
                        Some(close_start) => {
                            let end = close_start + close.len();
                            found.push(MathMatch {
                                start: pos,
                                end,
                                source: text[after_open..close_start].to_owned(),
                                mode: *mode,
                                kind: MatchKind::Delimited {
                                    open: pattern.text.clone(),
                                    close: close.clone(),
                                },
                            });
                            pos = end;
                        }
                        None => pos = after_open,
                    }
                }
                StartKind::Begin => match environment_end(text, after_open) {
                    Ok((name, end)) => {
                        found.push(MathMatch {
                            start: pos,
                            end,
                            source: text[pos..end].to_owned(),
                            mode: MathMode::Display,
                            kind: MatchKind::Environment { name },
                        });
                        pos = end;
                    }
                    Err(skip_to) => pos = skip_to,
                },
            }
        }
        found
    }
}

/// Finds the start of `close` at brace depth zero, skipping `\x` escapes.
fn find_close(text: &str, from: usize, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut index = from;
    while index < text.len() {
        let rest = &text[index..];
        if depth == 0 && rest.starts_with(close) {
            return Some(index);
        }
        let mut chars = rest.chars();
        let ch = chars.next()?;
        index += ch.len_utf8();
        match ch {
            '\\' => index += chars.next().map_or(0, char::len_utf8),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Parses the environment name after `\begin{` and finds the end of the
/// matching `\end{name}`, honouring nested blocks of the same name.
///
/// On failure returns the offset scanning should resume from.
fn environment_end(text: &str, after_begin: usize) -> Result<(String, usize), usize> {
    let rest = &text[after_begin..];
    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '*'))
        .unwrap_or(rest.len());
    if name_len == 0 || !rest[name_len..].starts_with('}') {
        return Err(after_begin);
    }
    let name = &rest[..name_len];
    let body_start = after_begin + name_len + 1;
    let open = format!(r"\begin{{{name}}}");
    let close = format!(r"\end{{{name}}}");

    let mut depth = 0usize;
    let mut index = body_start;
    while index < text.len() {
        let rest = &text[index..];
        if rest.starts_with(&open) {
            depth += 1;
            index += open.len();
        } else if rest.starts_with(&close) {
            if depth == 0 {
                return Ok((name.to_owned(), index + close.len()));
            }
            depth -= 1;
            index += close.len();
        } else {
            index += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    Err(body_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Delimiter;

    fn sources(text: &str) -> Vec<(String, MathMode)> {
        MathFinder::new(&TexConfig::default())
            .find(text)
            .into_iter()
            .map(|m| (m.source, m.mode))
            .collect()
    }

    #[test]
    fn all_four_default_delimiters() {
        assert_eq!(
            sources(r"a $x$ b \(y\) c $$z$$ d \[w\] e"),
            [
                ("x".to_owned(), MathMode::Inline),
                ("y".to_owned(), MathMode::Inline),
                ("z".to_owned(), MathMode::Display),
                ("w".to_owned(), MathMode::Display),
            ]
        );
    }

    #[test]
    fn offsets_cover_the_delimiters() {
        let text = r"pre \(a+b\) post";
        let found = MathFinder::new(&TexConfig::default()).find(text);
        assert_eq!(&text[found[0].start..found[0].end], r"\(a+b\)");
    }

    #[test]
    fn escaped_dollars_are_literal() {
        let found = MathFinder::new(&TexConfig::default()).find(r"costs \$5 and \$6");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|m| m.kind == MatchKind::Escaped));

        let unescaped = TexConfig::builder().process_escapes(false).build();
        // the opening `$` finds no close because `\$` is skipped as an escape
        assert!(MathFinder::new(&unescaped).find(r"costs \$5 and \$6").is_empty());
    }

    #[test]
    fn close_delimiters_inside_braces_or_escapes_do_not_count() {
        assert_eq!(sources(r"$\text{$}x$")[0].0, r"\text{$}x");
        assert_eq!(sources(r"$a\$b$")[0].0, r"a\$b");
    }

    #[test]
    fn unmatched_openers_stay_text() {
        assert!(sources("price: $5").is_empty());
        assert_eq!(sources("$$ a $b$")[0].0, "b");
    }

    #[test]
    fn environments_nest_and_keep_their_markers() {
        let text = r"see \begin{matrix} \begin{matrix} 1 \end{matrix} \end{matrix} ok";
        let found = MathFinder::new(&TexConfig::default()).find(text);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].source,
            r"\begin{matrix} \begin{matrix} 1 \end{matrix} \end{matrix}"
        );
        assert_eq!(
            found[0].kind,
            MatchKind::Environment {
                name: "matrix".to_owned()
            }
        );

        let disabled = TexConfig::builder().process_environments(false).build();
        assert!(MathFinder::new(&disabled).find(text).is_empty());
    }

    #[test]
    fn custom_delimiters_are_honoured() {
        let config = TexConfig::builder()
            .inline_math(vec![Delimiter::new("@@", "@@")])
            .display_math(vec![])
            .build();
        let found = MathFinder::new(&config).find("a @@x@@ $y$");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "x");
    }
}
