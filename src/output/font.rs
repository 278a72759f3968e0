//! Font policies: which glyph definitions the output processor injects.
//!
//! Output markup never depends on the policy. Every glyph is written as an
//! empty `mjx-c` hook element carrying its code point class; the policy only
//! decides which of those hooks get a CSS rule that draws the character.

use alloc::collections::BTreeSet;
use core::fmt;

use crate::input::Variant;
use crate::utils::{codepoint_hex, escape_css_string};

/// One glyph hook used by rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Glyph {
    /// Character drawn by the hook
    pub ch: char,
    /// Alphabet the character is drawn from
    pub variant: Variant,
}

impl Glyph {
    /// Creates a glyph.
    #[must_use]
    pub const fn new(ch: char, variant: Variant) -> Self {
        Self { ch, variant }
    }

    /// Code point class of the hook element (`mjx-c78`).
    #[must_use]
    pub fn class(&self) -> String {
        format!("mjx-c{}", codepoint_hex(self.ch))
    }

    /// CSS selector matching the hook element.
    #[must_use]
    pub fn selector(&self) -> String {
        match self.variant.font_class() {
            Some(font) => format!("mjx-c.{}.{font}", self.class()),
            None => format!("mjx-c.{}", self.class()),
        }
    }
}

/// Glyphs used during one invocation, ordered so rules come out stable.
pub type GlyphCache = BTreeSet<Glyph>;

/// Characters a font policy can draw, as inclusive ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontTable {
    ranges: &'static [(char, char)],
}

impl FontTable {
    /// A table that draws nothing.
    pub const EMPTY: Self = Self { ranges: &[] };

    /// Creates a table from sorted, inclusive character ranges.
    #[must_use]
    pub const fn new(ranges: &'static [(char, char)]) -> Self {
        Self { ranges }
    }

    /// Whether the table has a definition for `ch`.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .iter()
            .any(|&(first, last)| (first..=last).contains(&ch))
    }

    /// Whether the table defines no glyph at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The CSS rule drawing `glyph`, if the table defines it.
    ///
    /// ```
    /// use mathdoc::input::Variant;
    /// use mathdoc::output::{FontPolicy, Glyph, TexFont};
    ///
    /// let rule = TexFont.resolve_fonts().rule(Glyph::new('x', Variant::Italic));
    /// assert_eq!(rule.as_deref(), Some(r#"mjx-c.mjx-c78.TEX-I::before { content: "x"; }"#));
    /// ```
    #[must_use]
    pub fn rule(&self, glyph: Glyph) -> Option<String> {
        self.contains(glyph.ch).then(|| {
            format!(
                "{}::before {{ content: \"{}\"; }}",
                glyph.selector(),
                escape_css_string(glyph.ch.encode_utf8(&mut [0; 4]))
            )
        })
    }
}

/// Strategy deciding which glyph definitions are available.
pub trait FontPolicy: Send + Sync + fmt::Debug {
    /// Policy name used in logs.
    fn name(&self) -> &'static str;

    /// The glyph table of this policy.
    fn resolve_fonts(&self) -> &FontTable;
}

static TEX_RANGES: [(char, char); 14] = [
    ('\u{20}', '\u{7E}'),
    ('\u{A0}', '\u{FF}'),
    ('\u{131}', '\u{131}'),
    ('\u{2C6}', '\u{2DC}'),
    ('\u{300}', '\u{36F}'),
    ('\u{391}', '\u{3F6}'),
    ('\u{2013}', '\u{2044}'),
    ('\u{20D7}', '\u{20D7}'),
    ('\u{2102}', '\u{2135}'),
    ('\u{2190}', '\u{23B1}'),
    ('\u{25A0}', '\u{266F}'),
    ('\u{27E8}', '\u{27FF}'),
    ('\u{2A00}', '\u{2AFF}'),
    ('\u{1D400}', '\u{1D7FF}'),
];

static TEX_TABLE: FontTable = FontTable::new(&TEX_RANGES);

/// Built-in TeX glyph table. Rules for the glyphs a document uses are
/// injected at update time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexFont;

impl FontPolicy for TexFont {
    fn name(&self) -> &'static str {
        "tex"
    }

    fn resolve_fonts(&self) -> &FontTable {
        &TEX_TABLE
    }
}

/// Policy for pages that bundle the font stylesheets themselves: the table
/// is empty, so nothing is ever injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyFont;

impl FontPolicy for EmptyFont {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn resolve_fonts(&self) -> &FontTable {
        &FontTable::EMPTY
    }
}
