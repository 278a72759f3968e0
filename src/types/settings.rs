//! Configuration of the input processor, the output processor and document
//! discovery.
//!
//! All three structs follow the same shape: public fields with concrete
//! values, a `bon` builder whose inputs are all optional, and a `Default`
//! implementation that is simply the empty builder. They also deserialize
//! from the JSON configuration surface (see [`crate::config`]).

use core::fmt;

use bon::bon;
use serde::Deserialize;
use strum::{Display, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::input::Package;
use crate::types::{SessionError, SessionErrorKind};

/// Whether a fragment is typeset inline or as a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathMode {
    /// Inline fragment (`$…$`, `\(…\)`)
    Inline,
    /// Block fragment (`$$…$$`, `\[…\]`, environments)
    Display,
}

/// One `(open, close)` delimiter pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Delimiter {
    /// Opening string
    pub open: String,
    /// Closing string
    pub close: String,
}

impl Delimiter {
    /// Create a new delimiter pair
    #[must_use]
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_owned(),
            close: close.to_owned(),
        }
    }
}

impl From<(String, String)> for Delimiter {
    fn from((open, close): (String, String)) -> Self {
        Self { open, close }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…{}", self.open, self.close)
    }
}

/// Set of enabled markup packages. `base` is always present.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "PackageSpec")]
pub struct PackageSet {
    bits: u32,
}

impl PackageSet {
    /// Every known package: the broadest markup vocabulary.
    #[must_use]
    pub fn all() -> Self {
        Package::iter().collect()
    }

    /// Only the `base` package.
    #[must_use]
    pub const fn base() -> Self {
        Self {
            bits: 1 << Package::Base as u32,
        }
    }

    /// Add a package to the set
    pub const fn insert(&mut self, package: Package) {
        self.bits |= 1 << package as u32;
    }

    /// Whether the package is enabled
    #[must_use]
    pub const fn contains(&self, package: Package) -> bool {
        self.bits & (1 << package as u32) != 0
    }

    /// Iterate over the enabled packages
    pub fn iter(&self) -> impl Iterator<Item = Package> + '_ {
        Package::iter().filter(|package| self.contains(*package))
    }
}

impl Default for PackageSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Package> for PackageSet {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut set = Self::base();
        for package in iter {
            set.insert(package);
        }
        set
    }
}

impl fmt::Debug for PackageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PackageSpec {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<PackageSpec> for PackageSet {
    type Error = strum::ParseError;

    fn try_from(spec: PackageSpec) -> Result<Self, Self::Error> {
        match spec {
            PackageSpec::Keyword(word) if word == "all" => Ok(Self::all()),
            PackageSpec::Keyword(word) => Ok(core::iter::once(word.parse::<Package>()?).collect()),
            PackageSpec::List(names) => names
                .iter()
                .map(|name| name.parse::<Package>())
                .collect::<Result<Self, _>>(),
        }
    }
}

/// Input (TeX) processor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TexConfig {
    /// Enabled extension packages.
    pub packages: PackageSet,
    /// Inline delimiter pairs, tried longest opening string first.
    pub inline_math: Vec<Delimiter>,
    /// Display delimiter pairs, tried longest opening string first.
    pub display_math: Vec<Delimiter>,
    /// Treat `\$` as a literal dollar sign instead of a delimiter.
    pub process_escapes: bool,
    /// Recognise `\begin{…}…\end{…}` blocks outside explicit delimiters.
    pub process_environments: bool,
}

#[bon]
impl TexConfig {
    /// Creates a new [`TexConfig`] from optional configuration values.
    ///
    /// # Default Values
    /// - `packages`: every package
    /// - `inline_math`: `$…$` and `\(…\)`
    /// - `display_math`: `$$…$$` and `\[…\]`
    /// - `process_escapes`: `true`
    /// - `process_environments`: `true`
    #[must_use]
    #[builder]
    pub fn new(
        /// Enabled extension packages.
        packages: Option<PackageSet>,
        /// Inline delimiter pairs.
        inline_math: Option<Vec<Delimiter>>,
        /// Display delimiter pairs.
        display_math: Option<Vec<Delimiter>>,
        /// Escaped delimiter passthrough.
        process_escapes: Option<bool>,
        /// Environment block recognition.
        process_environments: Option<bool>,
    ) -> Self {
        Self {
            packages: packages.unwrap_or_default(),
            inline_math: inline_math
                .unwrap_or_else(|| vec![Delimiter::new("$", "$"), Delimiter::new(r"\(", r"\)")]),
            display_math: display_math
                .unwrap_or_else(|| vec![Delimiter::new("$$", "$$"), Delimiter::new(r"\[", r"\]")]),
            process_escapes: process_escapes.unwrap_or(true),
            process_environments: process_environments.unwrap_or(true),
        }
    }

    /// Iterates every configured pair together with its mode.
    pub fn delimiters(&self) -> impl Iterator<Item = (&Delimiter, MathMode)> {
        self.inline_math
            .iter()
            .map(|d| (d, MathMode::Inline))
            .chain(self.display_math.iter().map(|d| (d, MathMode::Display)))
    }

    /// Rejects empty, duplicated and overlapping delimiter pairs.
    ///
    /// Two pairs overlap when they start with the same opening string: the
    /// finder could not tell which closing string to search for. A shorter
    /// opening string that is a prefix of a longer one (`$` and `$$`) is fine
    /// since the longest opening string is always tried first.
    pub fn validate(&self) -> Result<(), SessionError> {
        let pairs: Vec<_> = self.delimiters().collect();
        for (index, (delim, mode)) in pairs.iter().enumerate() {
            let side = if delim.open.is_empty() {
                Some("open")
            } else if delim.close.is_empty() {
                Some("close")
            } else {
                None
            };
            if let Some(side) = side {
                return Err(SessionError::new(SessionErrorKind::EmptyDelimiter {
                    mode: (*mode).into(),
                    side,
                }));
            }
            for (other, _) in &pairs[..index] {
                if *other == *delim {
                    return Err(SessionError::new(SessionErrorKind::DuplicateDelimiter {
                        open: delim.open.clone(),
                        close: delim.close.clone(),
                    }));
                }
                if other.open == delim.open {
                    return Err(SessionError::new(SessionErrorKind::OverlappingDelimiters {
                        first: other.open.clone(),
                        second: delim.open.clone(),
                    }));
                }
            }
        }
        Ok(())
    }
}

impl Default for TexConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Which font strategy the output processor is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FontChoice {
    /// Built-in TeX glyph table; glyph rules are injected at typeset time.
    #[default]
    Tex,
    /// Empty glyph table; glyphs come from externally bundled stylesheets.
    Empty,
}

/// Output (CHTML) processor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChtmlConfig {
    /// Font strategy.
    pub font: FontChoice,
    /// Global scaling factor applied to every fragment.
    pub scale: f64,
    /// Smallest scaling factor produced by font height matching.
    pub min_scale: f64,
    /// Match the surrounding font's x-height.
    pub match_font_height: bool,
    /// CSS color used by error indicators.
    pub error_color: String,
}

#[bon]
impl ChtmlConfig {
    /// Creates a new [`ChtmlConfig`] from optional configuration values.
    #[must_use]
    #[builder]
    pub fn new(
        /// Font strategy.
        font: Option<FontChoice>,
        /// Global scaling factor.
        scale: Option<f64>,
        /// Smallest scaling factor.
        min_scale: Option<f64>,
        /// Match the surrounding font's x-height.
        match_font_height: Option<bool>,
        /// CSS color for error indicators.
        error_color: Option<String>,
    ) -> Self {
        Self {
            font: font.unwrap_or_default(),
            scale: scale.unwrap_or(1.0),
            min_scale: min_scale.unwrap_or(0.5),
            match_font_height: match_font_height.unwrap_or(true),
            error_color: error_color.unwrap_or_else(|| "#cc0000".to_owned()),
        }
    }
}

impl Default for ChtmlConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Document discovery options used by `findMath`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Tags whose content is never searched.
    pub skip_html_tags: Vec<String>,
    /// Classes that exclude an element's subtree.
    pub ignore_html_class: Vec<String>,
    /// Classes that (re-)enable processing of an element's subtree.
    pub process_html_class: Vec<String>,
}

#[bon]
impl DocumentOptions {
    /// Creates new [`DocumentOptions`] from optional configuration values.
    #[must_use]
    #[builder]
    pub fn new(
        /// Tags whose content is never searched.
        skip_html_tags: Option<Vec<String>>,
        /// Classes that exclude an element's subtree.
        ignore_html_class: Option<Vec<String>>,
        /// Classes that re-enable processing.
        process_html_class: Option<Vec<String>>,
    ) -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| (*s).to_owned()).collect();
        Self {
            skip_html_tags: skip_html_tags.unwrap_or_else(|| {
                owned(&[
                    "script",
                    "noscript",
                    "style",
                    "textarea",
                    "pre",
                    "code",
                    "annotation",
                    "annotation-xml",
                ])
            }),
            ignore_html_class: ignore_html_class
                .unwrap_or_else(|| owned(&["tex2jax_ignore", "mathjax_ignore"])),
            process_html_class: process_html_class
                .unwrap_or_else(|| owned(&["tex2jax_process", "mathjax_process"])),
        }
    }

    /// Whether the tag's subtree is skipped.
    #[must_use]
    pub fn skips_tag(&self, tag: &str) -> bool {
        self.skip_html_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_the_standard_delimiters() {
        let config = TexConfig::default();
        assert_eq!(config.inline_math.len(), 2);
        assert_eq!(config.display_math.len(), 2);
        assert!(config.process_escapes);
        assert!(config.process_environments);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_delimiters_are_rejected() {
        let config = TexConfig::builder()
            .inline_math(vec![Delimiter::new("$", "")])
            .build();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            *err.kind,
            SessionErrorKind::EmptyDelimiter {
                mode: "inline",
                side: "close"
            }
        ));
    }

    #[test]
    fn duplicate_and_overlapping_pairs_are_rejected() {
        let duplicate = TexConfig::builder()
            .display_math(vec![Delimiter::new("$$", "$$"), Delimiter::new("$$", "$$")])
            .build();
        assert!(matches!(
            *duplicate.validate().unwrap_err().kind,
            SessionErrorKind::DuplicateDelimiter { .. }
        ));

        let overlapping = TexConfig::builder()
            .inline_math(vec![Delimiter::new(r"\[", r"\)")])
            .build();
        assert!(matches!(
            *overlapping.validate().unwrap_err().kind,
            SessionErrorKind::OverlappingDelimiters { .. }
        ));
    }

    #[test]
    fn package_set_always_contains_base() {
        let set: PackageSet = [Package::Ams].into_iter().collect();
        assert!(set.contains(Package::Base));
        assert!(set.contains(Package::Ams));
        assert!(!set.contains(Package::Color));
        assert!(PackageSet::all().contains(Package::Color));
    }

    #[test]
    fn document_options_skip_code_blocks() {
        let options = DocumentOptions::default();
        assert!(options.skips_tag("PRE"));
        assert!(options.skips_tag("script"));
        assert!(!options.skips_tag("div"));
    }
}
