//! Core type definitions shared by the pipeline, the output builder and the
//! menu widget.

use core::fmt::{self, Write as _};

use strum::{AsRefStr, Display, EnumCount, EnumIter, FromRepr};

mod parse_error;
pub use parse_error::{ErrorLocationProvider, ParseError, ParseErrorKind};

mod session_error;
pub use session_error::{SessionError, SessionErrorKind};

mod source_location;
pub use source_location::SourceLocation;

mod settings;
pub use settings::{
    ChtmlConfig, Delimiter, DocumentOptions, FontChoice, MathMode, PackageSet, TexConfig,
};

/// Represents the CSS property names written by the output and menu builders.
///
/// This enum is serialized in `kebab-case` (the standard CSS syntax) via
/// `strum`.
#[derive(
    EnumIter, Debug, Copy, AsRefStr, PartialEq, Eq, Hash, Clone, Display, EnumCount, FromRepr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum CssProperty {
    /// See: <https://developer.mozilla.org/docs/Web/CSS/background-color>
    BackgroundColor,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/color>
    Color,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/display>
    Display,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/font-size>
    FontSize,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/height>
    Height,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/left>
    Left,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/max-height>
    MaxHeight,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/min-width>
    MinWidth,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/position>
    Position,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/top>
    Top,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/width>
    Width,
    /// See: <https://developer.mozilla.org/docs/Web/CSS/z-index>
    ZIndex,
}

/// Inline style object: at most one value per [`CssProperty`], written in
/// declaration order of the enum so markup is deterministic.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CssStyle {
    map: [Option<String>; CssProperty::COUNT],
}

impl fmt::Debug for CssStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("CssStyle");
        for (property, value) in self {
            ds.field(property.as_ref(), &value);
        }
        ds.finish()
    }
}

/// Iterator over CSS style properties
pub struct CssStyleIter<'a> {
    index: usize,
    data: &'a [Option<String>; CssProperty::COUNT],
}

impl<'a> Iterator for CssStyleIter<'a> {
    type Item = (CssProperty, &'a str);
    fn next(&mut self) -> Option<Self::Item> {
        while self.index < CssProperty::COUNT {
            let idx = self.index;
            self.index += 1;
            if let Some(v) = &self.data[idx]
                && let Some(prop) = CssProperty::from_repr(idx as u8)
            {
                return Some((prop, v.as_str()));
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a CssStyle {
    type Item = (CssProperty, &'a str);
    type IntoIter = CssStyleIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        CssStyleIter {
            index: 0,
            data: &self.map,
        }
    }
}

impl CssStyle {
    /// Inserts or updates a CSS property with the given value.
    #[inline]
    pub fn insert(&mut self, property: CssProperty, value: impl Into<String>) {
        self.map[property as usize] = Some(value.into());
    }

    /// Builder-style variant of [`CssStyle::insert`].
    #[must_use]
    pub fn with(mut self, property: CssProperty, value: impl Into<String>) -> Self {
        self.insert(property, value);
        self
    }

    /// Returns the value for a property, if set.
    #[must_use]
    pub fn get(&self, property: CssProperty) -> Option<&str> {
        self.map[property as usize].as_deref()
    }

    /// Removes a property.
    pub fn remove(&mut self, property: CssProperty) {
        self.map[property as usize] = None;
    }

    /// Extends the current style with properties from another `CssStyle`.
    /// Values from `other` win.
    pub fn extend(&mut self, other: &Self) {
        for (property, value) in other {
            self.insert(property, value);
        }
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.iter().all(Option::is_none)
    }

    /// Iterates over the set properties.
    #[must_use]
    pub fn iter(&self) -> CssStyleIter<'_> {
        self.into_iter()
    }

    /// Serializes the style as an inline `style` attribute value.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        self.iter().fold(String::new(), |mut out, (key, value)| {
            let _ = write!(out, "{key}:{value};");
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_iterates_in_property_order() {
        let style = CssStyle::default()
            .with(CssProperty::Top, "4px")
            .with(CssProperty::Position, "absolute")
            .with(CssProperty::Color, "red");
        assert_eq!(
            style.to_attribute(),
            "color:red;position:absolute;top:4px;"
        );
    }

    #[test]
    fn extend_overrides_existing_values() {
        let mut style = CssStyle::default().with(CssProperty::Left, "0px");
        style.extend(&CssStyle::default().with(CssProperty::Left, "12px"));
        assert_eq!(style.get(CssProperty::Left), Some("12px"));
        style.remove(CssProperty::Left);
        assert!(style.is_empty());
    }
}
