use alloc::sync::Arc;

use crate::types::ErrorLocationProvider;

/// Represents a source location inside one math fragment.
///
/// The fragment source is shared through an [`Arc`] so that every token and
/// parse node produced while compiling a fragment can point back into it
/// without copying. Offsets are byte offsets into the fragment source.
///
/// # Cross-references
///
/// - Used in [`ParseError`](crate::types::ParseError) for error location
///   reporting.
/// - Integrated with [`ErrorLocationProvider`] for consistent error handling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Reference-counted fragment source that was processed.
    pub input: Arc<str>,

    /// Zero-based inclusive start offset in the fragment source.
    pub start: usize,

    /// Zero-based exclusive end offset in the fragment source.
    pub end: usize,
}

impl SourceLocation {
    /// Creates a new `SourceLocation` with the given input string and position
    /// range.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathdoc::types::SourceLocation;
    /// use std::sync::Arc;
    ///
    /// let input = Arc::from("x^2");
    /// let loc = SourceLocation::new(input, 0, 3);
    /// assert_eq!(loc.end(), 3);
    /// ```
    #[must_use]
    pub const fn new(input: Arc<str>, start: usize, end: usize) -> Self {
        Self { input, start, end }
    }

    /// Creates a new `SourceLocation` from a string slice and position range.
    #[must_use]
    pub fn from_str(input: &str, start: usize, end: usize) -> Self {
        Self::new(Arc::from(input), start, end)
    }

    /// Returns the start offset of this source location.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset of this source location.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the fragment source this location points into.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the text covered by this location.
    #[must_use]
    pub fn text(&self) -> &str {
        self.input.get(self.start..self.end).unwrap_or_default()
    }

    /// Merges two locations into one spanning from the start of `self` to the
    /// end of `other`. Locations over different inputs are not merged.
    #[must_use]
    pub fn range(&self, other: &Self) -> Self {
        if Arc::ptr_eq(&self.input, &other.input) {
            Self::new(Arc::clone(&self.input), self.start, other.end.max(self.end))
        } else {
            self.clone()
        }
    }
}

impl ErrorLocationProvider for SourceLocation {
    fn loc(&self) -> Option<&SourceLocation> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_covers_both_locations() {
        let input: Arc<str> = Arc::from(r"\frac{a}{b}");
        let first = SourceLocation::new(Arc::clone(&input), 0, 5);
        let second = SourceLocation::new(Arc::clone(&input), 8, 11);
        let merged = first.range(&second);
        assert_eq!(merged.start(), 0);
        assert_eq!(merged.end(), 11);
        assert_eq!(merged.text(), r"\frac{a}{b}");
    }

    #[test]
    fn range_ignores_foreign_input() {
        let first = SourceLocation::from_str("ab", 0, 1);
        let second = SourceLocation::from_str("ab", 1, 2);
        assert_eq!(first.range(&second), first);
    }
}
