//! Measurements taken from the live document during `getMetrics`.

/// Font and layout measurements of the element that contains a fragment.
///
/// All lengths are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Size of one em in the container's font
    pub em: f64,
    /// Size of one ex (x-height) in the container's font
    pub ex: f64,
    /// Available line width of the container
    pub container_width: f64,
}

impl Metrics {
    /// Default em size used when nothing better is known.
    pub const DEFAULT_EM: f64 = 16.0;
    /// Default container width used when nothing better is known.
    pub const DEFAULT_WIDTH: f64 = 1200.0;

    /// Metrics of a container whose font is `em` pixels and whose x-height
    /// is half an em.
    #[must_use]
    pub const fn from_em(em: f64, container_width: f64) -> Self {
        Self {
            em,
            ex: em / 2.0,
            container_width,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::from_em(Self::DEFAULT_EM, Self::DEFAULT_WIDTH)
    }
}
