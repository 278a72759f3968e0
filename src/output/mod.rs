//! Output processing: rendering compiled fragments as CHTML.
//!
//! The output processor owns a [`FontPolicy`]. Rendering records every glyph
//! hook it writes into the invocation's [`GlyphCache`]; the session later asks
//! for the CSS rules of those glyphs and writes them into the stylesheet
//! named by [`OutputProcessor::stylesheet_id`].

use alloc::boxed::Box;
use core::fmt;

use crate::dom_tree::{Element, HtmlDomNode};
use crate::input::ParseNode;
use crate::metrics::Metrics;
use crate::types::{ChtmlConfig, CssProperty, FontChoice, MathMode, ParseError};

mod build;
use build::{Builder, percent};

mod font;
pub use font::{EmptyFont, FontPolicy, FontTable, Glyph, GlyphCache, TexFont};

/// Id of the stylesheet glyph rules are written into.
pub const STYLESHEET_ID: &str = "MJX-CHTML-styles";

/// Ratio of x-height to em in the TeX fonts.
const TEX_EX_RATIO: f64 = 0.442;

/// Renders compiled fragments into detached output trees.
pub trait OutputProcessor: Send + Sync + fmt::Debug {
    /// Short name used in logs (`"CHTML"`).
    fn name(&self) -> &'static str;

    /// The font policy the processor was constructed with.
    fn font(&self) -> &dyn FontPolicy;

    /// Id of the stylesheet holding glyph rules.
    fn stylesheet_id(&self) -> &'static str {
        STYLESHEET_ID
    }

    /// Scaling factor for a fragment whose container has `metrics`.
    fn scale(&self, metrics: &Metrics) -> f64;

    /// Renders one compiled fragment, recording the glyphs it uses.
    fn render(
        &self,
        tree: &ParseNode,
        mode: MathMode,
        metrics: &Metrics,
        glyphs: &mut GlyphCache,
    ) -> HtmlDomNode;

    /// Renders the error indicator for a fragment that failed to compile.
    fn render_error(
        &self,
        error: &ParseError,
        source: &str,
        mode: MathMode,
        metrics: &Metrics,
    ) -> HtmlDomNode;

    /// CSS rules for the glyphs the font policy defines, in glyph order.
    fn font_rules(&self, glyphs: &GlyphCache) -> Vec<String> {
        let table = self.font().resolve_fonts();
        glyphs.iter().filter_map(|glyph| table.rule(*glyph)).collect()
    }
}

/// CHTML output processor.
#[derive(Debug)]
pub struct ChtmlOutput {
    config: ChtmlConfig,
    font: Box<dyn FontPolicy>,
}

impl ChtmlOutput {
    /// Creates a processor using the font policy named by `config.font`.
    #[must_use]
    pub fn new(config: ChtmlConfig) -> Self {
        let font: Box<dyn FontPolicy> = match config.font {
            FontChoice::Tex => Box::new(TexFont),
            FontChoice::Empty => Box::new(EmptyFont),
        };
        Self { config, font }
    }

    /// Creates a processor with a caller-supplied font policy.
    #[must_use]
    pub fn with_font(config: ChtmlConfig, font: Box<dyn FontPolicy>) -> Self {
        Self { config, font }
    }

    /// The configuration this processor was built from.
    #[must_use]
    pub const fn config(&self) -> &ChtmlConfig {
        &self.config
    }

    fn container(&self, mode: MathMode, metrics: &Metrics) -> Element {
        let mut container = Element::new("mjx-container")
            .class("MathJax")
            .attr("jax", "CHTML");
        if mode == MathMode::Display {
            container = container.attr("display", "true");
        }
        let scale = self.scale(metrics);
        if (scale - 1.0).abs() > f64::EPSILON {
            container = container.css(CssProperty::FontSize, percent(scale));
        }
        container
    }
}

impl Default for ChtmlOutput {
    fn default() -> Self {
        Self::new(ChtmlConfig::default())
    }
}

impl OutputProcessor for ChtmlOutput {
    fn name(&self) -> &'static str {
        "CHTML"
    }

    fn font(&self) -> &dyn FontPolicy {
        self.font.as_ref()
    }

    fn scale(&self, metrics: &Metrics) -> f64 {
        if !self.config.match_font_height || metrics.em <= 0.0 {
            return self.config.scale;
        }
        let matched = (metrics.ex / metrics.em) / TEX_EX_RATIO;
        matched.max(self.config.min_scale) * self.config.scale
    }

    fn render(
        &self,
        tree: &ParseNode,
        mode: MathMode,
        metrics: &Metrics,
        glyphs: &mut GlyphCache,
    ) -> HtmlDomNode {
        let display = mode == MathMode::Display;
        let body = Builder::new(glyphs, display).build_root(tree);
        let mut math = Element::new("mjx-math").class("MJX-TEX");
        if display {
            math = math.attr("display", "true");
        }
        self.container(mode, metrics)
            .child(math.children(body))
            .into()
    }

    fn render_error(
        &self,
        error: &ParseError,
        source: &str,
        mode: MathMode,
        metrics: &Metrics,
    ) -> HtmlDomNode {
        let message = error.message();
        let merror = Element::new("mjx-merror")
            .css(CssProperty::Color, self.config.error_color.as_str())
            .attr("data-mjx-error", message.as_str())
            .attr("title", message)
            .child(Element::new("mjx-mtext").child(HtmlDomNode::text(source)));
        self.container(mode, metrics).child(merror).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse;
    use crate::tree::VirtualNode as _;
    use crate::types::{PackageSet, ParseErrorKind};

    fn unscaled(font: FontChoice) -> ChtmlOutput {
        ChtmlOutput::new(
            ChtmlConfig::builder()
                .font(font)
                .match_font_height(false)
                .build(),
        )
    }

    #[test]
    fn containers_mark_display_mode() {
        let output = unscaled(FontChoice::Tex);
        let tree = parse("x", PackageSet::all()).unwrap();
        let mut glyphs = GlyphCache::new();
        let inline = output.render(&tree, MathMode::Inline, &Metrics::default(), &mut glyphs);
        assert_eq!(
            inline.to_markup(),
            concat!(
                r#"<mjx-container class="MathJax" jax="CHTML">"#,
                r#"<mjx-math class="MJX-TEX"><mjx-mi><mjx-c class="mjx-c78 TEX-I"></mjx-c></mjx-mi></mjx-math>"#,
                "</mjx-container>",
            )
        );
        let display = output.render(&tree, MathMode::Display, &Metrics::default(), &mut glyphs);
        assert!(display.to_markup().starts_with(
            r#"<mjx-container class="MathJax" jax="CHTML" display="true"><mjx-math class="MJX-TEX" display="true">"#
        ));
    }

    #[test]
    fn markup_does_not_depend_on_the_font_policy() {
        let tree = parse(r"\sum_{i} x_i^2", PackageSet::all()).unwrap();
        let mut tex_glyphs = GlyphCache::new();
        let mut empty_glyphs = GlyphCache::new();
        let tex = unscaled(FontChoice::Tex).render(
            &tree,
            MathMode::Display,
            &Metrics::default(),
            &mut tex_glyphs,
        );
        let empty = unscaled(FontChoice::Empty).render(
            &tree,
            MathMode::Display,
            &Metrics::default(),
            &mut empty_glyphs,
        );
        assert_eq!(tex.to_markup(), empty.to_markup());
        assert_eq!(tex_glyphs, empty_glyphs);
        assert!(!unscaled(FontChoice::Tex).font_rules(&tex_glyphs).is_empty());
        assert!(unscaled(FontChoice::Empty).font_rules(&empty_glyphs).is_empty());
    }

    #[test]
    fn scale_matches_the_surrounding_x_height() {
        let output = ChtmlOutput::default();
        let metrics = Metrics {
            em: 20.0,
            ex: 8.84,
            container_width: 800.0,
        };
        assert!((output.scale(&metrics) - 1.0).abs() < 1e-9);

        let tiny = Metrics {
            em: 20.0,
            ex: 1.0,
            container_width: 800.0,
        };
        assert!((output.scale(&tiny) - 0.5).abs() < 1e-9);

        let doubled = ChtmlOutput::new(
            ChtmlConfig::builder()
                .scale(2.0)
                .match_font_height(false)
                .build(),
        );
        assert!((doubled.scale(&metrics) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn errors_render_as_merror_with_the_source() {
        let output = unscaled(FontChoice::Tex);
        let error = ParseError::new(ParseErrorKind::ExtraCloseBrace);
        let node = output.render_error(&error, "x}", MathMode::Inline, &Metrics::default());
        let merrors = node.find_all("mjx-merror");
        let merror = merrors[0];
        assert_eq!(merror.attribute("data-mjx-error"), Some(error.message().as_str()));
        assert_eq!(merror.attribute("title"), Some(error.message().as_str()));
        assert_eq!(merror.style.get(CssProperty::Color), Some("#cc0000"));
        assert_eq!(node.text_content(), "x}");
    }
}
