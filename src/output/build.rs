//! Turns a compiled fragment into a CHTML element tree.

use crate::dom_tree::{Element, HtmlDomNode};
use crate::input::{Family, FracStyle, ParseNode, Variant};
use crate::output::font::{Glyph, GlyphCache};
use crate::types::CssProperty;

/// Alphabet override in effect for the current subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontOverride {
    None,
    Replace(Variant),
    Embolden,
}

/// Builds the children of one `mjx-math` element, recording every glyph hook
/// it writes.
pub(crate) struct Builder<'a> {
    glyphs: &'a mut GlyphCache,
    font: FontOverride,
    display: bool,
}

impl<'a> Builder<'a> {
    pub(crate) const fn new(glyphs: &'a mut GlyphCache, display: bool) -> Self {
        Self {
            glyphs,
            font: FontOverride::None,
            display,
        }
    }

    /// Builds the top-level node list. A root group contributes its children
    /// directly.
    pub(crate) fn build_root(&mut self, root: &ParseNode) -> Vec<HtmlDomNode> {
        match root {
            ParseNode::Group { body, .. } => self.build_list(body),
            other => vec![self.build(other)],
        }
    }

    fn build_list(&mut self, nodes: &[ParseNode]) -> Vec<HtmlDomNode> {
        nodes.iter().map(|node| self.build(node)).collect()
    }

    fn resolve(&self, variant: Variant) -> Variant {
        match self.font {
            FontOverride::None => variant,
            FontOverride::Replace(font) => font,
            FontOverride::Embolden => variant.bold(),
        }
    }

    fn glyph_hooks(&mut self, text: &str, variant: Variant) -> Vec<HtmlDomNode> {
        text.chars()
            .map(|ch| {
                let glyph = Glyph::new(ch, variant);
                let mut hook = Element::new("mjx-c").class(glyph.class());
                if let Some(font) = variant.font_class() {
                    hook = hook.class(font);
                }
                self.glyphs.insert(glyph);
                HtmlDomNode::from(hook)
            })
            .collect()
    }

    fn token(&mut self, tag: &str, text: &str, variant: Variant) -> Element {
        let children = self.glyph_hooks(text, variant);
        Element::new(tag).children(children)
    }

    fn operator(&mut self, text: &str) -> Element {
        self.token("mjx-mo", text, Variant::Normal).class("mjx-n")
    }

    fn fence(&mut self, text: &str) -> Option<HtmlDomNode> {
        (!text.is_empty()).then(|| self.operator(text).attr("stretchy", "true").into())
    }

    fn with_display<T>(&mut self, display: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = core::mem::replace(&mut self.display, display);
        let result = f(self);
        self.display = saved;
        result
    }

    fn script(&mut self, node: &ParseNode) -> HtmlDomNode {
        let built = self.with_display(false, |builder| builder.build(node));
        match built {
            HtmlDomNode::Element(element) => element.attr("size", "s").into(),
            text @ HtmlDomNode::Text(_) => text,
        }
    }

    fn build(&mut self, node: &ParseNode) -> HtmlDomNode {
        match node {
            ParseNode::Ord {
                text,
                variant,
                number,
                ..
            } => {
                let tag = if *number { "mjx-mn" } else { "mjx-mi" };
                let variant = self.resolve(*variant);
                self.token(tag, text, variant).into()
            }
            ParseNode::Atom {
                family, text, size, ..
            } => {
                let mut mo = self.operator(text);
                match family {
                    Family::Bin => mo = mo.attr("space", "3"),
                    Family::Rel => mo = mo.attr("space", "4"),
                    Family::Ord | Family::Open | Family::Close | Family::Punct => {}
                }
                if let Some(size) = size {
                    mo = mo.css(CssProperty::FontSize, percent(*size));
                }
                mo.into()
            }
            ParseNode::Op { text, named, .. } => {
                if *named {
                    self.token("mjx-mi", text, self.resolve(Variant::Normal))
                        .class("mjx-n")
                        .into()
                } else {
                    let size = if self.display { "mjx-lop" } else { "mjx-sop" };
                    self.token("mjx-mo", text, Variant::Normal)
                        .class(size)
                        .into()
                }
            }
            ParseNode::Text { text, variant, .. } => {
                self.token("mjx-mtext", text, *variant).into()
            }
            ParseNode::Group { body, .. } => {
                Element::new("mjx-mrow").children(self.build_list(body)).into()
            }
            ParseNode::SupSub { base, sup, sub, .. } => self.build_scripts(
                base.as_deref(),
                sup.as_deref(),
                sub.as_deref(),
            ),
            ParseNode::Frac {
                numer,
                denom,
                bar,
                style,
                ..
            } => {
                let display = match style {
                    FracStyle::Auto => self.display,
                    FracStyle::Display => true,
                    FracStyle::Text => false,
                };
                let (numer, denom) = self.with_display(false, |builder| {
                    (builder.build(numer), builder.build(denom))
                });
                let mut dbox = Element::new("mjx-dbox");
                if *bar {
                    dbox = dbox.child(Element::new("mjx-line"));
                }
                let mut frac = Element::new("mjx-frac");
                if display {
                    frac = frac.attr("type", "d");
                }
                let frac = Element::new("mjx-mfrac").child(
                    frac.child(Element::new("mjx-num").child(numer))
                        .child(dbox.child(Element::new("mjx-den").child(denom))),
                );
                if *bar {
                    frac.into()
                } else {
                    let open = self.operator("(");
                    let close = self.operator(")");
                    Element::new("mjx-mrow")
                        .child(open)
                        .child(frac)
                        .child(close)
                        .into()
                }
            }
            ParseNode::Sqrt { body, index, .. } => {
                let surd = self.operator("\u{221A}");
                let body = self.build(body);
                let sqrt = Element::new("mjx-sqrt")
                    .child(Element::new("mjx-surd").child(surd))
                    .child(Element::new("mjx-box").child(body));
                match index {
                    Some(index) => {
                        let index = self.script(index);
                        Element::new("mjx-mroot")
                            .child(Element::new("mjx-root").child(index))
                            .child(sqrt)
                            .into()
                    }
                    None => Element::new("mjx-msqrt").child(sqrt).into(),
                }
            }
            ParseNode::Accent {
                accent,
                stretchy,
                base,
                ..
            } => {
                let mut mark = self.operator(accent);
                if *stretchy {
                    mark = mark.attr("stretchy", "true");
                }
                let base = self.build(base);
                Element::new("mjx-mover")
                    .child(Element::new("mjx-over").child(mark))
                    .child(Element::new("mjx-base").child(base))
                    .into()
            }
            ParseNode::Font { variant, body, .. } => {
                let font = if *variant == Variant::BoldItalic {
                    FontOverride::Embolden
                } else {
                    FontOverride::Replace(*variant)
                };
                let saved = core::mem::replace(&mut self.font, font);
                let built = self.build(body);
                self.font = saved;
                built
            }
            ParseNode::LeftRight {
                left, right, body, ..
            } => {
                let open = self.fence(left);
                let inner = self.build_list(body);
                let close = self.fence(right);
                Element::new("mjx-mrow")
                    .class("mjx-fence")
                    .children(open)
                    .children(inner)
                    .children(close)
                    .into()
            }
            ParseNode::Space {
                width, line_break, ..
            } => {
                if *line_break {
                    Element::new("mjx-mspace").attr("linebreak", "newline").into()
                } else {
                    Element::new("mjx-mspace")
                        .css(CssProperty::Width, format!("{width}em"))
                        .into()
                }
            }
            ParseNode::Environment {
                name,
                left,
                right,
                rows,
                ..
            } => {
                let mut table_rows = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut cells = Vec::with_capacity(row.len());
                    for cell in row {
                        let cell = Element::new("mjx-mtd").children(self.build_list(cell));
                        cells.push(HtmlDomNode::from(cell));
                    }
                    table_rows.push(HtmlDomNode::from(Element::new("mjx-mtr").children(cells)));
                }
                let table = Element::new("mjx-mtable")
                    .attr("data-env", name.as_str())
                    .child(Element::new("mjx-table").children(table_rows));
                if left.is_none() && right.is_none() {
                    return table.into();
                }
                let open = left.and_then(|fence| self.fence(fence));
                let close = right.and_then(|fence| self.fence(fence));
                Element::new("mjx-mrow")
                    .class("mjx-fence")
                    .children(open)
                    .child(table)
                    .children(close)
                    .into()
            }
            ParseNode::Color { color, body, .. } => Element::new("mjx-mstyle")
                .css(CssProperty::Color, color.as_str())
                .children(self.build_list(body))
                .into(),
            ParseNode::Enclose { notation, body, .. } => {
                let notation: &'static str = (*notation).into();
                Element::new("mjx-menclose")
                    .attr("notation", notation)
                    .child(self.build(body))
                    .into()
            }
        }
    }

    fn build_scripts(
        &mut self,
        base: Option<&ParseNode>,
        sup: Option<&ParseNode>,
        sub: Option<&ParseNode>,
    ) -> HtmlDomNode {
        let limits = self.display
            && matches!(base, Some(ParseNode::Op { limits: true, .. }));
        let base = base.map_or_else(|| Element::new("mjx-mi").into(), |node| self.build(node));
        let sup = sup.map(|node| self.script(node));
        let sub = sub.map(|node| self.script(node));

        if limits {
            let (tag, over, under) = match (sup, sub) {
                (Some(sup), Some(sub)) => ("mjx-munderover", Some(sup), Some(sub)),
                (Some(sup), None) => ("mjx-mover", Some(sup), None),
                (None, sub) => ("mjx-munder", None, sub),
            };
            return Element::new(tag)
                .children(over.map(|node| HtmlDomNode::from(Element::new("mjx-over").child(node))))
                .child(Element::new("mjx-base").child(base))
                .children(under.map(|node| HtmlDomNode::from(Element::new("mjx-under").child(node))))
                .into();
        }

        let (tag, script) = match (sup, sub) {
            (Some(sup), Some(sub)) => (
                "mjx-msubsup",
                Element::new("mjx-script")
                    .child(sup)
                    .child(Element::new("mjx-spacer"))
                    .child(sub),
            ),
            (Some(sup), None) => ("mjx-msup", Element::new("mjx-script").child(sup)),
            (None, sub) => ("mjx-msub", Element::new("mjx-script").children(sub)),
        };
        Element::new(tag).child(base).child(script).into()
    }
}

/// Formats a scale factor as a CSS percentage with one decimal (`113.1%`).
pub(crate) fn percent(scale: f64) -> String {
    format!("{}%", (scale * 1000.0).round() / 10.0)
}
