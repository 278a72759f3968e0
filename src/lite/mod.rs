//! Lightweight in-memory host document.
//!
//! [`LiteDocument`] is an arena of element, text and comment nodes with just
//! enough HTML parsing and serialization to typeset notebook output without a
//! browser: in tests, benchmarks and server-side rendering. [`LiteAdaptor`]
//! exposes it through the [`DocumentAdaptor`] contract.

mod parser;

use core::fmt::{self, Write as _};

use crate::adaptor::{DocumentAdaptor, NodeKind};
use crate::metrics::Metrics;
use crate::types::{SessionError, SessionErrorKind};
use crate::utils::{parse_px, style_value};

/// Elements that never have children or a closing tag.
pub(crate) const VOID_ELEMENTS: [&str; 8] =
    ["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// Handle to a node of a [`LiteDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum LiteData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct LiteNode {
    data: LiteData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document with an `html` root, a `head` and a `body`.
#[derive(Debug, Clone)]
pub struct LiteDocument {
    nodes: Vec<LiteNode>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for LiteDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl LiteDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        document.root = document.alloc_element("html");
        document.head = document.alloc_element("head");
        document.body = document.alloc_element("body");
        document.attach(document.root, document.head, None);
        document.attach(document.root, document.body, None);
        document
    }

    /// Creates a document whose body holds the parsed `html` fragment.
    ///
    /// ```
    /// use mathdoc::lite::LiteDocument;
    ///
    /// let doc = LiteDocument::from_html("<p>Euler: $e^{i\\pi}+1=0$</p>");
    /// assert_eq!(doc.inner_html(doc.body()), "<p>Euler: $e^{i\\pi}+1=0$</p>");
    /// ```
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        let mut document = Self::new();
        let body = document.body;
        document.append_html(body, html);
        document
    }

    /// Parses `html` and appends the resulting nodes to `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) {
        parser::parse_into(self, parent, html);
    }

    /// The `html` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The `head` element.
    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    /// The `body` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Finds the first element (in document order) whose `id` attribute is
    /// `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    /// Every element with the given tag, in document order.
    #[must_use]
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|node| self.tag(*node) == Some(tag))
            .collect()
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            LiteData::Element { tag, .. } => Some(tag),
            LiteData::Text(_) | LiteData::Comment(_) => None,
        }
    }

    /// Attribute value of an element.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node).data {
            LiteData::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            LiteData::Text(_) | LiteData::Comment(_) => None,
        }
    }

    /// Children of a node.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Concatenated text content of a subtree.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.node(node).data {
            LiteData::Text(text) => text.clone(),
            LiteData::Comment(_) => String::new(),
            LiteData::Element { .. } => self
                .children(node)
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    /// Serializes a node including its own tag.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let _ = self.write_node(&mut out, node);
        out
    }

    /// Serializes the children of a node.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            let _ = self.write_node(&mut out, *child);
        }
        out
    }

    /// Serializes the whole document.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.outer_html(self.root)
    }

    fn node(&self, node: NodeId) -> &LiteNode {
        &self.nodes[node.0]
    }

    fn node_mut(&mut self, node: NodeId) -> &mut LiteNode {
        &mut self.nodes[node.0]
    }

    fn alloc(&mut self, data: LiteData) -> NodeId {
        self.nodes.push(LiteNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn alloc_element(&mut self, tag: &str) -> NodeId {
        self.alloc(LiteData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub(crate) fn alloc_text(&mut self, text: &str) -> NodeId {
        self.alloc(LiteData::Text(text.to_owned()))
    }

    pub(crate) fn alloc_comment(&mut self, text: &str) -> NodeId {
        self.alloc(LiteData::Comment(text.to_owned()))
    }

    pub(crate) fn push_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let LiteData::Element { attributes, .. } = &mut self.node_mut(node).data {
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => value.clone_into(existing),
                None => attributes.push((name.to_owned(), value.to_owned())),
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != node);
        }
    }

    /// Inserts `child` into `parent` at `index` (or at the end).
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.detach(child);
        let children = &mut self.node_mut(parent).children;
        match index {
            Some(index) if index <= children.len() => children.insert(index, child),
            _ => children.push(child),
        }
        self.node_mut(child).parent = Some(parent);
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId) -> fmt::Result {
        match &self.node(node).data {
            LiteData::Text(text) => {
                let raw = self
                    .node(node)
                    .parent
                    .and_then(|parent| self.tag(parent))
                    .is_some_and(|tag| matches!(tag, "script" | "style"));
                if raw {
                    out.write_str(text)
                } else {
                    write_escaped_text(out, text)
                }
            }
            LiteData::Comment(text) => write!(out, "<!--{text}-->"),
            LiteData::Element { tag, attributes } => {
                write!(out, "<{tag}")?;
                for (name, value) in attributes {
                    write!(out, " {name}=\"")?;
                    write_escaped_attribute(out, value)?;
                    out.write_char('"')?;
                }
                out.write_char('>')?;
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return Ok(());
                }
                for child in self.children(node) {
                    self.write_node(out, *child)?;
                }
                write!(out, "</{tag}>")
            }
        }
    }
}

fn write_escaped_text(out: &mut String, text: &str) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

fn write_escaped_attribute(out: &mut String, value: &str) -> fmt::Result {
    for ch in value.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '"' => out.write_str("&quot;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

/// [`DocumentAdaptor`] over a [`LiteDocument`].
#[derive(Debug, Clone, Default)]
pub struct LiteAdaptor {
    document: LiteDocument,
}

impl LiteAdaptor {
    /// Wraps a document.
    #[must_use]
    pub const fn new(document: LiteDocument) -> Self {
        Self { document }
    }

    /// The wrapped document.
    #[must_use]
    pub const fn document(&self) -> &LiteDocument {
        &self.document
    }

    /// Mutable access to the wrapped document.
    pub const fn document_mut(&mut self) -> &mut LiteDocument {
        &mut self.document
    }

    /// Unwraps the document.
    #[must_use]
    pub fn into_document(self) -> LiteDocument {
        self.document
    }

    fn not_a_child(parent: NodeId, node: NodeId) -> SessionError {
        SessionError::new(SessionErrorKind::Host {
            details: format!("{node:?} is not a child of {parent:?}"),
        })
    }

    fn inherited_style(&self, node: NodeId, property: &str) -> Option<f64> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if let Some(value) = self
                .document
                .attribute(candidate, "style")
                .and_then(|style| style_value(style, property))
                .and_then(parse_px)
            {
                return Some(value);
            }
            current = self.document.node(candidate).parent;
        }
        None
    }
}

impl DocumentAdaptor for LiteAdaptor {
    type Node = NodeId;

    const KIND: &'static str = "lite";

    fn body(&self) -> NodeId {
        self.document.body
    }

    fn head(&self) -> Option<NodeId> {
        Some(self.document.head)
    }

    fn node_kind(&self, node: &NodeId) -> NodeKind {
        match self.document.node(*node).data {
            LiteData::Element { .. } => NodeKind::Element,
            LiteData::Text(_) => NodeKind::Text,
            LiteData::Comment(_) => NodeKind::Comment,
        }
    }

    fn tag_name(&self, node: &NodeId) -> String {
        match &self.document.node(*node).data {
            LiteData::Element { tag, .. } => tag.clone(),
            LiteData::Text(_) => "#text".to_owned(),
            LiteData::Comment(_) => "#comment".to_owned(),
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.document.children(*node).to_vec()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.document.node(*node).parent
    }

    fn text(&self, node: &NodeId) -> String {
        match &self.document.node(*node).data {
            LiteData::Text(text) => text.clone(),
            LiteData::Element { .. } | LiteData::Comment(_) => String::new(),
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.document.attribute(*node, name).map(str::to_owned)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, SessionError> {
        Ok(self.document.alloc_element(tag))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, SessionError> {
        Ok(self.document.alloc_text(text))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), SessionError> {
        self.document.push_attribute(*node, name, value);
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SessionError> {
        self.document.attach(*parent, *child, None);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: &NodeId,
    ) -> Result<(), SessionError> {
        if self.document.node(*reference).parent != Some(*parent) {
            return Err(Self::not_a_child(*parent, *reference));
        }
        self.document.detach(*child);
        let index = self
            .document
            .children(*parent)
            .iter()
            .position(|node| node == reference)
            .ok_or_else(|| Self::not_a_child(*parent, *reference))?;
        self.document.attach(*parent, *child, Some(index));
        Ok(())
    }

    fn remove(&mut self, node: &NodeId) -> Result<(), SessionError> {
        self.document.detach(*node);
        Ok(())
    }

    fn split_text(&mut self, node: &NodeId, offset: usize) -> Result<NodeId, SessionError> {
        let LiteData::Text(text) = &mut self.document.node_mut(*node).data else {
            return Err(SessionError::new(SessionErrorKind::Host {
                details: format!("{node:?} is not a text node"),
            }));
        };
        if !text.is_char_boundary(offset) {
            return Err(SessionError::new(SessionErrorKind::Host {
                details: format!("offset {offset} is not a character boundary"),
            }));
        }
        let tail = text.split_off(offset);
        let new_node = self.document.alloc_text(&tail);
        if let Some(parent) = self.document.node(*node).parent {
            let index = self
                .document
                .children(parent)
                .iter()
                .position(|child| child == node)
                .ok_or_else(|| Self::not_a_child(parent, *node))?;
            self.document.attach(parent, new_node, Some(index + 1));
        }
        Ok(new_node)
    }

    fn upsert_stylesheet(&mut self, id: &str, css: &str) -> Result<(), SessionError> {
        let head = self.document.head;
        let sheet = match self.document.element_by_id(id) {
            Some(sheet) => sheet,
            None => {
                let sheet = self.document.alloc_element("style");
                self.document.push_attribute(sheet, "id", id);
                self.document.attach(head, sheet, None);
                sheet
            }
        };
        for child in self.document.children(sheet).to_vec() {
            self.document.detach(child);
        }
        let text = self.document.alloc_text(css);
        self.document.attach(sheet, text, None);
        Ok(())
    }

    fn measure(&self, node: &NodeId) -> Metrics {
        let em = self
            .inherited_style(*node, "font-size")
            .unwrap_or(Metrics::DEFAULT_EM);
        let width = self
            .inherited_style(*node, "width")
            .unwrap_or(Metrics::DEFAULT_WIDTH);
        Metrics::from_em(em, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_text_inserts_the_tail_after_the_node() {
        let mut adaptor = LiteAdaptor::new(LiteDocument::from_html("<p>ab$x$cd</p>"));
        let p = adaptor.document().elements_by_tag("p")[0];
        let text = adaptor.document().children(p)[0];
        let tail = adaptor.split_text(&text, 2).unwrap();
        assert_eq!(adaptor.text(&text), "ab");
        assert_eq!(adaptor.text(&tail), "$x$cd");
        assert_eq!(adaptor.document().children(p), &[text, tail]);
        assert!(adaptor.split_text(&p, 0).is_err());
    }

    #[test]
    fn measure_inherits_font_size_from_ancestors() {
        let adaptor = LiteAdaptor::new(LiteDocument::from_html(
            r#"<div style="font-size: 20px; width: 600px"><p><span>x</span></p></div><p>y</p>"#,
        ));
        let span = adaptor.document().elements_by_tag("span")[0];
        let metrics = adaptor.measure(&span);
        assert_eq!(metrics.em, 20.0);
        assert_eq!(metrics.ex, 10.0);
        assert_eq!(metrics.container_width, 600.0);

        let plain = adaptor.document().elements_by_tag("p")[1];
        assert_eq!(adaptor.measure(&plain), Metrics::default());
    }

    #[test]
    fn stylesheets_are_replaced_in_place() {
        let mut adaptor = LiteAdaptor::default();
        adaptor.upsert_stylesheet("sheet", "a {}").unwrap();
        adaptor.upsert_stylesheet("sheet", "b {}").unwrap();
        let doc = adaptor.document();
        assert_eq!(doc.inner_html(doc.head()), r#"<style id="sheet">b {}</style>"#);
    }

    #[test]
    fn insert_before_rejects_foreign_reference() {
        let mut adaptor = LiteAdaptor::new(LiteDocument::from_html("<p>a</p><p>b</p>"));
        let paragraphs = adaptor.document().elements_by_tag("p");
        let text = adaptor.document().children(paragraphs[1])[0];
        let span = adaptor.create_element("span").unwrap();
        assert!(adaptor.insert_before(&paragraphs[0], &span, &text).is_err());
        adaptor.insert_before(&paragraphs[1], &span, &text).unwrap();
        let doc = adaptor.document();
        assert_eq!(doc.outer_html(paragraphs[1]), "<p><span></span>b</p>");
    }
}
