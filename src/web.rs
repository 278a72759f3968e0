//! Browser document adaptor.
//!
//! Wraps a [`web_sys::Document`] and exposes it through [`DocumentAdaptor`].
//! Text offsets arrive as byte offsets and are converted to the UTF-16 units
//! the DOM expects before splitting.

use core::hash::{Hash, Hasher};

use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{CharacterData, Document, Element, Node, Text};

use crate::adaptor::{DocumentAdaptor, NodeKind};
use crate::metrics::Metrics;
use crate::types::{SessionError, SessionErrorKind};
use crate::utils::parse_px;

/// Handle to a live DOM node.
///
/// Equality is node identity. The hash only covers the node name, which is
/// stable for a node's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebNode(pub Node);

impl Hash for WebNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node_type().hash(state);
        self.0.node_name().hash(state);
    }
}

impl From<Node> for WebNode {
    fn from(node: Node) -> Self {
        Self(node)
    }
}

/// Adaptor over the browser's document.
#[derive(Debug, Clone)]
pub struct WebAdaptor {
    document: Document,
}

fn host_error(value: &JsValue) -> SessionError {
    SessionError::new(SessionErrorKind::Host {
        details: value.as_string().unwrap_or_else(|| format!("{value:?}")),
    })
}

fn not_an(what: &str) -> SessionError {
    SessionError::new(SessionErrorKind::Host {
        details: format!("node is not {what}"),
    })
}

impl WebAdaptor {
    /// Wraps `document`.
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    /// Adaptor over `window.document`, when running with a DOM.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }

    /// The wrapped document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn element<'a>(node: &'a WebNode) -> Option<&'a Element> {
        node.0.dyn_ref::<Element>()
    }
}

impl DocumentAdaptor for WebAdaptor {
    type Node = WebNode;

    const KIND: &'static str = "web";

    fn body(&self) -> WebNode {
        self.document
            .body()
            .map_or_else(|| WebNode(self.document.clone().into()), |body| WebNode(body.into()))
    }

    fn head(&self) -> Option<WebNode> {
        self.document.head().map(|head| WebNode(head.into()))
    }

    fn node_kind(&self, node: &WebNode) -> NodeKind {
        match node.0.node_type() {
            Node::ELEMENT_NODE => NodeKind::Element,
            Node::TEXT_NODE => NodeKind::Text,
            Node::COMMENT_NODE => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: &WebNode) -> String {
        Self::element(node).map_or_else(
            || node.0.node_name(),
            |element| element.tag_name().to_ascii_lowercase(),
        )
    }

    fn children(&self, node: &WebNode) -> Vec<WebNode> {
        let list = node.0.child_nodes();
        (0..list.length())
            .filter_map(|index| list.item(index))
            .map(WebNode)
            .collect()
    }

    fn parent(&self, node: &WebNode) -> Option<WebNode> {
        node.0.parent_node().map(WebNode)
    }

    fn text(&self, node: &WebNode) -> String {
        if node.0.node_type() != Node::TEXT_NODE {
            return String::new();
        }
        node.0
            .dyn_ref::<CharacterData>()
            .map(CharacterData::data)
            .unwrap_or_default()
    }

    fn attribute(&self, node: &WebNode, name: &str) -> Option<String> {
        Self::element(node)?.get_attribute(name)
    }

    fn contains(&self, container: &WebNode, node: &WebNode) -> bool {
        container.0.contains(Some(&node.0))
    }

    fn create_element(&mut self, tag: &str) -> Result<WebNode, SessionError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|err| host_error(&err))?;
        Ok(WebNode(element.into()))
    }

    fn create_text(&mut self, text: &str) -> Result<WebNode, SessionError> {
        Ok(WebNode(self.document.create_text_node(text).into()))
    }

    fn set_attribute(&mut self, node: &WebNode, name: &str, value: &str) -> Result<(), SessionError> {
        Self::element(node)
            .ok_or_else(|| not_an("an element"))?
            .set_attribute(name, value)
            .map_err(|err| host_error(&err))
    }

    fn append_child(&mut self, parent: &WebNode, child: &WebNode) -> Result<(), SessionError> {
        parent
            .0
            .append_child(&child.0)
            .map(drop)
            .map_err(|err| host_error(&err))
    }

    fn insert_before(
        &mut self,
        parent: &WebNode,
        child: &WebNode,
        reference: &WebNode,
    ) -> Result<(), SessionError> {
        parent
            .0
            .insert_before(&child.0, Some(&reference.0))
            .map(drop)
            .map_err(|err| host_error(&err))
    }

    fn remove(&mut self, node: &WebNode) -> Result<(), SessionError> {
        let Some(parent) = node.0.parent_node() else {
            return Ok(());
        };
        parent
            .remove_child(&node.0)
            .map(drop)
            .map_err(|err| host_error(&err))
    }

    fn split_text(&mut self, node: &WebNode, offset: usize) -> Result<WebNode, SessionError> {
        let text = node.0.dyn_ref::<Text>().ok_or_else(|| not_an("a text node"))?;
        let data = text.data();
        let head = data.get(..offset).ok_or_else(|| {
            SessionError::new(SessionErrorKind::Host {
                details: format!("offset {offset} is not a character boundary"),
            })
        })?;
        let units = u32::try_from(head.encode_utf16().count()).map_err(|err| {
            SessionError::new(SessionErrorKind::Host {
                details: err.to_string(),
            })
        })?;
        let rest = text.split_text(units).map_err(|err| host_error(&err))?;
        Ok(WebNode(rest.into()))
    }

    fn upsert_stylesheet(&mut self, id: &str, css: &str) -> Result<(), SessionError> {
        if let Some(existing) = self.document.get_element_by_id(id) {
            existing.set_text_content(Some(css));
            return Ok(());
        }
        let style = self
            .document
            .create_element("style")
            .map_err(|err| host_error(&err))?;
        style.set_id(id);
        style.set_text_content(Some(css));
        let target = self.head().unwrap_or_else(|| self.body());
        target
            .0
            .append_child(&style)
            .map(drop)
            .map_err(|err| host_error(&err))
    }

    fn measure(&self, node: &WebNode) -> Metrics {
        let Some(element) = Self::element(node) else {
            return Metrics::default();
        };
        let em = web_sys::window()
            .and_then(|window| window.get_computed_style(element).ok().flatten())
            .and_then(|style| style.get_property_value("font-size").ok())
            .and_then(|size| parse_px(&size))
            .unwrap_or(Metrics::DEFAULT_EM);
        let width = match element.client_width() {
            0 => Metrics::DEFAULT_WIDTH,
            width => f64::from(width),
        };
        Metrics::from_em(em, width)
    }
}
