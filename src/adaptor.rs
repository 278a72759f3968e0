//! Document adaptation layer.
//!
//! The pipeline never touches a host document directly. Everything it needs
//! (walking the tree, reading text and attributes, measuring fonts, splicing
//! rendered output in) goes through a [`DocumentAdaptor`]. An adaptor type
//! must be registered once per process with [`register_adaptor`] before a
//! session can be bound to it.

use core::fmt::Debug;
use core::hash::Hash;
use std::sync::{LazyLock, Mutex, PoisonError};

use crate::metrics::Metrics;
use crate::namespace::KeySet;
use crate::types::{SessionError, SessionErrorKind};

/// Coarse classification of a host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a tag name, attributes and children
    Element,
    /// A text node
    Text,
    /// A comment node
    Comment,
    /// Anything else (processing instructions, doctype, …)
    Other,
}

/// Capability set for reading, measuring and mutating one kind of host
/// document tree.
///
/// Text offsets are byte offsets into the string returned by
/// [`DocumentAdaptor::text`]; adaptors over hosts with a different native
/// unit convert internally.
pub trait DocumentAdaptor {
    /// Handle to a node of the host document. Cheap to clone, compared by
    /// identity.
    type Node: Clone + Eq + Hash + Debug;

    /// Name of the host document type, used for process-wide registration.
    const KIND: &'static str;

    /// The element whose subtree is searched when no scope is given.
    fn body(&self) -> Self::Node;

    /// The element receiving stylesheets, if the document has one.
    fn head(&self) -> Option<Self::Node>;

    /// Classifies a node.
    fn node_kind(&self, node: &Self::Node) -> NodeKind;

    /// Lowercase tag name of an element (`"#text"`, `"#comment"` otherwise).
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Child nodes in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Parent node, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Text of a text node (empty for other nodes).
    fn text(&self, node: &Self::Node) -> String;

    /// Attribute value of an element.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether the element's `class` attribute lists `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Whether `node` is `container` or one of its descendants.
    fn contains(&self, container: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if candidate == *container {
                return true;
            }
            current = self.parent(&candidate);
        }
        false
    }

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, SessionError>;

    /// Creates a detached text node.
    fn create_text(&mut self, text: &str) -> Result<Self::Node, SessionError>;

    /// Sets an attribute on an element.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), SessionError>;

    /// Appends `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), SessionError>;

    /// Inserts `child` into `parent` right before `reference`.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: &Self::Node,
    ) -> Result<(), SessionError>;

    /// Detaches a node from its parent.
    fn remove(&mut self, node: &Self::Node) -> Result<(), SessionError>;

    /// Splits a text node at `offset`; the original keeps the text before the
    /// offset and the returned node (inserted right after it) the rest.
    fn split_text(&mut self, node: &Self::Node, offset: usize) -> Result<Self::Node, SessionError>;

    /// Creates or replaces the stylesheet identified by `id`.
    fn upsert_stylesheet(&mut self, id: &str, css: &str) -> Result<(), SessionError>;

    /// Measures the font and width of an element.
    fn measure(&self, node: &Self::Node) -> Metrics;
}

static REGISTRY: LazyLock<Mutex<KeySet<&'static str>>> =
    LazyLock::new(|| Mutex::new(KeySet::default()));

/// Registers the adaptor type `A` for its host document kind.
///
/// Registration happens once per process; a second registration of the same
/// kind fails with [`SessionErrorKind::AdaptorAlreadyRegistered`].
pub fn register_adaptor<A: DocumentAdaptor>() -> Result<(), SessionError> {
    let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    if !registry.insert(A::KIND) {
        return Err(SessionError::new(
            SessionErrorKind::AdaptorAlreadyRegistered { kind: A::KIND },
        ));
    }
    log::info!("Registered document adaptor for '{}'", A::KIND);
    Ok(())
}

/// Whether an adaptor has been registered for `kind`.
#[must_use]
pub fn is_registered(kind: &str) -> bool {
    REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(kind)
}
