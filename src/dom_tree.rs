//! Output nodes produced by the output processor and the menu widget.
//!
//! An [`HtmlDomNode`] is either an [`Element`] with classes, inline style and
//! attributes, or plain text. Markup is written in a fixed order (`class`,
//! `style`, then attributes in insertion order) so that equal trees always
//! serialize to equal strings.

use core::fmt::{self, Write as _};

use crate::adaptor::DocumentAdaptor;
use crate::tree::VirtualNode;
use crate::types::{CssProperty, CssStyle, SessionError};
use crate::utils::escape_into;

/// Element with a custom or HTML tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name (`mjx-mi`, `div`, …)
    pub tag: String,
    /// CSS classes, written in order
    pub classes: Vec<String>,
    /// Inline CSS style object
    pub style: CssStyle,
    /// Attributes other than `class` and `style`, in insertion order
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<HtmlDomNode>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            classes: Vec::new(),
            style: CssStyle::default(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets an attribute, replacing an earlier value.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
        self
    }

    /// Sets one style property.
    #[must_use]
    pub fn css(mut self, property: CssProperty, value: impl Into<String>) -> Self {
        self.style.insert(property, value);
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: impl Into<HtmlDomNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = HtmlDomNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check if the element has a specific class
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.iter().any(|cls| cls == class_name)
    }
}

/// Node of a rendered output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlDomNode {
    /// An element
    Element(Element),
    /// Plain text
    Text(String),
}

impl From<Element> for HtmlDomNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl HtmlDomNode {
    /// Creates a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The element, if this is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Check if the node is an element with a specific class
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.as_element().is_some_and(|e| e.has_class(class_name))
    }

    /// Concatenated text of the subtree.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Element(element) => element.children.iter().map(Self::text_content).collect(),
        }
    }

    /// Every element of the subtree (including this node) with the given tag,
    /// in document order.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_tag(tag, &mut found);
        found
    }

    fn collect_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if let Self::Element(element) = self {
            if element.tag == tag {
                found.push(element);
            }
            for child in &element.children {
                child.collect_tag(tag, found);
            }
        }
    }
}

/// Create an HTML className based on a list of classes. In addition to joining
/// with spaces, we also remove empty classes.
#[must_use]
pub fn create_class(classes: &[String]) -> String {
    classes
        .iter()
        .filter(|cls| !cls.is_empty())
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(" ")
}

fn write_node_class<W: fmt::Write>(writer: &mut W, classes: &[String]) -> fmt::Result {
    if classes.iter().all(String::is_empty) {
        return Ok(());
    }

    writer.write_str(" class=\"")?;
    escape_into(writer, &create_class(classes))?;
    writer.write_char('"')
}

fn write_node_style<W: fmt::Write>(writer: &mut W, style: &CssStyle) -> fmt::Result {
    if style.is_empty() {
        return Ok(());
    }

    writer.write_str(" style=\"")?;
    escape_into(writer, &style.to_attribute())?;
    writer.write_char('"')
}

impl VirtualNode for Element {
    fn write_markup(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "<{}", self.tag)?;
        write_node_class(fmt, &self.classes)?;
        write_node_style(fmt, &self.style)?;
        for (name, value) in &self.attributes {
            write!(fmt, " {name}=\"")?;
            escape_into(fmt, value)?;
            fmt.write_char('"')?;
        }
        fmt.write_char('>')?;

        for child in &self.children {
            child.write_markup(fmt)?;
        }

        write!(fmt, "</{}>", self.tag)
    }

    fn to_host<A: DocumentAdaptor>(&self, adaptor: &mut A) -> Result<A::Node, SessionError> {
        let element = adaptor.create_element(&self.tag)?;
        let class = create_class(&self.classes);
        if !class.is_empty() {
            adaptor.set_attribute(&element, "class", &class)?;
        }
        if !self.style.is_empty() {
            adaptor.set_attribute(&element, "style", &self.style.to_attribute())?;
        }
        for (name, value) in &self.attributes {
            adaptor.set_attribute(&element, name, value)?;
        }
        for child in &self.children {
            let node = child.to_host(adaptor)?;
            adaptor.append_child(&element, &node)?;
        }
        Ok(element)
    }
}

impl VirtualNode for HtmlDomNode {
    fn write_markup(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => element.write_markup(fmt),
            Self::Text(text) => escape_into(fmt, text),
        }
    }

    fn to_host<A: DocumentAdaptor>(&self, adaptor: &mut A) -> Result<A::Node, SessionError> {
        match self {
            Self::Element(element) => element.to_host(adaptor),
            Self::Text(text) => adaptor.create_text(text),
        }
    }
}
