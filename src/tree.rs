//! Base interface of detached output nodes.
//!
//! Rendered fragments are built as a small virtual tree first and only turned
//! into host nodes during `updateDocument`. The same tree can also be written
//! out as markup, which is what tests and server-side callers look at.

use core::fmt;

use crate::adaptor::DocumentAdaptor;
use crate::types::SessionError;

/// Detached node that can be serialized or materialised in a host document.
pub trait VirtualNode {
    /// Convert into HTML markup by writing into the provided formatter.
    fn write_markup(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Convenience helper that renders the node into a [`String`].
    fn to_markup(&self) -> String
    where
        Self: Sized,
    {
        markup_to_string(self)
    }

    /// Creates the equivalent detached host node through `adaptor`.
    fn to_host<A: DocumentAdaptor>(&self, adaptor: &mut A) -> Result<A::Node, SessionError>
    where
        Self: Sized;
}

/// Renders the provided [`VirtualNode`] into a [`String`] buffer.
pub fn markup_to_string<T: VirtualNode + ?Sized>(node: &T) -> String {
    struct DisplayAdapter<'a, T: VirtualNode + ?Sized>(&'a T);

    impl<T: VirtualNode + ?Sized> fmt::Display for DisplayAdapter<'_, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.write_markup(f)
        }
    }

    DisplayAdapter(node).to_string()
}
