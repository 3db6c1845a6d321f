//! The document surface the engine reads and writes.
//!
//! The engine only needs a narrow view of a page: navigation, element tag
//! names, text values and editability. [`DomSurface`] captures that view so a
//! browser binding and the in-crate [`Document`] arena are interchangeable.
//! Nothing here lets the engine change structure or attributes.

pub mod document;
pub mod mutation;
pub mod serialize;

pub use document::{Document, Element, NodeKind};
pub use mutation::{MutationKind, MutationRecord};

/// Opaque handle to a node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
    /// Comments, doctypes and anything else the engine never touches.
    Other,
}

/// Element kinds whose text must never be rewritten.
pub const EXCLUDED_TAGS: [&str; 5] = ["script", "style", "noscript", "textarea", "input"];

pub fn is_excluded_tag(tag: &str) -> bool {
    EXCLUDED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Read/write access to a live document, restricted to what text replacement needs.
pub trait DomSurface {
    /// The `<body>` element, if the document has one yet.
    fn body(&self) -> Option<NodeId>;

    fn node_type(&self, node: NodeId) -> NodeType;

    /// Lowercase tag name for elements, `None` otherwise.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// The value of a text node, `None` for any other node.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Overwrites a text node's value. Ignored for other node types.
    fn set_text(&mut self, node: NodeId, value: String);

    /// The editability `node` sets for itself and its descendants, or `None`
    /// when it inherits from its parent.
    fn editable_override(&self, node: NodeId) -> Option<bool>;

    /// Whether the whole document is in design mode.
    fn design_mode(&self) -> bool;

    /// Whether the user can currently edit the content at `node`: the nearest
    /// override at or above it decides, then design mode.
    fn is_editable(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if let Some(editable) = self.editable_override(current) {
                return editable;
            }
            cursor = self.parent(current);
        }
        self.design_mode()
    }

    /// Children of `node` in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.first_child(node);
        while let Some(child) = cursor {
            out.push(child);
            cursor = self.next_sibling(child);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_tags_ignore_case() {
        assert!(is_excluded_tag("SCRIPT"));
        assert!(is_excluded_tag("textarea"));
        assert!(!is_excluded_tag("p"));
    }
}
