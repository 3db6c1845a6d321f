//! An arena-backed document tree.
//!
//! Nodes live in a `Vec` and link to each other by [`NodeId`], so handles stay
//! valid for the document's lifetime even after a node is detached. While
//! observation is on, child-list and attribute changes are queued as
//! [`MutationRecord`]s for the caller to drain, the same way a page's
//! mutation observer delivers batches. Text writes are never recorded.

use log::trace;

use super::mutation::MutationRecord;
use super::{DomSurface, NodeId, NodeType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    design_mode: bool,
    observing: bool,
    pending: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
            design_mode: false,
            observing: false,
            pending: Vec::new(),
        }
    }

    /// A document with an `<html><head></head><body></body></html>` skeleton.
    pub fn with_body() -> Self {
        let mut doc = Self::new();
        let html = doc.append_element(doc.root(), "html");
        doc.append_element(html, "head");
        doc.append_element(html, "body");
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Doctype(name.into()))
    }

    /// Appends `child` as the last child of `parent`, detaching it first if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes[child.0].parent.is_some() {
            self.remove(child);
        }
        let last = self.nodes[parent.0].last_child;
        {
            let data = &mut self.nodes[child.0];
            data.parent = Some(parent);
            data.prev_sibling = last;
            data.next_sibling = None;
        }
        match last {
            Some(last) => self.nodes[last.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
        if self.observing {
            self.pending.push(MutationRecord::child_added(parent, child));
        }
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Detaches `node` (and its subtree) from its parent.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent else {
            return;
        };
        let prev = self.nodes[node.0].prev_sibling;
        let next = self.nodes[node.0].next_sibling;
        match prev {
            Some(p) => self.nodes[p.0].next_sibling = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(n) => self.nodes[n.0].prev_sibling = prev,
            None => self.nodes[parent.0].last_child = prev,
        }
        let data = &mut self.nodes[node.0];
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
        if self.observing {
            self.pending.push(MutationRecord::child_removed(parent, node));
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let NodeKind::Element(element) = &mut self.nodes[node.0].kind else {
            return;
        };
        let value = value.into();
        match element.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => element.attrs.push((name.to_ascii_lowercase(), value)),
        }
        if self.observing {
            self.pending.push(MutationRecord::attribute_changed(node, name.to_ascii_lowercase()));
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => element.attr(name),
            _ => None,
        }
    }

    pub fn set_design_mode(&mut self, on: bool) {
        self.design_mode = on;
    }

    /// Starts or stops queueing mutation records.
    pub fn observe(&mut self, on: bool) {
        self.observing = on;
    }

    /// Drains queued mutation records in the order they happened.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        let records = std::mem::take(&mut self.pending);
        if !records.is_empty() {
            trace!("Delivering {} mutation record(s).", records.len());
        }
        records
    }

    /// Concatenated text of every text node under `node`, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let NodeKind::Text(text) = &self.nodes[current.0].kind {
                out.push_str(text);
            }
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Every element with the given tag, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(current) = stack.pop() {
            if self.tag_name(current).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
                out.push(current);
            }
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .into_iter()
            .find(|c| self.tag_name(*c) == Some(tag))
    }
}

impl DomSurface for Document {
    fn body(&self) -> Option<NodeId> {
        let html = self.find_child_element(self.root(), "html")?;
        self.find_child_element(html, "body")
    }

    fn node_type(&self, node: NodeId) -> NodeType {
        match self.nodes[node.0].kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Doctype(_) | NodeKind::Comment(_) => NodeType::Other,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element.tag.as_str()),
            _ => None,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].next_sibling
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn set_text(&mut self, node: NodeId, value: String) {
        if let NodeKind::Text(text) = &mut self.nodes[node.0].kind {
            *text = value;
        }
    }

    /// Recognised `contenteditable` values; anything else defers to the parent.
    fn editable_override(&self, node: NodeId) -> Option<bool> {
        let value = self.attribute(node, "contenteditable")?;
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "true" | "plaintext-only" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn design_mode(&self) -> bool {
        self.design_mode
    }
}
