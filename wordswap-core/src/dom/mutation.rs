//! Structural mutation records, shaped after the browser's observer records.

use super::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    /// Set for attribute records.
    pub attribute_name: Option<String>,
}

impl MutationRecord {
    pub fn child_added(target: NodeId, added: NodeId) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes: vec![added],
            removed_nodes: Vec::new(),
            attribute_name: None,
        }
    }

    pub fn child_removed(target: NodeId, removed: NodeId) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes: Vec::new(),
            removed_nodes: vec![removed],
            attribute_name: None,
        }
    }

    pub fn attribute_changed(target: NodeId, name: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.into()),
        }
    }
}
