//! Mutation observation.
//!
//! A [`Document`](crate::Document) has at most one observer. While attached,
//! every qualifying mutation appends a [`MutationRecord`] to a pending queue;
//! the owner drains it with `take_records`.

use crate::node::NodeId;

/// Observer options (`MutationObserverInit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationObserverInit {
    pub attributes: bool,
    pub child_list: bool,
    pub character_data: bool,
    /// Observe the whole tree rather than only the document node itself.
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Everything, tree-wide.
    pub fn all() -> Self {
        Self {
            attributes: true,
            child_list: true,
            character_data: true,
            subtree: true,
        }
    }

    pub(crate) fn accepts(&self, kind: &MutationKind) -> bool {
        match kind {
            MutationKind::Attributes { .. } => self.attributes,
            MutationKind::ChildList { .. } => self.child_list,
            MutationKind::CharacterData => self.character_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Attributes {
        name: String,
        old_value: Option<String>,
    },
    ChildList {
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    CharacterData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    pub fn is_attribute(&self, name: &str) -> bool {
        matches!(&self.kind, MutationKind::Attributes { name: n, .. } if n == name)
    }
}
