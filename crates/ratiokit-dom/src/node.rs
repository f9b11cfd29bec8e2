//! Node storage types.

use smallvec::SmallVec;
use string_cache::DefaultAtom;

use crate::style::{BoxMetrics, InlineStyle};

/// Interned tag and attribute names.
pub type LocalName = DefaultAtom;

/// Handle to a node in a [`Document`](crate::Document).
///
/// A handle is an index plus the generation of the slot it was issued for.
/// Once the node is destroyed the slot's generation moves on, so an old
/// handle never resolves to whatever is created in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// What a node is.
#[derive(Debug, Clone)]
pub enum NodeType {
    Document,
    Element(ElementData),
    Text(String),
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag_name: LocalName,
    pub(crate) attributes: SmallVec<[(LocalName, String); 4]>,
    pub(crate) inline_style: InlineStyle,
    /// Used values from the host's last layout pass.
    pub(crate) metrics: BoxMetrics,
    pub(crate) display: String,
    pub(crate) flex_direction: String,
}

impl ElementData {
    pub(crate) fn new(tag_name: &str) -> Self {
        Self {
            tag_name: LocalName::from(tag_name),
            attributes: SmallVec::new(),
            inline_style: InlineStyle::default(),
            metrics: BoxMetrics::default(),
            display: "block".to_string(),
            flex_direction: "row".to_string(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (&**n, v.as_str()))
    }

    /// Set an attribute, returning the previous value.
    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some((_, v)) = self.attributes.iter_mut().find(|(n, _)| &**n == name) {
            return Some(std::mem::replace(v, value.to_string()));
        }
        self.attributes
            .push((LocalName::from(name), value.to_string()));
        None
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(n, _)| &**n == name)?;
        Some(self.attributes.remove(pos).1)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) node_type: NodeType,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }
}

/// Arena slot. `node` is `None` once the node has been destroyed.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node>,
}
