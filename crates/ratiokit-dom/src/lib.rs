//! # RatioKit DOM
//!
//! An in-memory render tree: the collaborator the aspect-ratio polyfill
//! drives when it is not embedded in a full engine.
//!
//! ## What it models
//!
//! 1. **Tree**: a document node owning elements and text nodes in an arena,
//!    addressed by generational [`NodeId`]s
//! 2. **Attributes and inline style**: what page code and the polyfill write
//! 3. **Resolved style**: inline style layered over the host's layout values
//! 4. **Mutation records**: a single observer with `take_records` semantics
//! 5. **Connectivity**: `is_connected` and `compare_document_position`
//!
//! It does not lay anything out. The host feeds used sizes in through
//! [`Document::set_box_metrics`] after its own layout pass.

pub mod mutation;
pub mod node;
pub mod position;
pub mod style;

use thiserror::Error;
use tracing::{debug, trace};

pub use mutation::{MutationKind, MutationObserverInit, MutationRecord};
pub use node::{ElementData, LocalName, NodeId, NodeType};
pub use position::DocumentPosition;
pub use style::{format_px, BoxMetrics, ComputedStyle, InlineStyle};

use node::{Node, Slot};

/// Errors from the tree editing API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Stale node handle: {0:?}")]
    StaleNode(NodeId),

    #[error("Not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),
}

pub type Result<T> = std::result::Result<T, DomError>;

/// A document and every node created through it.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    observer: Option<MutationObserverInit>,
    records: Vec<MutationRecord>,
    native_connectivity: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            observer: None,
            records: Vec::new(),
            native_connectivity: true,
        };
        doc.root = doc.alloc(Node::new(NodeType::Document));
        doc
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(Node::new(NodeType::Element(ElementData::new(tag_name))))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::new(NodeType::Text(text.to_string())))
    }

    /// Whether `id` refers to a node that has not been destroyed.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        let slot = self
            .slots
            .get(id.index as usize)
            .ok_or(DomError::NodeNotFound(id))?;
        if slot.generation != id.generation {
            return Err(DomError::StaleNode(id));
        }
        slot.node.as_ref().ok_or(DomError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .ok_or(DomError::NodeNotFound(id))?;
        if slot.generation != id.generation {
            return Err(DomError::StaleNode(id));
        }
        slot.node.as_mut().ok_or(DomError::StaleNode(id))
    }

    fn element(&self, id: NodeId) -> Result<&ElementData> {
        self.node(id)?.element().ok_or(DomError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        self.node_mut(id)?
            .element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn node_type(&self, id: NodeId) -> Option<&NodeType> {
        self.node(id).ok().map(|n| &n.node_type)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|e| &*e.tag_name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    /// The parent, if it is an element (the document node is not).
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.element(parent).ok().map(|_| parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    // ==================== Tree editing ====================

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (or at the end).
    /// A child that already has a parent is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        if matches!(self.node(parent)?.node_type, NodeType::Text(_)) {
            return Err(DomError::HierarchyRequest(
                "text nodes cannot have children".into(),
            ));
        }
        if matches!(self.node(child)?.node_type, NodeType::Document) {
            return Err(DomError::HierarchyRequest(
                "the document node cannot be inserted".into(),
            ));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest(
                "cannot insert a node into its own subtree".into(),
            ));
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != Some(parent) {
                return Err(DomError::HierarchyRequest(
                    "reference node is not a child of parent".into(),
                ));
            }
        }

        if let Some(old_parent) = self.node(child)?.parent {
            self.remove_child(old_parent, child)?;
        }

        let position = match reference {
            Some(reference) => self
                .children(parent)
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(self.children(parent).len()),
            None => self.children(parent).len(),
        };
        self.node_mut(parent)?.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);

        self.queue_record(
            parent,
            MutationKind::ChildList {
                added: vec![child],
                removed: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::HierarchyRequest(
                "node is not a child of parent".into(),
            ));
        }
        self.node_mut(parent)?.children.retain(|&c| c != child);
        self.node_mut(child)?.parent = None;

        self.queue_record(
            parent,
            MutationKind::ChildList {
                added: Vec::new(),
                removed: vec![child],
            },
        );
        Ok(())
    }

    /// Remove `id` from its parent, if it has one. The node stays alive.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        match self.node(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    /// Detach `id` and free it along with its whole subtree. Handles to
    /// the freed nodes become stale.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DomError::HierarchyRequest(
                "the document node cannot be destroyed".into(),
            ));
        }
        self.detach(id)?;

        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(current) = stack.pop() {
            stack.extend(self.children(current).iter().copied());
            let slot = &mut self.slots[current.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            freed += 1;
        }
        debug!(?id, freed, "Destroyed subtree");
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ==================== Attributes and style ====================

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok()?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let old_value = self.element_mut(id)?.set_attribute(name, value);
        self.queue_record(
            id,
            MutationKind::Attributes {
                name: name.to_string(),
                old_value,
            },
        );
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        if let Some(old_value) = self.element_mut(id)?.remove_attribute(name) {
            self.queue_record(
                id,
                MutationKind::Attributes {
                    name: name.to_string(),
                    old_value: Some(old_value),
                },
            );
        }
        Ok(())
    }

    pub fn inline_style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.element(id).ok().map(|e| &e.inline_style)
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.inline_style(id)?.get(property)
    }

    /// Set an inline style property. An empty value clears it. Changes are
    /// reported as a mutation of the `style` attribute.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> Result<()> {
        let style = &mut self.element_mut(id)?.inline_style;
        let old_value = style.css_text();
        if style.set(property, value) {
            self.queue_style_record(id, old_value);
        }
        Ok(())
    }

    pub fn remove_style_property(&mut self, id: NodeId, property: &str) -> Result<()> {
        let style = &mut self.element_mut(id)?.inline_style;
        let old_value = style.css_text();
        if style.remove(property) {
            self.queue_style_record(id, old_value);
        }
        Ok(())
    }

    fn queue_style_record(&mut self, id: NodeId, old_value: String) {
        self.queue_record(
            id,
            MutationKind::Attributes {
                name: "style".to_string(),
                old_value: (!old_value.is_empty()).then_some(old_value),
            },
        );
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        match &mut self.node_mut(id)?.node_type {
            NodeType::Text(content) => {
                *content = text.to_string();
            }
            _ => {
                return Err(DomError::HierarchyRequest(
                    "set_text on a non-text node".into(),
                ))
            }
        }
        self.queue_record(id, MutationKind::CharacterData);
        Ok(())
    }

    // ==================== Layout inputs ====================
    //
    // Results of the host's layout pass. Not DOM mutations: nothing is
    // recorded, the host signals a resize instead.

    pub fn set_box_metrics(&mut self, id: NodeId, metrics: BoxMetrics) -> Result<()> {
        self.element_mut(id)?.metrics = metrics;
        Ok(())
    }

    pub fn box_metrics(&self, id: NodeId) -> Option<BoxMetrics> {
        self.element(id).ok().map(|e| e.metrics)
    }

    pub fn set_display(&mut self, id: NodeId, display: &str) -> Result<()> {
        self.element_mut(id)?.display = display.to_string();
        Ok(())
    }

    pub fn set_flex_direction(&mut self, id: NodeId, direction: &str) -> Result<()> {
        self.element_mut(id)?.flex_direction = direction.to_string();
        Ok(())
    }

    /// Resolved style (`getComputedStyle`). `None` for non-elements.
    pub fn computed_style(&self, id: NodeId) -> Option<ComputedStyle> {
        let element = self.element(id).ok()?;
        Some(ComputedStyle::resolve(
            &element.inline_style,
            &element.metrics,
            &element.display,
            &element.flex_direction,
        ))
    }

    // ==================== Queries ====================

    /// Connected elements carrying `name`, in document order.
    pub fn query_attribute(&self, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else { continue };
            if node.element().and_then(|e| e.attribute(name)).is_some() {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// Whether `id` is live and reachable from the document node.
    pub fn is_connected(&self, id: NodeId) -> bool {
        if !self.contains_node(id) {
            return false;
        }
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Turn the native `is_connected` capability on or off. Collaborator
    /// adapters consult this to emulate trees that predate the query.
    pub fn set_native_connectivity(&mut self, enabled: bool) {
        self.native_connectivity = enabled;
    }

    pub fn has_native_connectivity(&self) -> bool {
        self.native_connectivity
    }

    /// The document a node belongs to. `None` only for the document node
    /// itself. Destroyed and unknown handles still report this document, so
    /// position queries against it see them as disconnected.
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        if id == self.root {
            return None;
        }
        Some(self.root)
    }

    /// Position of `other` relative to `reference`.
    pub fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        if reference == other && self.contains_node(reference) {
            return DocumentPosition::empty();
        }
        let disconnected = |a: NodeId, b: NodeId| {
            let order = if b < a {
                DocumentPosition::PRECEDING
            } else {
                DocumentPosition::FOLLOWING
            };
            DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC | order
        };
        if !self.contains_node(reference) || !self.contains_node(other) {
            return disconnected(reference, other);
        }

        let ref_chain = self.ancestor_chain(reference);
        let other_chain = self.ancestor_chain(other);
        let (ref_top, other_top) = (ref_chain[ref_chain.len() - 1], other_chain[other_chain.len() - 1]);
        if ref_top != other_top {
            return disconnected(ref_top, other_top);
        }
        if other_chain.contains(&reference) {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }
        if ref_chain.contains(&other) {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }

        // Walk down from the shared top until the chains diverge.
        let mut r = ref_chain.iter().rev();
        let mut o = other_chain.iter().rev();
        let mut common = ref_top;
        loop {
            match (r.next(), o.next()) {
                (Some(&a), Some(&b)) if a == b => common = a,
                (Some(&a), Some(&b)) => {
                    let siblings = self.children(common);
                    let pos_a = siblings.iter().position(|&c| c == a);
                    let pos_b = siblings.iter().position(|&c| c == b);
                    return if pos_b < pos_a {
                        DocumentPosition::PRECEDING
                    } else {
                        DocumentPosition::FOLLOWING
                    };
                }
                _ => return DocumentPosition::FOLLOWING,
            }
        }
    }

    /// `[id, parent, grandparent, ..., top]`.
    fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    // ==================== Observation ====================

    /// Attach (or reconfigure) the document's observer. Pending records
    /// are kept.
    pub fn observe(&mut self, init: MutationObserverInit) {
        debug!(?init, "Observer attached");
        self.observer = Some(init);
    }

    /// Detach the observer and drop pending records.
    pub fn disconnect_observer(&mut self) {
        self.observer = None;
        self.records.clear();
    }

    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    /// Drain and return the pending records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn has_pending_records(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn pending_records(&self) -> &[MutationRecord] {
        &self.records
    }

    fn queue_record(&mut self, target: NodeId, kind: MutationKind) {
        let Some(init) = self.observer else { return };
        if !init.accepts(&kind) {
            return;
        }
        let in_scope = if init.subtree {
            self.is_connected(target)
        } else {
            target == self.root
        };
        if !in_scope {
            return;
        }
        trace!(?target, ?kind, "Queued mutation record");
        self.records.push(MutationRecord { target, kind });
    }
}
