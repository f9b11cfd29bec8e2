//! [`RenderTree`] for the in-memory [`Document`].

use ratiokit_common::ObserveOptions;
use ratiokit_dom::{Document, MutationObserverInit, MutationRecord, NodeId};
use tracing::trace;

use crate::tree::{DocumentPosition, RenderTree, ResolvedStyle};

pub fn observer_init(options: &ObserveOptions) -> MutationObserverInit {
    MutationObserverInit {
        attributes: options.attributes,
        child_list: options.child_list,
        character_data: options.character_data,
        subtree: options.subtree,
    }
}

impl RenderTree for Document {
    type ElementId = NodeId;
    type Record = MutationRecord;

    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.query_attribute(name)
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.get_attribute(element, name)
    }

    fn set_style(&mut self, element: NodeId, property: &str, value: &str) {
        if let Err(err) = self.set_style_property(element, property, value) {
            trace!(?element, %err, "Style write dropped");
        }
    }

    fn clear_style(&mut self, element: NodeId, property: &str) {
        if let Err(err) = self.remove_style_property(element, property) {
            trace!(?element, %err, "Style clear dropped");
        }
    }

    fn parent_element(&self, element: NodeId) -> Option<NodeId> {
        Document::parent_element(self, element)
    }

    fn resolved_style(&self, element: NodeId) -> Option<ResolvedStyle> {
        let style = self.computed_style(element)?;
        Some(ResolvedStyle {
            display: style.display,
            flex_direction: style.flex_direction,
            width: style.width,
            height: style.height,
            min_width: style.min_width,
            min_height: style.min_height,
            max_width: style.max_width,
            max_height: style.max_height,
        })
    }

    fn observe(&mut self, options: &ObserveOptions) {
        Document::observe(self, observer_init(options));
    }

    fn disconnect(&mut self) {
        self.disconnect_observer();
    }

    fn take_records(&mut self) -> Vec<MutationRecord> {
        Document::take_records(self)
    }

    fn has_pending_records(&self) -> bool {
        Document::has_pending_records(self)
    }

    fn native_is_connected(&self, element: NodeId) -> Option<bool> {
        self.has_native_connectivity()
            .then(|| self.is_connected(element))
    }

    fn has_owner_document(&self, element: NodeId) -> bool {
        self.owner_document(element).is_some()
    }

    fn document_position(&self, element: NodeId) -> DocumentPosition {
        match self.owner_document(element) {
            Some(owner) => self.compare_document_position(owner, element),
            None => DocumentPosition::empty(),
        }
    }
}
