//! The render-tree contract the polyfill is written against.
//!
//! Anything that can answer these calls can host the polyfill: the
//! in-memory [`ratiokit_dom::Document`] (see [`crate::adapter`]) or an engine's
//! own DOM.

use std::fmt::Debug;
use std::hash::Hash;

use ratiokit_common::ObserveOptions;
pub use ratiokit_dom::DocumentPosition;

/// Resolved style values as the tree reports them (`"200px"`, `"none"`,
/// `"flex"`). The polyfill parses them itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    pub display: String,
    pub flex_direction: String,
    pub width: String,
    pub height: String,
    pub min_width: String,
    pub min_height: String,
    pub max_width: String,
    pub max_height: String,
}

/// Capabilities consumed from the render tree.
///
/// None of these calls may fail observably: a write to an element that no
/// longer exists is a no-op, a read returns `None`.
pub trait RenderTree {
    /// Element identity. Holding one must not keep the element alive.
    type ElementId: Copy + Eq + Hash + Debug;

    /// One change notification. The polyfill only counts them.
    type Record: Debug;

    /// Connected elements carrying `name`, evaluated fresh on every call.
    fn elements_with_attribute(&self, name: &str) -> Vec<Self::ElementId>;

    fn attribute(&self, element: Self::ElementId, name: &str) -> Option<&str>;

    /// Set an explicit inline style value.
    fn set_style(&mut self, element: Self::ElementId, property: &str, value: &str);

    /// Remove an explicit inline style value.
    fn clear_style(&mut self, element: Self::ElementId, property: &str);

    /// Parent element, or `None` at the top of the tree.
    fn parent_element(&self, element: Self::ElementId) -> Option<Self::ElementId>;

    fn resolved_style(&self, element: Self::ElementId) -> Option<ResolvedStyle>;

    /// Start (or reconfigure) change notification for the whole tree.
    fn observe(&mut self, options: &ObserveOptions);

    /// Stop change notification and drop anything pending.
    fn disconnect(&mut self);

    /// Drain pending notifications.
    fn take_records(&mut self) -> Vec<Self::Record>;

    fn has_pending_records(&self) -> bool;

    /// Native "is this node in the document" query. `None` when the tree
    /// does not provide one.
    fn native_is_connected(&self, element: Self::ElementId) -> Option<bool>;

    fn has_owner_document(&self, element: Self::ElementId) -> bool;

    /// Position of `element` relative to its owner document.
    fn document_position(&self, element: Self::ElementId) -> DocumentPosition;
}
