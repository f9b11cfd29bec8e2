//! Registry of elements carrying a ratio declaration.
//!
//! # Reconciliation
//!
//! The mutation batch that wakes the tracker is never trusted as a diff: it
//! can coalesce or under-report (an attribute added and removed before the
//! batch is delivered leaves no net change). Each reconciliation therefore
//!
//! 1. re-queries the whole tree for elements carrying the attribute,
//! 2. processes each distinct element once,
//! 3. upserts changed non-empty declarations and drops emptied ones,
//! 4. sweeps every entry the scan did not return or that is no longer
//!    connected.
//!
//! Entries are keyed by element identity only. The sweep, not any ownership
//! mechanism, is what removes elements that left the tree.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::tree::RenderTree;

/// What one reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport<Id> {
    /// Distinct candidates returned by the scan.
    pub scanned: usize,
    /// Newly tracked elements.
    pub added: usize,
    /// Tracked elements whose declaration changed.
    pub updated: usize,
    /// Elements dropped because their declaration was emptied or removed.
    pub removed: usize,
    /// Elements dropped because they left the tree.
    pub collected: usize,
    /// Every element dropped in this pass. Overrides written for them
    /// earlier are still in place.
    pub released: Vec<Id>,
}

impl<Id> Default for ReconcileReport<Id> {
    fn default() -> Self {
        Self {
            scanned: 0,
            added: 0,
            updated: 0,
            removed: 0,
            collected: 0,
            released: Vec::new(),
        }
    }
}

impl<Id> ReconcileReport<Id> {
    pub fn changed(&self) -> bool {
        self.added + self.updated + self.removed + self.collected > 0
    }
}

/// Tracked elements and the declaration last seen on each.
#[derive(Debug, Clone)]
pub struct Tracker<Id> {
    attribute: String,
    targets: HashMap<Id, String>,
}

impl<Id: Copy + Eq + Hash + Debug> Tracker<Id> {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            targets: HashMap::new(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.targets.contains_key(&id)
    }

    /// The declaration recorded for `id` at the last reconciliation.
    pub fn declaration(&self, id: Id) -> Option<&str> {
        self.targets.get(&id).map(String::as_str)
    }

    /// Tracked ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.targets.keys().copied()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Bring the registry in line with the tree. `batch` only signals that
    /// something happened; its contents are not inspected.
    pub fn reconcile<T>(&mut self, tree: &T, batch: &[T::Record]) -> ReconcileReport<Id>
    where
        T: RenderTree<ElementId = Id>,
    {
        let mut report = ReconcileReport::default();
        let mut seen = HashSet::new();

        for id in tree.elements_with_attribute(&self.attribute) {
            if !seen.insert(id) {
                continue;
            }
            report.scanned += 1;

            let current = tree.attribute(id, &self.attribute).unwrap_or("");
            let previous = self.targets.get(&id).map(String::as_str);
            if previous == Some(current) {
                continue;
            }

            if current.is_empty() {
                if self.targets.remove(&id).is_some() {
                    report.removed += 1;
                    report.released.push(id);
                    trace!(?id, "Declaration cleared");
                }
            } else {
                trace!(?id, ?previous, current, "Declaration changed");
                if self.targets.insert(id, current.to_string()).is_some() {
                    report.updated += 1;
                } else {
                    report.added += 1;
                }
            }
        }

        // Anything the scan did not return either lost the attribute or left
        // the tree.
        let stale: Vec<Id> = self
            .targets
            .keys()
            .copied()
            .filter(|id| !seen.contains(id) || !is_connected(tree, *id))
            .collect();
        for id in stale {
            self.targets.remove(&id);
            if is_connected(tree, id) {
                report.removed += 1;
                trace!(?id, "Declaration removed");
            } else {
                report.collected += 1;
                trace!(?id, "Dropped disconnected element");
            }
            report.released.push(id);
        }

        debug!(
            batch = batch.len(),
            tracked = self.targets.len(),
            ?report,
            "Reconciled"
        );
        report
    }
}

/// Whether `element` is part of its document.
///
/// Uses the tree's native query when it has one. Otherwise an element without
/// an owner document counts as connected, and one with an owner is connected
/// unless the owner reports it as disconnected.
pub fn is_connected<T: RenderTree>(tree: &T, element: T::ElementId) -> bool {
    if let Some(connected) = tree.native_is_connected(element) {
        return connected;
    }
    !tree.has_owner_document(element) || !tree.document_position(element).is_disconnected()
}
