//! # RatioKit Polyfill
//!
//! Keeps elements that declare an `aspect-ratio` attribute at that ratio in
//! a render tree that has no native support for it.
//!
//! ## Design Goals
//!
//! 1. **Never miss a change**: every wake-up rescans the tree instead of
//!    trusting the notification batch
//! 2. **Never hold on to dead elements**: tracking is by identity and pruned
//!    by a connectivity sweep
//! 3. **Never feed back on itself**: notifications caused by our own style
//!    writes are flushed before control returns to the host
//! 4. **Never fail loudly**: bad declarations or styles degrade to "no
//!    override" for that element
//!
//! ## Usage
//!
//! ```ignore
//! let mut polyfill = AspectRatioPolyfill::<Document>::new(PolyfillConfig::default());
//! let signals = polyfill.signal_sender();
//!
//! // In the host event loop:
//! signals.resize();
//! polyfill.pump(&mut document);
//! ```

pub mod adapter;
pub mod applier;
pub mod signal;
pub mod tracker;
pub mod tree;

use crossbeam_channel::Receiver;
use ratiokit_common::PolyfillConfig;
use tracing::{debug, info, trace};

pub use applier::{ApplyOutcome, Applier, Axis, BoxConstraints};
pub use signal::{Signal, SignalSender};
pub use tracker::{is_connected, ReconcileReport, Tracker};
pub use tree::{DocumentPosition, RenderTree, ResolvedStyle};

/// Counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolyfillStats {
    /// Reconcile and/or apply passes run by [`AspectRatioPolyfill::pump`].
    pub cycles: u64,
    pub reconciles: u64,
    pub apply_passes: u64,
    /// Size overrides written.
    pub writes: u64,
    /// Notifications flushed after our own writes.
    pub flushed_records: u64,
}

/// The installed polyfill for one tree.
pub struct AspectRatioPolyfill<T: RenderTree> {
    config: PolyfillConfig,
    tracker: Tracker<T::ElementId>,
    applier: Applier,
    sender: SignalSender,
    receiver: Receiver<Signal>,
    installed: bool,
    /// External notifications were flushed together with our own writes.
    rescan_owed: bool,
    stats: PolyfillStats,
}

impl<T: RenderTree> Default for AspectRatioPolyfill<T> {
    fn default() -> Self {
        Self::new(PolyfillConfig::default())
    }
}

impl<T: RenderTree> AspectRatioPolyfill<T> {
    /// Create the polyfill and schedule its installation for the next
    /// [`pump`](Self::pump).
    pub fn new(config: PolyfillConfig) -> Self {
        let (sender, receiver) = signal::channel();
        sender.send(Signal::Install);
        Self {
            tracker: Tracker::new(config.attribute.clone()),
            applier: Applier::from_config(&config),
            config,
            sender,
            receiver,
            installed: false,
            rescan_owed: false,
            stats: PolyfillStats::default(),
        }
    }

    pub fn config(&self) -> &PolyfillConfig {
        &self.config
    }

    /// Handle for the host's resize and ready-state notifications.
    pub fn signal_sender(&self) -> SignalSender {
        self.sender.clone()
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn stats(&self) -> &PolyfillStats {
        &self.stats
    }

    pub fn tracked(&self) -> impl Iterator<Item = T::ElementId> + '_ {
        self.tracker.ids()
    }

    pub fn is_tracked(&self, element: T::ElementId) -> bool {
        self.tracker.contains(element)
    }

    pub fn tracked_len(&self) -> usize {
        self.tracker.len()
    }

    pub fn declaration(&self, element: T::ElementId) -> Option<&str> {
        self.tracker.declaration(element)
    }

    /// Process everything that happened since the last pump: queued host
    /// signals and pending tree notifications. Runs at most one
    /// reconcile+apply cycle and returns whether it ran.
    pub fn pump(&mut self, tree: &mut T) -> bool {
        let pending = signal::drain(&self.receiver);

        if pending.install && !self.installed {
            tree.observe(&self.config.observe);
            self.installed = true;
            info!(attribute = %self.config.attribute, "Aspect-ratio polyfill installed");
        }
        if !self.installed {
            trace!(?pending, "Not installed, signals ignored");
            return false;
        }

        let records = if tree.has_pending_records() {
            tree.take_records()
        } else {
            Vec::new()
        };

        let rescan = pending.install
            || self.rescan_owed
            || !records.is_empty()
            || (pending.layout_changed() && self.config.reconcile_on_resize);

        if rescan {
            self.rescan_owed = false;
            self.stats.cycles += 1;
            self.reconcile(tree, &records);
            self.apply_tracked(tree);
            true
        } else if pending.layout_changed() {
            self.stats.cycles += 1;
            self.apply_tracked(tree);
            true
        } else {
            false
        }
    }

    fn reconcile(&mut self, tree: &mut T, batch: &[T::Record]) {
        self.stats.reconciles += 1;
        let report = self.tracker.reconcile(tree, batch);
        for &element in &report.released {
            self.applier.release(tree, element);
        }
    }

    /// Re-apply every tracked element without rescanning.
    ///
    /// Returns the number of overrides written.
    pub fn apply_all(&mut self, tree: &mut T) -> usize {
        self.note_external_records(tree);
        self.apply_tracked(tree)
    }

    fn apply_tracked(&mut self, tree: &mut T) -> usize {
        let mut writes = 0;
        for element in self.tracker.ids() {
            if self.applier.apply(tree, element).wrote() {
                writes += 1;
            }
        }
        let flushed = tree.take_records().len();

        self.stats.apply_passes += 1;
        self.stats.writes += writes as u64;
        self.stats.flushed_records += flushed as u64;
        debug!(
            tracked = self.tracker.len(),
            writes,
            flushed,
            "Applied aspect ratios"
        );
        writes
    }

    /// Apply one element without reconciling. The element does not need to
    /// be tracked.
    pub fn apply_element(&mut self, tree: &mut T, element: T::ElementId) -> ApplyOutcome {
        self.note_external_records(tree);
        let outcome = self.applier.apply(tree, element);
        let flushed = tree.take_records().len();
        self.stats.flushed_records += flushed as u64;
        if outcome.wrote() {
            self.stats.writes += 1;
        }
        outcome
    }

    /// Notifications already pending before we write are someone else's.
    /// They get flushed along with ours, so the next pump rescans for them.
    fn note_external_records(&mut self, tree: &T) {
        if tree.has_pending_records() {
            self.rescan_owed = true;
        }
    }

    /// Stop observing and forget every tracked element. Overrides already
    /// written stay in place. Signals are ignored until [`reinstall`](Self::reinstall).
    pub fn disconnect(&mut self, tree: &mut T) {
        tree.disconnect();
        self.tracker.clear();
        self.installed = false;
        self.rescan_owed = false;
        signal::drain(&self.receiver);
        info!("Aspect-ratio polyfill disconnected");
    }

    /// Schedule installation again for the next pump.
    pub fn reinstall(&mut self) {
        self.sender.send(Signal::Install);
    }
}
