//! Host signals.
//!
//! The host posts these from its event loop (or any other thread); the
//! polyfill drains them on its next [`pump`](crate::AspectRatioPolyfill::pump).

use crossbeam_channel::{Receiver, Sender};

/// Something the host wants the polyfill to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Deferred installation: subscribe to the tree and run the first pass.
    Install,
    /// The viewport was resized.
    Resize,
    /// The document's ready state changed.
    ReadyStateChange,
}

/// Cloneable handle for posting [`Signal`]s.
#[derive(Debug, Clone)]
pub struct SignalSender {
    inner: Sender<Signal>,
}

impl SignalSender {
    /// Post a signal. Returns `false` if the polyfill has been dropped.
    pub fn send(&self, signal: Signal) -> bool {
        self.inner.send(signal).is_ok()
    }

    pub fn resize(&self) -> bool {
        self.send(Signal::Resize)
    }

    pub fn ready_state_changed(&self) -> bool {
        self.send(Signal::ReadyStateChange)
    }
}

/// Signals drained in one pump, coalesced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Pending {
    pub(crate) install: bool,
    pub(crate) resize: bool,
    pub(crate) ready_state: bool,
}

impl Pending {
    pub(crate) fn layout_changed(&self) -> bool {
        self.resize || self.ready_state
    }
}

pub(crate) fn channel() -> (SignalSender, Receiver<Signal>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (SignalSender { inner: tx }, rx)
}

pub(crate) fn drain(receiver: &Receiver<Signal>) -> Pending {
    let mut pending = Pending::default();
    for signal in receiver.try_iter() {
        match signal {
            Signal::Install => pending.install = true,
            Signal::Resize => pending.resize = true,
            Signal::ReadyStateChange => pending.ready_state = true,
        }
    }
    pending
}
