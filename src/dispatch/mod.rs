//! Frame dispatch: callbacks and listeners registered per mailbox, the
//! routing policy between them, and integration helpers.
//!
//! # Concurrency
//!
//! Dispatch is synchronous and single-threaded: it runs in one polling loop
//! or task. Handlers run inline and must return quickly; nothing here queues
//! or applies backpressure. An interrupt handler does not dispatch itself; it
//! sends `(frame, mailbox)` into an `embassy_sync` channel whose receiver
//! feeds [`pump::pump`]. Interleaving registration with dispatch in that same
//! context goes through [`shared::SharedRegistry`].
pub mod pump;
pub mod registry;
pub mod shared;
pub mod subscriptions;

use crate::frame::CanFrame;

pub use registry::{DispatchRegistry, FrameCallback};
pub use subscriptions::{CanListener, MailboxMask, Subscriptions};

/// Anything able to route a received frame. Returns the number of handlers
/// that received it.
pub trait Dispatcher {
    fn dispatch(&self, frame: &CanFrame, mailbox: usize) -> usize;
}

impl<const MAILBOXES: usize> Dispatcher for DispatchRegistry<'_, MAILBOXES> {
    fn dispatch(&self, frame: &CanFrame, mailbox: usize) -> usize {
        DispatchRegistry::dispatch(self, frame, mailbox)
    }
}
