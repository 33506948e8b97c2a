//! Registry shared between setup code and receive-time code running in the
//! same execution context.
//!
//! [`DispatchRegistry`] has no locking of its own: mutating it while a
//! dispatch is running is undefined unless access is serialized.
//! `SharedRegistry` is that serialization point for one executor or one
//! polling loop. It wraps the registry in an [`embassy_sync`] blocking mutex
//! over a `RefCell`; use `NoopRawMutex`.
//!
//! Callbacks and listeners are borrowed trait objects without a `Send`
//! bound, so the registry never crosses into an interrupt handler. An ISR
//! should push `(frame, mailbox)` into an `embassy_sync` channel and let the
//! owning context drain it with [`pump`](crate::dispatch::pump::pump); the
//! channel receiver is a ready-made [`FrameSource`](crate::dispatch::pump::FrameSource).
//!
//! Handlers run with the lock held. A handler trying to reconfigure the same
//! registry gets [`RegistryError::Busy`] instead of a deadlock or a panic.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use crate::core::DEFAULT_MAILBOXES;
use crate::dispatch::{registry::DispatchRegistry, Dispatcher};
use crate::error::RegistryError;
use crate::frame::CanFrame;

/// Lock-guarded [`DispatchRegistry`].
pub struct SharedRegistry<'a, M: RawMutex, const MAILBOXES: usize = DEFAULT_MAILBOXES> {
    inner: Mutex<M, RefCell<DispatchRegistry<'a, MAILBOXES>>>,
}

impl<'a, M: RawMutex, const MAILBOXES: usize> SharedRegistry<'a, M, MAILBOXES> {
    pub const fn new(registry: DispatchRegistry<'a, MAILBOXES>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(registry)),
        }
    }

    /// Run `f` with exclusive access to the registration tables.
    ///
    /// Fails with [`RegistryError::Busy`] when called from inside a handler
    /// or from inside another `configure`.
    pub fn configure<R>(
        &self,
        f: impl FnOnce(&mut DispatchRegistry<'a, MAILBOXES>) -> R,
    ) -> Result<R, RegistryError> {
        self.inner.lock(|cell| {
            let mut registry = cell.try_borrow_mut().map_err(|_| RegistryError::Busy)?;
            Ok(f(&mut registry))
        })
    }

    /// Route one frame. Returns `0` (frame unclaimed) when the tables are
    /// being reconfigured by the current context.
    pub fn dispatch(&self, frame: &CanFrame, mailbox: usize) -> usize {
        self.inner.lock(|cell| match cell.try_borrow() {
            Ok(registry) => registry.dispatch(frame, mailbox),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Dispatch during reconfiguration, frame {:#x} dropped", frame.id);
                0
            }
        })
    }
}

impl<M: RawMutex, const MAILBOXES: usize> Dispatcher for SharedRegistry<'_, M, MAILBOXES> {
    fn dispatch(&self, frame: &CanFrame, mailbox: usize) -> usize {
        SharedRegistry::dispatch(self, frame, mailbox)
    }
}
