//! Mailbox dispatch registry: per-mailbox callbacks, one general callback, and
//! a small fixed set of borrowed listeners.
//!
//! # Delivery policy
//!
//! For each `(frame, mailbox)` handed to [`DispatchRegistry::dispatch`]:
//!
//! 1. the callback registered for `mailbox`, if any;
//! 2. every attached listener subscribed to `mailbox`;
//! 3. the general callback, only when step 1 found no callback;
//! 4. every attached listener subscribed to the general channel that did not
//!    already receive the frame in step 2.
//!
//! Each step runs regardless of the others; a listener sees a frame at most
//! once per dispatch.
//!
//! # Buffering switch
//!
//! Drivers queue frames nobody claims so the application can `read()` them
//! later. Installing a general callback turns that off: every frame then has
//! a taker and is delivered immediately. [`DispatchRegistry::buffers_unmatched`]
//! reports which mode is active.
use core::ptr;

use crate::core::{DEFAULT_MAILBOXES, MAX_MAILBOXES, SIZE_LISTENERS};
use crate::dispatch::subscriptions::CanListener;
use crate::error::RegistryError;
use crate::frame::CanFrame;

/// Function-style frame handler.
pub type FrameCallback<'a> = &'a dyn Fn(&CanFrame);

//==================================================================================REGISTRY
/// Routing tables for one transceiver with `MAILBOXES` filter slots.
pub struct DispatchRegistry<'a, const MAILBOXES: usize = DEFAULT_MAILBOXES> {
    callbacks: [Option<FrameCallback<'a>>; MAILBOXES],
    general: Option<FrameCallback<'a>>,
    listeners: [Option<&'a dyn CanListener>; SIZE_LISTENERS],
}

impl<const MAILBOXES: usize> core::fmt::Debug for DispatchRegistry<'_, MAILBOXES> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("mailboxes", &MAILBOXES)
            .field(
                "callbacks",
                &self.callbacks.iter().filter(|cb| cb.is_some()).count(),
            )
            .field("general", &self.general.is_some())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<const MAILBOXES: usize> Default for DispatchRegistry<'_, MAILBOXES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const MAILBOXES: usize> DispatchRegistry<'a, MAILBOXES> {
    const BOUNDED: () = assert!(
        MAILBOXES <= MAX_MAILBOXES,
        "mailbox count exceeds MAX_MAILBOXES"
    );

    /// Empty registry: no callbacks, no listeners.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::BOUNDED;
        Self {
            callbacks: [None; MAILBOXES],
            general: None,
            listeners: [None; SIZE_LISTENERS],
        }
    }

    /// Number of mailboxes this registry routes.
    #[inline]
    pub const fn num_filters(&self) -> usize {
        MAILBOXES
    }

    //==============================================================================LISTENERS
    /// Install `listener` in the first free slot and reset its subscriptions.
    ///
    /// Returns the slot index, or [`RegistryError::RegistryFull`]. Attaching a
    /// listener that is already present only resets it and keeps its slot.
    ///
    /// The listener should not stay attached to another registry: its
    /// subscriptions are resized to this one's mailbox count.
    pub fn attach(&mut self, listener: &'a dyn CanListener) -> Result<usize, RegistryError> {
        if let Some(index) = self.slot_of(listener) {
            listener.subscriptions().initialize(MAILBOXES);
            return Ok(index);
        }

        let (index, slot) = self
            .listeners
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())
            .ok_or(RegistryError::RegistryFull)?;

        listener.subscriptions().initialize(MAILBOXES);
        *slot = Some(listener);

        #[cfg(feature = "defmt")]
        defmt::debug!("Listener attached to slot {}", index);
        Ok(index)
    }

    /// Remove `listener` from its slot. Other slots are left untouched.
    ///
    /// Returns the freed slot index, or [`RegistryError::NotFound`] when the
    /// listener was not attached.
    pub fn detach(&mut self, listener: &dyn CanListener) -> Result<usize, RegistryError> {
        let index = self.slot_of(listener).ok_or(RegistryError::NotFound)?;
        self.listeners[index] = None;

        #[cfg(feature = "defmt")]
        defmt::debug!("Listener detached from slot {}", index);
        Ok(index)
    }

    fn slot_of(&self, listener: &dyn CanListener) -> Option<usize> {
        self.listeners
            .iter()
            .position(|slot| slot.is_some_and(|held| same_listener(held, listener)))
    }

    /// Number of occupied listener slots.
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().flatten().count()
    }

    //==============================================================================CALLBACKS
    /// Install the callback for `mailbox`, replacing any previous one.
    pub fn set_callback(
        &mut self,
        mailbox: usize,
        callback: FrameCallback<'a>,
    ) -> Result<(), RegistryError> {
        *self.callback_slot(mailbox)? = Some(callback);
        Ok(())
    }

    /// Remove the callback for `mailbox`.
    pub fn clear_callback(&mut self, mailbox: usize) -> Result<(), RegistryError> {
        *self.callback_slot(mailbox)? = None;
        Ok(())
    }

    /// Install the fallback callback. Disables driver-side buffering of
    /// unclaimed frames.
    pub fn set_general_callback(&mut self, callback: FrameCallback<'a>) {
        self.general = Some(callback);
    }

    pub fn clear_general_callback(&mut self) {
        self.general = None;
    }

    /// `true` while no general callback is installed, i.e. frames without a
    /// taker should be queued by the driver.
    #[inline]
    pub fn buffers_unmatched(&self) -> bool {
        self.general.is_none()
    }

    fn callback_slot(
        &mut self,
        mailbox: usize,
    ) -> Result<&mut Option<FrameCallback<'a>>, RegistryError> {
        self.callbacks
            .get_mut(mailbox)
            .ok_or(RegistryError::InvalidMailbox {
                mailbox,
                num_filters: MAILBOXES,
            })
    }

    //==============================================================================DISPATCH
    /// Whether a frame on `mailbox` would reach at least one callback or listener.
    pub fn would_deliver(&self, mailbox: usize) -> bool {
        self.mailbox_callback(mailbox).is_some()
            || self.general.is_some()
            || self.listeners.iter().flatten().copied().any(|listener| {
                self.listens_on(listener, mailbox) || listener.subscriptions().is_general_enabled()
            })
    }

    /// Route one received frame. Returns how many handlers were invoked;
    /// `0` means nobody claimed the frame.
    ///
    /// A `mailbox` outside the table has no mailbox-specific interest and goes
    /// straight to the general path.
    pub fn dispatch(&self, frame: &CanFrame, mailbox: usize) -> usize {
        let mut delivered = 0;

        let callback = self.mailbox_callback(mailbox);
        if let Some(callback) = callback {
            callback(frame);
            delivered += 1;
        }

        for listener in self.listeners.iter().flatten().copied() {
            if self.listens_on(listener, mailbox) {
                listener.got_frame(frame, Some(mailbox));
                delivered += 1;
            }
        }

        if callback.is_none() {
            if let Some(general) = self.general {
                general(frame);
                delivered += 1;
            }
        }

        for listener in self.listeners.iter().flatten().copied() {
            if !self.listens_on(listener, mailbox)
                && listener.subscriptions().is_general_enabled()
            {
                listener.got_frame(frame, None);
                delivered += 1;
            }
        }

        #[cfg(feature = "defmt")]
        if delivered == 0 {
            defmt::trace!("Frame {:#x} on mailbox {} unclaimed", frame.id, mailbox);
        }

        delivered
    }

    #[inline]
    fn mailbox_callback(&self, mailbox: usize) -> Option<FrameCallback<'a>> {
        self.callbacks.get(mailbox).copied().flatten()
    }

    /// Mailbox interest only counts below both table sizes: at or above the
    /// listener's own count the bit is its general flag, not a mailbox.
    #[inline]
    fn listens_on(&self, listener: &dyn CanListener, mailbox: usize) -> bool {
        let subs = listener.subscriptions();
        mailbox < MAILBOXES && mailbox < subs.num_filters() && subs.is_enabled(mailbox)
    }
}

/// Listeners are told apart by the subscriptions they own. Object addresses
/// alone are ambiguous: a listener nested as the first field of another
/// shares its address.
fn same_listener(a: &dyn CanListener, b: &dyn CanListener) -> bool {
    ptr::eq(a.subscriptions(), b.subscriptions())
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
