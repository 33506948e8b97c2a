//! Listener side of the dispatch model: the [`CanListener`] trait and the
//! [`Subscriptions`] bitmask every listener carries.
//!
//! Bits `0..num_filters` gate per-mailbox delivery, bit `num_filters` gates
//! the general channel (frames no mailbox-specific interest claimed).
use core::cell::Cell;

use crate::core::{DEFAULT_MAILBOXES, MAX_MAILBOXES};
use crate::error::RegistryError;
use crate::frame::CanFrame;

//==================================================================================MAILBOX_MASK
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Plain bit set over mailbox indices (plus the general bit).
pub struct MailboxMask(u32);

impl MailboxMask {
    pub const EMPTY: Self = Self(0);

    /// Set `bit`. Indices beyond the mask width are ignored.
    #[inline]
    pub const fn with(self, bit: usize) -> Self {
        if bit < u32::BITS as usize {
            Self(self.0 | (1 << bit))
        } else {
            self
        }
    }

    /// Clear `bit`. Indices beyond the mask width are ignored.
    #[inline]
    pub const fn without(self, bit: usize) -> Self {
        if bit < u32::BITS as usize {
            Self(self.0 & !(1 << bit))
        } else {
            self
        }
    }

    #[inline]
    pub const fn contains(self, bit: usize) -> bool {
        bit < u32::BITS as usize && self.0 & (1 << bit) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

//==================================================================================SUBSCRIPTIONS
/// Delivery interests of one listener.
///
/// Uses `Cell` so a listener borrowed immutably by a registry can still be
/// reconfigured. Not `Sync`: see the crate-level concurrency notes.
#[derive(Debug)]
pub struct Subscriptions {
    active: Cell<MailboxMask>,
    num_filters: Cell<usize>,
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriptions {
    /// Empty subscriptions sized for [`DEFAULT_MAILBOXES`].
    pub const fn new() -> Self {
        Self {
            active: Cell::new(MailboxMask::EMPTY),
            num_filters: Cell::new(DEFAULT_MAILBOXES),
        }
    }

    /// Clear every interest and resize for `num_filters` mailboxes.
    /// Called by the registry when the listener is attached.
    pub fn initialize(&self, num_filters: usize) {
        self.num_filters.set(num_filters.min(MAX_MAILBOXES));
        self.active.set(MailboxMask::EMPTY);
    }

    /// Number of mailboxes the mask is sized for; also the general bit index.
    #[inline]
    pub fn num_filters(&self) -> usize {
        self.num_filters.get()
    }

    /// Raw snapshot of the active bits.
    #[inline]
    pub fn mask(&self) -> MailboxMask {
        self.active.get()
    }

    /// Receive frames from `mailbox`.
    pub fn enable_mailbox(&self, mailbox: usize) -> Result<(), RegistryError> {
        let bit = self.check(mailbox)?;
        self.active.set(self.active.get().with(bit));
        Ok(())
    }

    /// Stop receiving frames from `mailbox`.
    pub fn disable_mailbox(&self, mailbox: usize) -> Result<(), RegistryError> {
        let bit = self.check(mailbox)?;
        self.active.set(self.active.get().without(bit));
        Ok(())
    }

    /// Receive frames no mailbox-specific interest claimed.
    pub fn enable_general(&self) {
        self.active.set(self.active.get().with(self.num_filters()));
    }

    pub fn disable_general(&self) {
        self.active.set(self.active.get().without(self.num_filters()));
    }

    /// Read any bit, the general one (`num_filters`) included.
    #[inline]
    pub fn is_enabled(&self, bit: usize) -> bool {
        self.active.get().contains(bit)
    }

    #[inline]
    pub fn is_general_enabled(&self) -> bool {
        self.is_enabled(self.num_filters())
    }

    fn check(&self, mailbox: usize) -> Result<usize, RegistryError> {
        let num_filters = self.num_filters();
        if mailbox < num_filters {
            Ok(mailbox)
        } else {
            Err(RegistryError::InvalidMailbox {
                mailbox,
                num_filters,
            })
        }
    }
}

//==================================================================================LISTENER
/// Application object receiving frames from a dispatch registry.
///
/// The registry only borrows listeners; it never owns or drops them.
///
/// A listener is identified by its [`Subscriptions`]: every listener must
/// return its own instance, and belongs to one registry at a time, since
/// attaching resizes the subscriptions to that registry's mailbox count.
pub trait CanListener {
    /// Delivery interests, consulted on every dispatch.
    fn subscriptions(&self) -> &Subscriptions;

    /// Called once per dispatched frame the listener is subscribed to.
    /// `mailbox` is `None` when the frame arrived through the general channel.
    fn got_frame(&self, frame: &CanFrame, mailbox: Option<usize>) {
        let _ = (frame, mailbox);
    }
}
