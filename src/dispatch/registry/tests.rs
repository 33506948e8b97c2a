//! Registry tests: slot bookkeeping, mailbox validation, and delivery precedence.
use super::*;
use crate::dispatch::subscriptions::Subscriptions;
use core::cell::Cell;

/// Listener counting deliveries per channel.
#[derive(Default)]
struct RecordingListener {
    subs: Subscriptions,
    mailbox_hits: Cell<usize>,
    general_hits: Cell<usize>,
    last_mailbox: Cell<Option<usize>>,
}

impl CanListener for RecordingListener {
    fn subscriptions(&self) -> &Subscriptions {
        &self.subs
    }

    fn got_frame(&self, _frame: &CanFrame, mailbox: Option<usize>) {
        match mailbox {
            Some(_) => self.mailbox_hits.set(self.mailbox_hits.get() + 1),
            None => self.general_hits.set(self.general_hits.get() + 1),
        }
        self.last_mailbox.set(mailbox);
    }
}

fn frame(id: u32) -> CanFrame {
    CanFrame::with_data(id, false, &[1, 2, 3]).expect("three bytes fit")
}

//==================================================================================SLOTS
#[test]
/// Four listeners fit, a fifth is refused, and detaching frees a slot.
fn test_listener_capacity() {
    let listeners: [RecordingListener; 5] = Default::default();
    let mut registry: DispatchRegistry = DispatchRegistry::new();

    for (expected_slot, listener) in listeners[..4].iter().enumerate() {
        assert_eq!(registry.attach(listener), Ok(expected_slot));
    }
    assert_eq!(registry.attach(&listeners[4]), Err(RegistryError::RegistryFull));
    assert_eq!(registry.listener_count(), 4);

    assert_eq!(registry.detach(&listeners[1]), Ok(1));
    assert_eq!(registry.attach(&listeners[4]), Ok(1));
}

#[test]
/// Attaching wipes whatever the listener had enabled before.
fn test_attach_resets_subscriptions() {
    let listener = RecordingListener::default();
    listener.subs.enable_mailbox(3).expect("mailbox 3 exists");
    listener.subs.enable_general();

    let mut registry: DispatchRegistry<'_, 4> = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");

    assert!(listener.subs.mask().is_empty());
    assert_eq!(listener.subs.num_filters(), 4);
}

#[test]
/// Re-attaching keeps the slot, so a listener never holds two slots.
fn test_reattach_keeps_single_slot() {
    let listener = RecordingListener::default();
    let mut registry: DispatchRegistry = DispatchRegistry::new();
    assert_eq!(registry.attach(&listener), Ok(0));
    listener.subs.enable_general();

    assert_eq!(registry.attach(&listener), Ok(0));
    assert_eq!(registry.listener_count(), 1);
    assert!(!listener.subs.is_general_enabled());

    listener.subs.enable_general();
    assert_eq!(registry.dispatch(&frame(0x9), 0), 1);
    assert_eq!(listener.general_hits.get(), 1);
}

#[test]
/// A listener embedded at the start of another is still a distinct listener.
fn test_nested_listeners_are_distinct() {
    struct Outer {
        inner: RecordingListener,
        subs: Subscriptions,
        hits: Cell<usize>,
    }
    impl CanListener for Outer {
        fn subscriptions(&self) -> &Subscriptions {
            &self.subs
        }
        fn got_frame(&self, _frame: &CanFrame, _mailbox: Option<usize>) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    let outer = Outer {
        inner: RecordingListener::default(),
        subs: Subscriptions::new(),
        hits: Cell::new(0),
    };
    let mut registry: DispatchRegistry = DispatchRegistry::new();
    assert_eq!(registry.attach(&outer), Ok(0));
    assert_eq!(registry.attach(&outer.inner), Ok(1));
    assert_eq!(registry.listener_count(), 2);

    outer.subs.enable_general();
    outer.inner.subs.enable_general();
    assert_eq!(registry.dispatch(&frame(0x33), 0), 2);
    assert_eq!(outer.hits.get(), 1);
    assert_eq!(outer.inner.general_hits.get(), 1);

    assert_eq!(registry.detach(&outer.inner), Ok(1));
    assert_eq!(registry.listener_count(), 1);
    assert_eq!(registry.detach(&outer), Ok(0));
}

#[test]
/// After a smaller registry resized a listener, its general bit is never read as mailbox interest.
fn test_general_bit_not_mistaken_for_mailbox() {
    let listener = RecordingListener::default();
    let mut wide: DispatchRegistry = DispatchRegistry::new();
    let mut narrow: DispatchRegistry<'_, 4> = DispatchRegistry::new();
    wide.attach(&listener).expect("free slot");
    narrow.attach(&listener).expect("free slot");
    listener.subs.enable_general();
    assert!(listener.subs.is_enabled(4));

    assert_eq!(wide.dispatch(&frame(0x44), 4), 1);
    assert_eq!(listener.mailbox_hits.get(), 0);
    assert_eq!(listener.general_hits.get(), 1);
    assert_eq!(listener.last_mailbox.get(), None);
}

#[test]
/// Detaching twice reports `NotFound` and leaves the other slots alone.
fn test_detach_idempotent() {
    let first = RecordingListener::default();
    let second = RecordingListener::default();
    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.attach(&first).expect("free slot");
    registry.attach(&second).expect("free slot");

    assert_eq!(registry.detach(&first), Ok(0));
    assert_eq!(registry.detach(&first), Err(RegistryError::NotFound));
    assert_eq!(registry.listener_count(), 1);

    second.subs.enable_general();
    registry.dispatch(&frame(0x10), 0);
    assert_eq!(second.general_hits.get(), 1);
    assert_eq!(first.general_hits.get(), 0);
}

//==================================================================================MAILBOX_VALIDATION
#[test]
/// Mailbox `num_filters` is rejected by both callbacks and listeners.
fn test_invalid_mailbox() {
    let callback = |_: &CanFrame| {};
    let listener = RecordingListener::default();
    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");

    let invalid = Err(RegistryError::InvalidMailbox {
        mailbox: 8,
        num_filters: 8,
    });
    assert_eq!(registry.set_callback(8, &callback), invalid);
    assert_eq!(registry.clear_callback(8), invalid);
    assert_eq!(listener.subs.enable_mailbox(8), invalid);
    assert!(registry.set_callback(7, &callback).is_ok());
}

//==================================================================================DISPATCH
#[test]
/// Mailbox-specific interest wins over general interest for both callbacks and listeners.
fn test_mailbox_path_preferred() {
    let mailbox_calls = Cell::new(0);
    let general_calls = Cell::new(0);
    let on_mailbox = |_: &CanFrame| mailbox_calls.set(mailbox_calls.get() + 1);
    let on_general = |_: &CanFrame| general_calls.set(general_calls.get() + 1);
    let listener = RecordingListener::default();

    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");
    listener.subs.enable_mailbox(2).expect("mailbox 2 exists");
    listener.subs.enable_general();
    registry.set_callback(2, &on_mailbox).expect("mailbox 2 exists");
    registry.set_general_callback(&on_general);

    assert_eq!(registry.dispatch(&frame(0x100), 2), 2);

    assert_eq!(mailbox_calls.get(), 1);
    assert_eq!(listener.mailbox_hits.get(), 1);
    assert_eq!(listener.last_mailbox.get(), Some(2));
    assert_eq!(listener.general_hits.get(), 0);
    assert_eq!(general_calls.get(), 0);
}

#[test]
/// Without mailbox interest the general callback and general listeners each get the frame once.
fn test_general_fallback() {
    let general_calls = Cell::new(0);
    let on_general = |_: &CanFrame| general_calls.set(general_calls.get() + 1);
    let listener = RecordingListener::default();

    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");
    listener.subs.enable_general();
    registry.set_general_callback(&on_general);

    assert_eq!(registry.dispatch(&frame(0x200), 5), 2);
    assert_eq!(general_calls.get(), 1);
    assert_eq!(listener.general_hits.get(), 1);
    assert_eq!(listener.mailbox_hits.get(), 0);
    assert_eq!(listener.last_mailbox.get(), None);
}

#[test]
/// A mailbox callback suppresses the general callback only, not general listeners.
fn test_callback_does_not_suppress_general_listener() {
    let general_calls = Cell::new(0);
    let on_mailbox = |_: &CanFrame| {};
    let on_general = |_: &CanFrame| general_calls.set(general_calls.get() + 1);
    let listener = RecordingListener::default();

    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");
    listener.subs.enable_general();
    registry.set_callback(1, &on_mailbox).expect("mailbox 1 exists");
    registry.set_general_callback(&on_general);

    assert_eq!(registry.dispatch(&frame(0x300), 1), 2);
    assert_eq!(general_calls.get(), 0);
    assert_eq!(listener.general_hits.get(), 1);
}

#[test]
/// Handlers run in policy order: mailbox callback, mailbox listeners, general callback, general listeners.
fn test_delivery_order() {
    let clock = Cell::new(0u32);
    let tick = || {
        let now = clock.get();
        clock.set(now + 1);
        now
    };
    let general_seen_at = Cell::new(u32::MAX);
    let on_general = |_: &CanFrame| general_seen_at.set(tick());

    struct Stamped<'c> {
        subs: Subscriptions,
        clock: &'c Cell<u32>,
        seen_at: Cell<u32>,
    }
    impl CanListener for Stamped<'_> {
        fn subscriptions(&self) -> &Subscriptions {
            &self.subs
        }
        fn got_frame(&self, _frame: &CanFrame, _mailbox: Option<usize>) {
            self.seen_at.set(self.clock.get());
            self.clock.set(self.clock.get() + 1);
        }
    }
    let general_listener = Stamped {
        subs: Subscriptions::new(),
        clock: &clock,
        seen_at: Cell::new(u32::MAX),
    };
    let mailbox_listener = Stamped {
        subs: Subscriptions::new(),
        clock: &clock,
        seen_at: Cell::new(u32::MAX),
    };

    let mut registry: DispatchRegistry = DispatchRegistry::new();
    // Attach the general listener first so slot order alone cannot explain the result.
    registry.attach(&general_listener).expect("free slot");
    registry.attach(&mailbox_listener).expect("free slot");
    general_listener.subs.enable_general();
    mailbox_listener.subs.enable_mailbox(4).expect("mailbox 4 exists");
    registry.set_general_callback(&on_general);

    assert_eq!(registry.dispatch(&frame(0x44), 4), 3);
    assert_eq!(mailbox_listener.seen_at.get(), 0);
    assert_eq!(general_seen_at.get(), 1);
    assert_eq!(general_listener.seen_at.get(), 2);
}

#[test]
/// Indices past the table have no mailbox interest and fall through to the general path.
fn test_out_of_range_mailbox_goes_general() {
    let listener = RecordingListener::default();
    let mut registry: DispatchRegistry<'_, 2> = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");
    listener.subs.enable_general();

    assert_eq!(registry.dispatch(&frame(0x1), 2), 1);
    assert_eq!(listener.general_hits.get(), 1);
}

#[test]
/// An unclaimed frame is dropped silently and reported as zero deliveries.
fn test_unclaimed_frame() {
    let listener = RecordingListener::default();
    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.attach(&listener).expect("free slot");
    listener.subs.enable_mailbox(0).expect("mailbox 0 exists");

    assert!(!registry.would_deliver(3));
    assert_eq!(registry.dispatch(&frame(0x7), 3), 0);
    assert_eq!(listener.mailbox_hits.get(), 0);
    assert!(registry.would_deliver(0));
}

#[test]
/// The general callback flips the buffering switch; clearing it flips it back.
fn test_buffering_switch() {
    let on_general = |_: &CanFrame| {};
    let mut registry: DispatchRegistry = DispatchRegistry::new();
    assert!(registry.buffers_unmatched());

    registry.set_general_callback(&on_general);
    assert!(!registry.buffers_unmatched());
    assert!(registry.would_deliver(6));

    registry.clear_general_callback();
    assert!(registry.buffers_unmatched());
}

#[test]
/// Clearing a mailbox callback hands the mailbox back to the general callback.
fn test_clear_callback_restores_general() {
    let mailbox_calls = Cell::new(0);
    let general_calls = Cell::new(0);
    let on_mailbox = |_: &CanFrame| mailbox_calls.set(mailbox_calls.get() + 1);
    let on_general = |_: &CanFrame| general_calls.set(general_calls.get() + 1);

    let mut registry: DispatchRegistry = DispatchRegistry::new();
    registry.set_callback(0, &on_mailbox).expect("mailbox 0 exists");
    registry.set_general_callback(&on_general);

    registry.dispatch(&frame(0x5), 0);
    registry.clear_callback(0).expect("mailbox 0 exists");
    registry.dispatch(&frame(0x5), 0);

    assert_eq!(mailbox_calls.get(), 1);
    assert_eq!(general_calls.get(), 1);
}
