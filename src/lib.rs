//! `can-common` library: a hardware-agnostic CAN transceiver layer for
//! `no_std` targets. Concrete drivers implement
//! [`transceiver::CanTransceiver`]; this crate supplies acceptance filter
//! synthesis, mailbox/listener dispatch, and the bring-up front end they share.
#![no_std]
//==================================================================================
/// Bus-wide constants: baud rates, identifier widths, table capacities.
pub mod core;
/// Frame routing to per-mailbox callbacks and registered listeners.
pub mod dispatch;
/// Registry and subscription errors.
pub mod error;
/// Acceptance filter synthesis (single id, id/mask, id range).
pub mod filter;
/// Classic CAN frame representation with native-endian payload views.
pub mod frame;
/// Driver contract, filter-programming helpers, and the `CanCommon` front end.
pub mod transceiver;
//==================================================================================
