//! Bus-wide constants shared by the filter synthesizer, the dispatch registry,
//! and transceiver front ends.
//!
//! Values here are compile-time configuration: baud rates a driver can be asked
//! for, identifier widths, and the fixed capacities of the dispatch tables.

//==================================================================================BAUD_RATES
/// 1 Mbit/s.
pub const CAN_BPS_1000K: u32 = 1_000_000;
/// 800 kbit/s.
pub const CAN_BPS_800K: u32 = 800_000;
/// 500 kbit/s.
pub const CAN_BPS_500K: u32 = 500_000;
/// 250 kbit/s.
pub const CAN_BPS_250K: u32 = 250_000;
/// 125 kbit/s.
pub const CAN_BPS_125K: u32 = 125_000;
/// 50 kbit/s.
pub const CAN_BPS_50K: u32 = 50_000;
/// 33.333 kbit/s (single-wire GMLAN).
pub const CAN_BPS_33333: u32 = 33_333;
/// 25 kbit/s.
pub const CAN_BPS_25K: u32 = 25_000;
/// 10 kbit/s.
pub const CAN_BPS_10K: u32 = 10_000;
/// 5 kbit/s.
pub const CAN_BPS_5K: u32 = 5_000;

/// Baud rate used by `begin()` when the caller does not pick one.
pub const CAN_DEFAULT_BAUD: u32 = CAN_BPS_250K;

//==================================================================================IDENTIFIERS
/// Highest standard (11-bit) identifier, also the all-ones standard mask.
pub const STANDARD_ID_MASK: u32 = 0x7FF;
/// Highest extended (29-bit) identifier, also the all-ones extended mask.
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

//==================================================================================CAPACITIES
/// Number of listener objects a registry can hold at once.
pub const SIZE_LISTENERS: usize = 4;
/// Upper bound on hardware mailboxes (filter slots) a registry can address.
pub const MAX_MAILBOXES: usize = 16;
/// Mailbox count most transceivers expose; used when nothing else is specified.
pub const DEFAULT_MAILBOXES: usize = 8;
