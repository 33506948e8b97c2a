//! Abstraction traits used by the transceiver layer (driver contract and
//! filter-programming helpers).
pub mod can_transceiver;
pub mod watch;
