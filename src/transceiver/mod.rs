//! Transceiver layer: the driver contract, filter-programming helpers, bus
//! configuration, and [`common::CanCommon`], which ties one driver to one
//! dispatch registry.
pub mod common;
pub mod config;
pub mod traits;

pub use common::{CanCommon, Reception};
pub use config::BusConfig;
pub use traits::{can_transceiver::CanTransceiver, watch::WatchFor};
