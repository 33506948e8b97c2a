//! Runtime bus configuration applied by [`CanCommon::begin_with_config`].
//!
//! [`CanCommon::begin_with_config`]: crate::transceiver::common::CanCommon::begin_with_config
use crate::core::CAN_DEFAULT_BAUD;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Requested bit rate in bit/s.
    pub baud_rate: u32,
    /// GPIO driving the transceiver's enable/standby line, if the board has one.
    pub enable_pin: Option<u8>,
    /// Start in listen-only mode.
    pub listen_only: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            baud_rate: CAN_DEFAULT_BAUD,
            enable_pin: None,
            listen_only: false,
        }
    }
}

impl BusConfig {
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_enable_pin(mut self, pin: u8) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    pub fn listen_only(mut self, enabled: bool) -> Self {
        self.listen_only = enabled;
        self
    }
}
