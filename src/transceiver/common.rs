//! Front end shared by every transceiver: bus bring-up, bus speed
//! bookkeeping, and the hand-off from driver receive events to the dispatch
//! registry.
use crate::core::{CAN_DEFAULT_BAUD, DEFAULT_MAILBOXES};
use crate::dispatch::registry::DispatchRegistry;
use crate::frame::CanFrame;
use crate::transceiver::config::BusConfig;
use crate::transceiver::traits::can_transceiver::CanTransceiver;

/// What the driver should do with a frame it just received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reception {
    /// Handed to this many callbacks/listeners.
    Delivered(usize),
    /// Nobody took it; the driver should queue it for [`CanCommon::read`].
    Unclaimed,
}

/// One transceiver plus its dispatch tables.
pub struct CanCommon<'a, T: CanTransceiver, const MAILBOXES: usize = DEFAULT_MAILBOXES> {
    transceiver: T,
    registry: DispatchRegistry<'a, MAILBOXES>,
    bus_speed: u32,
    enable_pin: Option<u8>,
    unclaimed: u32,
}

impl<'a, T: CanTransceiver, const MAILBOXES: usize> CanCommon<'a, T, MAILBOXES> {
    pub fn new(transceiver: T) -> Self {
        Self {
            transceiver,
            registry: DispatchRegistry::new(),
            bus_speed: 0,
            enable_pin: None,
            unclaimed: 0,
        }
    }

    //==============================================================================BRING_UP
    /// Initialize at [`CAN_DEFAULT_BAUD`].
    pub fn begin(&mut self) -> Result<u32, T::Error> {
        self.begin_with(CAN_DEFAULT_BAUD)
    }

    /// Initialize at `baud_rate`. Returns the rate the driver configured.
    pub fn begin_with(&mut self, baud_rate: u32) -> Result<u32, T::Error> {
        let configured = self.transceiver.init(baud_rate)?;
        self.bus_speed = configured;

        #[cfg(feature = "defmt")]
        defmt::info!("CAN bus up at {} bit/s (asked {})", configured, baud_rate);
        Ok(configured)
    }

    /// Record the transceiver enable pin, then initialize at `baud_rate`.
    pub fn begin_with_pin(&mut self, baud_rate: u32, enable_pin: u8) -> Result<u32, T::Error> {
        self.enable_pin = Some(enable_pin);
        self.begin_with(baud_rate)
    }

    /// Apply a full [`BusConfig`].
    pub fn begin_with_config(&mut self, config: &BusConfig) -> Result<u32, T::Error> {
        if let Some(pin) = config.enable_pin {
            self.enable_pin = Some(pin);
        }
        let configured = self.begin_with(config.baud_rate)?;
        self.transceiver.set_listen_only_mode(config.listen_only);
        Ok(configured)
    }

    /// Let the driver detect the bus rate.
    pub fn begin_auto_speed(&mut self) -> Result<u32, T::Error> {
        let detected = self.transceiver.begin_auto_speed()?;
        self.bus_speed = detected;
        Ok(detected)
    }

    pub fn set_baudrate(&mut self, baud_rate: u32) -> Result<u32, T::Error> {
        let configured = self.transceiver.set_baudrate(baud_rate)?;
        self.bus_speed = configured;
        Ok(configured)
    }

    /// Last bit rate reported by the driver; `0` before bring-up.
    #[inline]
    pub fn bus_speed(&self) -> u32 {
        self.bus_speed
    }

    #[inline]
    pub fn enable_pin(&self) -> Option<u8> {
        self.enable_pin
    }

    //==============================================================================ACCESSORS
    pub fn transceiver(&self) -> &T {
        &self.transceiver
    }

    /// Driver access, including the [`WatchFor`] helpers.
    ///
    /// [`WatchFor`]: crate::transceiver::traits::watch::WatchFor
    pub fn transceiver_mut(&mut self) -> &mut T {
        &mut self.transceiver
    }

    pub fn registry(&self) -> &DispatchRegistry<'a, MAILBOXES> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DispatchRegistry<'a, MAILBOXES> {
        &mut self.registry
    }

    //==============================================================================RECEIVE
    /// Pop the oldest frame the driver buffered.
    pub fn read(&mut self) -> Option<CanFrame> {
        self.transceiver.get_rx_buff()
    }

    /// Entry point for the driver's receive path.
    pub fn on_receive(&mut self, frame: &CanFrame, mailbox: usize) -> Reception {
        match self.registry.dispatch(frame, mailbox) {
            0 => {
                self.unclaimed = self.unclaimed.wrapping_add(1);
                Reception::Unclaimed
            }
            delivered => Reception::Delivered(delivered),
        }
    }

    /// Frames [`on_receive`](Self::on_receive) found no taker for (wrapping).
    #[inline]
    pub fn unclaimed_frames(&self) -> u32 {
        self.unclaimed
    }

    /// Give the driver back.
    pub fn release(self) -> T {
        self.transceiver
    }
}
