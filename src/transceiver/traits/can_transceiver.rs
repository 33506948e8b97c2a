//! Capability contract every concrete transceiver driver implements. The
//! library only relies on filter programming and frame delivery; the rest
//! is the uniform surface applications drive the hardware through.
use crate::filter::Filter;
use crate::frame::CanFrame;

/// Driver-side operations of a CAN transceiver.
pub trait CanTransceiver {
    type Error: core::fmt::Debug;

    /// Bring the peripheral up at `baud_rate` bit/s. Returns the rate actually configured.
    fn init(&mut self, baud_rate: u32) -> Result<u32, Self::Error>;

    /// Program `filter` into any free receive mailbox. Returns the mailbox used.
    fn set_filter(&mut self, filter: Filter) -> Result<usize, Self::Error>;

    /// Program `filter` into `mailbox`. Returns the mailbox used.
    fn set_filter_specific(&mut self, mailbox: usize, filter: Filter)
        -> Result<usize, Self::Error>;

    /// Probe the bus for its baud rate. Returns the detected rate.
    fn begin_auto_speed(&mut self) -> Result<u32, Self::Error>;

    /// Change the baud rate of a running peripheral. Returns the rate configured.
    fn set_baudrate(&mut self, baud_rate: u32) -> Result<u32, Self::Error>;

    /// Receive without acknowledging or transmitting.
    fn set_listen_only_mode(&mut self, enabled: bool);

    fn enable(&mut self);

    fn disable(&mut self);

    /// Queue `frame` for transmission.
    fn send_frame(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;

    /// Number of frames waiting in the receive buffer.
    fn available(&self) -> usize;

    /// Whether at least one frame is waiting.
    fn rx_avail(&self) -> bool {
        self.available() > 0
    }

    /// Pop the oldest buffered frame.
    fn get_rx_buff(&mut self) -> Option<CanFrame>;
}
