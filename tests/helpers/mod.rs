/// Test doubles simulating a transceiver driver and an async frame source.
use can_common::{
    dispatch::pump::FrameSource,
    filter::Filter,
    frame::CanFrame,
    transceiver::CanTransceiver,
};
use std::collections::VecDeque;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Errors the mock driver can be told to report.
pub enum MockError {
    NoFreeMailbox,
    BadBaud,
    TxFull,
}

#[derive(Debug, Default)]
#[allow(dead_code)]
/// In-memory driver recording everything the library asks of it.
pub struct MockTransceiver {
    /// Filters programmed so far, with the mailbox each one landed in.
    pub programmed: Vec<(usize, Filter)>,
    /// Number of mailboxes available to `set_filter`.
    pub mailboxes: usize,
    /// Frames waiting in the receive buffer.
    pub rx_queue: VecDeque<CanFrame>,
    /// Frames handed to `send_frame`.
    pub sent: Vec<CanFrame>,
    pub baud_rate: u32,
    pub listen_only: bool,
    pub enabled: bool,
    /// Rate reported by `begin_auto_speed`.
    pub detected_baud: u32,
}

#[allow(dead_code)]
impl MockTransceiver {
    pub fn with_mailboxes(mailboxes: usize) -> Self {
        Self {
            mailboxes,
            detected_baud: 500_000,
            ..Self::default()
        }
    }
}

impl CanTransceiver for MockTransceiver {
    type Error = MockError;

    fn init(&mut self, baud_rate: u32) -> Result<u32, Self::Error> {
        if baud_rate == 0 {
            return Err(MockError::BadBaud);
        }
        self.baud_rate = baud_rate;
        self.enabled = true;
        Ok(baud_rate)
    }

    fn set_filter(&mut self, filter: Filter) -> Result<usize, Self::Error> {
        let mailbox = self.programmed.len();
        if mailbox >= self.mailboxes {
            return Err(MockError::NoFreeMailbox);
        }
        self.programmed.push((mailbox, filter));
        Ok(mailbox)
    }

    fn set_filter_specific(
        &mut self,
        mailbox: usize,
        filter: Filter,
    ) -> Result<usize, Self::Error> {
        if mailbox >= self.mailboxes {
            return Err(MockError::NoFreeMailbox);
        }
        self.programmed.push((mailbox, filter));
        Ok(mailbox)
    }

    fn begin_auto_speed(&mut self) -> Result<u32, Self::Error> {
        self.init(self.detected_baud)
    }

    fn set_baudrate(&mut self, baud_rate: u32) -> Result<u32, Self::Error> {
        self.init(baud_rate)
    }

    fn set_listen_only_mode(&mut self, enabled: bool) {
        self.listen_only = enabled;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn send_frame(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if !self.enabled {
            return Err(MockError::TxFull);
        }
        self.sent.push(*frame);
        Ok(())
    }

    fn available(&self) -> usize {
        self.rx_queue.len()
    }

    fn get_rx_buff(&mut self) -> Option<CanFrame> {
        self.rx_queue.pop_front()
    }
}

#[allow(dead_code)]
/// Async frame source fed through a tokio channel; fails once every sender is gone.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<(CanFrame, usize)>,
}

#[allow(dead_code)]
impl ChannelSource {
    pub fn new() -> (mpsc::UnboundedSender<(CanFrame, usize)>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

impl FrameSource for ChannelSource {
    type Error = ();

    async fn recv(&mut self) -> Result<(CanFrame, usize), Self::Error> {
        self.rx.recv().await.ok_or(())
    }
}
