//! Async receive loop for polling-style integrations: pull `(frame, mailbox)`
//! pairs from a driver and route each one through a [`Dispatcher`].
use core::convert::Infallible;

use crate::dispatch::Dispatcher;
use crate::frame::CanFrame;
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver};
use futures_util::Future;

/// Asynchronous stream of received frames tagged with their mailbox.
pub trait FrameSource {
    type Error: core::fmt::Debug;
    /// Wait for the next received frame and the mailbox that accepted it.
    fn recv<'a>(
        &'a mut self,
    ) -> impl Future<Output = Result<(CanFrame, usize), Self::Error>> + 'a;
}

/// Hand-off from interrupt context: the ISR `try_send`s into the channel,
/// the owning context pumps the receiver. Never fails.
impl<'ch, M: RawMutex, const N: usize> FrameSource for Receiver<'ch, M, (CanFrame, usize), N> {
    type Error = Infallible;

    fn recv<'a>(
        &'a mut self,
    ) -> impl Future<Output = Result<(CanFrame, usize), Self::Error>> + 'a {
        async move { Ok(self.receive().await) }
    }
}

/// Dispatch every frame `source` yields until it fails; returns that error.
///
/// Frames nobody claims are dropped here: a pump has no buffer to put them in.
pub async fn pump<S, D>(source: &mut S, dispatcher: &D) -> S::Error
where
    S: FrameSource,
    D: Dispatcher + ?Sized,
{
    loop {
        match source.recv().await {
            Ok((frame, mailbox)) => {
                let _delivered = dispatcher.dispatch(&frame, mailbox);
                #[cfg(feature = "defmt")]
                defmt::trace!(
                    "Pumped frame {:#x} from mailbox {} to {} handlers",
                    frame.id,
                    mailbox,
                    _delivered
                );
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Frame source stopped: {}", defmt::Debug2Format(&err));
                return err;
            }
        }
    }
}
