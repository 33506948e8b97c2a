//! `CanTransceiver` extension turning "watch these identifiers" into filter
//! programming. Each helper synthesizes a [`Filter`] and hands it to the
//! driver; whatever the driver returns is passed back untouched.
use crate::filter::Filter;
use crate::transceiver::traits::can_transceiver::CanTransceiver;

/// Filter-programming conveniences available on every transceiver.
pub trait WatchFor: CanTransceiver {
    /// Program `filter` into the next free mailbox.
    fn set_rx_filter(&mut self, filter: Filter) -> Result<usize, Self::Error>;

    /// Program `filter` into `mailbox`.
    fn set_rx_filter_specific(
        &mut self,
        mailbox: usize,
        filter: Filter,
    ) -> Result<usize, Self::Error>;

    /// Promiscuous mode: one standard and one extended catch-all filter.
    ///
    /// Returns the first driver error, otherwise the mailbox of the
    /// extended filter.
    fn watch_for_all(&mut self) -> Result<usize, Self::Error>;

    /// Let a single identifier through; standard/extended inferred.
    fn watch_for(&mut self, id: u32) -> Result<usize, Self::Error>;

    /// Identifier plus caller mask; standard/extended inferred from `id`.
    fn watch_for_mask(&mut self, id: u32, mask: u32) -> Result<usize, Self::Error>;

    /// Identifier plus caller mask with an explicit frame format.
    fn watch_for_mask_ext(
        &mut self,
        id: u32,
        mask: u32,
        extended: bool,
    ) -> Result<usize, Self::Error>;

    /// Let every identifier in `[lo, hi]` through (bounds in any order).
    ///
    /// See [`Filter::for_range`]: the filter may admit identifiers outside
    /// the range, and the computation is linear in the range size.
    fn watch_for_range(&mut self, lo: u32, hi: u32) -> Result<usize, Self::Error>;
}

impl<C: CanTransceiver> WatchFor for C {
    fn set_rx_filter(&mut self, filter: Filter) -> Result<usize, Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Programming filter {}", filter);
        self.set_filter(filter)
    }

    fn set_rx_filter_specific(
        &mut self,
        mailbox: usize,
        filter: Filter,
    ) -> Result<usize, Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Programming filter {} into mailbox {}", filter, mailbox);
        self.set_filter_specific(mailbox, filter)
    }

    fn watch_for_all(&mut self) -> Result<usize, Self::Error> {
        self.set_rx_filter(Filter::accept_all(false))?;
        self.set_rx_filter(Filter::accept_all(true))
    }

    fn watch_for(&mut self, id: u32) -> Result<usize, Self::Error> {
        self.set_rx_filter(Filter::for_single_id(id))
    }

    fn watch_for_mask(&mut self, id: u32, mask: u32) -> Result<usize, Self::Error> {
        self.set_rx_filter(Filter::for_id_mask(id, mask))
    }

    fn watch_for_mask_ext(
        &mut self,
        id: u32,
        mask: u32,
        extended: bool,
    ) -> Result<usize, Self::Error> {
        self.set_rx_filter(Filter::for_id_mask_ext(id, mask, extended))
    }

    fn watch_for_range(&mut self, lo: u32, hi: u32) -> Result<usize, Self::Error> {
        self.set_rx_filter(Filter::for_range(lo, hi))
    }
}
