//! Acceptance filter synthesis: turn "let these identifiers through" into the
//! `(id, mask, extended)` triple a mailbox is programmed with.
//!
//! A mask bit set to `1` means the matching `id` bit must be equal; a `0` bit
//! is "don't care". An identifier `f` passes when `(f & mask) == (id & mask)`
//! and the frame format (standard or extended) agrees.
//!
//! Every constructor is pure and total: any `u32` input yields a filter.
use crate::core::{EXTENDED_ID_MASK, STANDARD_ID_MASK};
use crate::frame::CanFrame;

//==================================================================================FILTER
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Hardware acceptance filter for one mailbox.
pub struct Filter {
    /// Identifier bits to compare against.
    pub id: u32,
    /// Bits of `id` that must match exactly.
    pub mask: u32,
    /// Whether the filter targets extended (29-bit) frames.
    pub extended: bool,
}

impl Filter {
    /// Admit every frame of the chosen format.
    pub const fn accept_all(extended: bool) -> Self {
        Self {
            id: 0,
            mask: 0,
            extended,
        }
    }

    /// Admit exactly one identifier. The format is picked from its magnitude:
    /// anything above `0x7FF` is treated as an extended identifier.
    pub const fn for_single_id(id: u32) -> Self {
        let extended = is_extended_id(id);
        Self {
            id,
            mask: width_mask(extended),
            extended,
        }
    }

    /// Caller-supplied mask, passed through unchanged; format picked from `id`.
    pub const fn for_id_mask(id: u32, mask: u32) -> Self {
        Self::for_id_mask_ext(id, mask, is_extended_id(id))
    }

    /// Caller-supplied mask with an explicit frame format.
    pub const fn for_id_mask_ext(id: u32, mask: u32, extended: bool) -> Self {
        Self { id, mask, extended }
    }

    /// Smallest single filter that admits every identifier in `[lo, hi]`.
    ///
    /// The bounds may be given in either order. The result keeps only the
    /// bits that never differ from the low bound across the whole range, so
    /// it can also admit identifiers *outside* the range: a span that is not
    /// power-of-two aligned widens to the enclosing aligned block, and a range
    /// covering a full aligned block down to zero collapses to mask `0`. One
    /// mask/id pair cannot do better; callers needing an exact match must
    /// spread the range over several mailboxes.
    ///
    /// Runs in O(`hi - lo`): every identifier of the range is visited.
    pub fn for_range(lo: u32, hi: u32) -> Self {
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        let extended = is_extended_id(hi);
        let width = width_mask(extended);

        #[cfg(feature = "defmt")]
        if hi - lo > STANDARD_ID_MASK {
            defmt::warn!("Range filter spans {} identifiers", hi - lo);
        }

        let mut id = lo;
        let mut mask = width;
        for candidate in lo..=hi {
            // Bits set in every identifier stay set.
            id &= candidate;
            // Bits that ever differed from `lo` become "don't care".
            mask &= !(lo ^ candidate) & width;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Range [{:#x}, {:#x}] -> id {:#x}, mask {:#x}",
            lo,
            hi,
            id,
            mask
        );

        Self { id, mask, extended }
    }

    /// Whether an identifier of the given format passes this filter.
    #[inline]
    pub const fn matches(&self, id: u32, extended: bool) -> bool {
        self.extended == extended && (id & self.mask) == (self.id & self.mask)
    }

    /// Whether `frame` passes this filter.
    #[inline]
    pub fn admits(&self, frame: &CanFrame) -> bool {
        self.matches(frame.id, frame.extended)
    }
}

/// Identifiers above the 11-bit range can only be extended.
#[inline]
const fn is_extended_id(id: u32) -> bool {
    id > STANDARD_ID_MASK
}

#[inline]
const fn width_mask(extended: bool) -> u32 {
    if extended {
        EXTENDED_ID_MASK
    } else {
        STANDARD_ID_MASK
    }
}
