//! In-memory representation of a classic CAN frame as handed over by a
//! transceiver driver.
//!
//! # Byte order
//!
//! [`FrameData`] exposes the eight payload bytes as raw bytes, as one `u64`,
//! as two `u32` halves, or as four `u16` words. The multi-byte views read and
//! write in the **target's native byte order**: on a little-endian MCU
//! `low()` is `bytes[0..4]` with `bytes[0]` as the least significant byte, on
//! a big-endian one `bytes[0]` is the most significant. Protocols that define
//! their own byte order should use [`FrameData::bytes`] and explicit
//! `from_le_bytes`/`from_be_bytes` conversions instead.
use crate::core::{EXTENDED_ID_MASK, STANDARD_ID_MASK};
use embedded_can::{ExtendedId, Id, StandardId};

/// Largest payload of a classic CAN frame.
pub const MAX_DATA_LEN: usize = 8;

//==================================================================================FRAME_DATA
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Eight payload bytes with native-endian wide views.
pub struct FrameData {
    bytes: [u8; MAX_DATA_LEN],
}

impl FrameData {
    /// Wrap raw payload bytes.
    pub const fn from_bytes(bytes: [u8; MAX_DATA_LEN]) -> Self {
        Self { bytes }
    }

    /// Build a payload from a 64-bit value laid out in native byte order.
    pub const fn from_value(value: u64) -> Self {
        Self {
            bytes: value.to_ne_bytes(),
        }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8; MAX_DATA_LEN] {
        &self.bytes
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8; MAX_DATA_LEN] {
        &mut self.bytes
    }

    /// Whole payload as one native-endian `u64`.
    #[inline]
    pub fn value(&self) -> u64 {
        u64::from_ne_bytes(self.bytes)
    }

    #[inline]
    pub fn set_value(&mut self, value: u64) {
        self.bytes = value.to_ne_bytes();
    }

    /// Bytes 0..4 as a native-endian `u32`.
    #[inline]
    pub fn low(&self) -> u32 {
        u32::from_ne_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Bytes 4..8 as a native-endian `u32`.
    #[inline]
    pub fn high(&self) -> u32 {
        u32::from_ne_bytes([self.bytes[4], self.bytes[5], self.bytes[6], self.bytes[7]])
    }

    pub fn set_low(&mut self, value: u32) {
        self.bytes[..4].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn set_high(&mut self, value: u32) {
        self.bytes[4..].copy_from_slice(&value.to_ne_bytes());
    }

    /// The four consecutive native-endian `u16` words (`s0..s3`).
    pub fn words(&self) -> [u16; 4] {
        let mut words = [0u16; 4];
        for (word, pair) in words.iter_mut().zip(self.bytes.chunks_exact(2)) {
            *word = u16::from_ne_bytes([pair[0], pair[1]]);
        }
        words
    }

    pub fn set_words(&mut self, words: [u16; 4]) {
        for (pair, word) in self.bytes.chunks_exact_mut(2).zip(words) {
            pair.copy_from_slice(&word.to_ne_bytes());
        }
    }
}

//==================================================================================CAN_FRAME
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One CAN message, received or about to be transmitted.
pub struct CanFrame {
    /// Arbitration identifier: 29 bits when `extended`, 11 bits otherwise.
    pub id: u32,
    /// Family identifier, a driver-defined grouping tag.
    pub fid: u32,
    /// Remote Transmission Request.
    pub rtr: bool,
    /// Transmit priority; ignored on reception.
    pub priority: u8,
    /// Extended (29-bit) identifier flag.
    pub extended: bool,
    /// Hardware CAN timer value latched when the frame was received.
    pub time: u16,
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub length: u8,
    /// Payload buffer.
    pub data: FrameData,
}

impl CanFrame {
    /// Build a data frame. Returns `None` when the payload exceeds eight bytes.
    pub fn with_data(id: u32, extended: bool, payload: &[u8]) -> Option<Self> {
        if payload.len() > MAX_DATA_LEN {
            return None;
        }
        let mut data = FrameData::default();
        data.bytes_mut()[..payload.len()].copy_from_slice(payload);
        Some(Self {
            id,
            extended,
            length: payload.len() as u8,
            data,
            ..Self::default()
        })
    }

    /// Valid payload bytes, `length` clamped to eight.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let len = (self.length as usize).min(MAX_DATA_LEN);
        &self.data.bytes()[..len]
    }

    /// Identifier truncated to the width selected by `extended`.
    pub fn masked_id(&self) -> u32 {
        if self.extended {
            self.id & EXTENDED_ID_MASK
        } else {
            self.id & STANDARD_ID_MASK
        }
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let (raw, extended) = split_id(id.into());
        Self::with_data(raw, extended, data)
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_DATA_LEN {
            return None;
        }
        let (raw, extended) = split_id(id.into());
        Some(Self {
            id: raw,
            extended,
            rtr: true,
            length: dlc as u8,
            ..Self::default()
        })
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.rtr
    }

    fn id(&self) -> Id {
        if self.extended {
            Id::Extended(ExtendedId::new(self.masked_id()).unwrap_or(ExtendedId::ZERO))
        } else {
            Id::Standard(StandardId::new(self.masked_id() as u16).unwrap_or(StandardId::ZERO))
        }
    }

    fn dlc(&self) -> usize {
        self.length as usize
    }

    fn data(&self) -> &[u8] {
        if self.rtr {
            &[]
        } else {
            self.payload()
        }
    }
}

fn split_id(id: Id) -> (u32, bool) {
    match id {
        Id::Standard(id) => (id.as_raw() as u32, false),
        Id::Extended(id) => (id.as_raw(), true),
    }
}
