//! STP3593LF registers and the control word codec

use core::convert::TryInto;

use crate::{constants::*, errors::*};


/// Register map.
/// All multi-byte values are transferred MSB first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub enum Register {
    /// Reports the 32-bit unsigned frequency control word (4 bytes, read)
    ReadFrequencyControl = 0x41,
    /// Sets the 20-bit DAC value, i.e. the frequency control word (4 bytes, write)
    WriteDac = 0xA0,
    /// Saves the DAC value so it is reloaded on power-up (command, no payload)
    SaveFrequency = 0xC2,
}

impl Register {
    /// Register selector byte sent on the bus
    #[inline]
    pub fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    #[inline]
    fn from(r: Register) -> u8 {
        r.addr()
    }
}


/// Frequency control word, always within `0 ..= FREQ_CONTROL_MAX`.
///
/// The word is not mapped to an absolute frequency: it only moves the
/// output by `FREQ_CONTROL_RESOLUTION` per LSB around wherever the
/// oscillator happens to sit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub struct ControlWord(u32);

impl ControlWord {
    /// Upper end of the DAC range
    pub const MAX: ControlWord = ControlWord(FREQ_CONTROL_MAX);

    /// Checked constructor, `None` above `FREQ_CONTROL_MAX`
    #[inline]
    pub fn new(w: u32) -> Option<Self> {
        if w > FREQ_CONTROL_MAX { None } else { Some(ControlWord(w)) }
    }

    /// Saturates to `FREQ_CONTROL_MAX`, same as the hardware does
    #[inline]
    pub fn clamped(w: u32) -> Self {
        ControlWord(w.min(FREQ_CONTROL_MAX))
    }

    /// Rounds half away from zero and saturates into `0 ..= FREQ_CONTROL_MAX`.
    /// NaN maps to 0.
    pub fn from_f64(x: f64) -> Self {
        let r = libm::round(x);
        if !(r > 0.0) {
            ControlWord(0)
        } else if r >= FREQ_CONTROL_MAX as f64 {
            ControlWord::MAX
        } else {
            ControlWord(r as u32)
        }
    }

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<ControlWord> for u32 {
    #[inline]
    fn from(w: ControlWord) -> u32 {
        w.0
    }
}

impl From<ControlWord> for f64 {
    #[inline]
    fn from(w: ControlWord) -> f64 {
        w.0 as f64
    }
}


/// Decodes a `ReadFrequencyControl` response.
///
/// Only the first 4 bytes are looked at. Values above `FREQ_CONTROL_MAX`
/// are rejected rather than clamped.
pub fn decode(bytes: &[u8]) -> Result<ControlWord, Error> {
    let raw: [u8; FREQ_CONTROL_LEN] = bytes
        .get(..FREQ_CONTROL_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::ShortRead)?;

    let w = u32::from_be_bytes(raw);
    ControlWord::new(w).ok_or(Error::OutOfRange(w))
}

/// Encodes a `WriteDac` payload, silently clamping to `FREQ_CONTROL_MAX`.
#[inline]
pub fn encode(w: u32) -> [u8; FREQ_CONTROL_LEN] {
    ControlWord::clamped(w).value().to_be_bytes()
}
