//! Constants

/// Fixed 7-bit I²C address of the STP3593LF (0xE0 in 8-bit, shifted form)
pub const DEFAULT_ADDRESS: u8 = 0x70;

/// Largest frequency control word the DAC accepts.
/// The word is 20 bits wide but the part only tunes over 0 ..= 1_000_000.
pub const FREQ_CONTROL_MAX: u32 = 1_000_000;

/// Typical fractional frequency change per control word LSB.
/// Over the full range this gives 0 - 800ppb of pull, i.e. +/-400ppb.
pub const FREQ_CONTROL_RESOLUTION: f64 = 8e-13;

/// Width of the control word on the wire, bytes
pub const FREQ_CONTROL_LEN: usize = 4;

/// Half of the pull range, ppb.
/// Default limit on how far a single bias update may move the oscillator.
pub const MAX_FREQUENCY_CHANGE_PPB_DEFAULT: f64 = 400.0;

/// Default proportional gain for GNSS clock bias discipline
pub const PK_DEFAULT: f64 = 1.0 / 6.25;

/// Default integral gain for GNSS clock bias discipline
pub const IK_DEFAULT: f64 = (1.0 / 6.25) / 150.0;
