//! Driver errors

/// Everything that can go wrong talking to the oscillator.
///
/// Transport errors are not carried, only the direction of the failed
/// transfer. Nothing is retried by the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub enum Error {
    /// Presence probe was not acknowledged
    DeviceNotFound,
    /// Register read failed on the bus
    BusRead,
    /// Register or command write failed on the bus
    BusWrite,
    /// Fewer than 4 bytes came back from a register read
    ShortRead,
    /// Control word read back is above [`FREQ_CONTROL_MAX`](crate::constants::FREQ_CONTROL_MAX).
    /// Points at bus corruption or the wrong register, so it is never clamped.
    OutOfRange(u32),
    /// Operation attempted before the startup sequence reached `Ready`
    NotReady,
    /// One of the two startup reads of the control register failed
    InitReadFailed,
    /// Clock bias is NaN or infinite
    InvalidBias,
}
