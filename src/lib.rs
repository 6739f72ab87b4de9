#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

//! [STP3593LF](https://www.rakon.com) digitally controlled OCXO driver.
//!
//! Reads and writes the 20-bit frequency control word over I²C and steers
//! it from a GNSS receiver clock bias with a PI loop:
//!
//! ```ignore
//! let mut ocxo = Stp3593lf::begin(I2cTransport::new(i2c))?;
//! loop {
//!     let bias_ms = gnss.clock_bias_millis();
//!     ocxo.set_frequency_by_bias_millis(bias_ms, Gains::default())?;
//! }
//! ```
//!
//! The control word is not tied to an absolute output frequency, so there
//! are no Hz getters or setters.

pub mod constants;
pub mod errors;
pub mod register;
pub mod config;
pub mod transport;
pub mod controller;
pub mod device;

#[cfg(test)]
mod test_support;

pub use crate::{
    config::{Config, Gains, IntegralPolicy},
    device::{Startup, StartupState, Stp3593lf},
    errors::Error,
    register::ControlWord,
    transport::{I2cTransport, Transport},
};
