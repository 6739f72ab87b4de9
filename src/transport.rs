//! Register-oriented bus access

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::constants::*;


/// Byte-level bus primitives the driver needs.
///
/// Every call blocks until it completes or fails. Timeouts and retries,
/// if any, belong to the implementation.
pub trait Transport {
    type Error;

    /// Checks that the device acknowledges its address
    fn probe(&mut self) -> Result<(), Self::Error>;

    /// Reads `buf.len()` bytes starting at register `reg`.
    /// Returns the number of bytes actually read.
    fn read_register_region(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Writes `data` starting at register `reg`
    fn write_register_region(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Sends the register selector alone, no payload
    fn write_command_byte(&mut self, reg: u8) -> Result<(), Self::Error>;
}

impl<T> Transport for &mut T
where T: Transport + ?Sized,
{
    type Error = T::Error;

    #[inline]
    fn probe(&mut self) -> Result<(), Self::Error> {
        (**self).probe()
    }

    #[inline]
    fn read_register_region(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_register_region(reg, buf)
    }

    #[inline]
    fn write_register_region(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_register_region(reg, data)
    }

    #[inline]
    fn write_command_byte(&mut self, reg: u8) -> Result<(), Self::Error> {
        (**self).write_command_byte(reg)
    }
}


/// Largest payload `write_register_region` will frame
const MAX_WRITE_LEN: usize = 8;

/// I²C transport on top of `embedded-hal` blocking traits.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

/// Errors from [`I2cTransport`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum I2cError<E> {
    /// Error reported by the I²C peripheral
    I2c(E),
    /// Payload does not fit the write frame
    Overrun,
}

impl<I2C, E> I2cTransport<I2C>
where I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Transport at the fixed STP3593LF address
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Transport at a different 7-bit address, e.g. behind an emulator
    pub fn new_with_address(i2c: I2C, address: u8) -> Self {
        I2cTransport { i2c, address }
    }

    /// 7-bit device address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives the I²C peripheral back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Transport for I2cTransport<I2C>
where I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = I2cError<E>;

    /// Zero-length write, only the address byte goes out
    fn probe(&mut self) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[]).map_err(I2cError::I2c)
    }

    /// Register selector write followed by a repeated start read.
    /// The part must not see a stop between the two.
    fn read_register_region(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(I2cError::I2c)?;
        Ok(buf.len())
    }

    fn write_register_region(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut frame = [0u8; 1 + MAX_WRITE_LEN];
        let n = data.len();
        if n > MAX_WRITE_LEN {
            return Err(I2cError::Overrun);
        }
        frame[0] = reg;
        frame[1..=n].copy_from_slice(data);
        self.i2c.write(self.address, &frame[..=n]).map_err(I2cError::I2c)
    }

    fn write_command_byte(&mut self, reg: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[reg]).map_err(I2cError::I2c)
    }
}
