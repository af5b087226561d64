//! Register-oriented bus access
//!
//! Drivers in this crate only ever read or write one 8-bit register at a time. [`RegisterBus`]
//! captures that shape, so a driver can run on the [`I2cMaster`] transaction engine or, through
//! [`EhBus`], on any [`embedded_hal::i2c::I2c`] implementation.

use crate::i2c::{BusError, I2cMaster, Mssp};
use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Single-register read and write on a 7-bit addressed bus
pub trait RegisterBus {
    /// Transaction error
    type Error;

    /// Read one byte from `register` of the device at `address`
    fn read_register(&mut self, address: SevenBitAddress, register: u8)
        -> Result<u8, Self::Error>;

    /// Write one byte to `register` of the device at `address`
    fn write_register(
        &mut self,
        address: SevenBitAddress,
        register: u8,
        value: u8,
    ) -> Result<(), Self::Error>;
}

impl<P: Mssp> RegisterBus for I2cMaster<P> {
    type Error = BusError;

    #[inline]
    fn read_register(&mut self, address: SevenBitAddress, register: u8) -> Result<u8, BusError> {
        I2cMaster::read_register(self, address, register)
    }

    #[inline]
    fn write_register(
        &mut self,
        address: SevenBitAddress,
        register: u8,
        value: u8,
    ) -> Result<(), BusError> {
        I2cMaster::write_register(self, address, register, value)
    }
}

/// Adapter running register transactions over an `embedded-hal` I2C bus
pub struct EhBus<I2C>(I2C);

impl<I2C: I2c> EhBus<I2C> {
    /// Wrap an `embedded-hal` I2C bus
    #[inline]
    pub fn new(i2c: I2C) -> Self {
        EhBus(i2c)
    }

    /// Release the wrapped bus
    #[inline]
    pub fn free(self) -> I2C {
        self.0
    }
}

impl<I2C: I2c> RegisterBus for EhBus<I2C> {
    type Error = I2C::Error;

    fn read_register(&mut self, address: SevenBitAddress, register: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.0.write_read(address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(
        &mut self,
        address: SevenBitAddress,
        register: u8,
        value: u8,
    ) -> Result<(), I2C::Error> {
        self.0.write(address, &[register, value])
    }
}
