//! I2C master
//!
//! Single-byte register transactions over a master synchronous serial port (MSSP) configured as
//! an I2C master. Begin configuration by calling [`I2cConfig::new()`] with a peripheral
//! implementing [`Mssp`], then call [`I2cConfig::configure()`] to obtain an [`I2cMaster`].
//!
//! Every transaction opens with a start condition and always closes with a stop condition,
//! including when the slave NACKs a byte or a receive times out. The bus is therefore idle
//! whenever a method of [`I2cMaster`] returns. Failed transactions are never retried.
//!
//! Only the byte receive is bounded, by the poll limit set with [`I2cConfig::rx_poll_limit()`].
//! Waits on start, stop and transmit completion spin until the hardware clears the flag.

pub use crate::hw_traits::mssp::Mssp;
use core::{fmt, hint, num::NonZeroU32};
use embedded_hal::i2c::{Error, ErrorKind, NoAcknowledgeSource, SevenBitAddress};

/// Baud rate divisor written to the peripheral unless overridden
pub const DEFAULT_BAUD_DIVISOR: u8 = 12;

/// Number of buffer-full polls after which a receive is abandoned unless overridden
pub const DEFAULT_RX_POLL_LIMIT: NonZeroU32 = match NonZeroU32::new(10_000) {
    Some(limit) => limit,
    None => panic!(),
};

/// Direction bit appended to the 7-bit slave address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master transmits to the slave
    Write = 0,
    /// Master receives from the slave
    Read = 1,
}

impl Direction {
    /// Address byte placed on the bus for `address` in this direction
    #[inline(always)]
    pub fn address_byte(self, address: SevenBitAddress) -> u8 {
        ((address & 0x7F) << 1) | self as u8
    }
}

/// Byte of a transaction that the slave refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NackSource {
    /// Address byte, in either direction
    Address,
    /// Register pointer byte
    Register,
    /// Data byte of a write
    Data,
}

/// I2C transaction errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Slave did not acknowledge a byte
    Nack(NackSource),
    /// Received byte never arrived within the poll limit
    Timeout,
}

impl Error for BusError {
    fn kind(&self) -> ErrorKind {
        match self {
            BusError::Nack(NackSource::Address) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            BusError::Nack(_) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            BusError::Timeout => ErrorKind::Other,
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Nack(NackSource::Address) => f.write_str("address not acknowledged"),
            BusError::Nack(NackSource::Register) => f.write_str("register pointer not acknowledged"),
            BusError::Nack(NackSource::Data) => f.write_str("data byte not acknowledged"),
            BusError::Timeout => f.write_str("receive timed out"),
        }
    }
}

/// Configuration for an MSSP peripheral in I2C master mode
pub struct I2cConfig<P: Mssp> {
    periph: P,
    divisor: u8,
    rx_poll_limit: NonZeroU32,
}

impl<P: Mssp> I2cConfig<P> {
    /// Start a master configuration with the default baud divisor and receive poll limit
    pub fn new(periph: P) -> Self {
        I2cConfig {
            periph,
            divisor: DEFAULT_BAUD_DIVISOR,
            rx_poll_limit: DEFAULT_RX_POLL_LIMIT,
        }
    }

    /// Set the baud rate divisor. SCL = FOSC / (4 * (divisor + 1))
    #[inline]
    pub fn baud_divisor(mut self, divisor: u8) -> Self {
        self.divisor = divisor;
        self
    }

    /// Set how many times the buffer-full flag is polled before a receive is abandoned
    #[inline]
    pub fn rx_poll_limit(mut self, limit: NonZeroU32) -> Self {
        self.rx_poll_limit = limit;
        self
    }

    /// Performs hardware configuration and creates the bus master
    pub fn configure(self) -> I2cMaster<P> {
        self.periph.sspadd_wr(self.divisor);
        self.periph.master_mode();
        self.periph.clear_errors();
        self.periph.sspen_set();

        I2cMaster {
            periph: self.periph,
            rx_poll_limit: self.rx_poll_limit,
        }
    }
}

/// Bus master executing single-register transactions
pub struct I2cMaster<P: Mssp> {
    periph: P,
    rx_poll_limit: NonZeroU32,
}

impl<P: Mssp> I2cMaster<P> {
    /// Release the underlying peripheral
    #[inline]
    pub fn free(self) -> P {
        self.periph
    }

    /// Poll limit applied to every receive
    #[inline]
    pub fn rx_poll_limit(&self) -> NonZeroU32 {
        self.rx_poll_limit
    }

    #[inline(always)]
    fn start(&mut self) {
        self.periph.sen_set();
        while self.periph.sen_rd() {
            hint::spin_loop();
        }
    }

    #[inline(always)]
    fn restart(&mut self) {
        self.periph.rsen_set();
        while self.periph.rsen_rd() {
            hint::spin_loop();
        }
    }

    #[inline(always)]
    fn stop(&mut self) {
        self.periph.pen_set();
        while self.periph.pen_rd() {
            hint::spin_loop();
        }
    }

    // Shift one byte out. On NACK the bus is released before returning.
    fn send(&mut self, byte: u8, source: NackSource) -> Result<(), BusError> {
        self.periph.sspbuf_wr(byte);
        while self.periph.rw_rd() {
            hint::spin_loop();
        }

        if self.periph.ackstat_rd() {
            self.stop();
            warn!("i2c: {} NACKed byte {=u8:#x}", source, byte);
            return Err(BusError::Nack(source));
        }
        Ok(())
    }

    // Clock in a single byte, then NACK it so the slave stops sending, then release the bus.
    fn receive(&mut self) -> Result<u8, BusError> {
        self.periph.rcen_set();

        let mut remaining = self.rx_poll_limit.get();
        while !self.periph.bf_rd() {
            remaining -= 1;
            if remaining == 0 {
                self.stop();
                warn!("i2c: receive timed out after {=u32} polls", self.rx_poll_limit.get());
                return Err(BusError::Timeout);
            }
            hint::spin_loop();
        }
        let byte = self.periph.sspbuf_rd();

        self.periph.ackdt_wr(true);
        self.periph.acken_set();
        while self.periph.acken_rd() {
            hint::spin_loop();
        }

        self.stop();
        Ok(byte)
    }

    /// Write `data` into `register` of the slave at `address`.
    ///
    /// Aborts with a stop condition on the first byte the slave NACKs.
    pub fn write_register(
        &mut self,
        address: SevenBitAddress,
        register: u8,
        data: u8,
    ) -> Result<(), BusError> {
        trace!("i2c: write {=u8:#x}[{=u8:#x}] = {=u8:#x}", address, register, data);
        self.start();
        self.send(Direction::Write.address_byte(address), NackSource::Address)?;
        self.send(register, NackSource::Register)?;
        self.send(data, NackSource::Data)?;
        self.stop();
        Ok(())
    }

    /// Read a single byte from `register` of the slave at `address`.
    ///
    /// The register pointer is written first, then a repeated start switches the bus to receive.
    pub fn read_register(
        &mut self,
        address: SevenBitAddress,
        register: u8,
    ) -> Result<u8, BusError> {
        trace!("i2c: read {=u8:#x}[{=u8:#x}]", address, register);
        self.start();
        self.send(Direction::Write.address_byte(address), NackSource::Address)?;
        self.send(register, NackSource::Register)?;
        self.restart();
        self.send(Direction::Read.address_byte(address), NackSource::Address)?;
        self.receive()
    }

    /// Like [`read_register`](I2cMaster::read_register), but any failure reads as `0`.
    ///
    /// A failed transaction cannot be told apart from a register holding zero. Only use this
    /// where callers expect the legacy sentinel.
    #[inline]
    pub fn read_register_or_zero(&mut self, address: SevenBitAddress, register: u8) -> u8 {
        self.read_register(address, register).unwrap_or(0)
    }
}
