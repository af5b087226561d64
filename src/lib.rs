//! I2C master transactions for microcontrollers with a master synchronous serial port (MSSP),
//! and a register driver for the DS3231 real-time clock built on top of them.
//!
//! The [`i2c`] module implements single-byte register reads and writes with ACK checking, a
//! bounded receive and a guaranteed stop condition on every exit path. The hardware is reached
//! through the [`Mssp`](i2c::Mssp) trait, one method per control or status bit.
//!
//! The [`rtc`] and [`alarm`] modules translate between human-scale time fields and the clock's
//! BCD register layout. They work over anything implementing [`RegisterBus`](bus::RegisterBus):
//! the [`I2cMaster`](i2c::I2cMaster) engine, or any `embedded-hal` I2C bus wrapped in
//! [`EhBus`](bus::EhBus).
//!
//! # Usage
//!
//! ```ignore
//! use mssp_rtc::{i2c::I2cConfig, rtc::Ds3231};
//!
//! let bus = I2cConfig::new(mssp1).baud_divisor(12).configure();
//! let mut rtc = Ds3231::new(bus);
//! rtc.init(&mut delay)?;
//! rtc.set_hours(7)?;
//! let now = rtc.time()?;
//! ```
//!
//! # Logging
//!
//! Enable the `defmt` feature to log NACKs, receive timeouts and ignored field values through
//! [`defmt`](https://docs.rs/defmt).

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod bcd;
pub mod bus;
pub mod i2c;
pub mod prelude;
pub mod rtc;

mod hw_traits;
