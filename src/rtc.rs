//! DS3231 real-time clock
//!
//! Field-by-field access to the timekeeping and alarm-1 registers. Each getter re-reads its
//! register over the bus and each setter rewrites it. Nothing is cached between calls.
//!
//! Setters silently ignore values outside the field's range. No transaction is issued and
//! `Ok(())` is returned. The clock-halt bit of the seconds register and the 12/24-hour bit of
//! the hours registers are read back and preserved when those fields are written.
//!
//! Call [`Ds3231::init()`] once after power-up to start the oscillator and select 24-hour mode.

use crate::bcd;
use crate::bus::RegisterBus;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::SevenBitAddress;

/// Fixed 7-bit bus address of the DS3231
pub const DS3231_ADDRESS: SevenBitAddress = 0x68;

/// Clock-halt flag, bit 7 of the seconds register
pub const CLOCK_HALT: u8 = 0x80;

/// 12-hour mode flag, bit 6 of the hours registers
pub const HOUR_MODE_12: u8 = 0x40;

const OSCILLATOR_SETTLE_MS: u32 = 500;

/// Register map
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Seconds, BCD 0-59. Bit 7 is the clock-halt flag.
    Seconds = 0x00,
    /// Minutes, BCD 0-59
    Minutes = 0x01,
    /// Hours, BCD 0-23. Bit 6 selects 12-hour mode.
    Hours = 0x02,
    /// Day of week, 1-7 with Sunday as 1
    Weekday = 0x03,
    /// Day of month, BCD 1-31
    Day = 0x04,
    /// Month, BCD 1-12. Bit 7 is the century flag.
    Month = 0x05,
    /// Year, BCD 0-99
    Year = 0x06,
    /// Alarm-1 seconds, BCD 0-59
    AlarmSeconds = 0x07,
    /// Alarm-1 minutes, BCD 0-59
    AlarmMinutes = 0x08,
    /// Alarm-1 hours, BCD 0-23. Bit 6 selects 12-hour mode.
    AlarmHours = 0x09,
    /// Alarm-1 day/date and the A1M4 match mask
    AlarmDay = 0x0A,
    /// Interrupt and alarm enable control
    Control = 0x0E,
    /// Oscillator and alarm flags
    Status = 0x0F,
}

#[derive(Clone, Copy)]
enum Encoding {
    Bcd,
    Raw,
}

// Layout of one human-scale field within its register
#[derive(Clone, Copy)]
struct Field {
    register: Register,
    min: u8,
    max: u8,
    // Bits holding the value. Everything else is dropped on read.
    digits: u8,
    // Control bits carried over from the current register contents on write
    keep: u8,
    encoding: Encoding,
}

impl Field {
    const fn bcd(register: Register, min: u8, max: u8, digits: u8, keep: u8) -> Self {
        Field {
            register,
            min,
            max,
            digits,
            keep,
            encoding: Encoding::Bcd,
        }
    }

    #[inline]
    fn accepts(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    #[inline]
    fn decode(&self, byte: u8) -> u8 {
        match self.encoding {
            Encoding::Bcd => bcd::decode(byte & self.digits),
            Encoding::Raw => byte & self.digits,
        }
    }

    #[inline]
    fn encode(&self, value: u8) -> u8 {
        match self.encoding {
            Encoding::Bcd => bcd::encode(value),
            Encoding::Raw => value,
        }
    }
}

const SECONDS: Field = Field::bcd(Register::Seconds, 0, 59, 0x7F, CLOCK_HALT);
const MINUTES: Field = Field::bcd(Register::Minutes, 0, 59, 0x7F, 0);
const HOURS: Field = Field::bcd(Register::Hours, 0, 23, 0x3F, HOUR_MODE_12);
const WEEKDAY: Field = Field {
    register: Register::Weekday,
    min: 1,
    max: 7,
    digits: 0xFF,
    keep: 0,
    encoding: Encoding::Raw,
};
const DAY: Field = Field::bcd(Register::Day, 1, 31, 0x3F, 0);
const MONTH: Field = Field::bcd(Register::Month, 1, 12, 0x1F, 0);
const YEAR: Field = Field::bcd(Register::Year, 0, 99, 0xFF, 0);
const ALARM_SECONDS: Field = Field::bcd(Register::AlarmSeconds, 0, 59, 0x7F, 0);
const ALARM_MINUTES: Field = Field::bcd(Register::AlarmMinutes, 0, 59, 0x7F, 0);
const ALARM_HOURS: Field = Field::bcd(Register::AlarmHours, 0, 23, 0x3F, HOUR_MODE_12);

/// Time of day, 24-hour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    /// 0-23
    pub hours: u8,
    /// 0-59
    pub minutes: u8,
    /// 0-59
    pub seconds: u8,
}

/// Calendar date
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    /// 1-7, Sunday is 1
    pub weekday: u8,
    /// 1-31
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// 0-99
    pub year: u8,
}

/// DS3231 driver over a register bus
pub struct Ds3231<B> {
    bus: B,
    address: SevenBitAddress,
}

impl<B: RegisterBus> Ds3231<B> {
    /// Create a driver for a DS3231 at its fixed address
    #[inline]
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DS3231_ADDRESS)
    }

    /// Create a driver for a compatible clock at another address
    #[inline]
    pub fn with_address(bus: B, address: SevenBitAddress) -> Self {
        Ds3231 { bus, address }
    }

    /// Release the bus
    #[inline]
    pub fn free(self) -> B {
        self.bus
    }

    /// Read a raw register byte
    #[inline]
    pub fn read_raw(&mut self, register: Register) -> Result<u8, B::Error> {
        self.bus.read_register(self.address, register as u8)
    }

    /// Write a raw register byte
    #[inline]
    pub fn write_raw(&mut self, register: Register, value: u8) -> Result<(), B::Error> {
        self.bus.write_register(self.address, register as u8, value)
    }

    fn get(&mut self, field: Field) -> Result<u8, B::Error> {
        let byte = self.read_raw(field.register)?;
        Ok(field.decode(byte))
    }

    fn set(&mut self, field: Field, value: u8) -> Result<(), B::Error> {
        if !field.accepts(value) {
            debug!("rtc: ignoring {=u8} for {}", value, field.register);
            return Ok(());
        }

        let mut byte = field.encode(value);
        if field.keep != 0 {
            byte |= self.read_raw(field.register)? & field.keep;
        }
        self.write_raw(field.register, byte)
    }

    /// Start the oscillator and force 24-hour mode.
    ///
    /// When the clock-halt bit is found set it is cleared, then `delay` waits 500 ms for the
    /// oscillator to settle.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), B::Error> {
        let seconds = self.read_raw(Register::Seconds)?;
        if seconds & CLOCK_HALT != 0 {
            info!("rtc: starting halted oscillator");
            self.write_raw(Register::Seconds, seconds & !CLOCK_HALT)?;
            delay.delay_ms(OSCILLATOR_SETTLE_MS);
        }

        let hours = self.read_raw(Register::Hours)?;
        if hours & HOUR_MODE_12 != 0 {
            info!("rtc: switching to 24-hour mode");
            self.write_raw(Register::Hours, hours & !HOUR_MODE_12)?;
        }
        Ok(())
    }

    /// Seconds, 0-59
    pub fn seconds(&mut self) -> Result<u8, B::Error> {
        self.get(SECONDS)
    }

    /// Set seconds, keeping the clock-halt bit. Ignores values above 59.
    pub fn set_seconds(&mut self, seconds: u8) -> Result<(), B::Error> {
        self.set(SECONDS, seconds)
    }

    /// Minutes, 0-59
    pub fn minutes(&mut self) -> Result<u8, B::Error> {
        self.get(MINUTES)
    }

    /// Set minutes. Ignores values above 59.
    pub fn set_minutes(&mut self, minutes: u8) -> Result<(), B::Error> {
        self.set(MINUTES, minutes)
    }

    /// Hours, 0-23
    pub fn hours(&mut self) -> Result<u8, B::Error> {
        self.get(HOURS)
    }

    /// Set hours, keeping the 12/24-hour bit. Ignores values above 23.
    pub fn set_hours(&mut self, hours: u8) -> Result<(), B::Error> {
        self.set(HOURS, hours)
    }

    /// Day of week, 1-7 with Sunday as 1. Returned as stored.
    pub fn weekday(&mut self) -> Result<u8, B::Error> {
        self.get(WEEKDAY)
    }

    /// Set day of week. Ignores values outside 1-7.
    pub fn set_weekday(&mut self, weekday: u8) -> Result<(), B::Error> {
        self.set(WEEKDAY, weekday)
    }

    /// Day of month, 1-31
    pub fn day(&mut self) -> Result<u8, B::Error> {
        self.get(DAY)
    }

    /// Set day of month. Ignores values outside 1-31.
    pub fn set_day(&mut self, day: u8) -> Result<(), B::Error> {
        self.set(DAY, day)
    }

    /// Month, 1-12
    pub fn month(&mut self) -> Result<u8, B::Error> {
        self.get(MONTH)
    }

    /// Set month. Ignores values outside 1-12.
    pub fn set_month(&mut self, month: u8) -> Result<(), B::Error> {
        self.set(MONTH, month)
    }

    /// Two-digit year, 0-99
    pub fn year(&mut self) -> Result<u8, B::Error> {
        self.get(YEAR)
    }

    /// Set two-digit year. Ignores values above 99.
    pub fn set_year(&mut self, year: u8) -> Result<(), B::Error> {
        self.set(YEAR, year)
    }

    /// Alarm seconds, 0-59
    pub fn alarm_seconds(&mut self) -> Result<u8, B::Error> {
        self.get(ALARM_SECONDS)
    }

    /// Set alarm seconds. Ignores values above 59.
    pub fn set_alarm_seconds(&mut self, seconds: u8) -> Result<(), B::Error> {
        self.set(ALARM_SECONDS, seconds)
    }

    /// Alarm minutes, 0-59
    pub fn alarm_minutes(&mut self) -> Result<u8, B::Error> {
        self.get(ALARM_MINUTES)
    }

    /// Set alarm minutes. Ignores values above 59.
    pub fn set_alarm_minutes(&mut self, minutes: u8) -> Result<(), B::Error> {
        self.set(ALARM_MINUTES, minutes)
    }

    /// Alarm hours, 0-23
    pub fn alarm_hours(&mut self) -> Result<u8, B::Error> {
        self.get(ALARM_HOURS)
    }

    /// Set alarm hours, keeping the 12/24-hour bit. Ignores values above 23.
    pub fn set_alarm_hours(&mut self, hours: u8) -> Result<(), B::Error> {
        self.set(ALARM_HOURS, hours)
    }

    /// Current time of day
    pub fn time(&mut self) -> Result<Time, B::Error> {
        Ok(Time {
            hours: self.hours()?,
            minutes: self.minutes()?,
            seconds: self.seconds()?,
        })
    }

    /// Set the time of day, hours first. Out-of-range fields are skipped individually.
    pub fn set_time(&mut self, time: Time) -> Result<(), B::Error> {
        self.set_hours(time.hours)?;
        self.set_minutes(time.minutes)?;
        self.set_seconds(time.seconds)
    }

    /// Current date
    pub fn date(&mut self) -> Result<Date, B::Error> {
        Ok(Date {
            weekday: self.weekday()?,
            day: self.day()?,
            month: self.month()?,
            year: self.year()?,
        })
    }

    /// Set the date. Out-of-range fields are skipped individually.
    pub fn set_date(&mut self, date: Date) -> Result<(), B::Error> {
        self.set_weekday(date.weekday)?;
        self.set_day(date.day)?;
        self.set_month(date.month)?;
        self.set_year(date.year)
    }

    /// Alarm-1 time of day
    pub fn alarm_time(&mut self) -> Result<Time, B::Error> {
        Ok(Time {
            hours: self.alarm_hours()?,
            minutes: self.alarm_minutes()?,
            seconds: self.alarm_seconds()?,
        })
    }

    /// Set the alarm-1 time of day. Out-of-range fields are skipped individually.
    pub fn set_alarm_time(&mut self, time: Time) -> Result<(), B::Error> {
        self.set_alarm_hours(time.hours)?;
        self.set_alarm_minutes(time.minutes)?;
        self.set_alarm_seconds(time.seconds)
    }
}
