//! Alarm 1
//!
//! The alarm time itself is set through the `alarm_*` field setters on [`Ds3231`]. This module
//! arms and disarms the alarm interrupt and reports or clears the alarm flag.
//!
//! While armed, alarm 1 matches on hours, minutes and seconds only. The alarm drives the
//! INT/SQW pin low and latches `A1F` in the status register until [`Ds3231::clear_alarm()`]
//! is called.

use crate::bus::RegisterBus;
use crate::rtc::{Ds3231, Register};
use bitflags::bitflags;

bitflags! {
    /// Control register (0x0E)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Control: u8 {
        /// Stop the oscillator while on battery
        const EOSC = 0x80;
        /// Battery-backed square wave enable
        const BBSQW = 0x40;
        /// Force a temperature conversion
        const CONV = 0x20;
        /// Square wave rate select, high bit
        const RS2 = 0x10;
        /// Square wave rate select, low bit
        const RS1 = 0x08;
        /// INT/SQW pin outputs alarm interrupts instead of the square wave
        const INTCN = 0x04;
        /// Alarm 2 interrupt enable
        const A2IE = 0x02;
        /// Alarm 1 interrupt enable
        const A1IE = 0x01;
    }

    /// Status register (0x0F)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Oscillator stopped at some point
        const OSF = 0x80;
        /// 32kHz output enable
        const EN32KHZ = 0x08;
        /// Temperature conversion busy
        const BSY = 0x04;
        /// Alarm 2 matched
        const A2F = 0x02;
        /// Alarm 1 matched
        const A1F = 0x01;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Control({=u8:#x})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status({=u8:#x})", self.bits())
    }
}

// A1M4 in the alarm-1 day/date register: ignore the day, match on hours, minutes and seconds
const A1M4: u8 = 0x80;

impl<B: RegisterBus> Ds3231<B> {
    /// Read the control register
    pub fn control(&mut self) -> Result<Control, B::Error> {
        self.read_raw(Register::Control).map(Control::from_bits_retain)
    }

    /// Read the status register
    pub fn status(&mut self) -> Result<Status, B::Error> {
        self.read_raw(Register::Status).map(Status::from_bits_retain)
    }

    /// Arm alarm 1 with its interrupt routed to the INT/SQW pin, matching on time of day
    pub fn enable_alarm(&mut self) -> Result<(), B::Error> {
        self.write_raw(Register::Control, (Control::INTCN | Control::A1IE).bits())?;
        self.write_raw(Register::AlarmDay, A1M4)
    }

    /// Disarm alarm 1. The INT/SQW pin stays in interrupt mode.
    pub fn disable_alarm(&mut self) -> Result<(), B::Error> {
        self.write_raw(Register::Control, Control::INTCN.bits())
    }

    /// Whether alarm 1 has matched since it was last cleared
    pub fn alarm_fired(&mut self) -> Result<bool, B::Error> {
        Ok(self.status()?.contains(Status::A1F))
    }

    /// Non-blocking wait for alarm 1. Returns `WouldBlock` until the alarm flag is set.
    /// The flag is left set; call [`clear_alarm`](Ds3231::clear_alarm) to acknowledge it.
    pub fn poll_alarm(&mut self) -> nb::Result<(), B::Error> {
        if self.alarm_fired()? {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Clear every status flag, acknowledging the alarm
    pub fn clear_alarm(&mut self) -> Result<(), B::Error> {
        debug!("rtc: clearing alarm flag");
        self.write_raw(Register::Status, Status::empty().bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::spy::{SpyBus, Write};
    use crate::hw_traits::mock::{Event, MockMssp};
    use crate::i2c::{BusError, I2cConfig};
    use crate::rtc::DS3231_ADDRESS;

    fn write(register: u8, value: u8) -> Write {
        Write {
            address: DS3231_ADDRESS,
            register,
            value,
        }
    }

    #[test]
    fn enable_routes_interrupt_and_masks_day() {
        let mut rtc = Ds3231::new(SpyBus::new());
        rtc.enable_alarm().unwrap();
        assert_eq!(rtc.free().writes, [write(0x0E, 0x05), write(0x0A, 0x80)]);
    }

    #[test]
    fn disable_keeps_interrupt_mode() {
        let mut rtc = Ds3231::new(SpyBus::new().with(0x0E, 0x05));
        rtc.disable_alarm().unwrap();
        assert_eq!(rtc.control(), Ok(Control::INTCN));
    }

    #[test]
    fn fired_reads_a1f_only() {
        let mut rtc = Ds3231::new(SpyBus::new().with(0x0F, 0x80 | 0x02));
        assert_eq!(rtc.alarm_fired(), Ok(false));

        let mut rtc = Ds3231::new(SpyBus::new().with(0x0F, 0x01));
        assert_eq!(rtc.alarm_fired(), Ok(true));
        assert_eq!(rtc.status(), Ok(Status::A1F));
    }

    #[test]
    fn poll_blocks_until_flag_then_clear() {
        let mut rtc = Ds3231::new(SpyBus::new());
        assert_eq!(rtc.poll_alarm(), Err(nb::Error::WouldBlock));

        let mut bus = rtc.free();
        bus.registers[0x0F] = Status::A1F.bits();
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.poll_alarm(), Ok(()));

        rtc.clear_alarm().unwrap();
        assert_eq!(rtc.poll_alarm(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn poll_surfaces_bus_errors() {
        let mut bus = SpyBus::new();
        bus.fail = Some(BusError::Timeout);
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.poll_alarm(), Err(nb::Error::Other(BusError::Timeout)));
    }

    #[test]
    fn clear_goes_over_the_wire() {
        let periph = MockMssp::new(DS3231_ADDRESS).with_register(0x0F, 0x01);
        let mut rtc = Ds3231::new(I2cConfig::new(periph).configure());
        rtc.clear_alarm().unwrap();

        let periph = rtc.free().free();
        assert_eq!(periph.register(0x0F), 0x00);
        assert_eq!(
            periph.events(),
            [Event::Start, Event::Tx(0xD0), Event::Tx(0x0F), Event::Tx(0x00), Event::Stop]
        );
    }
}
