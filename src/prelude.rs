//! Prelude

pub use crate::bus::RegisterBus as _mssp_rtc_RegisterBus;
pub use crate::i2c::Mssp as _mssp_rtc_Mssp;
