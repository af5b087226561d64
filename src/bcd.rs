//! Binary-coded decimal helpers for RTC registers

/// Encode `value` (0-99) as two packed BCD digits
#[inline(always)]
pub const fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decode two packed BCD digits. Non-digit bits must already be masked off.
#[inline(always)]
pub const fn decode(byte: u8) -> u8 {
    (byte & 0x0F) + (byte >> 4) * 10
}
