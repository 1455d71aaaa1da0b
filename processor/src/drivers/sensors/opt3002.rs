//! TI OPT3002 light-to-digital sensor.

/// Optical power from the packed result register.
///
/// Bits 0..12 hold the mantissa and bits 12..16 a binary exponent; the
/// full-scale LSB is 1.2 nW/cm² at exponent zero.
pub fn optical_power(raw: i64) -> f64 {
    let mantissa = raw & 0xFFF;
    let exponent = (raw >> 12) & 0xF;

    1.2 * f64::from(1u32 << exponent) * mantissa as f64
}
