//! Sensirion SHTC humidity and temperature sensor.
//!
//! The device already applies the Sensirion formulas and publishes
//! thousandths of %RH and of °C.

pub fn humidity(raw: i64) -> f64 {
    milli(raw)
}

pub fn temperature(raw: i64) -> f64 {
    milli(raw)
}

fn milli(raw: i64) -> f64 {
    raw as f64 / 1000.0
}
