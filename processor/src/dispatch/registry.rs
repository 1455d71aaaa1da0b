//! Table of conversions keyed by raw field name.

use crate::domain::fields;
use crate::drivers::sensors::{icp101xx, opt3002, shtc};

/// How a raw field becomes a calibrated one.
#[derive(Clone, Copy, Debug)]
pub enum Conversion {
    /// A pure function of the raw code.
    Scalar(fn(i64) -> f64),
    /// ICP-101xx pressure, compensated by the temperature code stored
    /// under `temperature` in the same batch.
    IcpPressure { temperature: &'static str },
}

impl Conversion {
    /// The other field this conversion reads, if any.
    pub fn companion(&self) -> Option<&'static str> {
        match self {
            Conversion::Scalar(_) => None,
            Conversion::IcpPressure { temperature } => Some(*temperature),
        }
    }
}

/// One registry entry.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub raw: &'static str,
    pub output: &'static str,
    pub conversion: Conversion,
}

impl Transform {
    pub const fn scalar(raw: &'static str, output: &'static str, f: fn(i64) -> f64) -> Self {
        Self {
            raw,
            output,
            conversion: Conversion::Scalar(f),
        }
    }
}

/// Conversions for the sensor2cloud board: ICP-101xx, OPT3002 and SHTC.
pub static DEFAULT_TRANSFORMS: &[Transform] = &[
    Transform {
        raw: fields::PRESSURE_RAW,
        output: fields::PRESSURE,
        conversion: Conversion::IcpPressure {
            temperature: fields::TEMPERATURE_ICP_RAW,
        },
    },
    Transform::scalar(
        fields::TEMPERATURE_ICP_RAW,
        fields::TEMPERATURE_ICP,
        icp101xx::temperature_celsius,
    ),
    Transform::scalar(
        fields::OPTICAL_POWER_RAW,
        fields::OPTICAL_POWER,
        opt3002::optical_power,
    ),
    Transform::scalar(fields::HUMIDITY_RAW, fields::HUMIDITY, shtc::humidity),
    Transform::scalar(
        fields::TEMPERATURE_SHTC_RAW,
        fields::TEMPERATURE_SHTC,
        shtc::temperature,
    ),
];

/// Find the entry for a raw field name.
pub fn lookup<'t>(transforms: &'t [Transform], raw: &str) -> Option<&'t Transform> {
    transforms.iter().find(|t| t.raw == raw)
}
