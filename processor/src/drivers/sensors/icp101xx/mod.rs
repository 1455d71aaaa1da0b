//! TDK InvenSense ICP-101xx barometric pressure sensor.
//!
//! The device publishes its raw pressure and temperature codes together
//! with its four OTP coefficients; this module turns them into Pascals
//! and degrees Celsius.

pub mod calibration;

use core::cell::Cell;
use core::fmt::{self, Display, Formatter};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::domain::{CalibrationVector, Celsius, Pressure, Temperature};
use calibration::{lookup_values, ConversionCurve, REFERENCE_PRESSURES};

/// Mutex guarding calibration state shared between producers and the
/// reading consumer.
pub type CalibrationMutex = CriticalSectionRawMutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icp101xxError {
    /// The coefficients yield no finite pressure at this temperature.
    DegenerateCalibration,
}

impl Display for Icp101xxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Icp101xxError::DegenerateCalibration => {
                f.write_str("calibration yields no finite pressure")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Icp101xxError {}

#[derive(Clone, Copy)]
struct CalibrationState {
    vector: CalibrationVector,
    calibrated: bool,
}

/// Converts ICP-101xx codes using the most recent calibration.
///
/// The coefficient vector is swapped as one value under a blocking mutex,
/// so a conversion running on another thread sees either the old or the
/// new vector, never a mix.
pub struct Icp101xx {
    state: Mutex<CalibrationMutex, Cell<CalibrationState>>,
}

impl Icp101xx {
    pub const fn new(calibration: CalibrationVector) -> Self {
        Self {
            state: Mutex::new(Cell::new(CalibrationState {
                vector: calibration,
                calibrated: true,
            })),
        }
    }

    /// A converter holding the all-zero placeholder vector.
    pub const fn uncalibrated() -> Self {
        Self {
            state: Mutex::new(Cell::new(CalibrationState {
                vector: CalibrationVector::UNCALIBRATED,
                calibrated: false,
            })),
        }
    }

    /// Replace the coefficient vector. Any four integers are accepted.
    pub fn set_calibration(&self, calibration: CalibrationVector) {
        self.state.lock(|state| {
            state.set(CalibrationState {
                vector: calibration,
                calibrated: true,
            })
        });
    }

    pub fn calibration(&self) -> CalibrationVector {
        self.snapshot().vector
    }

    /// Whether coefficients were ever supplied.
    pub fn is_calibrated(&self) -> bool {
        self.snapshot().calibrated
    }

    pub fn convert_temperature(&self, t_lsb: i64) -> Temperature<Celsius> {
        temperature(t_lsb)
    }

    /// Temperature compensated pressure from a raw pressure code and the
    /// temperature code sampled with it.
    pub fn convert_pressure(&self, p_lsb: i64, t_lsb: i64) -> Result<Pressure, Icp101xxError> {
        let calibration = self.calibration();
        let curve = ConversionCurve::solve(REFERENCE_PRESSURES, lookup_values(&calibration, t_lsb))?;
        let pressure = curve.pressure(p_lsb as f64);
        if pressure.is_finite() {
            Ok(Pressure::from_pascals(pressure))
        } else {
            Err(Icp101xxError::DegenerateCalibration)
        }
    }

    fn snapshot(&self) -> CalibrationState {
        self.state.lock(|state| state.get())
    }
}

impl Default for Icp101xx {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

/// Temperature from a raw code. Needs no calibration.
pub fn temperature(t_lsb: i64) -> Temperature<Celsius> {
    Temperature::new(temperature_celsius(t_lsb))
}

/// [`temperature`] as a bare number, for use in transform tables.
pub fn temperature_celsius(t_lsb: i64) -> f64 {
    -45.0 + 175.0 / 65536.0 * t_lsb as f64
}
