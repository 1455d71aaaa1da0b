//! Three-point calibration model of the ICP-101xx.
//!
//! The sensor is characterised at three applied pressures. At a given
//! temperature each of them corresponds to a lookup value derived from
//! the OTP coefficients, and the pressure curve `A + B / (C + p_LSB)` is
//! solved to pass through all three points exactly.

use crate::domain::CalibrationVector;

use super::Icp101xxError;

/// Applied pressures of the factory calibration, in Pa.
pub const REFERENCE_PRESSURES: [f64; 3] = [45000.0, 80000.0, 105000.0];

pub const LUT_LOWER: f64 = 3.5 * (1u32 << 20) as f64;
pub const LUT_UPPER: f64 = 11.5 * (1u32 << 20) as f64;
pub const QUADRATIC_FACTOR: f64 = 1.0 / 16777216.0;
pub const OFFSET_FACTOR: f64 = 2048.0;

/// Raw temperature code of the nominal zero point.
const TEMPERATURE_CENTER: f64 = 32768.0;

/// Temperature adjusted lookup values `[s1, s2, s3]` for the three
/// calibration points.
pub fn lookup_values(calibration: &CalibrationVector, t_lsb: i64) -> [f64; 3] {
    let [c1, c2, c3, c4] = calibration.coefficients();
    let t = t_lsb as f64 - TEMPERATURE_CENTER;
    let t2 = t * t;

    [
        LUT_LOWER + (c1 as f64 * t2) * QUADRATIC_FACTOR,
        OFFSET_FACTOR * c4 as f64 + (c2 as f64 * t2) * QUADRATIC_FACTOR,
        LUT_UPPER + (c3 as f64 * t2) * QUADRATIC_FACTOR,
    ]
}

/// Coefficients of `p = A + B / (C + p_LSB)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConversionCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ConversionCurve {
    /// Fit the curve through `(p_lut[i], p_pa[i])` for all three points.
    ///
    /// Fails when two lookup values coincide, which leaves the system
    /// without a unique solution.
    pub fn solve(p_pa: [f64; 3], p_lut: [f64; 3]) -> Result<Self, Icp101xxError> {
        let [p0, p1, p2] = p_pa;
        let [s1, s2, s3] = p_lut;

        let c = (s1 * s2 * (p0 - p1) + s2 * s3 * (p1 - p2) + s3 * s1 * (p2 - p0))
            / (s3 * (p0 - p1) + s1 * (p1 - p2) + s2 * (p2 - p0));
        let a = (p0 * s1 - p1 * s2 - (p1 - p0) * c) / (s1 - s2);
        let b = (p0 - a) * (s1 + c);

        if a.is_finite() && b.is_finite() && c.is_finite() {
            Ok(Self { a, b, c })
        } else {
            Err(Icp101xxError::DegenerateCalibration)
        }
    }

    /// The curve evaluated at a raw pressure code.
    pub fn pressure(&self, p_lsb: f64) -> f64 {
        self.a + self.b / (self.c + p_lsb)
    }
}
