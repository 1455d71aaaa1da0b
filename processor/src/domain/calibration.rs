//! Calibration data delivered by the device alongside its readings.

use serde::{Deserialize, Serialize};

/// The four OTP compensation coefficients `[c1, c2, c3, c4]` of an
/// ICP-101xx pressure sensor.
///
/// Always replaced as a whole; there is no way to update one coefficient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct CalibrationVector([i32; 4]);

impl CalibrationVector {
    /// Placeholder used until the device has sent its coefficients.
    pub const UNCALIBRATED: Self = Self([0; 4]);

    pub const fn new(coefficients: [i32; 4]) -> Self {
        Self(coefficients)
    }

    pub const fn coefficients(&self) -> [i32; 4] {
        self.0
    }
}

impl From<[i32; 4]> for CalibrationVector {
    fn from(coefficients: [i32; 4]) -> Self {
        Self(coefficients)
    }
}

/// The `calib` object of a device event, keyed by sensor.
///
/// Keys for sensors this crate does not know about are dropped while
/// decoding, so newer firmware can add calibration blocks freely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorCalibration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icp: Option<CalibrationVector>,
}

impl SensorCalibration {
    pub const fn icp(vector: CalibrationVector) -> Self {
        Self { icp: Some(vector) }
    }

    pub fn is_empty(&self) -> bool {
        self.icp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sensor_keys_are_ignored() {
        let calib: SensorCalibration =
            serde_json::from_str(r#"{"icp": [1, -2, 3, 4], "bmp": [9, 9, 9]}"#).unwrap();
        assert_eq!(
            Some(CalibrationVector::new([1, -2, 3, 4])),
            calib.icp
        );
    }

    #[test]
    fn test_empty_calibration() {
        let calib: SensorCalibration = serde_json::from_str("{}").unwrap();
        assert!(calib.is_empty());
        assert_eq!(SensorCalibration::default(), calib);
    }
}
