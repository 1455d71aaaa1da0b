//! Routes every field of a raw batch to its conversion.

pub mod registry;

use crate::domain::{FieldValue, ProcessedReadingBatch, RawReadingBatch, SensorCalibration};
use crate::drivers::sensors::icp101xx::Icp101xx;
use crate::error::ProcessError;
use crate::event::Event;
use crate::traits::sink::ReadingSink;

pub use registry::{Conversion, Transform, DEFAULT_TRANSFORMS};

/// Owns the sensor converters and a read-only transform table.
///
/// All methods take `&self`; the dispatcher can be shared between a
/// thread delivering calibration and threads processing batches.
pub struct ReadingDispatcher {
    icp: Icp101xx,
    transforms: &'static [Transform],
}

impl ReadingDispatcher {
    pub fn new(calibration: &SensorCalibration) -> Self {
        Self::with_transforms(calibration, DEFAULT_TRANSFORMS)
    }

    pub fn with_transforms(
        calibration: &SensorCalibration,
        transforms: &'static [Transform],
    ) -> Self {
        let icp = match calibration.icp {
            Some(vector) => Icp101xx::new(vector),
            None => Icp101xx::uncalibrated(),
        };
        Self { icp, transforms }
    }

    pub fn icp(&self) -> &Icp101xx {
        &self.icp
    }

    /// Apply the calibration blocks this dispatcher knows about.
    pub fn set_calibration(&self, calibration: &SensorCalibration) {
        if let Some(vector) = calibration.icp {
            info!("ICP-101xx calibration: {:?}", vector.coefficients());
            self.icp.set_calibration(vector);
        }
    }

    /// Convert one raw batch.
    ///
    /// Fields with a registered transform are replaced by their converted
    /// value, anything else is copied unchanged. A conversion that reads a
    /// companion field (pressure needs the ICP temperature code) fails the
    /// whole batch when the companion is missing.
    pub fn process_reading(
        &self,
        raw: &RawReadingBatch,
    ) -> Result<ProcessedReadingBatch, ProcessError> {
        self.validate(raw)?;

        let mut processed = ProcessedReadingBatch::new();
        for (name, value) in raw.iter() {
            match registry::lookup(self.transforms, name) {
                Some(transform) => {
                    let converted = self.convert(transform, value, raw)?;
                    trace!("{} -> {} = {}", name, transform.output, converted);
                    let replaced = processed.insert(transform.output, FieldValue::Float(converted))?;
                    if replaced.is_some() {
                        debug!("`{}` overwrote an earlier value", transform.output);
                    }
                }
                None => {
                    if processed.insert(name, value)?.is_some() {
                        debug!("`{}` overwrote an earlier value", name);
                    }
                }
            }
        }
        Ok(processed)
    }

    /// Apply the calibration of `event`, then process each of its readings
    /// in order. Readings that fail are logged and skipped.
    ///
    /// Returns the number of readings delivered to `sink`.
    pub fn handle_event<S: ReadingSink>(&self, event: &Event, sink: &mut S) -> usize {
        if let Some(calibration) = &event.calibration {
            self.set_calibration(calibration);
        }

        let mut delivered = 0;
        for (index, reading) in event.readings.iter().enumerate() {
            match self.process_reading(reading) {
                Ok(processed) => {
                    sink.notify(&processed);
                    delivered += 1;
                }
                Err(e) => {
                    warn!("Dropping reading {}: {:?}", index, e);
                }
            }
        }
        delivered
    }

    fn validate(&self, raw: &RawReadingBatch) -> Result<(), ProcessError> {
        for (name, value) in raw.iter() {
            let transform = match registry::lookup(self.transforms, name) {
                Some(transform) => transform,
                None => continue,
            };
            if value.as_integer().is_none() {
                return Err(ProcessError::NonIntegerRaw {
                    field: transform.raw,
                });
            }
            if let Some(companion) = transform.conversion.companion() {
                match raw.get(companion) {
                    Some(FieldValue::Integer(_)) => {}
                    Some(FieldValue::Float(_)) => {
                        return Err(ProcessError::NonIntegerRaw { field: companion })
                    }
                    None => {
                        return Err(ProcessError::MissingCompanion {
                            field: transform.raw,
                            companion,
                        })
                    }
                }
            }
        }
        Ok(())
    }

    fn convert(
        &self,
        transform: &Transform,
        value: FieldValue,
        raw: &RawReadingBatch,
    ) -> Result<f64, ProcessError> {
        let code = value.as_integer().ok_or(ProcessError::NonIntegerRaw {
            field: transform.raw,
        })?;

        match transform.conversion {
            Conversion::Scalar(f) => Ok(f(code)),
            Conversion::IcpPressure { temperature } => {
                let t_lsb = raw
                    .get(temperature)
                    .and_then(|v| v.as_integer())
                    .ok_or(ProcessError::MissingCompanion {
                        field: transform.raw,
                        companion: temperature,
                    })?;
                if !self.icp.is_calibrated() {
                    debug!("`{}` converted with placeholder calibration", transform.raw);
                }
                Ok(self.icp.convert_pressure(code, t_lsb)?.pascals())
            }
        }
    }
}

impl Default for ReadingDispatcher {
    fn default() -> Self {
        Self::new(&SensorCalibration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalibrationVector;
    use crate::drivers::sensors::icp101xx::Icp101xxError;

    fn batch(pairs: &[(&str, FieldValue)]) -> RawReadingBatch {
        RawReadingBatch::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let dispatcher = ReadingDispatcher::default();
        let processed = dispatcher
            .process_reading(&batch(&[
                ("time", FieldValue::Integer(1_000_000)),
                ("temp_bmp", FieldValue::Float(21.25)),
            ]))
            .unwrap();
        assert_eq!(Some(FieldValue::Integer(1_000_000)), processed.get("time"));
        assert_eq!(Some(FieldValue::Float(21.25)), processed.get("temp_bmp"));
        assert_eq!(2, processed.len());
    }

    #[test]
    fn test_scalar_conversions() {
        let dispatcher = ReadingDispatcher::default();
        let processed = dispatcher
            .process_reading(&batch(&[
                ("opt_raw", FieldValue::Integer(0x1064)),
                ("humid_raw", FieldValue::Integer(45000)),
                ("temp_shtc_raw", FieldValue::Integer(-1000)),
                ("temp_icp_raw", FieldValue::Integer(0)),
            ]))
            .unwrap();
        assert_eq!(Some(FieldValue::Float(240.0)), processed.get("opt"));
        assert_eq!(Some(FieldValue::Float(45.0)), processed.get("humid"));
        assert_eq!(Some(FieldValue::Float(-1.0)), processed.get("temp_shtc"));
        assert_eq!(Some(FieldValue::Float(-45.0)), processed.get("temp_icp"));
        assert!(!processed.contains("opt_raw"));
    }

    #[test]
    fn test_pressure_without_temperature_is_rejected() {
        let dispatcher = ReadingDispatcher::default();
        assert_eq!(
            Err(ProcessError::MissingCompanion {
                field: "pres_raw",
                companion: "temp_icp_raw"
            }),
            dispatcher.process_reading(&batch(&[
                ("time", FieldValue::Integer(1)),
                ("pres_raw", FieldValue::Integer(5_000_000)),
            ]))
            .map(|_| ())
        );
    }

    #[test]
    fn test_float_raw_is_rejected() {
        let dispatcher = ReadingDispatcher::default();
        assert_eq!(
            Err(ProcessError::NonIntegerRaw { field: "humid_raw" }),
            dispatcher
                .process_reading(&batch(&[("humid_raw", FieldValue::Float(45.0))]))
                .map(|_| ())
        );
        assert_eq!(
            Err(ProcessError::NonIntegerRaw {
                field: "temp_icp_raw"
            }),
            dispatcher
                .process_reading(&batch(&[
                    ("pres_raw", FieldValue::Integer(5_000_000)),
                    ("temp_icp_raw", FieldValue::Float(1.0)),
                ]))
                .map(|_| ())
        );
    }

    #[test]
    fn test_degenerate_calibration_fails_batch_but_keeps_state() {
        let vector = CalibrationVector::new([0, 0, 0, 1792]);
        let dispatcher = ReadingDispatcher::new(&SensorCalibration::icp(vector));
        assert_eq!(
            Err(ProcessError::Conversion(Icp101xxError::DegenerateCalibration)),
            dispatcher
                .process_reading(&batch(&[
                    ("pres_raw", FieldValue::Integer(5_000_000)),
                    ("temp_icp_raw", FieldValue::Integer(30000)),
                ]))
                .map(|_| ())
        );
        assert_eq!(vector, dispatcher.icp().calibration());
    }

    #[test]
    fn test_initial_and_updated_calibration() {
        let dispatcher = ReadingDispatcher::new(&SensorCalibration::default());
        assert!(!dispatcher.icp().is_calibrated());

        dispatcher.set_calibration(&SensorCalibration::default());
        assert!(!dispatcher.icp().is_calibrated());

        let vector = CalibrationVector::new([1, 2, 3, 4]);
        dispatcher.set_calibration(&SensorCalibration::icp(vector));
        assert!(dispatcher.icp().is_calibrated());
        assert_eq!(vector, dispatcher.icp().calibration());
    }

    #[test]
    fn test_temperature_before_pressure() {
        let vector = CalibrationVector::new([0, 0, 0, 3500]);
        let dispatcher = ReadingDispatcher::new(&SensorCalibration::icp(vector));
        let processed = dispatcher
            .process_reading(&batch(&[
                ("temp_icp_raw", FieldValue::Integer(32768)),
                ("time", FieldValue::Integer(7)),
                ("pres_raw", FieldValue::Integer(12_058_624)),
            ]))
            .unwrap();

        let keys: std::vec::Vec<&str> = processed.iter().map(|(name, _)| name).collect();
        assert_eq!(keys, ["temp_icp", "time", "pres"]);
        assert_eq!(Some(FieldValue::Float(42.5)), processed.get("temp_icp"));
        let pressure = processed.get("pres").unwrap().as_f64();
        assert!((pressure - 105_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_pass_through_overwrites_converted_value() {
        let dispatcher = ReadingDispatcher::default();
        let processed = dispatcher
            .process_reading(&batch(&[
                ("humid_raw", FieldValue::Integer(45000)),
                ("humid", FieldValue::Integer(12)),
            ]))
            .unwrap();
        assert_eq!(1, processed.len());
        assert_eq!(Some(FieldValue::Integer(12)), processed.get("humid"));
    }

    fn tenths(raw: i64) -> f64 {
        raw as f64 / 10.0
    }

    static HUMIDITY_ONLY: &[Transform] = &[Transform::scalar("rh_raw", "rh", tenths)];

    #[test]
    fn test_custom_transforms() {
        let dispatcher =
            ReadingDispatcher::with_transforms(&SensorCalibration::default(), HUMIDITY_ONLY);
        let processed = dispatcher
            .process_reading(&batch(&[
                ("rh_raw", FieldValue::Integer(455)),
                ("humid_raw", FieldValue::Integer(45000)),
            ]))
            .unwrap();
        assert_eq!(Some(FieldValue::Float(45.5)), processed.get("rh"));
        assert_eq!(Some(FieldValue::Integer(45000)), processed.get("humid_raw"));
    }
}
