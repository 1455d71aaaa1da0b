pub mod calibration;
pub mod fields;
pub mod pressure;
pub mod reading;
pub mod temperature;

pub use calibration::{CalibrationVector, SensorCalibration};
pub use pressure::Pressure;
pub use reading::{FieldName, FieldValue, ProcessedReadingBatch, RawReadingBatch};
pub use temperature::{Celsius, Temperature};
