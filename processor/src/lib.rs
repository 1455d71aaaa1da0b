#![macro_use]
#![cfg_attr(not(feature = "std"), no_std)]
//! Sensor Processor turns the raw readings published by a sensor2cloud
//! board into calibrated engineering units.
//!
//! The board samples an ICP-101xx barometer, an OPT3002 light sensor and an
//! SHTC humidity sensor, and ships the raw codes together with the
//! barometer's OTP coefficients.
//!
//! # Pipeline
//!
//! * [`Event`] decodes a device event into an optional [`SensorCalibration`]
//!   and a list of [`RawReadingBatch`]es.
//! * [`ReadingDispatcher`] owns the sensor converters and a static table of
//!   [`Transform`]s. Each raw field is converted, or copied when nothing is
//!   registered for it.
//! * [`EventQueue`] hands events from the receiving task to the processing
//!   task; processed batches go to a [`ReadingSink`].
//!
//! # Example
//!
//! ```
//! use sensor_processor::*;
//!
//! let dispatcher = ReadingDispatcher::new(&SensorCalibration::icp(
//!     CalibrationVector::new([1795, -820, 2412, 3605]),
//! ));
//!
//! let raw = RawReadingBatch::from_pairs([
//!     ("time", FieldValue::Integer(1_000_000)),
//!     ("pres_raw", FieldValue::Integer(6_000_000)),
//!     ("temp_icp_raw", FieldValue::Integer(30000)),
//! ])?;
//!
//! let processed = dispatcher.process_reading(&raw)?;
//! assert!(processed.contains("pres"));
//! assert!(processed.contains("temp_icp"));
//! # Ok::<(), ProcessError>(())
//! ```

pub(crate) mod fmt;

pub mod dispatch;
pub mod domain;
pub mod drivers;
pub mod error;
pub mod event;
pub mod queue;
pub mod traits;

pub use dispatch::{Conversion, ReadingDispatcher, Transform, DEFAULT_TRANSFORMS};
pub use domain::{
    CalibrationVector, FieldValue, ProcessedReadingBatch, RawReadingBatch, SensorCalibration,
};
pub use drivers::sensors::icp101xx::{Icp101xx, Icp101xxError};
pub use error::{ProcessError, QueueError};
pub use event::Event;
pub use queue::EventQueue;
pub use traits::sink::ReadingSink;
