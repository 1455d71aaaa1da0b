use core::fmt::{self, Display, Formatter};

use crate::drivers::sensors::icp101xx::Icp101xxError;

/// Reasons a reading batch could not be processed.
///
/// Errors are local to the batch that caused them; calibration state is
/// never touched on failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessError {
    /// `field` needs `companion` from the same batch, and it was absent.
    MissingCompanion {
        field: &'static str,
        companion: &'static str,
    },
    /// A field with a registered conversion did not carry an integer code.
    NonIntegerRaw { field: &'static str },
    /// The sensor model could not produce a finite value.
    Conversion(Icp101xxError),
    /// More distinct fields than a batch can hold.
    CapacityExceeded,
    /// A field name longer than [`FIELD_NAME_CAPACITY`](crate::domain::reading::FIELD_NAME_CAPACITY).
    FieldNameTooLong,
}

impl From<Icp101xxError> for ProcessError {
    fn from(e: Icp101xxError) -> Self {
        ProcessError::Conversion(e)
    }
}

impl Display for ProcessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::MissingCompanion { field, companion } => {
                write!(f, "`{}` present without `{}`", field, companion)
            }
            ProcessError::NonIntegerRaw { field } => {
                write!(f, "`{}` is not an integer sensor code", field)
            }
            ProcessError::Conversion(e) => Display::fmt(e, f),
            ProcessError::CapacityExceeded => f.write_str("too many fields in batch"),
            ProcessError::FieldNameTooLong => f.write_str("field name too long"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProcessError {}

/// The event queue had no room left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    Full,
}

impl Display for QueueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full => f.write_str("event queue full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueueError {}
