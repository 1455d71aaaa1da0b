//! Reading batches exchanged with the transport and display collaborators.
//!
//! A batch is a flat, insertion-ordered set of named values for one
//! timestamped sample. Capacities are fixed so batches can live on the
//! stack or in a static queue.

use core::fmt::{self, Formatter};

use heapless::{FnvIndexMap, String};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::fields;
use crate::error::ProcessError;

/// Maximum number of fields in one batch. Must stay a power of two.
pub const MAX_FIELDS: usize = 16;

/// Maximum length of a field name in bytes.
pub const FIELD_NAME_CAPACITY: usize = 32;

pub type FieldName = String<FIELD_NAME_CAPACITY>;

type FieldMap = FnvIndexMap<FieldName, FieldValue, MAX_FIELDS>;

/// A single value in a batch.
///
/// Raw sensor codes are integers. Converted quantities are floats.
/// Fields nobody converts keep the variant they arrived with.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Integer(value) => *value as f64,
            FieldValue::Float(value) => *value,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Integer(value) => serializer.serialize_i64(*value),
            FieldValue::Float(value) => serializer.serialize_f64(*value),
        }
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or floating point number")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<FieldValue, E> {
        i64::try_from(value)
            .map(FieldValue::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<FieldValue, E> {
        Ok(FieldValue::Float(value))
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct FieldSet(FieldMap);

impl FieldSet {
    fn insert(&mut self, name: &str, value: FieldValue) -> Result<Option<FieldValue>, ProcessError> {
        let mut key = FieldName::new();
        key.push_str(name)
            .map_err(|_| ProcessError::FieldNameTooLong)?;
        self.0
            .insert(key, value)
            .map_err(|_| ProcessError::CapacityExceeded)
    }

    fn get(&self, name: &str) -> Option<FieldValue> {
        self.0
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| *value)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> + '_ {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    fn timestamp(&self) -> Option<u64> {
        self.get(fields::TIMESTAMP)
            .and_then(|value| value.as_integer())
            .and_then(|value| u64::try_from(value).ok())
    }
}

/// Raw readings for one sample, as published by the device.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReadingBatch {
    fields: FieldSet,
}

impl RawReadingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ProcessError>
    where
        I: IntoIterator<Item = (&'a str, FieldValue)>,
    {
        let mut batch = Self::new();
        for (name, value) in pairs {
            batch.insert(name, value)?;
        }
        Ok(batch)
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) -> Result<Option<FieldValue>, ProcessError> {
        self.fields.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> + '_ {
        self.fields.iter()
    }

    /// Sample time in microseconds, if the batch carries a valid one.
    pub fn timestamp(&self) -> Option<u64> {
        self.fields.timestamp()
    }
}

/// Calibrated readings for one sample, ready for display.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessedReadingBatch {
    fields: FieldSet,
}

impl ProcessedReadingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: &str, value: FieldValue) -> Result<Option<FieldValue>, ProcessError> {
        self.fields.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> + '_ {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.0.is_empty()
    }

    /// Sample time in microseconds.
    pub fn timestamp(&self) -> Option<u64> {
        self.fields.timestamp()
    }

    /// Sample time in seconds, the unit used on plot axes.
    pub fn timestamp_secs(&self) -> Option<f64> {
        self.timestamp().map(|us| us as f64 / 1_000_000.0)
    }
}
