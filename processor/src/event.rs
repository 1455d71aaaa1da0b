//! Device events as delivered by the cloud subscription.
//!
//! ```text
//! {"calib": {"icp": [c1, c2, c3, c4]}, "rdg0": {"time": .., "pres_raw": .., ..}, "rdg1": {..}}
//! ```
//!
//! Either part may be missing. Events with neither are status chatter
//! and carry nothing to process.

use core::fmt::{self, Formatter};

use heapless::Vec;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use crate::domain::{fields, RawReadingBatch, SensorCalibration};

/// Maximum number of readings in one event.
pub const MAX_READINGS: usize = 8;

#[derive(Clone, Debug, Default)]
pub struct Event {
    pub calibration: Option<SensorCalibration>,
    pub readings: Vec<RawReadingBatch, MAX_READINGS>,
}

impl Event {
    pub fn is_sensor_event(&self) -> bool {
        self.calibration.is_some() || !self.readings.is_empty()
    }

    #[cfg(feature = "std")]
    pub fn from_json(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

enum EventKey {
    Calibration,
    Reading,
    Other,
}

fn is_reading_key(key: &str) -> bool {
    match key.strip_prefix(fields::READING_PREFIX) {
        Some(index) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

struct EventKeyVisitor;

impl<'de> Visitor<'de> for EventKeyVisitor {
    type Value = EventKey;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("an event attribute name")
    }

    fn visit_str<E: de::Error>(self, key: &str) -> Result<EventKey, E> {
        if key == fields::CALIBRATION {
            Ok(EventKey::Calibration)
        } else if is_reading_key(key) {
            Ok(EventKey::Reading)
        } else {
            Ok(EventKey::Other)
        }
    }
}

impl<'de> Deserialize<'de> for EventKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_identifier(EventKeyVisitor)
    }
}

struct EventVisitor;

impl<'de> Visitor<'de> for EventVisitor {
    type Value = Event;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a device event object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Event, A::Error> {
        let mut event = Event::default();
        while let Some(key) = map.next_key::<EventKey>()? {
            match key {
                EventKey::Calibration => {
                    event.calibration = Some(map.next_value()?);
                }
                EventKey::Reading => {
                    let reading: RawReadingBatch = map.next_value()?;
                    event
                        .readings
                        .push(reading)
                        .map_err(|_| de::Error::custom("too many readings in event"))?;
                }
                EventKey::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(event)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EventVisitor)
    }
}
