use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

/// Probe locations, named exactly as the wire generations name them.
///
/// The German names belong to the hive-id frame family, the English ones to
/// the ThingSpeak family. They are distinct keys, not translations of each
/// other: a reading only ever carries the names of the generation it was
/// decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Outer,
    Drop,
    Lower,
    Middle,
    Upper,
    Roof,
    Aussen,
    Unten,
    Mitte,
    Oben,
    Dach,
}

/// Normalized decoder output for one telemetry frame.
///
/// Every populated numeric field is the raw signed 16-bit word divided by
/// 100.0; anything the matched layout does not carry stays `None` and is
/// never defaulted. Locations mapped by the layout appear as map entries even
/// when the value was suppressed, so they serialize as explicit `null`s.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hive_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub humidity: BTreeMap<Location, Option<f64>>,
    pub temperature: BTreeMap<Location, Option<f64>>,
}

/// Legacy numbered-field rendition of a reading, as the ThingSpeak dashboard
/// expects it. Built fresh per decode, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedFieldView {
    pub field1: Option<f64>,
    pub field2: Option<f64>,
    pub field3: Option<f64>,
    pub field4: Option<f64>,
    pub field5: Option<f64>,
    pub field6: Option<f64>,
    pub field7: Option<f64>,
    pub field8: Option<f64>,
    pub status: String,
    pub sensor: SensorReading,
}

/// One decoded reading together with its envelope context, ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingRecord {
    pub device_id: String,
    pub application_id: String,
    pub recorded_at: OffsetDateTime,
    pub reading: SensorReading,
}
