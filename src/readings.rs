// Shaping of raw Firebase records into the `Reading` objects returned by the
// API, and their ordering by timestamp.
use crate::firebase::RawCollection;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// One telemetry sample as served to the frontend. Numbers keep the exact
/// representation the store returned (`21` stays `21`, not `21.0`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub id: String,
    pub humidity: Option<Number>,
    pub temperature: Option<Number>,
    pub timestamp: Option<Number>,
}

impl Reading {
    /// Project a stored record onto the output shape. Returns `None` when the
    /// stored value is not a JSON object.
    pub fn from_raw(id: &str, value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Reading {
            id: id.to_string(),
            humidity: number_field(fields, "hum"),
            temperature: number_field(fields, "temp"),
            timestamp: number_field(fields, "timestamp"),
        })
    }

    /// Sort key: the timestamp, or 0 when it is missing.
    pub fn sort_key(&self) -> f64 {
        self.timestamp.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
    }
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Option<Number> {
    match fields.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

/// Normalize every object-valued entry, in the collection's iteration order.
/// Anything else (partial writes, stray scalars) is dropped.
pub fn normalize(raw: &RawCollection) -> Vec<Reading> {
    raw.iter()
        .filter_map(|(id, value)| Reading::from_raw(id, value))
        .collect()
}

/// Stable ascending sort by timestamp; equal timestamps keep their order.
pub fn sort_by_timestamp(readings: &mut [Reading]) {
    readings.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
}

/// All readings, oldest first.
pub fn ordered(raw: &RawCollection) -> Vec<Reading> {
    let mut readings = normalize(raw);
    sort_by_timestamp(&mut readings);
    readings
}

/// The most recent reading. When several share the newest timestamp, the one
/// the store listed last wins; that order is whatever Firebase returns.
pub fn latest(raw: &RawCollection) -> Option<Reading> {
    ordered(raw).pop()
}
