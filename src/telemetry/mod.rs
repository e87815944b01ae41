//! Mapping of subscription snapshots to player and AI records.
//!
//! A snapshot lists one entry per subscribed path. The player record is
//! assembled from the `DriverAid.PlayerInfo` and `DriverAid.Data` entries;
//! AI records pair each timetable vehicle's `.LatLon` and `.ObjectClass`
//! entries.

use serde_json::Value;
use thiserror::Error;

pub mod ai;
pub mod player;

pub use ai::{ai_records, parse_vehicle_path, VehicleField};
pub use player::player_record;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TelemetryError {
    #[error("Subscription snapshot has no {0} entry")]
    MissingEntry(&'static str),

    #[error("Missing or invalid field `{field}` in {entry}")]
    MissingField { entry: &'static str, field: String },
}

/// Resolve a JSON pointer such as `/trackMaxSpeed/value` to a number
pub(crate) fn number_at(entry: &'static str, values: &Value, pointer: &str) -> Result<f64, TelemetryError> {
    values
        .pointer(pointer)
        .and_then(Value::as_f64)
        .ok_or_else(|| missing(entry, pointer))
}

pub(crate) fn integer_at(entry: &'static str, values: &Value, pointer: &str) -> Result<i64, TelemetryError> {
    let value = values.pointer(pointer).ok_or_else(|| missing(entry, pointer))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| missing(entry, pointer))
}

pub(crate) fn string_at(entry: &'static str, values: &Value, pointer: &str) -> Result<String, TelemetryError> {
    values
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(entry, pointer))
}

fn missing(entry: &'static str, pointer: &str) -> TelemetryError {
    TelemetryError::MissingField {
        entry,
        field: pointer.trim_start_matches('/').replace('/', "."),
    }
}
