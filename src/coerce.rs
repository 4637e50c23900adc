// SPDX-License-Identifier: MIT

//! Defensive numeric coercion for Strava API payloads.
//!
//! Depending on the client library that produced an activity, duration
//! fields arrive as plain numbers, numeric strings, or richer objects
//! shaped like `{"total_seconds": 120}`. These helpers normalize all of
//! them so the stored row always carries plain numeric counts.

use serde_json::Value;

/// Normalize a duration-ish JSON value to whole seconds.
///
/// Accepts numbers, numeric strings, and objects carrying a
/// `total_seconds` or `seconds` field. Anything else (including null)
/// coerces to 0 rather than failing the sync.
//
// TODO: surface a metric when a non-null value zeroes out here, so an
// upstream data-shape change does not go unnoticed.
pub fn to_seconds(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
        Value::Object(map) => map
            .get("total_seconds")
            .or_else(|| map.get("seconds"))
            .map(to_seconds)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Normalize a JSON value to a float, defaulting to 0.0.
///
/// Strava occasionally serializes quantities like `distance` as strings.
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
