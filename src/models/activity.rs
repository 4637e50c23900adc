// SPDX-License-Identifier: MIT

//! Activity and heart-rate zone rows.

use serde::{Deserialize, Serialize};

/// Activity row in the `activities` table.
///
/// Keyed by the Strava activity ID, so redelivered webhooks overwrite the
/// same row instead of duplicating it. The row is always written whole;
/// there are no partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID (primary key, upsert key)
    pub id: i64,
    /// Owning athlete ID
    pub athlete_id: i64,
    /// Activity name/title
    pub name: String,
    /// Sport type (Ride, Run, Hike, etc.)
    pub sport_type: String,
    /// Local start date/time (ISO 8601)
    pub start_date: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: i64,
    /// Elapsed time in seconds
    pub elapsed_time: i64,
    /// Total elevation gain in meters
    pub total_elevation_gain: f64,
    /// Average speed in m/s
    pub average_speed: f64,
    /// Max speed in m/s
    pub max_speed: f64,
    /// Average heart rate (bpm), absent when not recorded
    pub average_heartrate: Option<f64>,
    /// Max heart rate (bpm), absent when not recorded
    pub max_heartrate: Option<f64>,
    /// Average power (watts), absent without a power meter
    pub average_watts: Option<f64>,
    /// Total work (kJ), absent without a power meter
    pub kilojoules: Option<f64>,
    /// Free-form description
    pub description: Option<String>,
}

/// Heart-rate zone row in the `heart_rate_zones` table (1:1 with an activity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZones {
    /// Activity ID (primary key, upsert key)
    pub activity_id: i64,
    /// Seconds spent in zone 1
    pub zone_1_time: i64,
    pub zone_2_time: i64,
    pub zone_3_time: i64,
    pub zone_4_time: i64,
    pub zone_5_time: i64,
}
