//! Athlete credential record.

use serde::{Deserialize, Serialize};

/// Athlete row in the `athletes` table.
///
/// Holds the OAuth token triple for outbound Strava calls. The access token
/// is only usable while `now < expires_at - 300`; a refresh replaces all
/// three fields together (Strava rotates the refresh token too).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    /// Strava athlete ID (primary key)
    pub id: i64,
    /// Current OAuth access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// When the access token expires (epoch seconds)
    pub expires_at: i64,
}

/// Replacement token triple from a successful OAuth refresh.
///
/// Deserialized straight from Strava's token endpoint response and applied
/// to the athlete row as a single update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUpdate {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}
