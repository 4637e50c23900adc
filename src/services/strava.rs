// SPDX-License-Identifier: MIT

//! Strava API client.
//!
//! Handles:
//! - Detailed activity fetching
//! - Activity zone fetching (heart rate)
//! - Token refresh when expired

use crate::coerce::to_seconds;
use crate::error::AppError;
use crate::models::TokenUpdate;
use serde::Deserialize;
use serde_json::Value;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            "https://www.strava.com/api/v3".to_string(),
            "https://www.strava.com/oauth/token".to_string(),
        )
    }

    /// Create a client against custom endpoints (used by tests to point at
    /// a mock server).
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        api_base: String,
        token_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            token_url,
            client_id,
            client_secret,
        }
    }

    /// Refresh an expired access token.
    ///
    /// The response carries a rotated refresh token along with the new
    /// access token; callers must persist the whole triple.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenUpdate, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: i64,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.api_base, activity_id);
        self.get_json(&url, access_token).await
    }

    /// Get the zone breakdown for an activity.
    pub async fn get_activity_zones(
        &self,
        access_token: &str,
        activity_id: i64,
    ) -> Result<Vec<ActivityZone>, AppError> {
        let url = format!("{}/activities/{}/zones", self.api_base, activity_id);
        self.get_json(&url, access_token).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Detailed Strava activity response.
///
/// Duration and quantity fields are kept as raw JSON values because their
/// shape varies between clients (numbers, strings, duration objects); the
/// sync pipeline normalizes them via [`crate::coerce`].
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sport_type: String,
    #[serde(default)]
    pub start_date_local: String,
    #[serde(default)]
    pub distance: Value,
    #[serde(default)]
    pub moving_time: Value,
    #[serde(default)]
    pub elapsed_time: Value,
    #[serde(default)]
    pub total_elevation_gain: Value,
    #[serde(default)]
    pub average_speed: Value,
    #[serde(default)]
    pub max_speed: Value,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub average_watts: Option<f64>,
    pub kilojoules: Option<f64>,
    pub description: Option<String>,
    #[serde(default)]
    pub has_heartrate: bool,
}

/// One entry of the activity zones response.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityZone {
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(default)]
    pub distribution_buckets: Vec<ZoneBucket>,
}

/// A single distribution bucket within a zone.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneBucket {
    #[serde(default)]
    pub time: Value,
}

/// Extract the five heart-rate bucket times from a zones response.
///
/// Returns `None` when no `"heartrate"`-typed zone is present (e.g. a
/// power-only activity). Missing buckets default to 0 seconds.
pub fn heart_rate_times(zones: &[ActivityZone]) -> Option<[i64; 5]> {
    let zone = zones.iter().find(|z| z.zone_type == "heartrate")?;
    let mut times = [0i64; 5];
    for (slot, bucket) in times.iter_mut().zip(zone.distribution_buckets.iter()) {
        *slot = to_seconds(&bucket.time);
    }
    Some(times)
}
