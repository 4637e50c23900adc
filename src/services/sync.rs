// SPDX-License-Identifier: MIT

//! Activity enrichment pipeline.
//!
//! For each `activity` create/update webhook this looks up the athlete's
//! credentials, refreshes the access token if it is close to expiring,
//! fetches the detailed activity from Strava, and upserts it (plus
//! heart-rate zones when available) into the store.

use crate::coerce::{to_f64, to_seconds};
use crate::db::Store;
use crate::error::AppError;
use crate::models::{Activity, HeartRateZones};
use crate::services::strava::{heart_rate_times, StravaActivity, StravaClient};
use chrono::Utc;
use std::sync::Arc;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Whether a stored access token is still usable at `now` (epoch seconds).
///
/// The 300-second margin is a hard threshold: a token expiring 301 seconds
/// from now is used as-is, one expiring 299 seconds from now is refreshed.
fn token_is_fresh(expires_at: i64, now: i64) -> bool {
    now < expires_at - TOKEN_REFRESH_MARGIN_SECS
}

/// Orchestrates the webhook enrichment flow.
///
/// Each call is self-contained: no cross-request state, no retries. A
/// duplicate or out-of-order delivery simply overwrites the same rows.
#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn Store>,
    strava: StravaClient,
}

impl SyncService {
    pub fn new(store: Arc<dyn Store>, strava: StravaClient) -> Self {
        Self { store, strava }
    }

    /// Sync a single activity for an athlete.
    ///
    /// An unknown athlete is a normal terminal outcome (logged, `Ok`); any
    /// downstream failure before the activity upsert aborts with no partial
    /// write. A failed zone write never undoes the activity write.
    pub async fn sync_activity(&self, athlete_id: i64, activity_id: i64) -> Result<(), AppError> {
        let Some(athlete) = self.store.get_athlete(athlete_id).await? else {
            tracing::warn!(athlete_id, "Athlete not found in database, skipping");
            return Ok(());
        };

        let access_token = if token_is_fresh(athlete.expires_at, Utc::now().timestamp()) {
            athlete.access_token
        } else {
            tracing::info!(athlete_id, "Access token expiring, refreshing");
            let tokens = self.strava.refresh_token(&athlete.refresh_token).await?;
            self.store
                .update_athlete_tokens(athlete_id, &tokens)
                .await?;
            tokens.access_token
        };

        let detail = self.strava.get_activity(&access_token, activity_id).await?;

        self.store
            .upsert_activity(&activity_row(athlete_id, &detail))
            .await?;
        tracing::info!(activity_id, athlete_id, "Activity saved");

        if detail.has_heartrate {
            // The activity row is already committed; zone trouble is not
            // worth failing the whole event over.
            if let Err(e) = self.sync_zones(&access_token, activity_id).await {
                tracing::warn!(
                    error = %e,
                    activity_id,
                    "Could not save heart rate zones"
                );
            }
        }

        Ok(())
    }

    async fn sync_zones(&self, access_token: &str, activity_id: i64) -> Result<(), AppError> {
        let zones = self
            .strava
            .get_activity_zones(access_token, activity_id)
            .await?;

        let Some(times) = heart_rate_times(&zones) else {
            tracing::debug!(activity_id, "No heartrate zone in response");
            return Ok(());
        };

        self.store
            .upsert_heart_rate_zones(&HeartRateZones {
                activity_id,
                zone_1_time: times[0],
                zone_2_time: times[1],
                zone_3_time: times[2],
                zone_4_time: times[3],
                zone_5_time: times[4],
            })
            .await?;
        tracing::info!(activity_id, "Heart rate zones saved");
        Ok(())
    }
}

/// Map a detailed Strava activity onto the stored row shape.
///
/// Durations and quantities are coerced defensively (0 when absent or
/// unparsable); physiological extras stay `None` when Strava omits them.
fn activity_row(athlete_id: i64, detail: &StravaActivity) -> Activity {
    Activity {
        id: detail.id,
        athlete_id,
        name: detail.name.clone(),
        sport_type: detail.sport_type.clone(),
        start_date: detail.start_date_local.clone(),
        distance: to_f64(&detail.distance),
        moving_time: to_seconds(&detail.moving_time),
        elapsed_time: to_seconds(&detail.elapsed_time),
        total_elevation_gain: to_f64(&detail.total_elevation_gain),
        average_speed: to_f64(&detail.average_speed),
        max_speed: to_f64(&detail.max_speed),
        average_heartrate: detail.average_heartrate,
        max_heartrate: detail.max_heartrate,
        average_watts: detail.average_watts,
        kilojoules: detail.kilojoules,
        description: detail.description.clone(),
    }
}
