// SPDX-License-Identifier: MIT

//! Shared test harness: an app wired to an in-memory store and an
//! optional mock Strava server.

use std::sync::Arc;
use strava_sync::config::Config;
use strava_sync::db::MemoryStore;
use strava_sync::models::Athlete;
use strava_sync::routes::create_router;
use strava_sync::services::{StravaClient, SyncService};
use strava_sync::AppState;

/// Create a test app with an in-memory store and a Strava client pointed
/// at `strava_base` (a wiremock server URI, or a dead address for tests
/// that must never reach Strava).
///
/// Returns the router and the store for post-hoc write assertions.
#[allow(dead_code)]
pub fn create_test_app(strava_base: &str) -> (axum::Router, Arc<MemoryStore>) {
    let config = Config::test_default();
    let store = Arc::new(MemoryStore::new());

    let strava = StravaClient::with_base_urls(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        format!("{}/api/v3", strava_base),
        format!("{}/oauth/token", strava_base),
    );

    let sync = SyncService::new(store.clone(), strava);

    let state = Arc::new(AppState {
        config,
        store: store.clone(),
        sync,
    });

    (create_router(state), store)
}

/// Create a test app whose Strava client points at an unroutable address.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<MemoryStore>) {
    create_test_app("http://127.0.0.1:9")
}

/// An athlete credential record whose token is valid for another hour.
#[allow(dead_code)]
pub fn fresh_athlete(id: i64) -> Athlete {
    Athlete {
        id,
        access_token: "fresh_access_token".to_string(),
        refresh_token: "refresh_token_1".to_string(),
        expires_at: chrono::Utc::now().timestamp() + 3600,
    }
}

/// An athlete credential record whose token already expired.
#[allow(dead_code)]
pub fn stale_athlete(id: i64) -> Athlete {
    Athlete {
        id,
        access_token: "stale_access_token".to_string(),
        refresh_token: "refresh_token_1".to_string(),
        expires_at: chrono::Utc::now().timestamp() - 10,
    }
}
