// SPDX-License-Identifier: MIT

//! Strava webhook sync server.
//!
//! Receives Strava activity webhooks, enriches them via the Strava API,
//! and persists activities (and heart-rate zones) to Supabase.

use std::sync::Arc;
use strava_sync::{
    config::Config,
    db::SupabaseStore,
    services::{StravaClient, SyncService},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment (fails fast on missing secrets)
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting strava-sync");

    let store = Arc::new(SupabaseStore::new(
        config.supabase_url.clone(),
        config.supabase_service_role_key.clone(),
    ));

    let strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );

    let sync = SyncService::new(store.clone(), strava);

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        sync,
    });

    let app = strava_sync::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
