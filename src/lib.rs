// SPDX-License-Identifier: MIT

//! Strava webhook sync service.
//!
//! Receives activity webhooks from Strava, refreshes OAuth tokens when they
//! are close to expiring, fetches the full activity (and heart-rate zones)
//! from the Strava API, and upserts the result into Supabase.

pub mod coerce;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::SyncService;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub sync: SyncService,
}
