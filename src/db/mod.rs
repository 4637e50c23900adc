//! Database layer.
//!
//! The sync pipeline talks to storage through the [`Store`] trait so the
//! core logic is not tied to a specific backend or query language.
//! Production uses [`SupabaseStore`] (PostgREST over HTTP); tests use
//! [`MemoryStore`].

pub mod memory;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use crate::error::AppError;
use crate::models::{Activity, Athlete, HeartRateZones, TokenUpdate};
use async_trait::async_trait;

/// Table names as constants.
pub mod tables {
    pub const ATHLETES: &str = "athletes";
    pub const ACTIVITIES: &str = "activities";
    pub const HEART_RATE_ZONES: &str = "heart_rate_zones";
}

/// Abstract store operations used by the sync pipeline.
#[async_trait]
pub trait Store: Send + Sync {
    /// Look up an athlete credential record by Strava athlete ID.
    async fn get_athlete(&self, athlete_id: i64) -> Result<Option<Athlete>, AppError>;

    /// Replace an athlete's token triple after a successful OAuth refresh.
    ///
    /// All three fields are written in one update; the refresh token
    /// rotates along with the access token and must never be left stale.
    async fn update_athlete_tokens(
        &self,
        athlete_id: i64,
        tokens: &TokenUpdate,
    ) -> Result<(), AppError>;

    /// Insert or overwrite an activity row keyed by activity ID.
    async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError>;

    /// Insert or overwrite a heart-rate zone row keyed by activity ID.
    async fn upsert_heart_rate_zones(&self, zones: &HeartRateZones) -> Result<(), AppError>;
}
