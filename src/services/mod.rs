//! Business logic services.

pub mod strava;
pub mod sync;

pub use strava::StravaClient;
pub use sync::SyncService;
