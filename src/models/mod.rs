//! Storage row types.

pub mod activity;
pub mod athlete;

pub use activity::{Activity, HeartRateZones};
pub use athlete::{Athlete, TokenUpdate};
