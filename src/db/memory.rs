// SPDX-License-Identifier: MIT

//! In-memory store for offline use and tests.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Activity, Athlete, HeartRateZones, TokenUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    athletes: HashMap<i64, Athlete>,
    activities: HashMap<i64, Activity>,
    zones: HashMap<i64, HeartRateZones>,
    athlete_reads: usize,
}

/// In-memory [`Store`] implementation.
///
/// Tests use the inspection helpers to assert which writes happened (and,
/// just as importantly, which did not).
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an athlete credential record.
    pub fn insert_athlete(&self, athlete: Athlete) {
        self.inner
            .lock()
            .unwrap()
            .athletes
            .insert(athlete.id, athlete);
    }

    pub fn athlete(&self, athlete_id: i64) -> Option<Athlete> {
        self.inner.lock().unwrap().athletes.get(&athlete_id).cloned()
    }

    pub fn activity(&self, activity_id: i64) -> Option<Activity> {
        self.inner
            .lock()
            .unwrap()
            .activities
            .get(&activity_id)
            .cloned()
    }

    pub fn activity_count(&self) -> usize {
        self.inner.lock().unwrap().activities.len()
    }

    pub fn zones(&self, activity_id: i64) -> Option<HeartRateZones> {
        self.inner.lock().unwrap().zones.get(&activity_id).cloned()
    }

    /// How many athlete lookups have been made.
    pub fn athlete_reads(&self) -> usize {
        self.inner.lock().unwrap().athlete_reads
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_athlete(&self, athlete_id: i64) -> Result<Option<Athlete>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.athlete_reads += 1;
        Ok(inner.athletes.get(&athlete_id).cloned())
    }

    async fn update_athlete_tokens(
        &self,
        athlete_id: i64,
        tokens: &TokenUpdate,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let athlete = inner
            .athletes
            .get_mut(&athlete_id)
            .ok_or_else(|| AppError::NotFound(format!("Athlete {}", athlete_id)))?;
        athlete.access_token = tokens.access_token.clone();
        athlete.refresh_token = tokens.refresh_token.clone();
        athlete.expires_at = tokens.expires_at;
        Ok(())
    }

    async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .activities
            .insert(activity.id, activity.clone());
        Ok(())
    }

    async fn upsert_heart_rate_zones(&self, zones: &HeartRateZones) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .zones
            .insert(zones.activity_id, zones.clone());
        Ok(())
    }
}
