// SPDX-License-Identifier: MIT

//! Supabase store backed by the PostgREST API.
//!
//! Upserts use `on_conflict` plus `Prefer: resolution=merge-duplicates`,
//! matching the semantics of the Supabase client libraries: a conflicting
//! primary key overwrites the existing row.

use crate::db::{tables, Store};
use crate::error::AppError;
use crate::models::{Activity, Athlete, HeartRateZones, TokenUpdate};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Supabase (PostgREST) database client.
#[derive(Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    /// Create a new store client for a Supabase project.
    ///
    /// `base_url` is the project URL without a trailing slash; the
    /// service-role key is sent as both `apikey` and bearer token.
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            service_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Fetch rows matching an `id = eq.{id}` filter.
    async fn select_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: i64,
    ) -> Result<Vec<T>, AppError> {
        let response = self
            .http
            .get(self.table_url(table))
            .query(&[("id", format!("eq.{}", id)), ("limit", "1".to_string())])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Insert-or-overwrite a row keyed by `conflict_column`.
    async fn upsert<T: Serialize>(
        &self,
        table: &str,
        conflict_column: &str,
        row: &T,
    ) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.table_url(table))
            .query(&[("on_conflict", conflict_column)])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(row)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.check_response(response).await
    }

    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Database(format!("HTTP {}: {}", status, body)))
    }

    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!("HTTP {}: {}", status, body)));
        }
        response
            .json()
            .await
            .map_err(|e| AppError::Database(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn get_athlete(&self, athlete_id: i64) -> Result<Option<Athlete>, AppError> {
        let mut rows: Vec<Athlete> = self.select_by_id(tables::ATHLETES, athlete_id).await?;
        Ok(rows.pop())
    }

    async fn update_athlete_tokens(
        &self,
        athlete_id: i64,
        tokens: &TokenUpdate,
    ) -> Result<(), AppError> {
        let response = self
            .http
            .patch(self.table_url(tables::ATHLETES))
            .query(&[("id", format!("eq.{}", athlete_id))])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(tokens)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.check_response(response).await
    }

    async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.upsert(tables::ACTIVITIES, "id", activity).await
    }

    async fn upsert_heart_rate_zones(&self, zones: &HeartRateZones) -> Result<(), AppError> {
        self.upsert(tables::HEART_RATE_ZONES, "activity_id", zones)
            .await
    }
}
