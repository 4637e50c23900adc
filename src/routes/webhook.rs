// SPDX-License-Identifier: MIT

//! Webhook routes for Strava events.

use crate::error::Result;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook", get(verify).post(handle_event))
}

/// Strava webhook verification query params.
///
/// Fields default to empty so a missing parameter fails the token check
/// (403) instead of failing extraction.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    mode: String,
    #[serde(rename = "hub.challenge", default)]
    challenge: String,
    #[serde(rename = "hub.verify_token", default)]
    verify_token: String,
}

/// Verification response echoing the challenge.
#[derive(Serialize)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge")]
    challenge: String,
}

/// Verify webhook subscription (GET).
///
/// This path never touches the store, even for garbage input.
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    if params.mode == "subscribe" && params.verify_token == state.config.webhook_verify_token {
        tracing::info!("Webhook subscription verified");
        (
            StatusCode::OK,
            Json(VerifyResponse {
                challenge: params.challenge,
            })
            .into_response(),
        )
    } else {
        tracing::warn!(mode = %params.mode, "Webhook verification failed: invalid token");
        (StatusCode::FORBIDDEN, "Forbidden".into_response())
    }
}

/// Strava webhook event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    object_type: String, // "activity" or "athlete"
    object_id: i64,
    aspect_type: String, // "create", "update", "delete"
    owner_id: i64,
    #[serde(default)]
    subscription_id: i64,
    #[serde(default)]
    event_time: i64,
}

/// Handle incoming webhook events (POST).
///
/// Always acks 200 once processing has been attempted: Strava retries on
/// non-2xx, and redelivery cannot fix a missing athlete or a bad
/// credential, so absorbing failures avoids retry storms. The body is
/// taken raw rather than through the `Json` extractor so malformed JSON
/// and a missing content-type header also land in the ack path instead
/// of bouncing with a 4xx.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode> {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return Ok(StatusCode::OK); // Still 200 to Strava to avoid retries
        }
    };

    tracing::info!(
        object_type = %event.object_type,
        object_id = event.object_id,
        aspect_type = %event.aspect_type,
        owner_id = event.owner_id,
        subscription_id = event.subscription_id,
        event_time = event.event_time,
        "Webhook event received"
    );

    match (event.object_type.as_str(), event.aspect_type.as_str()) {
        ("activity", "create") | ("activity", "update") => {
            if let Err(e) = state.sync.sync_activity(event.owner_id, event.object_id).await {
                tracing::error!(
                    error = %e,
                    activity_id = event.object_id,
                    athlete_id = event.owner_id,
                    "Failed to sync activity"
                );
            }
        }
        _ => {
            // Delete events and athlete events are acknowledged and dropped.
            tracing::debug!(
                object_type = %event.object_type,
                aspect_type = %event.aspect_type,
                "Ignoring unhandled event type"
            );
        }
    }

    Ok(StatusCode::OK)
}
