// SPDX-License-Identifier: MIT

//! End-to-end pipeline tests with a mock Strava API.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{create_test_app, fresh_athlete, stale_athlete};

/// Deliver an activity create event for athlete 42 / activity 555.
async fn deliver_create_event(app: axum::Router) -> StatusCode {
    let event = json!({
        "object_type": "activity",
        "aspect_type": "create",
        "object_id": 555,
        "owner_id": 42,
        "subscription_id": 1,
        "event_time": 1234567890
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&event).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

fn ride_detail() -> serde_json::Value {
    json!({
        "id": 555,
        "name": "Ride",
        "sport_type": "Ride",
        "start_date_local": "2026-08-29T07:00:00",
        "distance": "1000.5",
        "moving_time": 120,
        "elapsed_time": 150,
        "total_elevation_gain": 12.5,
        "average_speed": 8.3,
        "max_speed": 14.1,
        "average_heartrate": 141.2,
        "max_heartrate": 175.0,
        "has_heartrate": true
    })
}

fn heartrate_zones() -> serde_json::Value {
    json!([
        {
            "type": "heartrate",
            "distribution_buckets": [
                {"min": 0, "max": 120, "time": 10},
                {"min": 120, "max": 140, "time": 20},
                {"min": 140, "max": 160, "time": 30},
                {"min": 160, "max": 180, "time": 0},
                {"min": 180, "max": 220, "time": 0}
            ]
        }
    ])
}

#[tokio::test]
async fn test_create_event_end_to_end() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .and(header("Authorization", "Bearer fresh_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ride_detail()))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heartrate_zones()))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    let status = deliver_create_event(app).await;
    assert_eq!(status, StatusCode::OK);

    let activity = store.activity(555).expect("activity row written");
    assert_eq!(activity.athlete_id, 42);
    assert_eq!(activity.name, "Ride");
    // String-typed distance coerces to a float
    assert_eq!(activity.distance, 1000.5);
    assert_eq!(activity.moving_time, 120);
    assert_eq!(activity.elapsed_time, 150);
    assert_eq!(activity.average_heartrate, Some(141.2));
    assert_eq!(activity.average_watts, None);

    let zones = store.zones(555).expect("heart rate zones written");
    assert_eq!(zones.zone_1_time, 10);
    assert_eq!(zones.zone_2_time, 20);
    assert_eq!(zones.zone_3_time, 30);
    assert_eq!(zones.zone_4_time, 0);
    assert_eq!(zones.zone_5_time, 0);
}

#[tokio::test]
async fn test_redelivery_is_idempotent() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ride_detail()))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heartrate_zones()))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    assert_eq!(deliver_create_event(app.clone()).await, StatusCode::OK);
    assert_eq!(deliver_create_event(app).await, StatusCode::OK);

    // Second delivery overwrote, did not duplicate
    assert_eq!(store.activity_count(), 1);
}

#[tokio::test]
async fn test_stale_token_is_refreshed_before_fetch() {
    let strava = MockServer::start().await;

    let new_expiry = chrono::Utc::now().timestamp() + 21600;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh_token_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new_access_token",
            "refresh_token": "refresh_token_2",
            "expires_at": new_expiry
        })))
        .expect(1)
        .mount(&strava)
        .await;

    // The activity fetch must use the refreshed token
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .and(header("Authorization", "Bearer new_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ride_detail()))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heartrate_zones()))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(stale_athlete(42));

    assert_eq!(deliver_create_event(app).await, StatusCode::OK);

    // The whole token triple was replaced
    let athlete = store.athlete(42).unwrap();
    assert_eq!(athlete.access_token, "new_access_token");
    assert_eq!(athlete.refresh_token, "refresh_token_2");
    assert_eq!(athlete.expires_at, new_expiry);

    assert!(store.activity(555).is_some());
}

#[tokio::test]
async fn test_fresh_token_skips_refresh() {
    let strava = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .and(header("Authorization", "Bearer fresh_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ride_detail()))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heartrate_zones()))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    assert_eq!(deliver_create_event(app).await, StatusCode::OK);
    assert!(store.activity(555).is_some());
}

#[tokio::test]
async fn test_refresh_failure_abandons_event() {
    let strava = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Bad Request",
            "errors": [{"resource": "RefreshToken", "code": "invalid"}]
        })))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(stale_athlete(42));

    // Still acked, but nothing was fetched or written
    assert_eq!(deliver_create_event(app).await, StatusCode::OK);
    assert_eq!(store.activity_count(), 0);

    // The old credentials are untouched
    let athlete = store.athlete(42).unwrap();
    assert_eq!(athlete.access_token, "stale_access_token");
    assert_eq!(athlete.refresh_token, "refresh_token_1");
}

#[tokio::test]
async fn test_activity_fetch_failure_writes_nothing() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Record Not Found"
        })))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    assert_eq!(deliver_create_event(app).await, StatusCode::OK);
    assert_eq!(store.activity_count(), 0);
    assert!(store.zones(555).is_none());
}

#[tokio::test]
async fn test_zone_fetch_failure_keeps_activity() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ride_detail()))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    assert_eq!(deliver_create_event(app).await, StatusCode::OK);

    // The activity upsert is not undone by the zone failure
    assert!(store.activity(555).is_some());
    assert!(store.zones(555).is_none());
}

#[tokio::test]
async fn test_no_heartrate_skips_zone_fetch() {
    let strava = MockServer::start().await;

    let mut detail = ride_detail();
    detail["has_heartrate"] = json!(false);
    detail["average_heartrate"] = json!(null);
    detail["max_heartrate"] = json!(null);

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heartrate_zones()))
        .expect(0)
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    assert_eq!(deliver_create_event(app).await, StatusCode::OK);
    assert!(store.activity(555).is_some());
    assert!(store.zones(555).is_none());
}

#[tokio::test]
async fn test_power_only_zones_write_no_row() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ride_detail()))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "power", "distribution_buckets": [{"time": 60}]}
        ])))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    assert_eq!(deliver_create_event(app).await, StatusCode::OK);
    assert!(store.activity(555).is_some());
    assert!(store.zones(555).is_none());
}

#[tokio::test]
async fn test_update_event_overwrites_row() {
    let strava = MockServer::start().await;

    let mut renamed = ride_detail();
    renamed["name"] = json!("Morning Ride (renamed)");

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(renamed))
        .mount(&strava)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/555/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heartrate_zones()))
        .mount(&strava)
        .await;

    let (app, store) = create_test_app(&strava.uri());
    store.insert_athlete(fresh_athlete(42));

    let event = json!({
        "object_type": "activity",
        "aspect_type": "update",
        "object_id": 555,
        "owner_id": 42,
        "subscription_id": 1,
        "event_time": 1234567890
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&event).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.activity(555).unwrap().name, "Morning Ride (renamed)");
}
