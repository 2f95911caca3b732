//! Integration tests for the API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. All tests run against demo-mode state (no
//! database), which exercises the fallback paths end to end: zeroed
//! dashboard stats, empty admin listings, catalog-seeded games, and
//! write rejection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use bilsem_api::router::build_router;
use bilsem_api::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

fn make_demo_router() -> axum::Router {
    build_router(Arc::new(AppState::demo()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let response = make_demo_router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_health_in_demo_mode() {
    let response = make_demo_router()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["database"], false);
    assert_eq!(json["demo_mode"], true);
}

#[tokio::test]
async fn test_dashboard_stats_fall_back_to_zeros() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/dashboard/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["degraded"], true);
    assert_eq!(json["stats"]["user_count"], 0);
    assert_eq!(json["stats"]["active_user_count"], 0);
    assert_eq!(json["stats"]["active_games"], 0);
    assert_eq!(json["stats"]["todays_sessions"], 0);
}

#[tokio::test]
async fn test_admin_users_empty_fallback() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/admin/users?limit=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["degraded"], true);
    assert!(json["users"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_game_plays_empty_fallback() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/admin/game-plays")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["degraded"], true);
}

#[tokio::test]
async fn test_admin_game_plays_filter_by_user() {
    let user_id = uuid::Uuid::now_v7();
    let path = format!("/api/admin/game-plays?user_id={user_id}&limit=3");
    let response = make_demo_router()
        .oneshot(Request::get(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_games_serve_catalog_seed() {
    let response = make_demo_router()
        .oneshot(Request::get("/api/games").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["degraded"], true);
    assert!(json["count"].as_u64().unwrap() > 0);
    // Seed entries carry no metrics.
    assert!(json["games"][0]["plays_count"].is_null());
}

#[tokio::test]
async fn test_profile_level_unknown_in_demo_mode() {
    let user_id = uuid::Uuid::now_v7();
    let path = format!("/api/profiles/{user_id}/level");
    let response = make_demo_router()
        .oneshot(Request::get(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_level_invalid_uuid_is_400() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/profiles/not-a-uuid/level")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_game_by_slug() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/games/labirent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["game"]["title"], "Labirent");
    assert_eq!(json["game"]["category"], "logic");
}

#[tokio::test]
async fn test_get_unknown_game_returns_404() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/games/no-such-game")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_create_game_play_rejected_in_demo_mode() {
    let body = serde_json::json!({
        "game_id": "labirent",
        "score_achieved": 80,
        "duration_seconds": 120,
    });
    let response = make_demo_router()
        .oneshot(
            Request::post("/api/game-plays")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_create_game_play_empty_game_id_is_400() {
    let body = serde_json::json!({
        "game_id": "",
        "score_achieved": 80,
        "duration_seconds": 120,
    });
    let response = make_demo_router()
        .oneshot(
            Request::post("/api/game-plays")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_create_game_play_negative_score_is_400() {
    let body = serde_json::json!({
        "game_id": "labirent",
        "score_achieved": -5,
        "duration_seconds": 120,
    });
    let response = make_demo_router()
        .oneshot(
            Request::post("/api/game-plays")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_callback_redirects_to_safe_path() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/auth/callback?next=/games")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/games");
}

#[tokio::test]
async fn test_auth_callback_blocks_external_url() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/auth/callback?next=https%3A%2F%2Fevil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/dashboard");
}

#[tokio::test]
async fn test_auth_callback_without_next_lands_on_dashboard() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/auth/callback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/dashboard");
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let response = make_demo_router()
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
