//! Axum router construction for the API server.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the API server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/health` -- liveness + database reachability
/// - `GET /api/dashboard/stats` -- aggregated dashboard statistics
/// - `GET /api/admin/users` -- admin user listing
/// - `GET /api/admin/game-plays` -- admin play listing
/// - `GET /api/profiles/{id}/level` -- level info for one profile
/// - `GET /api/games` -- game summaries
/// - `GET /api/games/{id}` -- single game summary
/// - `POST /api/game-plays` -- record a completed play
/// - `GET /auth/callback` -- post-auth redirect
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/health", get(handlers::health))
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        .route("/api/admin/users", get(handlers::list_admin_users))
        .route("/api/admin/game-plays", get(handlers::list_admin_game_plays))
        .route("/api/profiles/{id}/level", get(handlers::get_profile_level))
        .route("/api/games", get(handlers::list_games))
        .route("/api/games/{id}", get(handlers::get_game))
        .route("/api/game-plays", post(handlers::create_game_play))
        // Auth redirect
        .route("/auth/callback", get(handlers::auth_callback))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
