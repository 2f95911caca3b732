//! REST API endpoint handlers.
//!
//! Read endpoints serve through the fallback-aware services in
//! [`crate::services`] and always answer 200 with a `degraded` flag.
//! The submission endpoint is the write path and surfaces errors.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/health` | Liveness + database reachability |
//! | `GET` | `/api/dashboard/stats` | Aggregated dashboard statistics |
//! | `GET` | `/api/admin/users` | Admin user listing |
//! | `GET` | `/api/admin/game-plays` | Admin play listing |
//! | `GET` | `/api/profiles/{id}/level` | Level info for one profile |
//! | `GET` | `/api/games` | Game summaries (metrics or seed) |
//! | `GET` | `/api/games/{id}` | Single game summary |
//! | `POST` | `/api/game-plays` | Record a play (201 / 400 / 500) |
//! | `GET` | `/auth/callback` | Normalize `next` and redirect |

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use bilsem_core::redirect::normalize_next_path;
use bilsem_types::{NewGamePlay, ProfileId};

use crate::error::ApiError;
use crate::services;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter and request body structs
// ---------------------------------------------------------------------------

/// Query parameters for listing endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct ListQuery {
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
}

/// Query parameters for the admin game-play listing.
#[derive(Debug, serde::Deserialize)]
pub struct GamePlaysQuery {
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
    /// Restrict the listing to a single user.
    pub user_id: Option<Uuid>,
}

/// Query parameters for the auth callback redirect.
#[derive(Debug, serde::Deserialize)]
pub struct CallbackQuery {
    /// Requested post-auth landing path.
    pub next: Option<String>,
}

/// Request body for `POST /api/game-plays`.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct RecordGamePlayRequest {
    /// The player, when the session was authenticated.
    pub user_id: Option<Uuid>,
    /// Catalog slug of the game played.
    #[validate(length(min = 1, max = 64))]
    pub game_id: String,
    /// Final score achieved.
    #[validate(range(min = 0))]
    pub score_achieved: i64,
    /// Session duration in seconds.
    #[validate(range(min = 0, max = 86_400))]
    pub duration_seconds: i64,
    /// Lives remaining at the end.
    #[validate(range(min = 0))]
    pub lives_remaining: Option<i32>,
    /// Workshop classification tag.
    pub workshop_type: Option<String>,
    /// Intelligence-type classification tag.
    pub intelligence_type: Option<String>,
    /// Free-form metadata stored as JSONB.
    pub metadata: Option<serde_json::Value>,
}

impl From<RecordGamePlayRequest> for NewGamePlay {
    fn from(request: RecordGamePlayRequest) -> Self {
        Self {
            user_id: request.user_id.map(ProfileId::from),
            game_id: request.game_id,
            score_achieved: request.score_achieved,
            duration_seconds: request.duration_seconds,
            lives_remaining: request.lives_remaining,
            workshop_type: request.workshop_type,
            intelligence_type: request.intelligence_type,
            metadata: request.metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server mode and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mode = if state.is_demo() { "DEMO" } else { "LIVE" };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>BilsemC2 Backend</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        li.post::before {{ content: "POST "; color: #d2a8ff; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>BilsemC2 Backend</h1>
    <p class="subtitle">Dashboard statistics and game-play API</p>

    <p>Mode: <span class="status">{mode}</span></p>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/health">/api/health</a> -- Liveness and database reachability</li>
        <li><a href="/api/dashboard/stats">/api/dashboard/stats</a> -- Dashboard statistics</li>
        <li><a href="/api/admin/users">/api/admin/users</a> -- Admin user listing (?limit=N)</li>
        <li><a href="/api/admin/game-plays">/api/admin/game-plays</a> -- Admin play listing (?limit=N&amp;user_id=X)</li>
        <li><a href="/api/games">/api/games</a> -- Game summaries</li>
        <li><a href="/api/games/labirent">/api/games/:id</a> -- Single game summary</li>
        <li class="post">/api/game-plays -- Record a completed play</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/health -- liveness + database reachability
// ---------------------------------------------------------------------------

/// Report process liveness and database reachability.
///
/// `database` is `false` both in demo mode and when the ping fails.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match &state.db {
        Some(db) => db.ping().await,
        None => false,
    };

    Json(serde_json::json!({
        "ok": true,
        "database": database,
        "demo_mode": state.is_demo(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/dashboard/stats -- aggregated dashboard statistics
// ---------------------------------------------------------------------------

/// Return the dashboard aggregate.
///
/// Never fails: on backend unavailability the stats are all zeros and
/// `degraded` is `true`.
pub async fn dashboard_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = services::dashboard_stats(&state).await;

    Json(serde_json::json!({
        "stats": stats.value(),
        "degraded": stats.is_fallback(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/admin/users -- admin user listing
// ---------------------------------------------------------------------------

/// List users with play aggregates for the admin table.
pub async fn list_admin_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> impl IntoResponse {
    let users = services::list_admin_users(&state, params.limit).await;
    let degraded = users.is_fallback();
    let users = users.into_inner();

    Json(serde_json::json!({
        "count": users.len(),
        "users": users,
        "degraded": degraded,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/admin/game-plays -- admin play listing
// ---------------------------------------------------------------------------

/// List recent game plays, optionally for a single user.
pub async fn list_admin_game_plays(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GamePlaysQuery>,
) -> impl IntoResponse {
    let plays = services::list_admin_game_plays(&state, params.limit, params.user_id).await;
    let degraded = plays.is_fallback();
    let plays = plays.into_inner();

    Json(serde_json::json!({
        "count": plays.len(),
        "game_plays": plays,
        "degraded": degraded,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/profiles/{id}/level -- level info for one profile
// ---------------------------------------------------------------------------

/// Return level and progress information for one profile.
///
/// The level is derived from the profile's experience total via the
/// leveling formula; badge and title come from the same tier tables the
/// frontend renders.
pub async fn get_profile_level(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let level = services::profile_level(&state, user_id).await;
    let degraded = level.is_fallback();

    let info = level
        .into_inner()
        .ok_or_else(|| ApiError::NotFound(format!("profile {user_id}")))?;

    Ok(Json(serde_json::json!({
        "level": info,
        "badge": bilsem_core::leveling::level_badge(info.current_level),
        "title": bilsem_core::leveling::level_title(info.current_level),
        "degraded": degraded,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/games -- game summaries
// ---------------------------------------------------------------------------

/// List all games with live metrics or the catalog seed.
pub async fn list_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let games = services::list_games(&state).await;
    let degraded = games.is_fallback();
    let games = games.into_inner();

    Json(serde_json::json!({
        "count": games.len(),
        "games": games,
        "degraded": degraded,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/games/{id} -- single game summary
// ---------------------------------------------------------------------------

/// Return one game's summary by catalog slug.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = services::game_by_id(&state, &game_id).await;
    let degraded = game.is_fallback();

    let summary = game
        .into_inner()
        .ok_or_else(|| ApiError::NotFound(format!("game {game_id}")))?;

    Ok(Json(serde_json::json!({
        "game": summary,
        "degraded": degraded,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/game-plays -- record a completed play
// ---------------------------------------------------------------------------

/// Record a completed game play and return the created ID with 201.
///
/// This is the write path: validation failures answer 400, demo mode 503,
/// and backend failures 500 -- nothing is silently swallowed here.
pub async fn create_game_play(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecordGamePlayRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))?;

    let input = NewGamePlay::from(body);
    let id = services::record_game_play(&state, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id })),
    ))
}

// ---------------------------------------------------------------------------
// GET /auth/callback -- post-auth redirect
// ---------------------------------------------------------------------------

/// Normalize the requested landing path and redirect there.
///
/// External URLs and blocked internal prefixes land on the dashboard.
pub async fn auth_callback(Query(params): Query<CallbackQuery>) -> impl IntoResponse {
    let next = normalize_next_path(params.next.as_deref().unwrap_or_default());
    Redirect::to(&next)
}
