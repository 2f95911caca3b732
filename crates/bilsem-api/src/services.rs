//! Aggregation and listing services between the stores and the handlers.
//!
//! Read services never fail: when the backing store is unreachable (or no
//! database is configured at all) they return a typed fallback instead of
//! an error, so the presentation layer can always render something. The
//! [`Sourced`] wrapper records which of the two happened -- callers can
//! distinguish "genuinely empty" from "fetch failed" without changing the
//! payload shape.
//!
//! The write path is the exception: recording a game play surfaces
//! validation and backend errors to the client.

use bilsem_core::catalog::{self, CatalogItem};
use bilsem_core::leveling;
use bilsem_db::{GamePlayStore, ProfileStore};
use bilsem_types::{
    AdminUserSummary, DashboardStats, GameCategory, GameMetrics, GamePlayId, GamePlayRecord,
    GameSummary, LevelInfo, NewGamePlay,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Typed fallback wrapper
// ---------------------------------------------------------------------------

/// A service result carrying its provenance.
///
/// `Live` values came from the database; `Fallback` values were
/// substituted because the store was unreachable or no database is
/// configured. Both carry a fully usable payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sourced<T> {
    /// Fetched from the backing store.
    Live(T),
    /// Substituted safe default; the store could not be queried.
    Fallback(T),
}

impl<T> Sourced<T> {
    /// Borrow the payload regardless of provenance.
    pub const fn value(&self) -> &T {
        match self {
            Self::Live(value) | Self::Fallback(value) => value,
        }
    }

    /// Consume the wrapper and return the payload.
    pub fn into_inner(self) -> T {
        match self {
            Self::Live(value) | Self::Fallback(value) => value,
        }
    }

    /// Whether this value is a substituted fallback.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

// ---------------------------------------------------------------------------
// Dashboard statistics
// ---------------------------------------------------------------------------

/// Produce the dashboard aggregate.
///
/// Fans out the two independent store calls concurrently and joins on
/// both. If either fails after exhausting retries, the whole aggregate
/// falls back to all zeros -- a clearly empty state is preferred over a
/// misleading partial one. Never errors.
pub async fn dashboard_stats(state: &AppState) -> Sourced<DashboardStats> {
    let Some(db) = &state.db else {
        return Sourced::Fallback(DashboardStats::default());
    };

    let profiles = ProfileStore::new(db.pool(), state.retry);
    let plays = GamePlayStore::new(db.pool(), state.retry);

    let (profile_stats, overview) = tokio::join!(profiles.stats(), plays.overview());

    match (profile_stats, overview) {
        (Ok(users), Ok(games)) => Sourced::Live(DashboardStats {
            user_count: non_negative(users.user_count),
            active_user_count: non_negative(users.active_user_count),
            active_games: non_negative(games.active_games),
            todays_sessions: non_negative(games.todays_sessions),
        }),
        (profile_stats, overview) => {
            if let Err(error) = profile_stats {
                tracing::warn!(%error, "Profile stats fetch failed, serving zeroed dashboard");
            }
            if let Err(error) = overview {
                tracing::warn!(%error, "Game-play overview fetch failed, serving zeroed dashboard");
            }
            Sourced::Fallback(DashboardStats::default())
        }
    }
}

// ---------------------------------------------------------------------------
// Admin listings
// ---------------------------------------------------------------------------

/// List users with play aggregates for the admin table.
///
/// Returns an empty fallback listing when the store is unreachable.
pub async fn list_admin_users(
    state: &AppState,
    limit: Option<i64>,
) -> Sourced<Vec<AdminUserSummary>> {
    let Some(db) = &state.db else {
        return Sourced::Fallback(Vec::new());
    };

    let store = ProfileStore::new(db.pool(), state.retry);
    match store.list_admin(limit).await {
        Ok(users) => Sourced::Live(users),
        Err(error) => {
            tracing::warn!(%error, "Admin user listing failed, serving empty listing");
            Sourced::Fallback(Vec::new())
        }
    }
}

/// List recent game plays, optionally filtered to one user.
///
/// Returns an empty fallback listing when the store is unreachable.
pub async fn list_admin_game_plays(
    state: &AppState,
    limit: Option<i64>,
    user_id: Option<Uuid>,
) -> Sourced<Vec<GamePlayRecord>> {
    let Some(db) = &state.db else {
        return Sourced::Fallback(Vec::new());
    };

    let store = GamePlayStore::new(db.pool(), state.retry);
    let result = match user_id {
        Some(user_id) => store.list_for_user(user_id, limit).await,
        None => store.list_recent(limit).await,
    };

    match result {
        Ok(plays) => Sourced::Live(plays),
        Err(error) => {
            tracing::warn!(%error, "Admin game-play listing failed, serving empty listing");
            Sourced::Fallback(Vec::new())
        }
    }
}

// ---------------------------------------------------------------------------
// Profile leveling
// ---------------------------------------------------------------------------

/// Compute level information for one profile's experience total.
///
/// `None` means the profile does not exist (or could not be fetched --
/// the fallback variant records which).
pub async fn profile_level(state: &AppState, user_id: Uuid) -> Sourced<Option<LevelInfo>> {
    let Some(db) = &state.db else {
        return Sourced::Fallback(None);
    };

    let store = ProfileStore::new(db.pool(), state.retry);
    match store.get(user_id).await {
        Ok(Some(profile)) => Sourced::Live(Some(leveling::level_info(profile.experience))),
        Ok(None) => Sourced::Live(None),
        Err(error) => {
            tracing::warn!(%error, %user_id, "Profile fetch failed, level unavailable");
            Sourced::Fallback(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

/// List games with live metrics, falling back to the catalog seed.
///
/// An empty metrics result is not a failure: it means no plays are
/// recorded yet, and the seed listing is served as a live value.
pub async fn list_games(state: &AppState) -> Sourced<Vec<GameSummary>> {
    let Some(db) = &state.db else {
        return Sourced::Fallback(catalog::seed_summaries());
    };

    let store = GamePlayStore::new(db.pool(), state.retry);
    match store.list_metrics(None).await {
        Ok(metrics) if metrics.is_empty() => Sourced::Live(catalog::seed_summaries()),
        Ok(metrics) => Sourced::Live(metrics.into_iter().map(summary_from_metrics).collect()),
        Err(error) => {
            tracing::warn!(%error, "Game metrics fetch failed, serving catalog seed");
            Sourced::Fallback(catalog::seed_summaries())
        }
    }
}

/// Fetch one game's summary by slug.
///
/// Prefers live metrics; falls back to the catalog entry. `None` means
/// the slug is unknown to both the database and the catalog.
pub async fn game_by_id(state: &AppState, game_id: &str) -> Sourced<Option<GameSummary>> {
    let from_catalog = || catalog::catalog_item(game_id).map(catalog::summary_from_catalog);

    let Some(db) = &state.db else {
        return Sourced::Fallback(from_catalog());
    };

    let store = GamePlayStore::new(db.pool(), state.retry);
    match store.metrics_for_game(game_id).await {
        Ok(Some(metrics)) => Sourced::Live(Some(summary_from_metrics(metrics))),
        Ok(None) => Sourced::Live(from_catalog()),
        Err(error) => {
            tracing::warn!(%error, game_id, "Game metric fetch failed, serving catalog entry");
            Sourced::Fallback(from_catalog())
        }
    }
}

// ---------------------------------------------------------------------------
// Game-play submission (write path)
// ---------------------------------------------------------------------------

/// Record a completed game play.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] in demo mode and
/// [`ApiError::Database`] when the insert fails after retries.
pub async fn record_game_play(
    state: &AppState,
    input: &NewGamePlay,
) -> Result<GamePlayId, ApiError> {
    let Some(db) = &state.db else {
        return Err(ApiError::Unavailable(String::from(
            "no database configured; game plays cannot be recorded in demo mode",
        )));
    };

    let store = GamePlayStore::new(db.pool(), state.retry);
    let id = store.insert(input).await?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Clamp a database count to the non-negative domain type.
fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Merge live metrics with the catalog entry for display.
fn summary_from_metrics(metrics: GameMetrics) -> GameSummary {
    let item: Option<&CatalogItem> = catalog::catalog_item(&metrics.game_id);
    GameSummary {
        title: item.map_or_else(
            || catalog::display_title(&metrics.game_id),
            |item| item.title.to_owned(),
        ),
        category: item.map_or(GameCategory::Logic, |item| item.category),
        duration_seconds: item.map_or_else(
            || u32::try_from(metrics.avg_duration_seconds.max(0)).unwrap_or(0),
            |item| item.duration_seconds,
        ),
        id: metrics.game_id,
        plays_count: Some(metrics.plays_count),
        best_score: Some(metrics.best_score),
        avg_score: Some(metrics.avg_score),
        avg_duration_seconds: Some(metrics.avg_duration_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_dashboard_is_zeroed_fallback() {
        let state = AppState::demo();
        let stats = dashboard_stats(&state).await;
        assert!(stats.is_fallback());
        assert_eq!(*stats.value(), DashboardStats::default());
    }

    #[tokio::test]
    async fn demo_listings_are_empty_fallbacks() {
        let state = AppState::demo();

        let users = list_admin_users(&state, Some(10)).await;
        assert!(users.is_fallback());
        assert!(users.value().is_empty());

        let plays = list_admin_game_plays(&state, Some(10), None).await;
        assert!(plays.is_fallback());
        assert!(plays.value().is_empty());
    }

    #[tokio::test]
    async fn demo_games_serve_catalog_seed() {
        let state = AppState::demo();
        let games = list_games(&state).await;
        assert!(games.is_fallback());
        assert_eq!(games.value().len(), bilsem_core::GAME_CATALOG.len());

        let game = game_by_id(&state, "labirent").await;
        let found = game.into_inner();
        assert_eq!(found.map(|g| g.title), Some(String::from("Labirent")));

        let missing = game_by_id(&state, "no-such-game").await;
        assert!(missing.into_inner().is_none());
    }

    #[tokio::test]
    async fn demo_rejects_writes() {
        let state = AppState::demo();
        let input = NewGamePlay {
            user_id: None,
            game_id: String::from("labirent"),
            score_achieved: 10,
            duration_seconds: 60,
            lives_remaining: None,
            workshop_type: None,
            intelligence_type: None,
            metadata: None,
        };
        let result = record_game_play(&state, &input).await;
        assert!(matches!(result, Err(ApiError::Unavailable(_))));
    }

    #[test]
    fn metrics_merge_prefers_catalog_title() {
        let summary = summary_from_metrics(GameMetrics {
            game_id: String::from("labirent"),
            plays_count: 12,
            avg_score: 55,
            best_score: 97,
            avg_duration_seconds: 140,
        });
        assert_eq!(summary.title, "Labirent");
        assert_eq!(summary.duration_seconds, 180);
        assert_eq!(summary.plays_count, Some(12));
    }

    #[test]
    fn metrics_merge_derives_title_for_unknown_slug() {
        let summary = summary_from_metrics(GameMetrics {
            game_id: String::from("renk-avi"),
            plays_count: 1,
            avg_score: 10,
            best_score: 10,
            avg_duration_seconds: 30,
        });
        assert_eq!(summary.title, "Renk Avi");
        assert_eq!(summary.category, GameCategory::Logic);
        assert_eq!(summary.duration_seconds, 30);
    }
}
