//! Game-play store operations: per-game metrics, admin listings, and the
//! play-submission insert.
//!
//! A game play is immutable once written. Metrics are aggregated on read;
//! nothing is cached or denormalized. All queries run through the retry
//! wrapper in [`crate::retry`].

use bilsem_types::{GameMetrics, GamePlayId, GamePlayRecord, NewGamePlay};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;
use crate::retry::{with_retries, RetryConfig};

/// Default listing limit for admin views.
const DEFAULT_LIMIT: i64 = 50;

/// Default limit for per-game metric listings.
const DEFAULT_METRICS_LIMIT: i64 = 100;

/// Columns selected by the admin listing queries.
const PLAY_COLUMNS: &str = r"gp.id,
    gp.user_id,
    gp.game_id,
    COALESCE(gp.score_achieved, 0) AS score_achieved,
    COALESCE(gp.duration_seconds, 0) AS duration_seconds,
    gp.lives_remaining,
    gp.workshop_type,
    gp.intelligence_type,
    gp.created_at,
    p.email AS user_email,
    COALESCE(p.full_name, p.name) AS user_name";

/// Operations on the `game_plays` table.
pub struct GamePlayStore<'a> {
    pool: &'a PgPool,
    retry: RetryConfig,
}

impl<'a> GamePlayStore<'a> {
    /// Create a new game-play store bound to a connection pool.
    pub const fn new(pool: &'a PgPool, retry: RetryConfig) -> Self {
        Self { pool, retry }
    }

    /// Aggregate play metrics per game, most played first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn list_metrics(&self, limit: Option<i64>) -> Result<Vec<GameMetrics>, DbError> {
        let limit = limit.unwrap_or(DEFAULT_METRICS_LIMIT);
        let rows = with_retries(&self.retry, || {
            sqlx::query_as::<_, GameMetricsRow>(
                r"SELECT
                      gp.game_id,
                      COUNT(*)::BIGINT AS plays_count,
                      COALESCE(ROUND(AVG(gp.score_achieved)), 0)::BIGINT AS avg_score,
                      COALESCE(MAX(gp.score_achieved), 0)::BIGINT AS best_score,
                      COALESCE(ROUND(AVG(gp.duration_seconds)), 0)::BIGINT AS avg_duration_seconds
                  FROM game_plays gp
                  GROUP BY gp.game_id
                  ORDER BY plays_count DESC, game_id ASC
                  LIMIT $1",
            )
            .bind(limit)
            .fetch_all(self.pool)
        })
        .await?;

        Ok(rows.into_iter().map(GameMetrics::from).collect())
    }

    /// Aggregate play metrics for a single game.
    ///
    /// Returns `None` when the game has no recorded plays.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn metrics_for_game(&self, game_id: &str) -> Result<Option<GameMetrics>, DbError> {
        let row = with_retries(&self.retry, || {
            sqlx::query_as::<_, GameMetricsRow>(
                r"SELECT
                      gp.game_id,
                      COUNT(*)::BIGINT AS plays_count,
                      COALESCE(ROUND(AVG(gp.score_achieved)), 0)::BIGINT AS avg_score,
                      COALESCE(MAX(gp.score_achieved), 0)::BIGINT AS best_score,
                      COALESCE(ROUND(AVG(gp.duration_seconds)), 0)::BIGINT AS avg_duration_seconds
                  FROM game_plays gp
                  WHERE gp.game_id = $1
                  GROUP BY gp.game_id
                  LIMIT 1",
            )
            .bind(game_id)
            .fetch_optional(self.pool)
        })
        .await?;

        Ok(row.map(GameMetrics::from))
    }

    /// List recent plays across all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<GamePlayRecord>, DbError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let sql = format!(
            r"SELECT {PLAY_COLUMNS}
              FROM game_plays gp
              LEFT JOIN profiles p ON p.id = gp.user_id
              ORDER BY gp.created_at DESC
              LIMIT $1"
        );
        let rows = with_retries(&self.retry, || {
            sqlx::query_as::<_, GamePlayRow>(&sql)
                .bind(limit)
                .fetch_all(self.pool)
        })
        .await?;

        Ok(rows.into_iter().map(GamePlayRecord::from).collect())
    }

    /// List plays for a single user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<GamePlayRecord>, DbError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let sql = format!(
            r"SELECT {PLAY_COLUMNS}
              FROM game_plays gp
              LEFT JOIN profiles p ON p.id = gp.user_id
              WHERE gp.user_id = $1
              ORDER BY gp.created_at DESC
              LIMIT $2"
        );
        let rows = with_retries(&self.retry, || {
            sqlx::query_as::<_, GamePlayRow>(&sql)
                .bind(user_id)
                .bind(limit)
                .fetch_all(self.pool)
        })
        .await?;

        Ok(rows.into_iter().map(GamePlayRecord::from).collect())
    }

    /// Count distinct played games and today's sessions for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn overview(&self) -> Result<GamePlayOverviewRow, DbError> {
        with_retries(&self.retry, || {
            sqlx::query_as::<_, GamePlayOverviewRow>(
                r"SELECT
                      COUNT(DISTINCT gp.game_id)::BIGINT AS active_games,
                      COUNT(*) FILTER (WHERE gp.created_at::date = CURRENT_DATE)::BIGINT AS todays_sessions
                  FROM game_plays gp",
            )
            .fetch_one(self.pool)
        })
        .await
    }

    /// Insert a new play and return its generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails after retries.
    pub async fn insert(&self, input: &NewGamePlay) -> Result<GamePlayId, DbError> {
        let metadata = input
            .metadata
            .clone()
            .unwrap_or_else(|| serde_json::json!({}));
        let id = with_retries(&self.retry, || {
            sqlx::query_scalar::<_, Uuid>(
                r"INSERT INTO game_plays (
                      user_id,
                      game_id,
                      score_achieved,
                      duration_seconds,
                      lives_remaining,
                      metadata,
                      workshop_type,
                      intelligence_type
                  )
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                  RETURNING id",
            )
            .bind(input.user_id.map(bilsem_types::ProfileId::into_inner))
            .bind(&input.game_id)
            .bind(input.score_achieved)
            .bind(input.duration_seconds)
            .bind(input.lives_remaining)
            .bind(&metadata)
            .bind(&input.workshop_type)
            .bind(&input.intelligence_type)
            .fetch_one(self.pool)
        })
        .await?;

        tracing::debug!(game_id = input.game_id, play_id = %id, "Recorded game play");
        Ok(id.into())
    }
}

/// Aggregate metrics row for one game.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameMetricsRow {
    /// Catalog slug of the game.
    pub game_id: String,
    /// Number of recorded plays.
    pub plays_count: i64,
    /// Average score, rounded.
    pub avg_score: i64,
    /// Best score.
    pub best_score: i64,
    /// Average duration in seconds, rounded.
    pub avg_duration_seconds: i64,
}

impl From<GameMetricsRow> for GameMetrics {
    fn from(row: GameMetricsRow) -> Self {
        Self {
            game_id: row.game_id,
            plays_count: row.plays_count,
            avg_score: row.avg_score,
            best_score: row.best_score,
            avg_duration_seconds: row.avg_duration_seconds,
        }
    }
}

/// A row from the `game_plays` table joined with the player profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GamePlayRow {
    /// Play ID.
    pub id: Uuid,
    /// The player, when the session was authenticated.
    pub user_id: Option<Uuid>,
    /// Catalog slug of the game.
    pub game_id: String,
    /// Final score.
    pub score_achieved: i64,
    /// Duration in seconds.
    pub duration_seconds: i64,
    /// Lives remaining, for games that track lives.
    pub lives_remaining: Option<i32>,
    /// Workshop classification tag.
    pub workshop_type: Option<String>,
    /// Intelligence-type classification tag.
    pub intelligence_type: Option<String>,
    /// Submission timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Joined player e-mail.
    pub user_email: Option<String>,
    /// Joined player display name.
    pub user_name: Option<String>,
}

impl From<GamePlayRow> for GamePlayRecord {
    fn from(row: GamePlayRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.map(Into::into),
            game_id: row.game_id,
            score_achieved: row.score_achieved,
            duration_seconds: row.duration_seconds,
            lives_remaining: row.lives_remaining,
            workshop_type: row.workshop_type,
            intelligence_type: row.intelligence_type,
            user_email: row.user_email,
            user_name: row.user_name,
            created_at: row.created_at,
        }
    }
}

/// Aggregate counts for the dashboard overview.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct GamePlayOverviewRow {
    /// Distinct games with at least one recorded play.
    pub active_games: i64,
    /// Plays recorded today (server date).
    pub todays_sessions: i64,
}
