//! Profile store operations for user listings and dashboard counts.
//!
//! Profiles are created by the auth signup flow, which is external to this
//! backend; every operation here is read-only. All queries run through the
//! retry wrapper in [`crate::retry`].

use bilsem_types::{AdminUserSummary, ProfileSummary, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;
use crate::retry::{with_retries, RetryConfig};

/// Default listing limit.
const DEFAULT_LIMIT: i64 = 25;

/// Read operations on the `profiles` table.
pub struct ProfileStore<'a> {
    pool: &'a PgPool,
    retry: RetryConfig,
}

impl<'a> ProfileStore<'a> {
    /// Create a new profile store bound to a connection pool.
    pub const fn new(pool: &'a PgPool, retry: RetryConfig) -> Self {
        Self { pool, retry }
    }

    /// List profiles, most recent signups first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<ProfileSummary>, DbError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let rows = with_retries(&self.retry, || {
            sqlx::query_as::<_, ProfileRow>(
                r"SELECT
                      p.id,
                      p.email,
                      p.full_name,
                      p.name,
                      p.role,
                      COALESCE(p.experience, 0)::BIGINT AS experience,
                      COALESCE(p.is_active, TRUE) AS is_active,
                      p.created_at
                  FROM profiles p
                  ORDER BY p.created_at DESC
                  LIMIT $1",
            )
            .bind(limit)
            .fetch_all(self.pool)
        })
        .await?;

        Ok(rows.into_iter().map(ProfileSummary::from).collect())
    }

    /// Fetch a single profile by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn get(&self, user_id: Uuid) -> Result<Option<ProfileSummary>, DbError> {
        let row = with_retries(&self.retry, || {
            sqlx::query_as::<_, ProfileRow>(
                r"SELECT
                      p.id,
                      p.email,
                      p.full_name,
                      p.name,
                      p.role,
                      COALESCE(p.experience, 0)::BIGINT AS experience,
                      COALESCE(p.is_active, TRUE) AS is_active,
                      p.created_at
                  FROM profiles p
                  WHERE p.id = $1
                  LIMIT 1",
            )
            .bind(user_id)
            .fetch_optional(self.pool)
        })
        .await?;

        Ok(row.map(ProfileSummary::from))
    }

    /// List profiles with per-user play aggregates for the admin table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn list_admin(&self, limit: Option<i64>) -> Result<Vec<AdminUserSummary>, DbError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let rows = with_retries(&self.retry, || {
            sqlx::query_as::<_, AdminProfileRow>(
                r"SELECT
                      p.id,
                      p.email,
                      p.full_name,
                      p.name,
                      p.role,
                      COALESCE(p.experience, 0)::BIGINT AS experience,
                      COALESCE(p.is_active, TRUE) AS is_active,
                      p.created_at,
                      COUNT(gp.id)::BIGINT AS game_play_count,
                      COALESCE(MAX(gp.score_achieved), 0)::BIGINT AS best_score,
                      MAX(gp.created_at) AS last_play_at
                  FROM profiles p
                  LEFT JOIN game_plays gp ON gp.user_id = p.id
                  GROUP BY p.id
                  ORDER BY p.created_at DESC
                  LIMIT $1",
            )
            .bind(limit)
            .fetch_all(self.pool)
        })
        .await?;

        Ok(rows.into_iter().map(AdminUserSummary::from).collect())
    }

    /// Count total and active users for the dashboard aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails after retries.
    pub async fn stats(&self) -> Result<ProfileStatsRow, DbError> {
        with_retries(&self.retry, || {
            sqlx::query_as::<_, ProfileStatsRow>(
                r"SELECT
                      COUNT(*)::BIGINT AS user_count,
                      COUNT(*) FILTER (WHERE COALESCE(is_active, TRUE))::BIGINT AS active_user_count
                  FROM profiles",
            )
            .fetch_one(self.pool)
        })
        .await
    }
}

/// A row from the `profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    /// Profile ID.
    pub id: Uuid,
    /// Contact e-mail.
    pub email: String,
    /// Full legal name, when provided.
    pub full_name: Option<String>,
    /// Display name.
    pub name: String,
    /// Role as stored text.
    pub role: String,
    /// Accumulated experience points.
    pub experience: i64,
    /// Whether the account is active.
    pub is_active: bool,
    /// Signup timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProfileRow> for ProfileSummary {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            full_name: row.full_name,
            name: row.name,
            role: UserRole::from_db(&row.role),
            experience: row.experience,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// A profile row joined with play aggregates for the admin listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminProfileRow {
    /// The profile columns.
    #[sqlx(flatten)]
    pub profile: ProfileRow,
    /// Number of recorded plays for this user.
    pub game_play_count: i64,
    /// Best recorded score (0 when the user never played).
    pub best_score: i64,
    /// Timestamp of the most recent play.
    pub last_play_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<AdminProfileRow> for AdminUserSummary {
    fn from(row: AdminProfileRow) -> Self {
        Self {
            profile: row.profile.into(),
            game_play_count: row.game_play_count,
            best_score: row.best_score,
            last_play_at: row.last_play_at,
        }
    }
}

/// Aggregate user counts for the dashboard.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ProfileStatsRow {
    /// Total registered users.
    pub user_count: i64,
    /// Users whose accounts are active.
    pub active_user_count: i64,
}
