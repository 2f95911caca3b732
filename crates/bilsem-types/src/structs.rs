//! Core domain structs for the BilsemC2 platform.
//!
//! These are the plain data objects exchanged between the data layer, the
//! aggregation services, and the presentation layer. None of them carry
//! framework-specific types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GameCategory, UserRole};
use crate::ids::{GamePlayId, ProfileId};

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// A user profile as shown in listings.
///
/// Profiles are created on signup by the auth flow (external to this
/// backend) and are read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProfileSummary {
    /// Profile identifier.
    pub id: ProfileId,
    /// Contact e-mail address.
    pub email: String,
    /// Full legal name, when provided at signup.
    pub full_name: Option<String>,
    /// Display name.
    pub name: String,
    /// Platform role.
    pub role: UserRole,
    /// Accumulated experience points.
    pub experience: i64,
    /// Whether the account is currently active.
    pub is_active: bool,
    /// Signup timestamp.
    pub created_at: DateTime<Utc>,
}

/// A profile enriched with play aggregates for the admin user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AdminUserSummary {
    /// The underlying profile.
    #[serde(flatten)]
    pub profile: ProfileSummary,
    /// Total recorded game plays for this user.
    pub game_play_count: i64,
    /// Best score across all plays (0 when the user never played).
    pub best_score: i64,
    /// Timestamp of the most recent play, if any.
    pub last_play_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Game plays
// ---------------------------------------------------------------------------

/// A single completed game session.
///
/// Immutable once written. `user_id` is `None` for anonymous play. The
/// joined `user_email`/`user_name` fields are populated only by the admin
/// listing queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GamePlayRecord {
    /// Play identifier.
    pub id: GamePlayId,
    /// The player, when the session was authenticated.
    pub user_id: Option<ProfileId>,
    /// Catalog slug of the game played.
    pub game_id: String,
    /// Final score achieved.
    pub score_achieved: i64,
    /// Session duration in seconds.
    pub duration_seconds: i64,
    /// Lives remaining at the end, for games that track lives.
    pub lives_remaining: Option<i32>,
    /// Workshop classification tag, when the play came from a workshop.
    pub workshop_type: Option<String>,
    /// Intelligence-type classification tag.
    pub intelligence_type: Option<String>,
    /// Player e-mail (admin listings only).
    pub user_email: Option<String>,
    /// Player display name (admin listings only).
    pub user_name: Option<String>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for recording a new game play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewGamePlay {
    /// The player, when authenticated. `None` records anonymous play.
    pub user_id: Option<ProfileId>,
    /// Catalog slug of the game played.
    pub game_id: String,
    /// Final score achieved.
    pub score_achieved: i64,
    /// Session duration in seconds.
    pub duration_seconds: i64,
    /// Lives remaining at the end.
    pub lives_remaining: Option<i32>,
    /// Workshop classification tag.
    pub workshop_type: Option<String>,
    /// Intelligence-type classification tag.
    pub intelligence_type: Option<String>,
    /// Free-form metadata stored as JSONB.
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Game metrics and summaries
// ---------------------------------------------------------------------------

/// Per-game play aggregates computed from the `game_plays` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameMetrics {
    /// Catalog slug of the game.
    pub game_id: String,
    /// Number of recorded plays.
    pub plays_count: i64,
    /// Average score, rounded to the nearest integer.
    pub avg_score: i64,
    /// Best score across all plays.
    pub best_score: i64,
    /// Average duration in seconds, rounded.
    pub avg_duration_seconds: i64,
}

/// A display-ready game summary merging catalog data with live metrics.
///
/// The metric fields are `None` when the summary was built from the static
/// catalog seed (no plays recorded yet, or the store was unreachable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSummary {
    /// Catalog slug.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Cognitive category.
    pub category: GameCategory,
    /// Nominal duration of one session in seconds.
    pub duration_seconds: u32,
    /// Number of recorded plays.
    pub plays_count: Option<i64>,
    /// Best recorded score.
    pub best_score: Option<i64>,
    /// Average recorded score.
    pub avg_score: Option<i64>,
    /// Average recorded duration in seconds.
    pub avg_duration_seconds: Option<i64>,
}

// ---------------------------------------------------------------------------
// Dashboard statistics
// ---------------------------------------------------------------------------

/// The derived aggregate served to the admin dashboard.
///
/// Recomputed on every request; never persisted. All fields are
/// non-negative. On total data-access failure the service substitutes
/// [`DashboardStats::default`] (all zeros) instead of propagating an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DashboardStats {
    /// Total registered users.
    pub user_count: u64,
    /// Users whose accounts are active.
    pub active_user_count: u64,
    /// Distinct games with at least one recorded play.
    pub active_games: u64,
    /// Plays recorded today (server date).
    pub todays_sessions: u64,
}

// ---------------------------------------------------------------------------
// Leveling
// ---------------------------------------------------------------------------

/// Level and progress information derived from a total XP amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LevelInfo {
    /// Current level (1-based, capped at the maximum level).
    pub current_level: u32,
    /// Progress through the current level as a percentage (0-100).
    pub level_progress: u32,
    /// Total XP, clamped to zero.
    pub current_xp: u64,
    /// Cumulative XP required to reach the next level.
    pub next_level_xp: u64,
    /// XP still missing to reach the next level.
    pub required_xp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_stats_default_is_all_zero() {
        let stats = DashboardStats::default();
        assert_eq!(stats.user_count, 0);
        assert_eq!(stats.active_user_count, 0);
        assert_eq!(stats.active_games, 0);
        assert_eq!(stats.todays_sessions, 0);
    }

    #[test]
    fn admin_summary_flattens_profile_fields() {
        let summary = AdminUserSummary {
            profile: ProfileSummary {
                id: ProfileId::new(),
                email: String::from("ada@example.com"),
                full_name: None,
                name: String::from("ada"),
                role: UserRole::Student,
                experience: 250,
                is_active: true,
                created_at: Utc::now(),
            },
            game_play_count: 3,
            best_score: 90,
            last_play_at: None,
        };

        let json = serde_json::to_value(&summary).ok();
        let json = json.unwrap_or_default();
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["game_play_count"], 3);
    }
}
