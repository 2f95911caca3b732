//! Enumeration types for the BilsemC2 platform.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// User roles
// ---------------------------------------------------------------------------

/// Role assigned to a user profile.
///
/// Roles are stored as text in the `profiles` table and gate access to the
/// admin and teacher surfaces. Unrecognized database values map to
/// [`UserRole::Student`], the least-privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A student working through games and quizzes.
    Student,
    /// A teacher managing classes and assignments.
    Teacher,
    /// A platform administrator with full dashboard access.
    Admin,
}

impl UserRole {
    /// Parse a role from its database text representation.
    ///
    /// Unknown values default to [`UserRole::Student`] rather than failing
    /// the whole row.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "teacher" => Self::Teacher,
            _ => Self::Student,
        }
    }

    /// The database text representation of this role.
    pub const fn as_db(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

// ---------------------------------------------------------------------------
// Game categories
// ---------------------------------------------------------------------------

/// Cognitive category of a game in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    /// Attention and visual scanning games.
    Attention,
    /// Short-term and working memory games.
    Memory,
    /// Logic, sequencing, and problem-solving games.
    Logic,
    /// Vocabulary and verbal reasoning games.
    Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_db_roundtrip() {
        for role in [UserRole::Student, UserRole::Teacher, UserRole::Admin] {
            assert_eq!(UserRole::from_db(role.as_db()), role);
        }
    }

    #[test]
    fn unknown_role_defaults_to_student() {
        assert_eq!(UserRole::from_db("superuser"), UserRole::Student);
        assert_eq!(UserRole::from_db(""), UserRole::Student);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&GameCategory::Attention).ok();
        assert_eq!(json.as_deref(), Some("\"attention\""));
    }
}
