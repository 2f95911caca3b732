//! Data layer for the BilsemC2 platform (`PostgreSQL`).
//!
//! `PostgreSQL` is the single store: user profiles and immutable game-play
//! records. Every query goes through a retry wrapper that classifies
//! failures as transient or permanent and applies bounded exponential
//! backoff to the transient ones.
//!
//! ```text
//! Service layer
//!     |
//!     +-- ProfileStore  ----+
//!     |                     +--> with_retries --> sqlx::PgPool --> PostgreSQL
//!     +-- GamePlayStore ----+
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool and configuration
//! - [`retry`] -- Error classification and bounded exponential backoff
//! - [`profile_store`] -- Profile listings and dashboard user counts
//! - [`game_play_store`] -- Play metrics, admin listings, and inserts
//! - [`error`] -- Shared error types

pub mod error;
pub mod game_play_store;
pub mod postgres;
pub mod profile_store;
pub mod retry;

// Re-export primary types for convenience.
pub use error::DbError;
pub use game_play_store::{GameMetricsRow, GamePlayOverviewRow, GamePlayRow, GamePlayStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use profile_store::{AdminProfileRow, ProfileRow, ProfileStatsRow, ProfileStore};
pub use retry::{is_retryable, is_retryable_code, retry_delay_ms, with_retries, RetryConfig};
