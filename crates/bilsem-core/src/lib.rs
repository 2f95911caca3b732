//! Configuration and domain logic for the BilsemC2 platform.
//!
//! Everything in this crate is I/O-free: pure functions plus typed
//! configuration. The data layer and HTTP server live in `bilsem-db`
//! and `bilsem-api` respectively.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`leveling`] -- XP to level/progress calculation
//! - [`catalog`] -- Static game catalog and seed summaries
//! - [`redirect`] -- Redirect-path normalization and query building

pub mod catalog;
pub mod config;
pub mod leveling;
pub mod redirect;

// Re-export primary types for convenience.
pub use catalog::{catalog_item, display_title, seed_summaries, CatalogItem, GAME_CATALOG};
pub use config::{
    ConfigError, DatabaseConfig, LoggingConfig, PlatformConfig, RetrySettings, ServerConfig,
};
pub use leveling::{level_badge, level_info, level_title, xp_required_for_level};
pub use redirect::{build_path_with_query, normalize_next_path, DEFAULT_NEXT_PATH};
