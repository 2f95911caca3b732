//! REST API server for the BilsemC2 platform.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Dashboard endpoint** aggregating user and game-play statistics
//!   with an all-zero fallback when the database is unreachable
//! - **Admin listing endpoints** for users and game plays, degrading to
//!   empty listings on failure
//! - **Game endpoints** merging live play metrics with the static catalog
//! - **Submission endpoint** recording completed plays (the one write path)
//! - **Minimal HTML status page** (`GET /`) showing mode and API links
//!
//! # Architecture
//!
//! Handlers call the fallback-aware services in [`services`], which in
//! turn call the retry-wrapped stores in `bilsem-db`. Read paths never
//! surface backend errors to clients; every read response carries a
//! `degraded` flag instead. State is explicitly constructed in `main`
//! and injected via Axum's `State` extractor.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod services;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerError};
pub use services::Sourced;
pub use state::AppState;
