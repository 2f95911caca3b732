//! Shared application state for the API server.
//!
//! [`AppState`] is constructed once in `main` and injected into handlers
//! via Axum's `State` extractor. Nothing here is module-global: the pool
//! handle and retry policy travel with the state, which keeps lifecycle
//! ownership explicit and makes handlers trivially testable.

use bilsem_db::{PostgresPool, RetryConfig};

/// Shared state for the Axum application.
///
/// The pool is `None` in demo mode (no `DATABASE_URL` configured). Read
/// services then serve fallback values; write endpoints reject with 503.
/// Cloning is cheap: the pool handle is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, absent in demo mode.
    pub db: Option<PostgresPool>,
    /// Retry policy applied to every store call.
    pub retry: RetryConfig,
}

impl AppState {
    /// Create application state with an optional database pool.
    pub const fn new(db: Option<PostgresPool>, retry: RetryConfig) -> Self {
        Self { db, retry }
    }

    /// Create state for demo mode (no database).
    pub fn demo() -> Self {
        Self {
            db: None,
            retry: RetryConfig::default(),
        }
    }

    /// Whether the platform is running without a database.
    pub const fn is_demo(&self) -> bool {
        self.db.is_none()
    }
}
