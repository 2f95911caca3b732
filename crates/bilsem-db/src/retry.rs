//! Retry classification and bounded exponential backoff for queries.
//!
//! Transient infrastructure failures (deadlocks, dropped connections,
//! timeouts) are retried with exponential backoff; permanent data errors
//! (constraint violations, malformed input) are surfaced immediately.
//! Unclassified errors default to non-retryable: fast failure is preferred
//! over silently masking a logic bug behind retries.

use std::future::Future;
use std::time::Duration;

use crate::error::DbError;

/// SQLSTATE codes that indicate a transient, retryable failure.
///
/// Serialization failure, deadlock detected, lock not available, too many
/// connections, and the admin-shutdown family. The `08` connection
/// exception class is matched by prefix in [`is_retryable_code`].
const RETRYABLE_SQLSTATES: [&str; 7] = [
    "40001", "40P01", "55P03", "53300", "57P01", "57P02", "57P03",
];

/// Default number of attempts (first try plus retries).
const DEFAULT_ATTEMPTS: u32 = 3;

/// Default base delay before the second attempt, in milliseconds.
const DEFAULT_BASE_DELAY_MS: u64 = 120;

/// Default ceiling on the backoff delay, in milliseconds.
const DEFAULT_MAX_DELAY_MS: u64 = 2_000;

/// Backoff policy for a retried operation.
///
/// Immutable per call site. The delay before attempt `n+1` is
/// `min(base_delay_ms * 2^(n-1), max_delay_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempt ceiling, including the first try.
    pub attempts: u32,
    /// Delay before the second attempt.
    pub base_delay_ms: u64,
    /// Saturation ceiling for the delay.
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Create a config with explicit values.
    pub const fn new(attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            attempts,
            base_delay_ms,
            max_delay_ms,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// Compute the backoff delay in milliseconds for a 1-indexed attempt.
///
/// Pure: no sleeping happens here. Attempt 1 always returns
/// `base_delay_ms`; attempt 0 is treated as attempt 1. The result
/// saturates at `max_delay_ms` for arbitrarily large attempt numbers.
pub fn retry_delay_ms(attempt: u32, config: &RetryConfig) -> u64 {
    let exponent = attempt.max(1).saturating_sub(1).min(63);
    let factor = 1_u64.checked_shl(exponent).unwrap_or(u64::MAX);
    config
        .base_delay_ms
        .saturating_mul(factor)
        .min(config.max_delay_ms)
}

/// Whether a SQLSTATE code identifies a transient failure.
///
/// The entire `08` class (connection exceptions) is retryable. Constraint
/// violations (`23`) and data errors (`22`) are permanent.
pub fn is_retryable_code(code: &str) -> bool {
    if RETRYABLE_SQLSTATES.contains(&code) {
        return true;
    }
    code.starts_with("08")
}

/// Message fallback for drivers that report transient failures without a
/// usable SQLSTATE.
fn is_retryable_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("connection terminated")
        || message.contains("terminating connection")
        || message.contains("timeout")
        || message.contains("deadlock detected")
}

/// Classify a [`sqlx::Error`] as retryable or permanent.
///
/// Transport-level failures (I/O, pool acquire timeout, pool closed) are
/// retryable. Database errors are classified by SQLSTATE first, then by
/// message. Everything else -- row-not-found, decode errors, and any
/// unrecognized shape -- is permanent.
pub fn is_retryable(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => true,
        sqlx::Error::Database(db) => {
            if let Some(code) = db.code() {
                if is_retryable_code(code.as_ref()) {
                    return true;
                }
                if code.starts_with("23") || code.starts_with("22") {
                    return false;
                }
            }
            is_retryable_message(db.message())
        }
        _ => false,
    }
}

/// Execute a query-producing closure with retry on transient failures.
///
/// The closure is invoked once per attempt so each retry builds a fresh
/// query future. Non-retryable errors and errors on the final attempt
/// propagate as [`DbError::Postgres`]. Sleeping between attempts uses
/// [`tokio::time::sleep`] with the delay from [`retry_delay_ms`].
///
/// # Errors
///
/// Returns [`DbError::Postgres`] with the last failure once the attempt
/// ceiling is reached or a permanent error occurs.
pub async fn with_retries<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let can_retry = is_retryable(&error) && attempt < config.attempts;
                if !can_retry {
                    return Err(DbError::Postgres(error));
                }

                let delay_ms = retry_delay_ms(attempt, config);
                tracing::warn!(
                    attempt,
                    delay_ms,
                    error = %error,
                    "Transient database error, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt = attempt.saturating_add(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: RetryConfig = RetryConfig::new(3, 100, 250);

    #[test]
    fn delay_doubles_then_saturates() {
        assert_eq!(retry_delay_ms(1, &TEST_CONFIG), 100);
        assert_eq!(retry_delay_ms(2, &TEST_CONFIG), 200);
        assert_eq!(retry_delay_ms(3, &TEST_CONFIG), 250);
        assert_eq!(retry_delay_ms(8, &TEST_CONFIG), 250);
    }

    #[test]
    fn delay_does_not_overflow_for_huge_attempts() {
        assert_eq!(retry_delay_ms(10_000, &TEST_CONFIG), 250);
        assert_eq!(retry_delay_ms(u32::MAX, &TEST_CONFIG), 250);
    }

    #[test]
    fn attempt_zero_is_treated_as_first_attempt() {
        assert_eq!(retry_delay_ms(0, &TEST_CONFIG), 100);
    }

    #[test]
    fn transient_codes_are_retryable() {
        for code in ["40001", "40P01", "55P03", "53300", "57P01", "57P02", "57P03"] {
            assert!(is_retryable_code(code), "expected {code} to be retryable");
        }
        // Connection exception class by prefix.
        for code in ["08000", "08001", "08003", "08006", "08P01"] {
            assert!(is_retryable_code(code), "expected {code} to be retryable");
        }
    }

    #[test]
    fn permanent_codes_are_not_retryable() {
        // Uniqueness conflict, foreign key, not-null, bad text representation.
        for code in ["23505", "23503", "23502", "22P02", "42601"] {
            assert!(!is_retryable_code(code), "expected {code} to be permanent");
        }
    }

    #[test]
    fn message_fallback_matches_known_phrases() {
        assert!(is_retryable_message("Connection terminated unexpectedly"));
        assert!(is_retryable_message("terminating connection due to administrator command"));
        assert!(is_retryable_message("canceling statement due to statement timeout"));
        assert!(is_retryable_message("deadlock detected"));
        assert!(!is_retryable_message("duplicate key value violates unique constraint"));
    }

    #[test]
    fn transport_errors_are_retryable() {
        assert!(is_retryable(&sqlx::Error::PoolTimedOut));
        assert!(is_retryable(&sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))));
    }

    #[test]
    fn unclassified_errors_fail_fast() {
        assert!(!is_retryable(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn with_retries_returns_first_success() {
        let result: Result<u32, DbError> =
            with_retries(&TEST_CONFIG, || async { Ok(7) }).await;
        assert_eq!(result.ok(), Some(7));
    }

    #[tokio::test]
    async fn with_retries_propagates_permanent_error_immediately() {
        let mut calls = 0_u32;
        let result: Result<u32, DbError> = with_retries(&TEST_CONFIG, || {
            calls = calls.saturating_add(1);
            async { Err(sqlx::Error::RowNotFound) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn with_retries_stops_at_attempt_ceiling() {
        let config = RetryConfig::new(3, 1, 2);
        let mut calls = 0_u32;
        let result: Result<u32, DbError> = with_retries(&config, || {
            calls = calls.saturating_add(1);
            async { Err(sqlx::Error::PoolTimedOut) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn with_retries_recovers_after_transient_failure() {
        let config = RetryConfig::new(3, 1, 2);
        let mut calls = 0_u32;
        let result: Result<u32, DbError> = with_retries(&config, || {
            calls = calls.saturating_add(1);
            let succeed = calls >= 2;
            async move {
                if succeed {
                    Ok(42)
                } else {
                    Err(sqlx::Error::PoolTimedOut)
                }
            }
        })
        .await;
        assert_eq!(result.ok(), Some(42));
        assert_eq!(calls, 2);
    }
}
