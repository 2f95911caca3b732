//! Redirect-path normalization and query-string building.
//!
//! Auth flows carry a `next` parameter naming where to land after the
//! flow completes. Only safe relative internal paths pass through;
//! everything else (external URLs, protocol-relative tricks, internal
//! API prefixes) falls back to the dashboard.

use std::fmt::Write as _;

/// Fallback landing path for unsafe or missing redirect targets.
pub const DEFAULT_NEXT_PATH: &str = "/dashboard";

/// Internal prefixes that must never be redirect targets.
const BLOCKED_PREFIXES: [&str; 2] = ["/api/", "/auth/"];

/// Normalize a user-supplied redirect target.
///
/// Safe relative internal paths are returned unchanged. Absolute URLs,
/// protocol-relative paths (`//host`), backslash variants, and blocked
/// internal prefixes all return [`DEFAULT_NEXT_PATH`].
pub fn normalize_next_path(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.is_empty()
        || !trimmed.starts_with('/')
        || trimmed.starts_with("//")
        || trimmed.contains("://")
        || trimmed.contains('\\')
    {
        return DEFAULT_NEXT_PATH.to_owned();
    }

    for prefix in BLOCKED_PREFIXES {
        if trimmed.starts_with(prefix) || trimmed == prefix.trim_end_matches('/') {
            return DEFAULT_NEXT_PATH.to_owned();
        }
    }

    trimmed.to_owned()
}

/// Build a path with a query string, skipping absent and empty values.
///
/// Values are form-encoded deterministically in the order given:
///
/// ```
/// use bilsem_core::redirect::build_path_with_query;
///
/// let path = build_path_with_query(
///     "/login",
///     &[("error", Some("Bad credentials")), ("next", Some("/games")), ("ignore", None)],
/// );
/// assert_eq!(path, "/login?error=Bad+credentials&next=%2Fgames");
/// ```
pub fn build_path_with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value.and_then(|value| {
                if value.is_empty() {
                    None
                } else {
                    Some(format!("{}={}", form_encode(key), form_encode(value)))
                }
            })
        })
        .collect();

    if pairs.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

/// Encode a string per `application/x-www-form-urlencoded`.
///
/// Unreserved ASCII passes through, space becomes `+`, everything else is
/// percent-encoded byte-wise.
fn form_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            }
            b' ' => encoded.push('+'),
            _ => {
                let _ = write!(encoded, "%{byte:02X}");
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_relative_path_passes_through() {
        assert_eq!(normalize_next_path("/games"), "/games");
        assert_eq!(normalize_next_path("/profile/settings"), "/profile/settings");
        assert_eq!(normalize_next_path("  /games  "), "/games");
    }

    #[test]
    fn external_urls_fall_back() {
        assert_eq!(normalize_next_path("https://evil.example"), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("http://evil.example/x"), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("//evil.example"), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("/redir\\evil"), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("javascript:alert(1)"), DEFAULT_NEXT_PATH);
    }

    #[test]
    fn blocked_prefixes_fall_back() {
        assert_eq!(normalize_next_path("/api/internal"), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("/api"), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("/auth/callback"), DEFAULT_NEXT_PATH);
    }

    #[test]
    fn empty_falls_back() {
        assert_eq!(normalize_next_path(""), DEFAULT_NEXT_PATH);
        assert_eq!(normalize_next_path("   "), DEFAULT_NEXT_PATH);
    }

    #[test]
    fn query_builder_skips_absent_and_empty_values() {
        let path = build_path_with_query(
            "/login",
            &[
                ("error", Some("Bad credentials")),
                ("next", Some("/games")),
                ("ignore", None),
                ("blank", Some("")),
            ],
        );
        assert_eq!(path, "/login?error=Bad+credentials&next=%2Fgames");
    }

    #[test]
    fn query_builder_with_no_params_returns_path() {
        assert_eq!(build_path_with_query("/login", &[]), "/login");
        assert_eq!(
            build_path_with_query("/login", &[("a", None), ("b", Some(""))]),
            "/login"
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(form_encode("a b&c=d"), "a+b%26c%3Dd");
        assert_eq!(form_encode("tilde~dot.dash-ok"), "tilde~dot.dash-ok");
        // UTF-8 bytes are encoded individually.
        assert_eq!(form_encode("\u{e7}"), "%C3%A7");
    }
}
