//! Tracing conventions for shippulse.
//!
//! Interpretation and derivation stay pure; the shell emits structured
//! events around fetches, cache transitions, and sync triggers. This
//! module pins the target prefix, span names, and field names so
//! subscribers, dashboards, and tests can match on them.
//!
//! # Usage
//!
//! ```text
//! RUST_LOG=shippulse=debug
//! ```

use tracing::Level;

/// Target prefix used by all shippulse tracing spans and events.
pub const TARGET_PREFIX: &str = "shippulse";

/// Standard tracing span names used across the dashboard.
///
/// These constants ensure consistent span naming so that consumers can
/// match on them in subscribers and tests.
pub mod span_names {
    /// Root span for one screen refresh.
    pub const REFRESH: &str = "shippulse::refresh";
    /// One metric fetch, from derivation to completion.
    pub const FETCH: &str = "shippulse::fetch";
    /// Connector sync trigger and its follow-up invalidation.
    pub const SYNC: &str = "shippulse::sync";
}

/// Standard structured field names used in tracing events.
///
/// Using consistent field names enables structured log queries across
/// the dashboard.
pub mod field_names {
    pub const SCREEN: &str = "screen";
    pub const METRIC: &str = "metric";
    pub const CACHE_KEY: &str = "cache_key";
    pub const GENERATION: &str = "generation";
    pub const OBSERVERS: &str = "observers";
    pub const NAMESPACE: &str = "namespace";
    pub const EVICTED: &str = "evicted";
    pub const CONNECTOR: &str = "connector";
}

/// Parse a log level string (case-insensitive).
///
/// Recognized values: `trace`, `debug`, `info`, `warn`, `error`.
/// Returns `None` for unrecognized strings.
#[must_use]
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Returns the recommended `tracing::Level` for the given environment.
///
/// Checks `SHIPPULSE_LOG_LEVEL` first, then falls back to the provided
/// default.
#[must_use]
pub fn level_from_env(default: Level) -> Level {
    std::env::var("SHIPPULSE_LOG_LEVEL")
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(default)
}
