//! Core interpretation and derivation layer for the shippulse dashboard.
//!
//! This crate turns raw engineering-delivery metrics (DORA values,
//! correlations, sync coverage) into display-ready classifications and
//! labels, and turns the shared [`FilterState`] into canonical API
//! parameters and cache keys. Everything here is pure: no I/O, no clocks
//! read implicitly, no hidden state. The dashboard shell in
//! `shippulse-dash` owns fetching, caching, and screens on top of these
//! functions.

pub mod benchmark;
pub mod cache_key;
pub mod config;
pub mod correlation;
pub mod coverage;
pub mod error;
pub mod filter;
pub mod format;
pub mod query;
pub mod tracing_config;
pub mod types;

pub use benchmark::{
    TierBadge, badge_or_default, classify_tier, gap_display, normalize_description, resolve_tier,
};
pub use cache_key::{CacheKey, MetricId};
pub use config::DashboardConfig;
pub use correlation::{CorrelationLabel, CorrelationStrength, classify_correlation};
pub use coverage::{CoverageDisplay, coverage_display};
pub use error::{MetricsError, MetricsResult};
pub use filter::{
    ChartPeriod, DateRange, DeveloperFilter, FilterState, RepoFilter, RepoId, TEAM_ID_NONE,
    TeamFilter, TeamId,
};
pub use format::{format_hours, format_time_ago};
pub use query::MetricQuery;
pub use types::{
    Benchmark, BenchmarkThresholds, ConnectorStatus, CorrelationPair, CoverageRow,
    ImprovementDirection, MetricSample, PLACEHOLDER, Tier, TrendInfo,
};
