//! Dashboard screen view models.
//!
//! Each screen module derives its requests from the shared filter state and
//! builds a serializable view model from fetched payloads. Request
//! derivation is deliberately shared: the overview and benchmarks screens
//! call the same [`dora_requests`] helper, so their cache keys are
//! identical and one fetch feeds both.

pub mod benchmarks;
pub mod correlations;
pub mod overview;
pub mod sync_status;

pub use benchmarks::{BenchmarkRow, BenchmarksModel};
pub use correlations::{CorrelationRow, CorrelationsModel};
pub use overview::{MetricCard, OverviewModel};
pub use sync_status::{ConnectorRow, CoverageBarRow, SyncStatusModel};

use shippulse_core::cache_key::{CacheKey, MetricId};
use shippulse_core::config::DashboardConfig;
use shippulse_core::filter::FilterState;
use shippulse_core::query::MetricQuery;

// ─── Screen Identity ────────────────────────────────────────────────────────

/// The four dashboard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Screen {
    /// Headline DORA cards.
    Overview,
    /// Tier table with descriptions and gaps.
    Benchmarks,
    /// Metric-pair correlation table.
    Correlations,
    /// Connector freshness and Linear linking coverage.
    SyncStatus,
}

impl Screen {
    /// Every screen, in display order.
    pub const ALL: &'static [Self] = &[
        Self::Overview,
        Self::Benchmarks,
        Self::Correlations,
        Self::SyncStatus,
    ];

    /// Stable lowercase identifier for logs and routing.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Benchmarks => "benchmarks",
            Self::Correlations => "correlations",
            Self::SyncStatus => "sync_status",
        }
    }

    /// Human-readable screen title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Benchmarks => "Benchmarks",
            Self::Correlations => "Correlations",
            Self::SyncStatus => "Sync Status",
        }
    }

    /// Whether the screen's data is scoped by the repository filter.
    ///
    /// Sync status is global: connector freshness and linking coverage are
    /// meaningful even when no repository is selected.
    #[must_use]
    pub const fn uses_repo_filter(self) -> bool {
        !matches!(self, Self::SyncStatus)
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Request Derivation ─────────────────────────────────────────────────────

/// One request a screen wants satisfied: a metric, optionally parameterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRequest {
    /// Which metric.
    pub metric: MetricId,
    /// Derived parameters; `None` for global endpoints such as connector
    /// status.
    pub query: Option<MetricQuery>,
}

impl MetricRequest {
    /// Request parameterized by a derived query.
    #[must_use]
    pub const fn parameterized(metric: MetricId, query: MetricQuery) -> Self {
        Self {
            metric,
            query: Some(query),
        }
    }

    /// Request with no parameters.
    #[must_use]
    pub const fn bare(metric: MetricId) -> Self {
        Self {
            metric,
            query: None,
        }
    }

    /// Cache key this request resolves under.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        match &self.query {
            Some(query) => CacheKey::build(self.metric, query),
            None => CacheKey::bare(self.metric),
        }
    }
}

/// Derive the four DORA metric requests from a filter snapshot.
///
/// Shared by the overview and benchmarks screens so both produce identical
/// queries, and therefore identical cache keys, from the same snapshot.
#[must_use]
pub fn dora_requests(filters: &FilterState, config: &DashboardConfig) -> Vec<MetricRequest> {
    MetricId::DORA
        .iter()
        .map(|&metric| {
            let query = MetricQuery::from_filters(filters)
                .with_period(filters.chart_period)
                .with_trend(config.include_trend)
                .with_benchmark(config.include_benchmark);
            MetricRequest::parameterized(metric, query)
        })
        .collect()
}

/// Copy shown when the repository filter excludes everything.
pub const NO_REPOS_HINT: &str = "Select at least one repository to see metrics";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shippulse_core::filter::DateRange;

    fn filters() -> FilterState {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
        )
        .expect("valid range");
        FilterState::new(range)
    }

    #[test]
    fn screen_labels_are_stable() {
        assert_eq!(Screen::Overview.label(), "overview");
        assert_eq!(Screen::SyncStatus.label(), "sync_status");
        assert_eq!(Screen::ALL.len(), 4);
    }

    #[test]
    fn only_sync_status_ignores_the_repo_filter() {
        for &screen in Screen::ALL {
            assert_eq!(
                screen.uses_repo_filter(),
                screen != Screen::SyncStatus,
                "{screen}"
            );
        }
    }

    #[test]
    fn dora_requests_cover_all_four_metrics() {
        let requests = dora_requests(&filters(), &DashboardConfig::default());
        let metrics: Vec<MetricId> = requests.iter().map(|r| r.metric).collect();
        assert_eq!(metrics, MetricId::DORA.to_vec());
        assert!(requests.iter().all(|r| r.query.is_some()));
    }

    #[test]
    fn equal_snapshots_derive_equal_request_keys() {
        let config = DashboardConfig::default();
        let a: Vec<CacheKey> = dora_requests(&filters(), &config)
            .iter()
            .map(MetricRequest::cache_key)
            .collect();
        let b: Vec<CacheKey> = dora_requests(&filters(), &config)
            .iter()
            .map(MetricRequest::cache_key)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn bare_request_uses_bare_key() {
        let request = MetricRequest::bare(MetricId::Connectors);
        assert_eq!(request.cache_key(), CacheKey::bare(MetricId::Connectors));
    }

    #[test]
    fn derived_requests_carry_config_toggles() {
        let config = DashboardConfig {
            include_trend: false,
            include_benchmark: true,
            ..DashboardConfig::default()
        };
        let requests = dora_requests(&filters(), &config);
        let query = requests[0].query.as_ref().unwrap();
        assert_eq!(query.include_trend, Some(false));
        assert_eq!(query.include_benchmark, Some(true));
    }
}
