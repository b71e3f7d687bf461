//! Canonical cache keys for metric requests.
//!
//! Independent screens frequently request parametrically identical metrics
//! (the overview and benchmarks screens both want weekly deployment
//! frequency). Sharing one in-flight fetch and one cached result requires
//! every call site to build its key the same way, so key construction
//! lives here and nowhere else: [`CacheKey::build`] renders the
//! contributing parameters of a [`MetricQuery`] in one fixed canonical
//! order. Namespace-level invalidation (`linear/*` after a Linear sync)
//! matches on the metric identifier's namespace.

use serde::Serialize;

use crate::query::MetricQuery;

// ─── Metric Identifiers ─────────────────────────────────────────────────────

/// Every metric this dashboard requests, identified as `namespace/name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    /// Deployments per unit time.
    DeploymentFrequency,
    /// Hours from first commit to production.
    LeadTime,
    /// Percent of deployments causing a failure.
    ChangeFailureRate,
    /// Hours to restore service after a failure.
    TimeToRestore,
    /// Cross-metric correlation pairs.
    Correlations,
    /// Connector sync statuses.
    Connectors,
    /// Linear issue-linking coverage per team.
    LinearCoverage,
}

impl MetricId {
    /// Every metric identifier.
    pub const ALL: &'static [Self] = &[
        Self::DeploymentFrequency,
        Self::LeadTime,
        Self::ChangeFailureRate,
        Self::TimeToRestore,
        Self::Correlations,
        Self::Connectors,
        Self::LinearCoverage,
    ];

    /// The four DORA metrics, in card order.
    pub const DORA: &'static [Self] = &[
        Self::DeploymentFrequency,
        Self::LeadTime,
        Self::ChangeFailureRate,
        Self::TimeToRestore,
    ];

    /// Full `namespace/name` identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => "dora/deployment_frequency",
            Self::LeadTime => "dora/lead_time",
            Self::ChangeFailureRate => "dora/change_failure_rate",
            Self::TimeToRestore => "dora/time_to_restore",
            Self::Correlations => "insights/correlations",
            Self::Connectors => "sync/connectors",
            Self::LinearCoverage => "linear/linking_coverage",
        }
    }

    /// Namespace prefix used for group invalidation.
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::DeploymentFrequency
            | Self::LeadTime
            | Self::ChangeFailureRate
            | Self::TimeToRestore => "dora",
            Self::Correlations => "insights",
            Self::Connectors => "sync",
            Self::LinearCoverage => "linear",
        }
    }

    /// Human title for cards and table rows.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::DeploymentFrequency => "Deployment Frequency",
            Self::LeadTime => "Lead Time for Changes",
            Self::ChangeFailureRate => "Change Failure Rate",
            Self::TimeToRestore => "Time to Restore Service",
            Self::Correlations => "Metric Correlations",
            Self::Connectors => "Connector Status",
            Self::LinearCoverage => "Linear Linking Coverage",
        }
    }

    /// True for the four DORA metrics.
    #[must_use]
    pub const fn is_dora(self) -> bool {
        matches!(
            self,
            Self::DeploymentFrequency
                | Self::LeadTime
                | Self::ChangeFailureRate
                | Self::TimeToRestore
        )
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Cache Keys ─────────────────────────────────────────────────────────────

/// Deterministic cache key: metric identifier plus canonically rendered
/// parameters.
///
/// Deep-equal queries for the same metric produce identical keys; any
/// change in a contributing parameter changes the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    metric: MetricId,
    params: String,
}

impl CacheKey {
    /// Build the key for a parameterized metric request.
    ///
    /// This is the only key constructor call sites may use for
    /// parameterized metrics; hand-assembled keys would silently break
    /// cross-screen sharing.
    #[must_use]
    pub fn build(metric: MetricId, query: &MetricQuery) -> Self {
        Self {
            metric,
            params: canonical_params(query),
        }
    }

    /// Key for an unparameterized metric (connector status, linking
    /// coverage).
    #[must_use]
    pub const fn bare(metric: MetricId) -> Self {
        Self {
            metric,
            params: String::new(),
        }
    }

    /// The metric this key caches.
    #[must_use]
    pub const fn metric(&self) -> MetricId {
        self.metric
    }

    /// True when this key's metric lives in `namespace`.
    #[must_use]
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.metric.namespace() == namespace
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.metric.as_str())
        } else {
            write!(f, "{}?{}", self.metric.as_str(), self.params)
        }
    }
}

/// Render the contributing parameters in the fixed canonical order:
/// dates, repos, teams, no-teams, authors, period, trend, benchmark.
fn canonical_params(query: &MetricQuery) -> String {
    let mut out = String::new();
    push_param(&mut out, "start", &query.start_date);
    push_param(&mut out, "end", &query.end_date);
    if let Some(ids) = &query.repo_ids {
        push_param(&mut out, "repos", &join_ids(ids));
    }
    if let Some(ids) = &query.team_ids {
        push_param(&mut out, "teams", &join_ids(ids));
    }
    if let Some(no_teams) = query.no_teams {
        push_param(&mut out, "no_teams", bool_param(no_teams));
    }
    if let Some(logins) = &query.author_logins {
        push_param(&mut out, "authors", &logins.join(","));
    }
    if let Some(period) = query.period {
        push_param(&mut out, "period", period.label());
    }
    if let Some(trend) = query.include_trend {
        push_param(&mut out, "trend", bool_param(trend));
    }
    if let Some(benchmark) = query.include_benchmark {
        push_param(&mut out, "benchmark", bool_param(benchmark));
    }
    out
}

fn push_param(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push('&');
    }
    out.push_str(key);
    out.push('=');
    out.push_str(value);
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

const fn bool_param(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
