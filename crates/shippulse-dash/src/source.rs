//! Metrics source trait and mock implementation.
//!
//! The [`MetricsSource`] trait decouples the dashboard from the concrete
//! transport. Screens never talk to a source directly; [`crate::app`]
//! derives requests, consults the cache, and only calls the source for
//! cache misses. [`MockMetricsSource`] provides deterministic data for
//! development and testing.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use shippulse_core::cache_key::MetricId;
use shippulse_core::error::MetricsResult;
use shippulse_core::query::MetricQuery;
use shippulse_core::types::{
    Benchmark, BenchmarkThresholds, ConnectorStatus, CorrelationPair, ImprovementDirection,
    MetricSample, Tier, TrendInfo,
};

// ─── Wire Envelopes ─────────────────────────────────────────────────────────

/// Response body for one DORA metric request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DoraMetricResponse {
    /// Headline value for the window.
    #[serde(default)]
    pub average: Option<f64>,
    /// Total over the window, where the metric has one.
    #[serde(default)]
    pub total: Option<f64>,
    /// Trend versus the previous window.
    #[serde(default)]
    pub trend: Option<TrendInfo>,
    /// Benchmark context.
    #[serde(default)]
    pub benchmark: Option<Benchmark>,
}

impl DoraMetricResponse {
    /// View of this response as the core sample type classifiers take.
    #[must_use]
    pub fn into_sample(self) -> MetricSample {
        MetricSample {
            value: self.average,
            total: self.total,
            trend: self.trend,
            benchmark: self.benchmark,
        }
    }
}

/// Response body for the correlations request.
///
/// Older deployments of the metrics API named the array `pairs`; both
/// spellings decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationResponse {
    /// Pre-computed correlation pairs.
    #[serde(default, alias = "pairs")]
    pub correlations: Vec<CorrelationPair>,
}

/// Response body for the connector status request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectorsResponse {
    /// Every configured connector.
    #[serde(default)]
    pub connectors: Vec<ConnectorStatus>,
}

/// One Linear team's linking counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearTeamRecord {
    /// Team display name.
    pub name: String,
    /// Linear team key (e.g. `PLT`).
    pub key: String,
    /// Issues in the team.
    pub total_issues: u64,
    /// Issues linked to a pull request.
    pub linked_issues: u64,
}

/// Response body for the Linear linking-coverage request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinearTeamsResponse {
    /// Per-team linking counts.
    #[serde(default)]
    pub linear_teams: Vec<LinearTeamRecord>,
}

/// Fetched payload, tagged by shape.
///
/// The cache stores these; screens downcast to the shape they asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricPayload {
    /// One DORA metric.
    Dora(DoraMetricResponse),
    /// Correlation pairs.
    Correlations(CorrelationResponse),
    /// Connector statuses.
    Connectors(ConnectorsResponse),
    /// Linear linking coverage.
    LinearTeams(LinearTeamsResponse),
}

// ─── Metrics Source Trait ───────────────────────────────────────────────────

/// Trait for transports that feed the dashboard.
///
/// Synchronous interface; the shell calls it only on cache misses. The
/// real implementation speaks HTTP to the metrics API; the mock serves
/// canned data.
pub trait MetricsSource: Send {
    /// Fetch one DORA metric for the derived query.
    fn dora_metric(&self, metric: MetricId, query: &MetricQuery)
    -> MetricsResult<DoraMetricResponse>;

    /// Fetch correlation pairs for the derived query.
    fn correlations(&self, query: &MetricQuery) -> MetricsResult<CorrelationResponse>;

    /// Fetch connector sync statuses.
    fn connectors(&self) -> MetricsResult<ConnectorsResponse>;

    /// Fetch Linear linking coverage per team.
    fn linear_teams(&self) -> MetricsResult<LinearTeamsResponse>;

    /// Trigger a connector sync. Returns when the sync has been accepted
    /// and completed by the backend.
    fn trigger_sync(&self, connector: &str) -> MetricsResult<()>;
}

// ─── Mock Metrics Source ────────────────────────────────────────────────────

/// Mock source for development and testing.
///
/// Serves one fixed, internally consistent dataset so screens can be
/// rendered and asserted against without a backend. Timestamps are fixed;
/// pair it with [`MockMetricsSource::reference_now`] for stable relative
/// times.
pub struct MockMetricsSource {
    deployment_frequency: DoraMetricResponse,
    lead_time: DoraMetricResponse,
    change_failure_rate: DoraMetricResponse,
    time_to_restore: DoraMetricResponse,
    correlations: CorrelationResponse,
    connectors: ConnectorsResponse,
    linear_teams: LinearTeamsResponse,
}

impl MockMetricsSource {
    /// The instant the sample dataset is staged around; pass this as `now`
    /// to get stable "35 minutes ago" style labels.
    #[must_use]
    pub fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// Create a mock with sample data covering every classifier path:
    /// all four tiers, every correlation band, sub-1% and zero-total
    /// coverage rows, and a never-synced connector.
    #[must_use]
    pub fn sample() -> Self {
        let now = Self::reference_now();

        let deployment_frequency = DoraMetricResponse {
            average: Some(2.4),
            total: Some(216.0),
            trend: Some(TrendInfo {
                change_percent: 12.5,
                is_improving: true,
            }),
            benchmark: Some(Benchmark {
                category: Some(Tier::High),
                thresholds: BenchmarkThresholds {
                    elite: 3.0,
                    high: 1.0,
                    medium: 0.25,
                },
                improvement_direction: ImprovementDirection::Higher,
                description: Some("high: Deploys most working days".to_owned()),
                gap_to_elite: Some("0.6 deploys/day from elite".to_owned()),
            }),
        };

        let lead_time = DoraMetricResponse {
            average: Some(26.0),
            total: None,
            trend: Some(TrendInfo {
                change_percent: -8.2,
                is_improving: true,
            }),
            benchmark: Some(Benchmark {
                category: Some(Tier::High),
                thresholds: BenchmarkThresholds {
                    elite: 24.0,
                    high: 168.0,
                    medium: 720.0,
                },
                improvement_direction: ImprovementDirection::Lower,
                description: Some("high: Merges reach production within a week".to_owned()),
                gap_to_elite: Some("2h from elite".to_owned()),
            }),
        };

        let change_failure_rate = DoraMetricResponse {
            average: Some(4.2),
            total: None,
            trend: Some(TrendInfo {
                change_percent: -1.1,
                is_improving: true,
            }),
            benchmark: Some(Benchmark {
                category: Some(Tier::Elite),
                thresholds: BenchmarkThresholds {
                    elite: 5.0,
                    high: 10.0,
                    medium: 15.0,
                },
                improvement_direction: ImprovementDirection::Lower,
                description: Some("elite: Fewer than one in twenty deploys fail".to_owned()),
                gap_to_elite: None,
            }),
        };

        let time_to_restore = DoraMetricResponse {
            average: Some(5.5),
            total: None,
            trend: Some(TrendInfo {
                change_percent: 3.0,
                is_improving: false,
            }),
            benchmark: Some(Benchmark {
                category: Some(Tier::High),
                thresholds: BenchmarkThresholds {
                    elite: 1.0,
                    high: 24.0,
                    medium: 168.0,
                },
                improvement_direction: ImprovementDirection::Lower,
                description: Some("high: Incidents resolve within a day".to_owned()),
                gap_to_elite: Some("4.5h from elite".to_owned()),
            }),
        };

        let correlations = CorrelationResponse {
            correlations: vec![
                CorrelationPair {
                    metric_a: "deployment_frequency".to_owned(),
                    metric_b: "lead_time".to_owned(),
                    correlation: -0.72,
                    period_count: Some(12),
                },
                CorrelationPair {
                    metric_a: "lead_time".to_owned(),
                    metric_b: "time_to_restore".to_owned(),
                    correlation: 0.55,
                    period_count: Some(12),
                },
                CorrelationPair {
                    metric_a: "deployment_frequency".to_owned(),
                    metric_b: "change_failure_rate".to_owned(),
                    correlation: 0.31,
                    period_count: Some(12),
                },
                CorrelationPair {
                    metric_a: "change_failure_rate".to_owned(),
                    metric_b: "time_to_restore".to_owned(),
                    correlation: 0.12,
                    period_count: Some(8),
                },
            ],
        };

        let connectors = ConnectorsResponse {
            connectors: vec![
                ConnectorStatus {
                    connector_name: "github".to_owned(),
                    display_name: "GitHub".to_owned(),
                    last_sync_at: Some(now - chrono::Duration::minutes(35)),
                },
                ConnectorStatus {
                    connector_name: "linear".to_owned(),
                    display_name: "Linear".to_owned(),
                    last_sync_at: Some(now - chrono::Duration::hours(3)),
                },
                ConnectorStatus {
                    connector_name: "jira".to_owned(),
                    display_name: "Jira".to_owned(),
                    last_sync_at: None,
                },
            ],
        };

        let linear_teams = LinearTeamsResponse {
            linear_teams: vec![
                LinearTeamRecord {
                    name: "Platform".to_owned(),
                    key: "PLT".to_owned(),
                    total_issues: 420,
                    linked_issues: 361,
                },
                LinearTeamRecord {
                    name: "Mobile".to_owned(),
                    key: "MOB".to_owned(),
                    total_issues: 950,
                    linked_issues: 4,
                },
                LinearTeamRecord {
                    name: "Web".to_owned(),
                    key: "WEB".to_owned(),
                    total_issues: 180,
                    linked_issues: 0,
                },
                LinearTeamRecord {
                    name: "Data".to_owned(),
                    key: "DAT".to_owned(),
                    total_issues: 0,
                    linked_issues: 0,
                },
            ],
        };

        Self {
            deployment_frequency,
            lead_time,
            change_failure_rate,
            time_to_restore,
            correlations,
            connectors,
            linear_teams,
        }
    }

    /// Create an empty mock (every response present but blank).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            deployment_frequency: DoraMetricResponse::default(),
            lead_time: DoraMetricResponse::default(),
            change_failure_rate: DoraMetricResponse::default(),
            time_to_restore: DoraMetricResponse::default(),
            correlations: CorrelationResponse::default(),
            connectors: ConnectorsResponse::default(),
            linear_teams: LinearTeamsResponse::default(),
        }
    }
}

impl MetricsSource for MockMetricsSource {
    fn dora_metric(
        &self,
        metric: MetricId,
        _query: &MetricQuery,
    ) -> MetricsResult<DoraMetricResponse> {
        let response = match metric {
            MetricId::LeadTime => &self.lead_time,
            MetricId::ChangeFailureRate => &self.change_failure_rate,
            MetricId::TimeToRestore => &self.time_to_restore,
            // Non-DORA ids never reach here; serve the frequency sample
            // rather than failing a mock.
            MetricId::DeploymentFrequency
            | MetricId::Correlations
            | MetricId::Connectors
            | MetricId::LinearCoverage => &self.deployment_frequency,
        };
        Ok(response.clone())
    }

    fn correlations(&self, _query: &MetricQuery) -> MetricsResult<CorrelationResponse> {
        Ok(self.correlations.clone())
    }

    fn connectors(&self) -> MetricsResult<ConnectorsResponse> {
        Ok(self.connectors.clone())
    }

    fn linear_teams(&self) -> MetricsResult<LinearTeamsResponse> {
        Ok(self.linear_teams.clone())
    }

    fn trigger_sync(&self, _connector: &str) -> MetricsResult<()> {
        Ok(())
    }
}
