//! Overview screen: one headline card per DORA metric.

use serde::Serialize;

use shippulse_core::benchmark::{TierBadge, badge_or_default, resolve_tier};
use shippulse_core::cache_key::MetricId;
use shippulse_core::config::DashboardConfig;
use shippulse_core::filter::FilterState;
use shippulse_core::format::format_hours;
use shippulse_core::types::{MetricSample, PLACEHOLDER, Tier, TrendInfo};

use super::{MetricRequest, NO_REPOS_HINT, dora_requests};

/// One headline metric card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    /// Which metric.
    pub metric: MetricId,
    /// Card title.
    pub title: &'static str,
    /// Formatted value, unit included. Placeholder when the value is
    /// missing or still loading.
    pub value_label: String,
    /// Resolved tier, when a benchmark was available.
    pub tier: Option<Tier>,
    /// Chip colors; medium style when the tier is unresolved.
    pub badge: TierBadge,
    /// Trend versus the previous window.
    pub trend: Option<TrendInfo>,
}

/// View model for the overview screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewModel {
    /// Cards in DORA order.
    pub cards: Vec<MetricCard>,
    /// Set when the repository filter excludes everything; no cards then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

impl OverviewModel {
    /// Model for the no-repositories-selected state.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cards: Vec::new(),
            empty_state: Some(NO_REPOS_HINT),
        }
    }
}

/// Requests this screen needs satisfied for the given filter snapshot.
#[must_use]
pub fn requests(filters: &FilterState, config: &DashboardConfig) -> Vec<MetricRequest> {
    dora_requests(filters, config)
}

/// Build the view model from fetched samples.
///
/// `samples` pairs each metric with its payload; `None` marks a metric
/// still loading or failed, whose card renders placeholders.
#[must_use]
pub fn build(samples: &[(MetricId, Option<MetricSample>)]) -> OverviewModel {
    let cards = samples
        .iter()
        .map(|(metric, sample)| card(*metric, sample.as_ref()))
        .collect();
    OverviewModel {
        cards,
        empty_state: None,
    }
}

fn card(metric: MetricId, sample: Option<&MetricSample>) -> MetricCard {
    let value = sample.and_then(|s| s.value);
    let tier = sample
        .and_then(|s| s.benchmark.as_ref())
        .and_then(|benchmark| resolve_tier(value, benchmark));
    MetricCard {
        metric,
        title: metric.title(),
        value_label: value_label(metric, value),
        tier,
        badge: badge_or_default(tier),
        trend: sample.and_then(|s| s.trend),
    }
}

/// Format a metric value with its unit.
fn value_label(metric: MetricId, value: Option<f64>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_owned();
    };
    match metric {
        MetricId::LeadTime | MetricId::TimeToRestore => format_hours(value),
        MetricId::ChangeFailureRate => format!("{value:.1}%"),
        MetricId::DeploymentFrequency => format!("{value:.1}/day"),
        _ => format!("{value:.1}"),
    }
}
