//! Benchmarks screen: tier table with descriptions and elite gaps.

use serde::Serialize;

use shippulse_core::benchmark::{TierBadge, badge_or_default, gap_display, normalize_description, resolve_tier};
use shippulse_core::cache_key::MetricId;
use shippulse_core::config::DashboardConfig;
use shippulse_core::filter::FilterState;
use shippulse_core::format::format_hours;
use shippulse_core::types::{MetricSample, PLACEHOLDER, Tier};

use super::{MetricRequest, NO_REPOS_HINT, dora_requests};

/// One row of the benchmark table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    /// Which metric.
    pub metric: MetricId,
    /// Row title.
    pub title: &'static str,
    /// Formatted current value.
    pub value_label: String,
    /// Resolved tier.
    pub tier: Option<Tier>,
    /// Lowercase tier label, placeholder when unresolved.
    pub tier_label: &'static str,
    /// Chip colors.
    pub badge: TierBadge,
    /// Tier description with the redundant category prefix stripped.
    pub description: String,
    /// Distance to the elite tier, or placeholder.
    pub gap_to_elite: String,
}

/// View model for the benchmarks screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarksModel {
    /// Rows in DORA order.
    pub rows: Vec<BenchmarkRow>,
    /// Set when the repository filter excludes everything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

impl BenchmarksModel {
    /// Model for the no-repositories-selected state.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: Vec::new(),
            empty_state: Some(NO_REPOS_HINT),
        }
    }
}

/// Requests this screen needs satisfied for the given filter snapshot.
///
/// Identical to the overview's requests, so the two screens share cached
/// fetches.
#[must_use]
pub fn requests(filters: &FilterState, config: &DashboardConfig) -> Vec<MetricRequest> {
    dora_requests(filters, config)
}

/// Build the view model from fetched samples.
#[must_use]
pub fn build(samples: &[(MetricId, Option<MetricSample>)]) -> BenchmarksModel {
    let rows = samples
        .iter()
        .map(|(metric, sample)| row(*metric, sample.as_ref()))
        .collect();
    BenchmarksModel {
        rows,
        empty_state: None,
    }
}

fn row(metric: MetricId, sample: Option<&MetricSample>) -> BenchmarkRow {
    let value = sample.and_then(|s| s.value);
    let benchmark = sample.and_then(|s| s.benchmark.as_ref());
    let tier = benchmark.and_then(|b| resolve_tier(value, b));
    BenchmarkRow {
        metric,
        title: metric.title(),
        value_label: value_label(metric, value),
        tier,
        tier_label: tier.map_or(PLACEHOLDER, Tier::label),
        badge: badge_or_default(tier),
        description: normalize_description(
            benchmark.and_then(|b| b.description.as_deref()),
            tier,
        ),
        gap_to_elite: gap_display(benchmark.and_then(|b| b.gap_to_elite.as_deref())),
    }
}

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

#[cfg(test)]
mod tests {
    use super::*;
    use shippulse_core::types::{Benchmark, BenchmarkThresholds, ImprovementDirection};

    fn failure_rate_sample() -> MetricSample {
        MetricSample {
            value: Some(4.2),
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
            ..MetricSample::default()
        }
    }

    #[test]
    fn row_resolves_tier_and_strips_description_prefix() {
        let model = build(&[(MetricId::ChangeFailureRate, Some(failure_rate_sample()))]);
        let row = &model.rows[0];
        assert_eq!(row.tier, Some(Tier::Elite));
        assert_eq!(row.tier_label, "elite");
        assert_eq!(row.badge, Tier::Elite.badge());
        assert_eq!(row.description, "Fewer than one in twenty deploys fail");
        assert_eq!(row.gap_to_elite, PLACEHOLDER);
        assert_eq!(row.value_label, "4.2%");
    }

    #[test]
    fn gap_text_passes_through() {
        let mut sample = failure_rate_sample();
        if let Some(benchmark) = sample.benchmark.as_mut() {
            benchmark.gap_to_elite = Some("0.6 deploys/day from elite".to_owned());
        }
        let model = build(&[(MetricId::ChangeFailureRate, Some(sample))]);
        assert_eq!(model.rows[0].gap_to_elite, "0.6 deploys/day from elite");
    }

    #[test]
    fn live_value_overrides_service_category() {
        // Service said elite, but a 12% live value bands as medium.
        let mut sample = failure_rate_sample();
        sample.value = Some(12.0);
        let model = build(&[(MetricId::ChangeFailureRate, Some(sample))]);
        assert_eq!(model.rows[0].tier, Some(Tier::Medium));
        assert_eq!(model.rows[0].tier_label, "medium");
    }

    #[test]
    fn missing_benchmark_renders_placeholders() {
        let sample = MetricSample {
            value: Some(2.0),
            ..MetricSample::default()
        };
        let model = build(&[(MetricId::DeploymentFrequency, Some(sample))]);
        let row = &model.rows[0];
        assert!(row.tier.is_none());
        assert_eq!(row.tier_label, PLACEHOLDER);
        assert_eq!(row.badge, badge_or_default(None));
        assert_eq!(row.description, PLACEHOLDER);
        assert_eq!(row.gap_to_elite, PLACEHOLDER);
        assert_eq!(row.value_label, "2.0/day");
    }

    #[test]
    fn empty_model_has_no_rows() {
        let model = BenchmarksModel::empty();
        assert!(model.rows.is_empty());
        assert_eq!(model.empty_state, Some(NO_REPOS_HINT));
    }

    #[test]
    fn requests_match_the_overview_exactly() {
        use chrono::NaiveDate;
        use shippulse_core::filter::DateRange;

        let range = DateRange::lookback(
            NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
            90,
        );
        let filters = FilterState::new(range);
        let config = DashboardConfig::default();
        assert_eq!(
            requests(&filters, &config),
            super::super::overview::requests(&filters, &config)
        );
    }
}
