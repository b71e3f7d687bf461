//! Correlations screen: metric pairs ranked by strength.

use serde::Serialize;

use shippulse_core::cache_key::MetricId;
use shippulse_core::correlation::classify_correlation;
use shippulse_core::filter::FilterState;
use shippulse_core::query::MetricQuery;
use shippulse_core::types::CorrelationPair;

use super::{MetricRequest, NO_REPOS_HINT};

/// One row of the correlation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    /// Pair label, e.g. `"Deployment Frequency vs Lead Time for Changes"`.
    pub label: String,
    /// Coefficient, clamped to `[-1, 1]`.
    pub coefficient: f64,
    /// Signed two-decimal rendering of the coefficient.
    pub coefficient_label: String,
    /// Strength text, e.g. `"Strong negative"`.
    pub strength: String,
    /// Strength band color.
    pub color: &'static str,
    /// Number of periods the coefficient was computed over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_count: Option<u32>,
}

/// View model for the correlations screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationsModel {
    /// Rows, strongest magnitude first.
    pub rows: Vec<CorrelationRow>,
    /// Set when the repository filter excludes everything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

impl CorrelationsModel {
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
/// Correlations take the base query only: no chart period, no trend or
/// benchmark blocks.
#[must_use]
pub fn requests(filters: &FilterState) -> Vec<MetricRequest> {
    vec![MetricRequest::parameterized(
        MetricId::Correlations,
        MetricQuery::from_filters(filters),
    )]
}

/// Build the view model from fetched pairs, strongest magnitude first.
///
/// Equal magnitudes order by pair name so re-renders are stable.
#[must_use]
pub fn build(pairs: &[CorrelationPair]) -> CorrelationsModel {
    let mut sorted: Vec<&CorrelationPair> = pairs.iter().collect();
    sorted.sort_by(|a, b| {
        magnitude(b.correlation)
            .total_cmp(&magnitude(a.correlation))
            .then_with(|| a.metric_a.cmp(&b.metric_a))
            .then_with(|| a.metric_b.cmp(&b.metric_b))
    });
    CorrelationsModel {
        rows: sorted.into_iter().map(row).collect(),
        empty_state: None,
    }
}

fn magnitude(r: f64) -> f64 {
    if r.is_nan() { 0.0 } else { r.clamp(-1.0, 1.0).abs() }
}

fn row(pair: &CorrelationPair) -> CorrelationRow {
    let label = classify_correlation(pair.correlation);
    let clamped = if pair.correlation.is_nan() {
        0.0
    } else {
        pair.correlation.clamp(-1.0, 1.0)
    };
    CorrelationRow {
        label: format!(
            "{} vs {}",
            metric_title(&pair.metric_a),
            metric_title(&pair.metric_b)
        ),
        coefficient: clamped,
        coefficient_label: format!("{clamped:+.2}"),
        strength: label.text(),
        color: label.color(),
        period_count: pair.period_count,
    }
}

/// Title for a wire metric name; unknown names pass through unchanged.
fn metric_title(name: &str) -> String {
    MetricId::DORA
        .iter()
        .find(|m| {
            m.as_str()
                .split_once('/')
                .is_some_and(|(_, short)| short == name)
        })
        .map_or_else(|| name.to_owned(), |m| m.title().to_owned())
}
