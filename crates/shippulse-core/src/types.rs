//! Shared value objects for the metric interpretation layer.
//!
//! Everything here is an immutable value produced per request: raw samples
//! and benchmark payloads as the metrics API ships them, plus the small
//! enums ([`Tier`], [`ImprovementDirection`]) the classifiers band them
//! into. None of these carry identity beyond value equality.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder rendered wherever a numeric or textual value is missing.
///
/// Missing data is never an error in this layer; it renders as this dash.
pub const PLACEHOLDER: &str = "—";

// ─── Benchmark Tiers ────────────────────────────────────────────────────────

/// Benchmark tier, classifying a metric value against industry thresholds.
///
/// Ordered worst-to-best so `Tier::Elite > Tier::Low` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Below the medium threshold.
    Low,
    /// Between the medium and high thresholds.
    Medium,
    /// Between the high and elite thresholds.
    High,
    /// At or beyond the elite threshold.
    Elite,
}

impl Tier {
    /// All tiers, worst first.
    pub const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Elite];

    /// Lowercase label matching the wire `category` field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Elite => "elite",
        }
    }

    /// Parse a wire category string, case-insensitively.
    ///
    /// Returns `None` for unrecognized categories; callers fall back to the
    /// default badge style rather than failing.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "elite" => Some(Self::Elite),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which way a metric improves.
///
/// Deployment frequency improves upward; lead time, change failure rate and
/// time-to-restore improve downward. Tier banding inverts its comparisons
/// on this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementDirection {
    /// Larger values are better.
    Higher,
    /// Smaller values are better.
    Lower,
}

impl ImprovementDirection {
    /// Lowercase label matching the wire `improvement_direction` field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Higher => "higher",
            Self::Lower => "lower",
        }
    }

    /// Parse a wire direction string, case-insensitively.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "higher" => Some(Self::Higher),
            "lower" => Some(Self::Lower),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImprovementDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-metric tier cutoffs from the benchmark payload.
///
/// For `Higher` metrics the thresholds descend (`elite` is the largest);
/// for `Lower` metrics they ascend (`elite` is the smallest).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkThresholds {
    /// Cutoff for the elite tier.
    pub elite: f64,
    /// Cutoff for the high tier.
    pub high: f64,
    /// Cutoff for the medium tier.
    pub medium: f64,
}

/// Benchmark context for a metric value, parsed from the wire payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Category the service assigned. `None` when the wire string was
    /// unrecognized; rendering falls back to the default badge style.
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Tier>,
    /// Tier cutoffs for this metric.
    pub thresholds: BenchmarkThresholds,
    /// Which way this metric improves.
    pub improvement_direction: ImprovementDirection,
    /// Free-text tier description, possibly `"{category}: "`-prefixed.
    pub description: Option<String>,
    /// Server-rendered prose describing the gap to the elite tier.
    pub gap_to_elite: Option<String>,
}

/// Unrecognized category strings decode to `None` rather than failing the
/// whole benchmark payload.
fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Tier>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Tier::from_wire))
}

// ─── Samples & Trends ───────────────────────────────────────────────────────

/// Trend block attached to a metric sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendInfo {
    /// Percent change versus the previous window.
    pub change_percent: f64,
    /// Whether the change moves in the metric's improving direction.
    pub is_improving: bool,
}

/// One metric reading with its optional trend and benchmark context.
///
/// Any field may be absent; absent numerics render as [`PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSample {
    /// Headline value (the wire `average`).
    pub value: Option<f64>,
    /// Total over the window, where the metric has one.
    pub total: Option<f64>,
    /// Trend versus the previous window.
    pub trend: Option<TrendInfo>,
    /// Benchmark context.
    pub benchmark: Option<Benchmark>,
}

// ─── Correlations ───────────────────────────────────────────────────────────

/// One pre-computed correlation between two metric series.
///
/// The coefficient arrives from the metrics API; this layer only labels it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    /// First metric in the pair.
    pub metric_a: String,
    /// Second metric in the pair.
    pub metric_b: String,
    /// Pearson coefficient, nominally in `[-1, 1]`.
    pub correlation: f64,
    /// How many periods the coefficient was computed over.
    #[serde(default)]
    pub period_count: Option<u32>,
}

// ─── Sync Coverage ──────────────────────────────────────────────────────────

/// Linked-versus-total counts for one coverage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// Display name of the row (e.g. a Linear team).
    pub name: String,
    /// Items linked to a counterpart.
    pub linked_count: u64,
    /// Total items.
    pub total_count: u64,
}

impl CoverageRow {
    /// Build a row, clamping `linked_count` so it never exceeds
    /// `total_count`.
    #[must_use]
    pub fn new(name: impl Into<String>, linked_count: u64, total_count: u64) -> Self {
        Self {
            name: name.into(),
            linked_count: linked_count.min(total_count),
            total_count,
        }
    }
}

/// Last-sync status of one data connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorStatus {
    /// Machine name of the connector (e.g. `github`, `linear`).
    pub connector_name: String,
    /// Human-readable connector name.
    pub display_name: String,
    /// When the connector last completed a sync. `None` means never.
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_worst_to_best() {
        assert!(Tier::Low < Tier::Medium);
        assert!(Tier::Medium < Tier::High);
        assert!(Tier::High < Tier::Elite);
    }

    #[test]
    fn tier_all_covers_every_variant() {
        assert_eq!(Tier::ALL.len(), 4);
        assert_eq!(Tier::ALL.first(), Some(&Tier::Low));
        assert_eq!(Tier::ALL.last(), Some(&Tier::Elite));
    }

    #[test]
    fn tier_from_wire_parses_known_categories() {
        assert_eq!(Tier::from_wire("elite"), Some(Tier::Elite));
        assert_eq!(Tier::from_wire("HIGH"), Some(Tier::High));
        assert_eq!(Tier::from_wire(" medium "), Some(Tier::Medium));
        assert_eq!(Tier::from_wire("Low"), Some(Tier::Low));
    }

    #[test]
    fn tier_from_wire_rejects_unknown_categories() {
        assert_eq!(Tier::from_wire("platinum"), None);
        assert_eq!(Tier::from_wire(""), None);
    }

    #[test]
    fn tier_serde_uses_wire_labels() {
        let json = serde_json::to_string(&Tier::Elite).unwrap();
        assert_eq!(json, "\"elite\"");
        let decoded: Tier = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(decoded, Tier::Low);
    }

    #[test]
    fn tier_display_matches_label() {
        assert_eq!(Tier::High.to_string(), "high");
    }

    #[test]
    fn direction_from_wire() {
        assert_eq!(
            ImprovementDirection::from_wire("higher"),
            Some(ImprovementDirection::Higher)
        );
        assert_eq!(
            ImprovementDirection::from_wire("Lower"),
            Some(ImprovementDirection::Lower)
        );
        assert_eq!(ImprovementDirection::from_wire("sideways"), None);
    }

    #[test]
    fn benchmark_serde_roundtrip() {
        let benchmark = Benchmark {
            category: Some(Tier::High),
            thresholds: BenchmarkThresholds {
                elite: 24.0,
                high: 168.0,
                medium: 720.0,
            },
            improvement_direction: ImprovementDirection::Lower,
            description: Some("high: ships within a week".into()),
            gap_to_elite: Some("2h from elite".into()),
        };

        let json = serde_json::to_string(&benchmark).unwrap();
        let decoded: Benchmark = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, benchmark);
    }

    #[test]
    fn unrecognized_category_decodes_to_none() {
        let decoded: Benchmark = serde_json::from_str(
            r#"{"category":"platinum",
                "thresholds":{"elite":10.0,"high":5.0,"medium":2.0},
                "improvement_direction":"higher"}"#,
        )
        .unwrap();
        assert!(decoded.category.is_none());

        let missing: Benchmark = serde_json::from_str(
            r#"{"thresholds":{"elite":10.0,"high":5.0,"medium":2.0},
                "improvement_direction":"higher"}"#,
        )
        .unwrap();
        assert!(missing.category.is_none());
    }

    #[test]
    fn metric_sample_defaults_to_all_absent() {
        let sample = MetricSample::default();
        assert!(sample.value.is_none());
        assert!(sample.total.is_none());
        assert!(sample.trend.is_none());
        assert!(sample.benchmark.is_none());
    }

    #[test]
    fn correlation_pair_period_count_defaults_to_none() {
        let decoded: CorrelationPair = serde_json::from_str(
            r#"{"metric_a":"deployment_frequency","metric_b":"lead_time","correlation":-0.72}"#,
        )
        .unwrap();
        assert_eq!(decoded.metric_a, "deployment_frequency");
        assert!(decoded.period_count.is_none());
    }

    #[test]
    fn coverage_row_clamps_linked_to_total() {
        let row = CoverageRow::new("Platform", 15, 10);
        assert_eq!(row.linked_count, 10);
        assert_eq!(row.total_count, 10);

        let row = CoverageRow::new("Mobile", 3, 10);
        assert_eq!(row.linked_count, 3);
    }

    #[test]
    fn connector_status_missing_last_sync_deserializes() {
        let decoded: ConnectorStatus = serde_json::from_str(
            r#"{"connector_name":"jira","display_name":"Jira"}"#,
        )
        .unwrap();
        assert!(decoded.last_sync_at.is_none());
    }

    #[test]
    fn placeholder_is_a_dash() {
        assert_eq!(PLACEHOLDER, "—");
    }
}
