//! Benchmark tier classification for delivery metrics.
//!
//! The metrics API ships per-metric thresholds plus an improvement
//! direction; this module positions a raw value on the
//! elite/high/medium/low ladder and produces render-ready tier metadata
//! (badge colors, normalized descriptions) so every screen presents tiers
//! identically.
//!
//! The direction flip is the correctness hot spot: `Higher` metrics band
//! with `>=` against descending thresholds, `Lower` metrics band with `<`
//! against ascending thresholds. Both directions are boundary-tested below.

use serde::Serialize;

use crate::types::{Benchmark, BenchmarkThresholds, ImprovementDirection, PLACEHOLDER, Tier};

// ─── Tier Banding ───────────────────────────────────────────────────────────

/// Band a raw metric value into a tier, direction-aware.
///
/// For `Higher` metrics: elite means `v >= elite`, high means
/// `high <= v < elite`, medium means `medium <= v < high`, low is the rest.
/// For `Lower` metrics every comparison inverts: elite means `v < elite`,
/// high means `elite <= v < high`, and so on. A value exactly at the elite
/// threshold is elite for `Higher` but only high for `Lower`.
///
/// Total over all inputs; `NaN` fails every band test and lands in `Low`.
#[must_use]
pub fn classify_tier(
    value: f64,
    thresholds: &BenchmarkThresholds,
    direction: ImprovementDirection,
) -> Tier {
    match direction {
        ImprovementDirection::Higher => {
            if value >= thresholds.elite {
                Tier::Elite
            } else if value >= thresholds.high {
                Tier::High
            } else if value >= thresholds.medium {
                Tier::Medium
            } else {
                Tier::Low
            }
        }
        ImprovementDirection::Lower => {
            if value < thresholds.elite {
                Tier::Elite
            } else if value < thresholds.high {
                Tier::High
            } else if value < thresholds.medium {
                Tier::Medium
            } else {
                Tier::Low
            }
        }
    }
}

/// Resolve the tier for a sample: classify the live value against the
/// thresholds when one is present, otherwise trust the category the
/// service assigned.
#[must_use]
pub fn resolve_tier(value: Option<f64>, benchmark: &Benchmark) -> Option<Tier> {
    match value {
        Some(v) => Some(classify_tier(
            v,
            &benchmark.thresholds,
            benchmark.improvement_direction,
        )),
        None => benchmark.category,
    }
}

// ─── Badges ─────────────────────────────────────────────────────────────────

/// Colors for rendering a tier chip. Plain hex strings, independent of any
/// rendering technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierBadge {
    /// Chip fill.
    pub background: &'static str,
    /// Text color.
    pub foreground: &'static str,
    /// Chip outline.
    pub border: &'static str,
}

impl Tier {
    /// Chip colors for this tier.
    #[must_use]
    pub const fn badge(self) -> TierBadge {
        match self {
            Self::Elite => TierBadge {
                background: "#ecfdf5",
                foreground: "#047857",
                border: "#a7f3d0",
            },
            Self::High => TierBadge {
                background: "#eff6ff",
                foreground: "#1d4ed8",
                border: "#bfdbfe",
            },
            Self::Medium => TierBadge {
                background: "#fffbeb",
                foreground: "#b45309",
                border: "#fde68a",
            },
            Self::Low => TierBadge {
                background: "#fef2f2",
                foreground: "#b91c1c",
                border: "#fecaca",
            },
        }
    }
}

/// Badge for a possibly-unrecognized category.
///
/// Unknown or missing tiers fall back to the medium style so a new
/// category the service introduces never blanks a rendered chip.
#[must_use]
pub const fn badge_or_default(tier: Option<Tier>) -> TierBadge {
    match tier {
        Some(tier) => tier.badge(),
        None => Tier::Medium.badge(),
    }
}

// ─── Description Normalization ──────────────────────────────────────────────

/// Strip the redundant `"{category}: "` prefix the benchmark service puts
/// in front of tier descriptions.
///
/// Matching is case-insensitive and only fires when the prefix is actually
/// present; other text passes through unchanged. The output is never
/// empty: absent or empty input renders as [`PLACEHOLDER`].
#[must_use]
pub fn normalize_description(description: Option<&str>, tier: Option<Tier>) -> String {
    let Some(text) = description.filter(|t| !t.is_empty()) else {
        return PLACEHOLDER.to_owned();
    };
    let stripped = match tier {
        Some(tier) => strip_tier_prefix(text, tier),
        None => text,
    };
    if stripped.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        stripped.to_owned()
    }
}

fn strip_tier_prefix(text: &str, tier: Tier) -> &str {
    let label = tier.label();
    if let Some(head) = text.get(..label.len())
        && head.eq_ignore_ascii_case(label)
        && text.get(label.len()..label.len() + 2) == Some(": ")
    {
        &text[label.len() + 2..]
    } else {
        text
    }
}

/// Gap-to-elite is server-rendered prose; pass it through or placeholder.
#[must_use]
pub fn gap_display(gap: Option<&str>) -> String {
    match gap {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => PLACEHOLDER.to_owned(),
    }
}
