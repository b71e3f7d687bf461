//! Correlation strength labeling.
//!
//! Coefficients arrive pre-computed from the metrics API; this module only
//! maps a Pearson `r` onto a human label ("Strong negative", "Very weak")
//! plus a band color. Band order is fixed and first-match: `|r| >= 0.7`
//! strong, `>= 0.4` moderate, `>= 0.2` weak, everything else very weak.
//! The very-weak band drops the sign entirely.

use serde::Serialize;

// ─── Strength Bands ─────────────────────────────────────────────────────────

/// Correlation strength band on `|r|`, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    /// `|r| < 0.2`.
    VeryWeak,
    /// `0.2 <= |r| < 0.4`.
    Weak,
    /// `0.4 <= |r| < 0.7`.
    Moderate,
    /// `|r| >= 0.7`.
    Strong,
}

impl CorrelationStrength {
    /// All bands, weakest first.
    pub const ALL: &'static [Self] = &[
        Self::VeryWeak,
        Self::Weak,
        Self::Moderate,
        Self::Strong,
    ];

    /// Band adjective as rendered in labels.
    #[must_use]
    pub const fn adjective(self) -> &'static str {
        match self {
            Self::VeryWeak => "Very weak",
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
        }
    }

    /// Display color keyed off the band, independent of sign.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::VeryWeak => "#6b7280",
            Self::Weak => "#d97706",
            Self::Moderate => "#2563eb",
            Self::Strong => "#15803d",
        }
    }
}

// ─── Classification ─────────────────────────────────────────────────────────

/// Classified correlation: band plus sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrelationLabel {
    /// Strength band on `|r|`.
    pub strength: CorrelationStrength,
    /// `r >= 0`. Ignored in the very-weak label.
    pub positive: bool,
}

impl CorrelationLabel {
    /// Human label: `"Strong positive"`, `"Weak negative"`, or the
    /// sign-free `"Very weak"`.
    #[must_use]
    pub fn text(&self) -> String {
        match self.strength {
            CorrelationStrength::VeryWeak => self.strength.adjective().to_owned(),
            _ => format!(
                "{} {}",
                self.strength.adjective(),
                if self.positive { "positive" } else { "negative" }
            ),
        }
    }

    /// Display color for this label's band.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.strength.color()
    }
}

impl std::fmt::Display for CorrelationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Classify a Pearson coefficient into a strength band plus sign.
///
/// Total over all inputs: out-of-domain coefficients are clamped to
/// `[-1, 1]` and `NaN` classifies as very weak.
#[must_use]
pub fn classify_correlation(r: f64) -> CorrelationLabel {
    let clamped = if r.is_nan() { 0.0 } else { r.clamp(-1.0, 1.0) };
    let magnitude = clamped.abs();
    let strength = if magnitude >= 0.7 {
        CorrelationStrength::Strong
    } else if magnitude >= 0.4 {
        CorrelationStrength::Moderate
    } else if magnitude >= 0.2 {
        CorrelationStrength::Weak
    } else {
        CorrelationStrength::VeryWeak
    };
    CorrelationLabel {
        strength,
        positive: clamped >= 0.0,
    }
}
