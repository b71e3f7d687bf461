//! Dashboard configuration.
//!
//! [`DashboardConfig`] holds the shell's tuning knobs: how far back the
//! default reporting window reaches, which chart granularity screens start
//! with, and whether metric requests ask the API for trend and benchmark
//! blocks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::filter::{ChartPeriod, DateRange, FilterState};

/// Configuration for the dashboard shell.
///
/// All fields have sensible defaults. Override selectively via
/// [`with_env_overrides`](Self::with_env_overrides).
///
/// # Environment Variable Overrides
///
/// | Variable                      | Field               | Default |
/// |-------------------------------|---------------------|---------|
/// | `SHIPPULSE_LOOKBACK_DAYS`     | `lookback_days`     | `90`    |
/// | `SHIPPULSE_CHART_PERIOD`      | `default_period`    | `week`  |
/// | `SHIPPULSE_INCLUDE_TREND`     | `include_trend`     | `true`  |
/// | `SHIPPULSE_INCLUDE_BENCHMARK` | `include_benchmark` | `true`  |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Calendar days the default reporting window reaches back, inclusive
    /// of today. Default: 90.
    pub lookback_days: u32,

    /// Chart granularity screens start with. Default: weekly.
    pub default_period: ChartPeriod,

    /// Ask the API for the trend block on DORA requests.
    /// Default: true.
    pub include_trend: bool,

    /// Ask the API for the benchmark block on DORA requests.
    /// Default: true.
    pub include_benchmark: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            default_period: ChartPeriod::Week,
            include_trend: true,
            include_benchmark: true,
        }
    }
}

impl DashboardConfig {
    /// Load overrides from environment variables.
    ///
    /// Only overrides fields for which environment variables are set.
    /// Invalid values are silently ignored (defaults are kept).
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SHIPPULSE_LOOKBACK_DAYS")
            && let Ok(days) = val.parse::<u32>()
            && days >= 1
        {
            self.lookback_days = days;
        }
        if let Ok(val) = std::env::var("SHIPPULSE_CHART_PERIOD")
            && let Some(period) = ChartPeriod::from_label(&val)
        {
            self.default_period = period;
        }
        if let Ok(val) = std::env::var("SHIPPULSE_INCLUDE_TREND") {
            self.include_trend = val == "true" || val == "1";
        }
        if let Ok(val) = std::env::var("SHIPPULSE_INCLUDE_BENCHMARK") {
            self.include_benchmark = val == "true" || val == "1";
        }
        self
    }

    /// Reject configurations no screen could work with.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidConfig`] when `lookback_days` is
    /// zero.
    pub fn validated(self) -> MetricsResult<Self> {
        if self.lookback_days == 0 {
            return Err(MetricsError::InvalidConfig {
                field: "lookback_days".into(),
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(self)
    }

    /// The filter state screens start from: an unfiltered lookback window
    /// ending today, at the configured granularity.
    #[must_use]
    pub fn initial_filters(&self, today: NaiveDate) -> FilterState {
        FilterState::new(DateRange::lookback(today, self.lookback_days))
            .with_period(self.default_period)
    }
}
