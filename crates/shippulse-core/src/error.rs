use chrono::NaiveDate;

/// Unified error type covering all failure modes in the metric
/// interpretation layer.
///
/// Every variant includes an actionable message guiding the consumer toward
/// resolution. Fetch failures are surfaced, never retried here: a screen's
/// manual retry simply re-issues the same derived request. Missing numeric
/// fields and unrecognized enum values are *not* errors; classifiers and
/// formatters render a placeholder or default style instead.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The transport collaborator failed to fetch a metric.
    #[error("Fetch failed for {metric}: {source}. Re-issue the derived request to retry.")]
    FetchFailed {
        /// Metric identifier whose fetch failed (e.g. `dora/lead_time`).
        metric: String,
        /// The underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A date range was constructed with `start` after `end`.
    #[error("Invalid date range: start {start} is after end {end}. Swap the bounds or widen the range.")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// A configuration value is invalid.
    #[error("Invalid config {field} = \"{value}\": {reason}")]
    InvalidConfig {
        /// Which config field.
        field: String,
        /// The invalid value.
        value: String,
        /// Why it is invalid.
        reason: String,
    },

    /// A sync trigger was invoked while a previous run is still pending.
    #[error("Sync already running for {connector}. Wait for the current run to finish before re-triggering.")]
    SyncAlreadyRunning {
        /// Connector whose sync is in flight (e.g. `linear`).
        connector: String,
    },
}

/// Convenience alias used throughout the shippulse crate hierarchy.
pub type MetricsResult<T> = Result<T, MetricsError>;
