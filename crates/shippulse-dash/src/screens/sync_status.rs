//! Sync status screen: connector freshness and Linear linking coverage.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shippulse_core::cache_key::MetricId;
use shippulse_core::coverage::coverage_display;
use shippulse_core::format::format_time_ago;
use shippulse_core::types::ConnectorStatus;

use super::MetricRequest;
use crate::source::LinearTeamRecord;

/// One connector's freshness row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorRow {
    /// Machine name, e.g. `github`.
    pub connector_name: String,
    /// Human name, e.g. `GitHub`.
    pub display_name: String,
    /// Relative sync time: `"35 minutes ago"`, `"never"`.
    pub last_sync_label: String,
}

/// One team's linking-coverage bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageBarRow {
    /// Team display name.
    pub team: String,
    /// Linear team key.
    pub key: String,
    /// Linked issue count.
    pub linked: u64,
    /// Total issue count.
    pub total: u64,
    /// Textual percent: `"86%"`, `"<1%"`, or placeholder.
    pub percent_label: String,
    /// Bar width, `0..=100`; floors at 1 when anything is linked.
    pub bar_percent: u8,
}

/// View model for the sync status screen.
///
/// Never has an empty state: connector freshness is meaningful regardless
/// of the repository filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatusModel {
    /// Connector rows in API order.
    pub connectors: Vec<ConnectorRow>,
    /// Coverage rows in API order.
    pub coverage: Vec<CoverageBarRow>,
}

/// Requests this screen needs satisfied. Both are global endpoints with no
/// derived parameters.
#[must_use]
pub fn requests() -> Vec<MetricRequest> {
    vec![
        MetricRequest::bare(MetricId::Connectors),
        MetricRequest::bare(MetricId::LinearCoverage),
    ]
}

/// Build the view model. `now` anchors the relative sync times.
#[must_use]
pub fn build(
    connectors: &[ConnectorStatus],
    teams: &[LinearTeamRecord],
    now: DateTime<Utc>,
) -> SyncStatusModel {
    SyncStatusModel {
        connectors: connectors
            .iter()
            .map(|status| ConnectorRow {
                connector_name: status.connector_name.clone(),
                display_name: status.display_name.clone(),
                last_sync_label: format_time_ago(status.last_sync_at, now),
            })
            .collect(),
        coverage: teams.iter().map(coverage_row).collect(),
    }
}

fn coverage_row(team: &LinearTeamRecord) -> CoverageBarRow {
    let display = coverage_display(team.linked_issues, team.total_issues);
    CoverageBarRow {
        team: team.name.clone(),
        key: team.key.clone(),
        linked: team.linked_issues,
        total: team.total_issues,
        percent_label: display.percent_label,
        bar_percent: display.bar_percent,
    }
}
