//! Wire-parameter derivation from filter state.
//!
//! [`MetricQuery`] is the canonical parameter object every screen sends to
//! the metrics API. It is derived from a [`FilterState`] snapshot by pure
//! functions, so equal snapshots always produce equal queries, and equal
//! queries always produce equal cache keys.
//!
//! The multi-repo `repo_ids` convention is canonical;
//! [`MetricQuery::legacy_repo_id`] is the compatibility shim for the older
//! single-repo endpoints.

use serde::Serialize;

use crate::filter::{ChartPeriod, FilterState, RepoId, TeamFilter, TeamId};

/// Canonical query parameters for one metrics-API request.
///
/// Optional parameters serialize only when present, so an omitted filter
/// is truly absent from the request, not an empty array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricQuery {
    /// ISO start date, inclusive.
    pub start_date: String,
    /// ISO end date, inclusive.
    pub end_date: String,
    /// Repository filter; absent means "all repositories".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_ids: Option<Vec<RepoId>>,
    /// Team filter; never contains the unassigned sentinel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<Vec<TeamId>>,
    /// Restrict to items with no team assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_teams: Option<bool>,
    /// Developer filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_logins: Option<Vec<String>>,
    /// Chart bucketing granularity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<ChartPeriod>,
    /// Ask the API to include the trend block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_trend: Option<bool>,
    /// Ask the API to include the benchmark block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_benchmark: Option<bool>,
}

impl MetricQuery {
    /// Derive the base query from a filter snapshot.
    ///
    /// Pure function of the snapshot: no I/O, no clock, no memoization.
    /// The exactly-unassigned team selection translates to
    /// `no_teams = true` with the team-id parameter omitted entirely; the
    /// sentinel id is never sent.
    #[must_use]
    pub fn from_filters(filters: &FilterState) -> Self {
        let (team_ids, no_teams) = team_wire(&filters.teams);
        Self {
            start_date: filters.date_range.start_iso(),
            end_date: filters.date_range.end_iso(),
            repo_ids: filters.repos.ids_for_api().map(<[RepoId]>::to_vec),
            team_ids,
            no_teams,
            author_logins: filters.developers.logins_for_api().map(<[String]>::to_vec),
            period: None,
            include_trend: None,
            include_benchmark: None,
        }
    }

    /// Set the chart granularity parameter.
    #[must_use]
    pub fn with_period(mut self, period: ChartPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the `include_trend` flag.
    #[must_use]
    pub fn with_trend(mut self, include: bool) -> Self {
        self.include_trend = Some(include);
        self
    }

    /// Set the `include_benchmark` flag.
    #[must_use]
    pub fn with_benchmark(mut self, include: bool) -> Self {
        self.include_benchmark = Some(include);
        self
    }

    /// Single repo id for legacy single-repo-scoped endpoints: the first
    /// (lowest) selected id, or `None` when no repo filter applies.
    #[must_use]
    pub fn legacy_repo_id(&self) -> Option<RepoId> {
        self.repo_ids.as_ref().and_then(|ids| ids.first().copied())
    }
}

/// Translate a team selection into its wire parameters.
///
/// The exactly-unassigned case becomes `no_teams = true` with no team-id
/// parameter; every other selection sends the legacy id list (sentinel
/// included for mixed selections).
fn team_wire(teams: &TeamFilter) -> (Option<Vec<TeamId>>, Option<bool>) {
    if teams.is_only_unassigned() {
        (None, Some(true))
    } else {
        (teams.ids_for_api(), None)
    }
}
