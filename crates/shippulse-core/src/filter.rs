//! Filter selections shared by every dashboard screen.
//!
//! [`FilterState`] is an immutable value: the shell replaces it on user
//! interaction and screens derive their API parameters from a snapshot via
//! pure functions (see [`crate::query`]). Equal snapshots always derive
//! equal parameters, which is what keeps cache keys consistent across
//! screens.
//!
//! Selections use tagged variants instead of "empty set plus a side flag":
//! [`RepoFilter::All`] means "apply no repo filter" while
//! [`RepoFilter::None`] means "the user explicitly deselected every repo",
//! and the unassigned-team sentinel lives in a dedicated
//! `include_unassigned` flag rather than hiding inside the id list.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

/// Repository identifier as issued by the metrics API.
pub type RepoId = i64;

/// Team identifier as issued by the metrics API.
pub type TeamId = i64;

/// Reserved sentinel meaning "items with no team assigned".
///
/// Accepted in id lists at construction boundaries for wire compatibility;
/// internally it is normalized into
/// [`TeamFilter::Selected`]`::include_unassigned`.
pub const TEAM_ID_NONE: TeamId = -1;

// ─── Date Range ─────────────────────────────────────────────────────────────

/// Inclusive calendar-date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidDateRange`] when the bounds are
    /// reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> MetricsResult<Self> {
        if start > end {
            return Err(MetricsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering the `days` calendar days ending at `end`, inclusive.
    ///
    /// `days` is clamped to at least 1; a lookback reaching past the
    /// calendar floor saturates rather than failing.
    #[must_use]
    pub fn lookback(end: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.max(1) - 1);
        let start = end.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Inclusive start date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Inclusive end date.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start date as an ISO `YYYY-MM-DD` string, no time component.
    #[must_use]
    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End date as an ISO `YYYY-MM-DD` string, no time component.
    #[must_use]
    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

// ─── Chart Period ───────────────────────────────────────────────────────────

/// Chart bucketing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPeriod {
    /// Daily buckets.
    Day,
    /// Weekly buckets.
    Week,
    /// Monthly buckets.
    Month,
}

impl ChartPeriod {
    /// All granularities, finest first.
    pub const ALL: &'static [Self] = &[Self::Day, Self::Week, Self::Month];

    /// Wire value for the `period` query parameter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Next coarser granularity, cycling back to daily.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Day => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Day,
        }
    }

    /// Parse a wire/config label, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ─── Repository Filter ──────────────────────────────────────────────────────

/// Repository selection.
///
/// `All` and `None` are distinct on purpose: an empty id set is ambiguous
/// between "no filter" and "user deselected everything", and screens must
/// render an empty state (not fetch everything) in the latter case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoFilter {
    /// Apply no repo filter; queries span every repository.
    All,
    /// The user explicitly deselected every repository.
    None,
    /// A non-empty, sorted, deduplicated set of repositories.
    Selected(Vec<RepoId>),
}

impl RepoFilter {
    /// Build a selection from arbitrary ids: sorted, deduplicated.
    /// An empty iterator is an explicit deselection, not "all".
    #[must_use]
    pub fn selected(ids: impl IntoIterator<Item = RepoId>) -> Self {
        let mut ids: Vec<RepoId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() { Self::None } else { Self::Selected(ids) }
    }

    /// True when the user explicitly deselected every repository.
    ///
    /// Screens whose queries are repo-scoped must check this before
    /// deriving a request; when true they render an empty state and skip
    /// the fetch.
    #[must_use]
    pub const fn is_none_selected(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Ids for the `repo_ids` API parameter, or `None` when no repo
    /// filter applies.
    #[must_use]
    pub fn ids_for_api(&self) -> Option<&[RepoId]> {
        match self {
            Self::Selected(ids) => Some(ids),
            Self::All | Self::None => None,
        }
    }

    /// First selected id (lowest, deterministic) for legacy single-repo
    /// endpoints.
    #[must_use]
    pub fn first_id(&self) -> Option<RepoId> {
        match self {
            Self::Selected(ids) => ids.first().copied(),
            Self::All | Self::None => None,
        }
    }

    /// Toggle one repo in or out of the selection.
    ///
    /// Toggling from `All` narrows to just that repo; toggling the last
    /// selected repo off yields the explicit `None`.
    #[must_use]
    pub fn toggled(&self, id: RepoId) -> Self {
        match self {
            Self::All | Self::None => Self::Selected(vec![id]),
            Self::Selected(ids) => {
                let mut ids = ids.clone();
                match ids.binary_search(&id) {
                    Ok(pos) => {
                        ids.remove(pos);
                    }
                    Err(pos) => ids.insert(pos, id),
                }
                if ids.is_empty() { Self::None } else { Self::Selected(ids) }
            }
        }
    }
}

// ─── Team Filter ────────────────────────────────────────────────────────────

/// Team selection.
///
/// The "items with no team assigned" condition is carried as the
/// `include_unassigned` flag; [`TEAM_ID_NONE`] never appears inside `ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamFilter {
    /// Apply no team filter.
    All,
    /// A concrete selection of teams and/or the unassigned bucket.
    Selected {
        /// Sorted, deduplicated real team ids.
        ids: Vec<TeamId>,
        /// Include items with no team assigned.
        include_unassigned: bool,
    },
}

impl TeamFilter {
    /// Build a selection from arbitrary ids: sorted, deduplicated, with
    /// any [`TEAM_ID_NONE`] occurrence normalized into the
    /// `include_unassigned` flag. An empty selection with the flag off
    /// collapses to `All`.
    #[must_use]
    pub fn selected(ids: impl IntoIterator<Item = TeamId>, include_unassigned: bool) -> Self {
        let mut real: Vec<TeamId> = Vec::new();
        let mut unassigned = include_unassigned;
        for id in ids {
            if id == TEAM_ID_NONE {
                unassigned = true;
            } else {
                real.push(id);
            }
        }
        real.sort_unstable();
        real.dedup();
        if real.is_empty() && !unassigned {
            Self::All
        } else {
            Self::Selected {
                ids: real,
                include_unassigned: unassigned,
            }
        }
    }

    /// Selection holding only the unassigned bucket.
    #[must_use]
    pub const fn only_unassigned() -> Self {
        Self::Selected {
            ids: Vec::new(),
            include_unassigned: true,
        }
    }

    /// True when the selection is exactly the unassigned bucket.
    #[must_use]
    pub fn is_only_unassigned(&self) -> bool {
        matches!(self, Self::Selected { ids, include_unassigned: true } if ids.is_empty())
    }

    /// Ids in the legacy wire shape: sorted real ids with
    /// [`TEAM_ID_NONE`] appended when the unassigned bucket is selected.
    /// `None` when no team filter applies.
    ///
    /// Request building must special-case the exactly-unassigned
    /// selection into `no_teams = true` instead of sending the sentinel
    /// (see [`crate::query::MetricQuery::from_filters`]).
    #[must_use]
    pub fn ids_for_api(&self) -> Option<Vec<TeamId>> {
        match self {
            Self::All => None,
            Self::Selected {
                ids,
                include_unassigned,
            } => {
                let mut out = ids.clone();
                if *include_unassigned {
                    out.push(TEAM_ID_NONE);
                }
                Some(out)
            }
        }
    }
}

// ─── Developer Filter ───────────────────────────────────────────────────────

/// Developer (author login) selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeveloperFilter {
    /// Apply no developer filter.
    All,
    /// A non-empty, sorted, deduplicated set of author logins.
    Selected(Vec<String>),
}

impl DeveloperFilter {
    /// Build a selection from arbitrary logins: sorted, deduplicated.
    /// An empty iterator collapses to `All`.
    #[must_use]
    pub fn selected(logins: impl IntoIterator<Item = String>) -> Self {
        let mut logins: Vec<String> = logins.into_iter().collect();
        logins.sort_unstable();
        logins.dedup();
        if logins.is_empty() {
            Self::All
        } else {
            Self::Selected(logins)
        }
    }

    /// Logins for the `author_logins` API parameter, or `None` when no
    /// developer filter applies.
    #[must_use]
    pub fn logins_for_api(&self) -> Option<&[String]> {
        match self {
            Self::Selected(logins) => Some(logins),
            Self::All => None,
        }
    }
}

// ─── Filter State ───────────────────────────────────────────────────────────

/// The single shared set of filter selections every screen derives from.
///
/// Owned by the dashboard shell and replaced wholesale on user
/// interaction; session lifetime, no persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Inclusive reporting window.
    pub date_range: DateRange,
    /// Repository selection.
    pub repos: RepoFilter,
    /// Team selection.
    pub teams: TeamFilter,
    /// Developer selection.
    pub developers: DeveloperFilter,
    /// Chart bucketing granularity.
    pub chart_period: ChartPeriod,
}

impl FilterState {
    /// Unfiltered state over `date_range` with weekly charts.
    #[must_use]
    pub const fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            repos: RepoFilter::All,
            teams: TeamFilter::All,
            developers: DeveloperFilter::All,
            chart_period: ChartPeriod::Week,
        }
    }

    /// Replace the repository selection.
    #[must_use]
    pub fn with_repos(mut self, repos: RepoFilter) -> Self {
        self.repos = repos;
        self
    }

    /// Replace the team selection.
    #[must_use]
    pub fn with_teams(mut self, teams: TeamFilter) -> Self {
        self.teams = teams;
        self
    }

    /// Replace the developer selection.
    #[must_use]
    pub fn with_developers(mut self, developers: DeveloperFilter) -> Self {
        self.developers = developers;
        self
    }

    /// Replace the chart granularity.
    #[must_use]
    pub fn with_period(mut self, period: ChartPeriod) -> Self {
        self.chart_period = period;
        self
    }
}
