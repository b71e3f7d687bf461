//! Shared dashboard state.
//!
//! One [`DashboardState`] instance backs every screen: the current filter
//! snapshot plus refresh bookkeeping. Filter updates replace the snapshot
//! wholesale; nothing here touches the request cache, because derived
//! cache keys change with the filters and superseded combinations simply
//! stop being requested.

use std::time::Instant;

use chrono::NaiveDate;

use shippulse_core::config::DashboardConfig;
use shippulse_core::filter::{
    ChartPeriod, DateRange, DeveloperFilter, FilterState, RepoFilter, RepoId, TeamFilter,
};

/// Filter snapshot and refresh bookkeeping shared by all screens.
#[derive(Debug, Clone)]
pub struct DashboardState {
    filters: FilterState,
    last_refresh: Option<Instant>,
}

impl DashboardState {
    /// Initial state from configuration: an unfiltered lookback window
    /// ending `today`.
    #[must_use]
    pub fn from_config(config: &DashboardConfig, today: NaiveDate) -> Self {
        Self {
            filters: config.initial_filters(today),
            last_refresh: None,
        }
    }

    /// Current filter snapshot.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Replace the reporting window.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.filters.date_range = range;
    }

    /// Toggle one repository in or out of the selection.
    pub fn toggle_repo(&mut self, id: RepoId) {
        self.filters.repos = self.filters.repos.toggled(id);
    }

    /// Replace the repository selection.
    pub fn select_repos(&mut self, repos: RepoFilter) {
        self.filters.repos = repos;
    }

    /// Replace the team selection.
    pub fn select_teams(&mut self, teams: TeamFilter) {
        self.filters.teams = teams;
    }

    /// Replace the developer selection.
    pub fn select_developers(&mut self, developers: DeveloperFilter) {
        self.filters.developers = developers;
    }

    /// Set the chart granularity.
    pub fn set_chart_period(&mut self, period: ChartPeriod) {
        self.filters.chart_period = period;
    }

    /// Advance to the next coarser granularity, cycling.
    pub fn cycle_chart_period(&mut self) {
        self.filters.chart_period = self.filters.chart_period.next();
    }

    /// Record a completed refresh.
    pub fn mark_refreshed(&mut self) {
        self.last_refresh = Some(Instant::now());
    }

    /// True once at least one refresh has completed.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.last_refresh.is_some()
    }

    /// Instant of the last completed refresh.
    #[must_use]
    pub const fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid test date")
    }

    fn state() -> DashboardState {
        DashboardState::from_config(&DashboardConfig::default(), today())
    }

    #[test]
    fn initial_state_spans_the_configured_window() {
        let state = state();
        assert_eq!(state.filters().date_range.start_iso(), "2025-01-01");
        assert_eq!(state.filters().date_range.end_iso(), "2025-03-31");
        assert_eq!(state.filters().chart_period, ChartPeriod::Week);
        assert!(!state.has_data());
    }

    #[test]
    fn toggling_repos_narrows_then_empties() {
        let mut state = state();
        assert_eq!(state.filters().repos, RepoFilter::All);

        state.toggle_repo(4);
        assert_eq!(state.filters().repos, RepoFilter::Selected(vec![4]));

        state.toggle_repo(4);
        assert!(state.filters().repos.is_none_selected());
    }

    #[test]
    fn period_cycles_through_all_granularities() {
        let mut state = state();
        state.set_chart_period(ChartPeriod::Day);
        state.cycle_chart_period();
        assert_eq!(state.filters().chart_period, ChartPeriod::Week);
        state.cycle_chart_period();
        assert_eq!(state.filters().chart_period, ChartPeriod::Month);
        state.cycle_chart_period();
        assert_eq!(state.filters().chart_period, ChartPeriod::Day);
    }

    #[test]
    fn date_range_replacement_keeps_other_filters() {
        let mut state = state();
        state.select_repos(RepoFilter::selected([1, 2]));
        state.set_date_range(DateRange::lookback(today(), 7));

        assert_eq!(state.filters().date_range.start_iso(), "2025-03-25");
        assert_eq!(state.filters().repos, RepoFilter::Selected(vec![1, 2]));
    }

    #[test]
    fn refresh_marks_data_present() {
        let mut state = state();
        assert!(state.last_refresh().is_none());
        state.mark_refreshed();
        assert!(state.has_data());
        assert!(state.last_refresh().is_some());
    }

    #[test]
    fn team_and_developer_selections_replace() {
        let mut state = state();
        state.select_teams(TeamFilter::only_unassigned());
        state.select_developers(DeveloperFilter::selected(["zoe".to_owned()]));

        assert!(state.filters().teams.is_only_unassigned());
        assert_eq!(
            state.filters().developers.logins_for_api(),
            Some(["zoe".to_owned()].as_slice())
        );
    }
}
