//! Dashboard application shell.
//!
//! [`DashApp`] owns the pieces every screen shares: the filter state, the
//! request cache, the metrics source, and the Linear sync action. A screen
//! refresh derives requests from the current filter snapshot, satisfies
//! them through the cache (fetching only on a miss), and builds a
//! serializable view model from whatever is cached.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use shippulse_core::cache_key::MetricId;
use shippulse_core::config::DashboardConfig;
use shippulse_core::error::MetricsResult;
use shippulse_core::query::MetricQuery;
use shippulse_core::types::{ConnectorStatus, CorrelationPair, MetricSample};

use crate::actions::SyncAction;
use crate::cache::{CacheStats, CompletionOutcome, Lookup, QueryCache};
use crate::screens::{
    BenchmarksModel, CorrelationsModel, MetricRequest, OverviewModel, Screen, SyncStatusModel,
    benchmarks, correlations, overview, sync_status,
};
use crate::source::{LinearTeamRecord, MetricPayload, MetricsSource};
use crate::state::DashboardState;

// ─── Screen Models ──────────────────────────────────────────────────────────

/// A refreshed screen's view model, tagged by screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenModel {
    /// Overview cards.
    Overview(OverviewModel),
    /// Benchmark table.
    Benchmarks(BenchmarksModel),
    /// Correlation table.
    Correlations(CorrelationsModel),
    /// Connector freshness and linking coverage.
    SyncStatus(SyncStatusModel),
}

impl ScreenModel {
    /// Which screen this model renders.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self {
            Self::Overview(_) => Screen::Overview,
            Self::Benchmarks(_) => Screen::Benchmarks,
            Self::Correlations(_) => Screen::Correlations,
            Self::SyncStatus(_) => Screen::SyncStatus,
        }
    }
}

// ─── Application Shell ──────────────────────────────────────────────────────

/// The dashboard shell: shared state plus the collaborators screens use.
pub struct DashApp {
    config: DashboardConfig,
    state: DashboardState,
    source: Box<dyn MetricsSource>,
    cache: QueryCache<MetricPayload>,
    linear_sync: SyncAction,
}

impl DashApp {
    /// Create the shell with an initial filter window ending `today`.
    #[must_use]
    pub fn new(config: DashboardConfig, source: Box<dyn MetricsSource>, today: NaiveDate) -> Self {
        let state = DashboardState::from_config(&config, today);
        Self {
            config,
            state,
            source,
            cache: QueryCache::new(),
            linear_sync: SyncAction::linear(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Shared state, read-only.
    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Shared state, for filter updates.
    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Cache counter snapshot.
    #[must_use]
    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// True while a triggered Linear sync has not finished.
    #[must_use]
    pub const fn linear_sync_pending(&self) -> bool {
        self.linear_sync.is_pending()
    }

    /// Refresh one screen: derive requests, satisfy them through the
    /// cache, and build the view model. `now` anchors relative times.
    ///
    /// When the screen is repo-scoped and the repository filter excludes
    /// everything, no request is derived and the empty-state model comes
    /// back immediately.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure. Successfully fetched metrics stay
    /// cached, so a retry refetches only what failed.
    pub fn refresh_screen(
        &mut self,
        screen: Screen,
        now: DateTime<Utc>,
    ) -> MetricsResult<ScreenModel> {
        let span = tracing::debug_span!("shippulse::refresh", screen = screen.label());
        let _guard = span.enter();

        if screen.uses_repo_filter() && self.state.filters().repos.is_none_selected() {
            tracing::debug!(
                target: "shippulse.dash",
                op = "refresh_empty",
                screen = screen.label(),
                "repository filter excludes everything"
            );
            return Ok(Self::empty_model(screen, now));
        }

        let requests = self.requests_for(screen);
        for request in &requests {
            self.satisfy(screen, request)?;
        }
        let model = self.build_model(screen, &requests, now);
        self.state.mark_refreshed();
        Ok(model)
    }

    /// Refresh every screen in display order.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure.
    pub fn refresh_all(&mut self, now: DateTime<Utc>) -> MetricsResult<Vec<ScreenModel>> {
        Screen::ALL
            .iter()
            .map(|&screen| self.refresh_screen(screen, now))
            .collect()
    }

    /// Drop a screen's cache subscriptions.
    ///
    /// Ready entries stay warm for the next mount; fetches only this
    /// screen was waiting on are abandoned, and their late completions
    /// will be discarded.
    pub fn unmount_screen(&mut self, screen: Screen) {
        self.cache.remove_screen(screen);
    }

    /// Trigger a Linear re-sync and invalidate the `linear` cache
    /// namespace once it succeeds. Returns the number of evicted entries.
    ///
    /// # Errors
    ///
    /// [`shippulse_core::error::MetricsError::SyncAlreadyRunning`] when a
    /// previous trigger has not finished, or the source's failure. A failed
    /// sync evicts nothing.
    pub fn trigger_linear_sync(&mut self) -> MetricsResult<usize> {
        let span = tracing::debug_span!("shippulse::sync", connector = "linear");
        let _guard = span.enter();

        self.linear_sync.begin()?;
        let result = self.source.trigger_sync(self.linear_sync.connector());
        let namespace = self.linear_sync.finish(&result).map(str::to_owned);
        let evicted = match namespace {
            Some(namespace) => self.cache.invalidate_namespace(&namespace),
            None => 0,
        };
        result.map(|()| evicted)
    }

    fn requests_for(&self, screen: Screen) -> Vec<MetricRequest> {
        let filters = self.state.filters();
        match screen {
            Screen::Overview => overview::requests(filters, &self.config),
            Screen::Benchmarks => benchmarks::requests(filters, &self.config),
            Screen::Correlations => correlations::requests(filters),
            Screen::SyncStatus => sync_status::requests(),
        }
    }

    /// Subscribe to one request; on a miss, fetch and redeem the ticket.
    fn satisfy(&mut self, screen: Screen, request: &MetricRequest) -> MetricsResult<()> {
        match self.cache.subscribe(request.cache_key(), screen) {
            Lookup::Ready(_) | Lookup::InFlight => Ok(()),
            Lookup::MustFetch(ticket) => {
                let result = self.fetch(request);
                match self.cache.complete(&ticket, result) {
                    CompletionOutcome::Failed { error, .. } => Err(error),
                    _ => Ok(()),
                }
            }
        }
    }

    fn fetch(&self, request: &MetricRequest) -> MetricsResult<MetricPayload> {
        let span = tracing::debug_span!("shippulse::fetch", metric = %request.metric);
        let _guard = span.enter();

        match request.metric {
            MetricId::DeploymentFrequency
            | MetricId::LeadTime
            | MetricId::ChangeFailureRate
            | MetricId::TimeToRestore => {
                let query = self.query_or_base(request);
                self.source
                    .dora_metric(request.metric, &query)
                    .map(MetricPayload::Dora)
            }
            MetricId::Correlations => {
                let query = self.query_or_base(request);
                self.source
                    .correlations(&query)
                    .map(MetricPayload::Correlations)
            }
            MetricId::Connectors => self.source.connectors().map(MetricPayload::Connectors),
            MetricId::LinearCoverage => {
                self.source.linear_teams().map(MetricPayload::LinearTeams)
            }
        }
    }

    /// The request's own query, or a base query from the current filters
    /// for requests built without one.
    fn query_or_base(&self, request: &MetricRequest) -> MetricQuery {
        request
            .query
            .clone()
            .unwrap_or_else(|| MetricQuery::from_filters(self.state.filters()))
    }

    fn build_model(
        &self,
        screen: Screen,
        requests: &[MetricRequest],
        now: DateTime<Utc>,
    ) -> ScreenModel {
        match screen {
            Screen::Overview => ScreenModel::Overview(overview::build(&self.dora_samples(requests))),
            Screen::Benchmarks => {
                ScreenModel::Benchmarks(benchmarks::build(&self.dora_samples(requests)))
            }
            Screen::Correlations => {
                let pairs: Vec<CorrelationPair> = requests
                    .iter()
                    .find_map(|request| match self.cache.peek(&request.cache_key()) {
                        Some(MetricPayload::Correlations(response)) => {
                            Some(response.correlations.clone())
                        }
                        _ => None,
                    })
                    .unwrap_or_default();
                ScreenModel::Correlations(correlations::build(&pairs))
            }
            Screen::SyncStatus => {
                let mut connectors: Vec<ConnectorStatus> = Vec::new();
                let mut teams: Vec<LinearTeamRecord> = Vec::new();
                for request in requests {
                    match self.cache.peek(&request.cache_key()) {
                        Some(MetricPayload::Connectors(response)) => {
                            connectors.clone_from(&response.connectors);
                        }
                        Some(MetricPayload::LinearTeams(response)) => {
                            teams.clone_from(&response.linear_teams);
                        }
                        _ => {}
                    }
                }
                ScreenModel::SyncStatus(sync_status::build(&connectors, &teams, now))
            }
        }
    }

    /// Cached payloads for DORA requests, as classifier samples. A metric
    /// with no ready payload maps to `None` and renders placeholders.
    fn dora_samples(&self, requests: &[MetricRequest]) -> Vec<(MetricId, Option<MetricSample>)> {
        requests
            .iter()
            .map(|request| {
                let sample = match self.cache.peek(&request.cache_key()) {
                    Some(MetricPayload::Dora(response)) => Some(response.clone().into_sample()),
                    _ => None,
                };
                (request.metric, sample)
            })
            .collect()
    }

    fn empty_model(screen: Screen, now: DateTime<Utc>) -> ScreenModel {
        match screen {
            Screen::Overview => ScreenModel::Overview(OverviewModel::empty()),
            Screen::Benchmarks => ScreenModel::Benchmarks(BenchmarksModel::empty()),
            Screen::Correlations => ScreenModel::Correlations(CorrelationsModel::empty()),
            // Sync status is never repo-scoped; total match regardless.
            Screen::SyncStatus => ScreenModel::SyncStatus(sync_status::build(&[], &[], now)),
        }
    }
}
