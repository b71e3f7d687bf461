//! End-to-end dashboard flows: request sharing across screens, namespace
//! invalidation after a sync, and the full sample dataset rendered into
//! view models.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

use shippulse_core::cache_key::MetricId;
use shippulse_core::config::DashboardConfig;
use shippulse_core::error::{MetricsError, MetricsResult};
use shippulse_core::filter::RepoFilter;
use shippulse_core::query::MetricQuery;
use shippulse_core::types::{PLACEHOLDER, Tier};
use shippulse_dash::{
    ConnectorsResponse, CorrelationResponse, DashApp, DoraMetricResponse, LinearTeamsResponse,
    MetricsSource, MockMetricsSource, Screen, ScreenModel,
};

/// Per-endpoint fetch counters, shared with the test after the source
/// moves into the app.
#[derive(Debug, Default, Clone)]
struct FetchCounts {
    dora: Arc<AtomicUsize>,
    correlations: Arc<AtomicUsize>,
    connectors: Arc<AtomicUsize>,
    linear_teams: Arc<AtomicUsize>,
    syncs: Arc<AtomicUsize>,
}

impl FetchCounts {
    fn dora(&self) -> usize {
        self.dora.load(Ordering::Relaxed)
    }

    fn connectors(&self) -> usize {
        self.connectors.load(Ordering::Relaxed)
    }

    fn linear_teams(&self) -> usize {
        self.linear_teams.load(Ordering::Relaxed)
    }

    fn correlations(&self) -> usize {
        self.correlations.load(Ordering::Relaxed)
    }

    fn syncs(&self) -> usize {
        self.syncs.load(Ordering::Relaxed)
    }
}

/// Counts every source call before delegating to the sample mock.
struct CountingSource {
    inner: MockMetricsSource,
    counts: FetchCounts,
    fail_sync: bool,
}

impl CountingSource {
    fn sample() -> (Self, FetchCounts) {
        let counts = FetchCounts::default();
        let source = Self {
            inner: MockMetricsSource::sample(),
            counts: counts.clone(),
            fail_sync: false,
        };
        (source, counts)
    }

    fn with_failing_sync() -> (Self, FetchCounts) {
        let (mut source, counts) = Self::sample();
        source.fail_sync = true;
        (source, counts)
    }
}

impl MetricsSource for CountingSource {
    fn dora_metric(
        &self,
        metric: MetricId,
        query: &MetricQuery,
    ) -> MetricsResult<DoraMetricResponse> {
        self.counts.dora.fetch_add(1, Ordering::Relaxed);
        self.inner.dora_metric(metric, query)
    }

    fn correlations(&self, query: &MetricQuery) -> MetricsResult<CorrelationResponse> {
        self.counts.correlations.fetch_add(1, Ordering::Relaxed);
        self.inner.correlations(query)
    }

    fn connectors(&self) -> MetricsResult<ConnectorsResponse> {
        self.counts.connectors.fetch_add(1, Ordering::Relaxed);
        self.inner.connectors()
    }

    fn linear_teams(&self) -> MetricsResult<LinearTeamsResponse> {
        self.counts.linear_teams.fetch_add(1, Ordering::Relaxed);
        self.inner.linear_teams()
    }

    fn trigger_sync(&self, connector: &str) -> MetricsResult<()> {
        self.counts.syncs.fetch_add(1, Ordering::Relaxed);
        if self.fail_sync {
            return Err(MetricsError::FetchFailed {
                metric: connector.to_owned(),
                source: Box::new(std::io::Error::other("sync endpoint unavailable")),
            });
        }
        self.inner.trigger_sync(connector)
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid test date")
}

fn now() -> DateTime<Utc> {
    MockMetricsSource::reference_now()
}

fn counted_app() -> (DashApp, FetchCounts) {
    let (source, counts) = CountingSource::sample();
    let app = DashApp::new(DashboardConfig::default(), Box::new(source), today());
    (app, counts)
}

#[test]
fn overview_and_benchmarks_share_one_round_of_fetches() {
    let (mut app, counts) = counted_app();

    let overview = app
        .refresh_screen(Screen::Overview, now())
        .expect("overview refresh should succeed");
    assert_eq!(counts.dora(), 4, "one fetch per DORA metric");

    let benchmarks = app
        .refresh_screen(Screen::Benchmarks, now())
        .expect("benchmarks refresh should succeed");
    assert_eq!(
        counts.dora(),
        4,
        "benchmarks must reuse the overview's cached fetches"
    );

    let ScreenModel::Overview(overview) = overview else {
        panic!("expected overview model");
    };
    let ScreenModel::Benchmarks(benchmarks) = benchmarks else {
        panic!("expected benchmarks model");
    };
    assert_eq!(overview.cards.len(), 4);
    assert_eq!(benchmarks.rows.len(), 4);
    // Same underlying payloads: the formatted values agree card for row.
    for (card, row) in overview.cards.iter().zip(&benchmarks.rows) {
        assert_eq!(card.metric, row.metric);
        assert_eq!(card.value_label, row.value_label);
        assert_eq!(card.tier, row.tier);
    }
}

#[test]
fn filter_changes_derive_new_requests() {
    let (mut app, counts) = counted_app();
    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    assert_eq!(counts.dora(), 4);

    app.state_mut().select_repos(RepoFilter::selected([3, 7]));
    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    assert_eq!(counts.dora(), 8, "narrowed filter means new cache keys");

    // Back to the original selection: those keys are still warm.
    app.state_mut().select_repos(RepoFilter::All);
    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    assert_eq!(counts.dora(), 8);
}

#[test]
fn deselecting_every_repo_skips_fetching_entirely() {
    let (mut app, counts) = counted_app();
    app.state_mut().select_repos(RepoFilter::None);

    for screen in [Screen::Overview, Screen::Benchmarks, Screen::Correlations] {
        let model = app
            .refresh_screen(screen, now())
            .expect("empty-state refresh should succeed");
        match model {
            ScreenModel::Overview(m) => assert!(m.empty_state.is_some()),
            ScreenModel::Benchmarks(m) => assert!(m.empty_state.is_some()),
            ScreenModel::Correlations(m) => assert!(m.empty_state.is_some()),
            ScreenModel::SyncStatus(_) => panic!("unexpected sync status model"),
        }
    }
    assert_eq!(counts.dora(), 0);
    assert_eq!(counts.correlations(), 0);

    // Sync status is global and still loads.
    app.refresh_screen(Screen::SyncStatus, now())
        .expect("sync status refresh should succeed");
    assert_eq!(counts.connectors(), 1);
    assert_eq!(counts.linear_teams(), 1);
}

#[test]
fn linear_sync_invalidates_only_the_linear_namespace() {
    let (mut app, counts) = counted_app();
    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    app.refresh_screen(Screen::SyncStatus, now())
        .expect("refresh should succeed");
    assert_eq!(counts.dora(), 4);
    assert_eq!(counts.connectors(), 1);
    assert_eq!(counts.linear_teams(), 1);

    let evicted = app.trigger_linear_sync().expect("sync should succeed");
    assert_eq!(evicted, 1, "exactly the linking-coverage entry");
    assert_eq!(counts.syncs(), 1);

    // Only the evicted endpoint refetches; connector status and DORA
    // entries are untouched.
    app.refresh_screen(Screen::SyncStatus, now())
        .expect("refresh should succeed");
    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    assert_eq!(counts.linear_teams(), 2);
    assert_eq!(counts.connectors(), 1);
    assert_eq!(counts.dora(), 4);
}

#[test]
fn failed_sync_evicts_nothing_and_clears_the_guard() {
    let (source, counts) = CountingSource::with_failing_sync();
    let mut app = DashApp::new(DashboardConfig::default(), Box::new(source), today());
    app.refresh_screen(Screen::SyncStatus, now())
        .expect("refresh should succeed");

    let err = app.trigger_linear_sync().expect_err("sync should fail");
    assert!(matches!(err, MetricsError::FetchFailed { .. }));
    assert!(!app.linear_sync_pending(), "failure must clear pending");

    // Nothing was evicted: the coverage entry is still served from cache.
    app.refresh_screen(Screen::SyncStatus, now())
        .expect("refresh should succeed");
    assert_eq!(counts.linear_teams(), 1);

    // The guard allows a retry.
    assert!(app.trigger_linear_sync().is_err());
    assert_eq!(counts.syncs(), 2);
}

#[test]
fn unmounting_keeps_entries_warm_for_remount() {
    let (mut app, counts) = counted_app();
    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    app.unmount_screen(Screen::Overview);

    app.refresh_screen(Screen::Overview, now())
        .expect("refresh should succeed");
    assert_eq!(counts.dora(), 4, "remount must be served from cache");
}

#[test]
fn sample_dataset_renders_every_screen() {
    let mut app = DashApp::new(
        DashboardConfig::default(),
        Box::new(MockMetricsSource::sample()),
        today(),
    );
    let models = app.refresh_all(now()).expect("refresh should succeed");
    assert_eq!(models.len(), 4);

    let ScreenModel::Overview(overview) = &models[0] else {
        panic!("expected overview first");
    };
    let labels: Vec<&str> = overview
        .cards
        .iter()
        .map(|c| c.value_label.as_str())
        .collect();
    assert_eq!(labels, vec!["2.4/day", "1.1 days", "4.2%", "5h 30m"]);
    assert_eq!(overview.cards[0].tier, Some(Tier::High));

    let ScreenModel::Benchmarks(benchmarks) = &models[1] else {
        panic!("expected benchmarks second");
    };
    let failure_rate = &benchmarks.rows[2];
    assert_eq!(failure_rate.metric, MetricId::ChangeFailureRate);
    assert_eq!(failure_rate.tier, Some(Tier::Elite));
    assert_eq!(
        failure_rate.description,
        "Fewer than one in twenty deploys fail"
    );
    assert_eq!(failure_rate.gap_to_elite, PLACEHOLDER);

    let ScreenModel::Correlations(correlations) = &models[2] else {
        panic!("expected correlations third");
    };
    assert_eq!(correlations.rows[0].coefficient_label, "-0.72");
    assert_eq!(correlations.rows[0].strength, "Strong negative");
    assert_eq!(
        correlations.rows[0].label,
        "Deployment Frequency vs Lead Time for Changes"
    );
    assert!(
        correlations
            .rows
            .windows(2)
            .all(|w| w[0].coefficient.abs() >= w[1].coefficient.abs()),
        "rows must rank by magnitude"
    );

    let ScreenModel::SyncStatus(sync) = &models[3] else {
        panic!("expected sync status last");
    };
    let sync_labels: Vec<&str> = sync
        .connectors
        .iter()
        .map(|c| c.last_sync_label.as_str())
        .collect();
    assert_eq!(sync_labels, vec!["35 minutes ago", "3 hours ago", "never"]);

    let coverage: Vec<(&str, &str, u8)> = sync
        .coverage
        .iter()
        .map(|row| (row.team.as_str(), row.percent_label.as_str(), row.bar_percent))
        .collect();
    assert_eq!(
        coverage,
        vec![
            ("Platform", "86%", 86),
            ("Mobile", "<1%", 1),
            ("Web", "0%", 0),
            ("Data", PLACEHOLDER, 0),
        ]
    );
}

#[test]
fn empty_source_renders_placeholders_not_errors() {
    let mut app = DashApp::new(
        DashboardConfig::default(),
        Box::new(MockMetricsSource::empty()),
        today(),
    );
    let models = app.refresh_all(now()).expect("refresh should succeed");

    let ScreenModel::Overview(overview) = &models[0] else {
        panic!("expected overview first");
    };
    assert!(
        overview
            .cards
            .iter()
            .all(|card| card.value_label == PLACEHOLDER && card.tier.is_none())
    );

    let ScreenModel::SyncStatus(sync) = &models[3] else {
        panic!("expected sync status last");
    };
    assert!(sync.connectors.is_empty());
    assert!(sync.coverage.is_empty());
}
