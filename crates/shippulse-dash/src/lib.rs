//! Dashboard shell for shippulse delivery metrics.
//!
//! This crate builds on [`shippulse_core`]'s pure interpretation layer to
//! provide the browser dashboard's coordination logic: deriving wire
//! requests from shared filter state, de-duplicating fetches across
//! screens through a subscriber-tracked cache, and shaping fetched
//! payloads into render-ready view models.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  shippulse-dash (this crate)                    │
//! │  ├─ app: DashApp refresh loop and sync trigger  │
//! │  ├─ source: MetricsSource trait + mock impl     │
//! │  ├─ cache: QueryCache with fetch tickets        │
//! │  ├─ state: shared filters + refresh bookkeeping │
//! │  ├─ actions: connector sync guard               │
//! │  └─ screens: Overview, Benchmarks, Correlations,│
//! │              Sync Status view models            │
//! ├─────────────────────────────────────────────────┤
//! │  shippulse-core (pure interpretation)           │
//! │  tiers, correlations, coverage, formatting,     │
//! │  filter state, query derivation, cache keys     │
//! └─────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]

pub mod actions;
pub mod app;
pub mod cache;
pub mod screens;
pub mod source;
pub mod state;
pub mod tracing_setup;

// ─── Re-exports ─────────────────────────────────────────────────────────────

pub use actions::SyncAction;
pub use app::{DashApp, ScreenModel};
pub use cache::{CacheStats, CompletionOutcome, FetchTicket, Lookup, QueryCache};
pub use screens::{
    BenchmarkRow, BenchmarksModel, ConnectorRow, CorrelationRow, CorrelationsModel,
    CoverageBarRow, MetricCard, MetricRequest, OverviewModel, Screen, SyncStatusModel,
};
pub use source::{
    ConnectorsResponse, CorrelationResponse, DoraMetricResponse, LinearTeamRecord,
    LinearTeamsResponse, MetricPayload, MetricsSource, MockMetricsSource,
};
pub use state::DashboardState;
