//! Request cache with subscriber tracking.
//!
//! Every screen refresh funnels through [`QueryCache::subscribe`]: the first
//! subscriber to a key receives a [`FetchTicket`] and owns the fetch; later
//! subscribers join the in-flight entry instead of issuing a duplicate
//! request. Completions are applied only when the ticket's generation still
//! matches and at least one subscriber remains, so a screen that unmounted
//! mid-fetch never observes a late result and an invalidated key never
//! resurrects stale data.

use std::collections::{BTreeSet, HashMap};

use shippulse_core::cache_key::CacheKey;
use shippulse_core::error::{MetricsError, MetricsResult};

use crate::screens::Screen;

// ─── Tickets and Outcomes ───────────────────────────────────────────────────

/// Proof that the holder owns an in-flight fetch for one cache key.
///
/// Issued by [`QueryCache::subscribe`] on a miss and redeemed exactly once
/// via [`QueryCache::complete`]. The generation pins the ticket to the cache
/// entry that existed at subscribe time; invalidation bumps the generation,
/// turning outstanding tickets stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    generation: u64,
}

impl FetchTicket {
    /// Key this ticket's fetch must fill.
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Generation the ticket was issued under.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a subscribe call.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Cached value, served immediately.
    Ready(V),
    /// Another screen's fetch for this key is in flight; wait for it.
    InFlight,
    /// Nothing cached or in flight; the caller must fetch and then
    /// redeem the ticket.
    MustFetch(FetchTicket),
}

/// What happened when a fetch completion was redeemed.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// Value cached; listed screens were subscribed when it landed.
    Applied {
        /// Screens to re-render with the fresh value.
        observers: Vec<Screen>,
    },
    /// Fetch failed; the entry was dropped so the next subscribe retries.
    Failed {
        /// The fetch error, for display.
        error: MetricsError,
        /// Screens that were waiting on this fetch.
        observers: Vec<Screen>,
    },
    /// The ticket's generation no longer matches; a newer cycle for the
    /// same key superseded this fetch. Result discarded.
    Stale,
    /// No subscriber remained (or the entry was gone entirely). Result
    /// discarded; no screen observes it.
    Orphaned,
}

impl CompletionOutcome {
    /// True when the completion updated the cache.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

// ─── Cache ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum EntryState<V> {
    Ready(V),
    InFlight { generation: u64 },
}

#[derive(Debug, Clone)]
struct Entry<V> {
    state: EntryState<V>,
    subscribers: BTreeSet<Screen>,
}

/// Hit, miss, and join counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Subscribes served from a ready entry.
    pub hits: u64,
    /// Subscribes that issued a fetch ticket.
    pub misses: u64,
    /// Subscribes that joined an already in-flight fetch.
    pub joins: u64,
}

/// Keyed request cache shared by all screens.
///
/// Single-threaded by design: the dashboard shell drives it from one event
/// loop, so interior mutability and locking are unnecessary.
#[derive(Debug, Default)]
pub struct QueryCache<V> {
    entries: HashMap<CacheKey, Entry<V>>,
    next_generation: u64,
    stats: CacheStats,
}

impl<V: Clone> QueryCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 0,
            stats: CacheStats::default(),
        }
    }

    /// Register `screen`'s interest in `key` and report what it should do.
    ///
    /// A ready entry is served as [`Lookup::Ready`]. An in-flight entry
    /// gains a subscriber and returns [`Lookup::InFlight`]. An absent entry
    /// is created in-flight and the caller receives the [`FetchTicket`].
    pub fn subscribe(&mut self, key: CacheKey, screen: Screen) -> Lookup<V> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.subscribers.insert(screen);
            return match &entry.state {
                EntryState::Ready(value) => {
                    self.stats.hits += 1;
                    tracing::trace!(
                        target: "shippulse.dash",
                        op = "cache_hit",
                        cache_key = %key,
                        screen = screen.label(),
                        "served from cache"
                    );
                    Lookup::Ready(value.clone())
                }
                EntryState::InFlight { generation } => {
                    self.stats.joins += 1;
                    tracing::trace!(
                        target: "shippulse.dash",
                        op = "cache_join",
                        cache_key = %key,
                        screen = screen.label(),
                        generation,
                        "joined in-flight fetch"
                    );
                    Lookup::InFlight
                }
            };
        }

        self.stats.misses += 1;
        let generation = self.next_generation;
        self.next_generation += 1;
        let mut subscribers = BTreeSet::new();
        subscribers.insert(screen);
        self.entries.insert(
            key.clone(),
            Entry {
                state: EntryState::InFlight { generation },
                subscribers,
            },
        );
        tracing::debug!(
            target: "shippulse.dash",
            op = "cache_miss",
            cache_key = %key,
            screen = screen.label(),
            generation,
            "fetch required"
        );
        Lookup::MustFetch(FetchTicket { key, generation })
    }

    /// Redeem a fetch ticket with its result.
    ///
    /// The result is applied only when the entry is still in flight under
    /// the ticket's generation and at least one subscriber remains;
    /// otherwise it is discarded as [`CompletionOutcome::Stale`] or
    /// [`CompletionOutcome::Orphaned`].
    pub fn complete(&mut self, ticket: &FetchTicket, result: MetricsResult<V>) -> CompletionOutcome {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            tracing::debug!(
                target: "shippulse.dash",
                op = "cache_orphaned",
                cache_key = %ticket.key,
                generation = ticket.generation,
                "completion for evicted entry discarded"
            );
            return CompletionOutcome::Orphaned;
        };
        let current = match entry.state {
            EntryState::InFlight { generation } => generation,
            EntryState::Ready(_) => {
                // A newer subscribe-fetch cycle already filled this key.
                tracing::debug!(
                    target: "shippulse.dash",
                    op = "cache_stale",
                    cache_key = %ticket.key,
                    generation = ticket.generation,
                    "completion for superseded fetch discarded"
                );
                return CompletionOutcome::Stale;
            }
        };
        if current != ticket.generation {
            tracing::debug!(
                target: "shippulse.dash",
                op = "cache_stale",
                cache_key = %ticket.key,
                generation = ticket.generation,
                current_generation = current,
                "completion generation mismatch"
            );
            return CompletionOutcome::Stale;
        }
        if entry.subscribers.is_empty() {
            self.entries.remove(&ticket.key);
            tracing::debug!(
                target: "shippulse.dash",
                op = "cache_orphaned",
                cache_key = %ticket.key,
                generation = ticket.generation,
                "no subscriber remained for completion"
            );
            return CompletionOutcome::Orphaned;
        }

        let observers: Vec<Screen> = entry.subscribers.iter().copied().collect();
        match result {
            Ok(value) => {
                entry.state = EntryState::Ready(value);
                tracing::debug!(
                    target: "shippulse.dash",
                    op = "cache_applied",
                    cache_key = %ticket.key,
                    generation = ticket.generation,
                    observers = observers.len(),
                    "fetch result cached"
                );
                CompletionOutcome::Applied { observers }
            }
            Err(error) => {
                // Dropped so the next subscribe retries the fetch.
                self.entries.remove(&ticket.key);
                tracing::debug!(
                    target: "shippulse.dash",
                    op = "cache_failed",
                    cache_key = %ticket.key,
                    generation = ticket.generation,
                    error = %error,
                    "fetch failed; entry dropped"
                );
                CompletionOutcome::Failed { error, observers }
            }
        }
    }

    /// Unsubscribe `screen` from every entry.
    ///
    /// Ready values stay cached for the next mount. In-flight entries left
    /// with no subscriber are dropped, which orphans their outstanding
    /// tickets.
    pub fn remove_screen(&mut self, screen: Screen) {
        let mut dropped = 0usize;
        self.entries.retain(|_, entry| {
            entry.subscribers.remove(&screen);
            match entry.state {
                EntryState::Ready(_) => true,
                EntryState::InFlight { .. } => {
                    let keep = !entry.subscribers.is_empty();
                    if !keep {
                        dropped += 1;
                    }
                    keep
                }
            }
        });
        tracing::debug!(
            target: "shippulse.dash",
            op = "cache_unmount",
            screen = screen.label(),
            dropped_in_flight = dropped,
            "screen unsubscribed"
        );
    }

    /// Evict every entry whose key lives under `namespace`.
    ///
    /// Both ready values and in-flight entries are removed, so completions
    /// for evicted fetches come back orphaned rather than re-populating the
    /// namespace with pre-invalidation data. Returns the eviction count.
    pub fn invalidate_namespace(&mut self, namespace: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.in_namespace(namespace));
        let evicted = before - self.entries.len();
        tracing::debug!(
            target: "shippulse.dash",
            op = "cache_invalidate",
            namespace,
            evicted,
            "namespace evicted"
        );
        evicted
    }

    /// Ready value for `key`, if any. Does not touch counters or
    /// subscriptions.
    #[must_use]
    pub fn peek(&self, key: &CacheKey) -> Option<&V> {
        match &self.entries.get(key)?.state {
            EntryState::Ready(value) => Some(value),
            EntryState::InFlight { .. } => None,
        }
    }

    /// Number of entries, ready or in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of in-flight entries.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e.state, EntryState::InFlight { .. }))
            .count()
    }

    /// Counter snapshot.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
