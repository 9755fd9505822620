//! # Derived Caches
//!
//! Lazily-built secondary views over the primary snapshots: account-wide
//! item totals, a substring search index, and per-item ownership lines for
//! tooltips. Each lives in its own slot with a shared TTL.
//!
//! Invalidation is push-based: the engine invalidates whenever a snapshot
//! is rebuilt. The TTL is the safety net underneath, bounding staleness if
//! an invalidation path is ever missed.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::StoreSnapshot;
use tokio::time::Instant;
use tracing::debug;

use crate::DEFAULT_DERIVED_TTL;

/// A labeled snapshot feeding the derived caches: `(owner, snapshot)`.
///
/// The owner label is what tooltip lines display ("warband", a character
/// key, a guild name).
pub type SnapshotSource<'a> = (&'a str, &'a StoreSnapshot);

/// The individually invalidatable derived caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedCacheKind {
    /// Account-wide stack totals per item.
    Aggregates,
    /// Name substring search index.
    SearchIndex,
    /// Per-item ownership lines.
    Tooltips,
}

/// One ownership line of a tooltip: who holds how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedCount {
    /// Owner label (store or character).
    pub owner: String,
    /// Total stack count held by that owner.
    pub count: u32,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matched item id.
    pub item_id: u64,
    /// Item display name.
    pub name: String,
    /// Owner label the item was found under.
    pub owner: String,
    /// Stack total for that owner.
    pub count: u32,
}

/// Counters and entry ages reported by the cache-stats operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CacheReport {
    /// Lookups answered from a fresh slot.
    pub hits: u64,
    /// Lookups that had to rebuild.
    pub misses: u64,
    /// Explicit invalidations received.
    pub invalidations: u64,
    /// Age of the aggregates slot, if built.
    pub aggregates_age_ms: Option<u64>,
    /// Age of the search-index slot, if built.
    pub search_age_ms: Option<u64>,
    /// Age of the tooltips slot, if built.
    pub tooltips_age_ms: Option<u64>,
}

#[derive(Debug)]
struct CacheSlot<T> {
    built_at: Instant,
    value: T,
}

impl<T> CacheSlot<T> {
    fn new(value: T) -> Self {
        CacheSlot {
            built_at: Instant::now(),
            value,
        }
    }

    fn age_ms(&self) -> u64 {
        self.built_at.elapsed().as_millis() as u64
    }
}

type Aggregates = BTreeMap<u64, u32>;
type SearchIndex = Vec<SearchHit>;
type TooltipIndex = BTreeMap<u64, Vec<OwnedCount>>;

/// The derived cache layer. One instance serves the whole engine.
#[derive(Debug)]
pub struct DerivedCaches {
    ttl: Duration,
    aggregates: Option<CacheSlot<Aggregates>>,
    search: Option<CacheSlot<SearchIndex>>,
    tooltips: Option<CacheSlot<TooltipIndex>>,
    hits: u64,
    misses: u64,
    invalidations: u64,
}

impl DerivedCaches {
    /// Creates the cache layer with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_DERIVED_TTL)
    }

    /// Creates the cache layer with an explicit TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        DerivedCaches {
            ttl,
            aggregates: None,
            search: None,
            tooltips: None,
            hits: 0,
            misses: 0,
            invalidations: 0,
        }
    }

    /// Account-wide stack totals per item id, rebuilding if stale.
    pub fn aggregates(&mut self, sources: &[SnapshotSource<'_>]) -> &Aggregates {
        Self::ensure(
            &mut self.aggregates,
            self.ttl,
            &mut self.hits,
            &mut self.misses,
            || build_aggregates(sources),
        )
    }

    /// Search hits whose item name contains `needle` (case-insensitive).
    pub fn search(&mut self, sources: &[SnapshotSource<'_>], needle: &str) -> Vec<SearchHit> {
        let needle = needle.to_lowercase();
        let index = Self::ensure(
            &mut self.search,
            self.ttl,
            &mut self.hits,
            &mut self.misses,
            || build_search_index(sources),
        );
        index
            .iter()
            .filter(|hit| hit.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Ownership lines for one item, rebuilding the tooltip index if stale.
    pub fn tooltip_lines(
        &mut self,
        sources: &[SnapshotSource<'_>],
        item_id: u64,
    ) -> Vec<OwnedCount> {
        let index = Self::ensure(
            &mut self.tooltips,
            self.ttl,
            &mut self.hits,
            &mut self.misses,
            || build_tooltip_index(sources),
        );
        index.get(&item_id).cloned().unwrap_or_default()
    }

    /// Drops one cache by name.
    pub fn invalidate(&mut self, kind: DerivedCacheKind) {
        debug!(?kind, "Derived cache invalidated");
        self.invalidations += 1;
        match kind {
            DerivedCacheKind::Aggregates => self.aggregates = None,
            DerivedCacheKind::SearchIndex => self.search = None,
            DerivedCacheKind::Tooltips => self.tooltips = None,
        }
    }

    /// Drops every cache; used after any snapshot rebuild.
    pub fn invalidate_all(&mut self) {
        self.invalidate(DerivedCacheKind::Aggregates);
        self.invalidate(DerivedCacheKind::SearchIndex);
        self.invalidate(DerivedCacheKind::Tooltips);
    }

    /// Drops every cache and zeroes the counters. The full-wipe path; a
    /// plain rebuild wants [`DerivedCaches::invalidate_all`] instead.
    pub fn reset(&mut self) {
        self.aggregates = None;
        self.search = None;
        self.tooltips = None;
        self.hits = 0;
        self.misses = 0;
        self.invalidations = 0;
    }

    /// Counters and entry ages for diagnostics.
    #[must_use]
    pub fn report(&self) -> CacheReport {
        CacheReport {
            hits: self.hits,
            misses: self.misses,
            invalidations: self.invalidations,
            aggregates_age_ms: self.aggregates.as_ref().map(CacheSlot::age_ms),
            search_age_ms: self.search.as_ref().map(CacheSlot::age_ms),
            tooltips_age_ms: self.tooltips.as_ref().map(CacheSlot::age_ms),
        }
    }

    fn ensure<'a, T>(
        slot: &'a mut Option<CacheSlot<T>>,
        ttl: Duration,
        hits: &mut u64,
        misses: &mut u64,
        build: impl FnOnce() -> T,
    ) -> &'a T {
        let fresh = slot
            .as_ref()
            .is_some_and(|entry| entry.built_at.elapsed() <= ttl);
        if fresh {
            *hits += 1;
        } else {
            *misses += 1;
            *slot = None;
        }
        &slot.get_or_insert_with(|| CacheSlot::new(build())).value
    }
}

impl Default for DerivedCaches {
    fn default() -> Self {
        Self::new()
    }
}

fn build_aggregates(sources: &[SnapshotSource<'_>]) -> Aggregates {
    let mut totals = Aggregates::new();
    for (_, snapshot) in sources {
        for tab in snapshot.items.values() {
            for record in tab.values() {
                *totals.entry(record.item_id).or_insert(0) += record.stack_count;
            }
        }
    }
    totals
}

fn build_search_index(sources: &[SnapshotSource<'_>]) -> SearchIndex {
    let mut index = SearchIndex::new();
    for (owner, snapshot) in sources {
        let mut per_item: BTreeMap<u64, (String, u32)> = BTreeMap::new();
        for tab in snapshot.items.values() {
            for record in tab.values() {
                let entry = per_item
                    .entry(record.item_id)
                    .or_insert_with(|| (record.name.clone(), 0));
                entry.1 += record.stack_count;
            }
        }
        for (item_id, (name, count)) in per_item {
            index.push(SearchHit {
                item_id,
                name,
                owner: (*owner).to_owned(),
                count,
            });
        }
    }
    index
}

fn build_tooltip_index(sources: &[SnapshotSource<'_>]) -> TooltipIndex {
    let mut index = TooltipIndex::new();
    for (owner, snapshot) in sources {
        let mut per_item: BTreeMap<u64, u32> = BTreeMap::new();
        for tab in snapshot.items.values() {
            for record in tab.values() {
                *per_item.entry(record.item_id).or_insert(0) += record.stack_count;
            }
        }
        for (item_id, count) in per_item {
            index.entry(item_id).or_default().push(OwnedCount {
                owner: (*owner).to_owned(),
                count,
            });
        }
    }
    index
}
