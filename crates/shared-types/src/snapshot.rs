//! # Store Snapshots
//!
//! A [`StoreSnapshot`] is the engine's cached image of one logical store:
//! every occupied slot, the gold balance, and slot totals. Scans replace a
//! snapshot wholesale (wipe-then-rebuild); incremental patching is
//! deliberately unsupported because partial updates were the historical
//! source of phantom-item bugs.
//!
//! Contents use `BTreeMap` so two scans of an unchanged store produce
//! byte-identical serializations.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::containers::{ContainerId, SlotIndex};
use crate::items::ItemRecord;

/// Occupied slots of one tab, keyed by slot index.
pub type TabContents = BTreeMap<SlotIndex, ItemRecord>;

/// The cached image of one logical store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreSnapshot {
    /// Occupied slots keyed by tab (container id), then slot index.
    /// Empty slots are absent, not present-with-placeholder.
    pub items: BTreeMap<ContainerId, TabContents>,
    /// Gold balance of the store, in copper.
    pub gold: u64,
    /// Unix milliseconds of the last successful scan, if any.
    pub last_scan: Option<u64>,
    /// Slot capacity summed over all scanned tabs.
    pub total_slots: u32,
    /// Occupied slot count summed over all scanned tabs.
    pub used_slots: u32,
}

impl StoreSnapshot {
    /// Returns `true` if no scan has ever populated this snapshot.
    #[must_use]
    pub fn is_unscanned(&self) -> bool {
        self.last_scan.is_none()
    }

    /// Compares scanned contents, ignoring the scan timestamp.
    ///
    /// Two scans of an unchanged store must compare equal here even though
    /// their `last_scan` stamps differ.
    #[must_use]
    pub fn contents_match(&self, other: &StoreSnapshot) -> bool {
        self.items == other.items
            && self.gold == other.gold
            && self.total_slots == other.total_slots
            && self.used_slots == other.used_slots
    }

    /// Total stack count of `item_id` across all tabs.
    #[must_use]
    pub fn stack_total(&self, item_id: u64) -> u32 {
        self.items
            .values()
            .flat_map(BTreeMap::values)
            .filter(|record| record.item_id == item_id)
            .map(|record| record.stack_count)
            .sum()
    }

    /// Number of distinct occupied slots.
    #[must_use]
    pub fn occupied_slots(&self) -> u32 {
        self.items.values().map(|tab| tab.len() as u32).sum()
    }
}

/// Current wall-clock time in unix milliseconds.
///
/// Clock rollback before the epoch is treated as time zero rather than a
/// panic; snapshot stamps are advisory, not load-bearing.
#[must_use]
pub fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
