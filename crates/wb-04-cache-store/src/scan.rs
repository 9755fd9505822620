//! # Snapshot Scan
//!
//! Rebuilds a [`StoreSnapshot`] from scratch by walking a store's tab list.
//! The algorithm is deliberately dumb: query capacity, walk slots, record
//! what answers. All resilience lives in how non-answers are treated.
//!
//! ## Per-Tab Outcomes
//!
//! | Capacity answer | Effect |
//! |---|---|
//! | `None` (unavailable) | Tab skipped entirely; counts toward the all-unavailable abort |
//! | `Some(0)` (no purchased slots) | Tab contributes zero slots; still an answered tab |
//! | `Some(n)` | Slots `1..=n` walked; unavailable slots skipped individually |
//! | `Some(n)`, `n` beyond [`SlotIndex`] | Clamped; the total and the walk use the same clamped value |

use shared_types::{unix_time_ms, ContainerId, SlotIndex, StoreKind, StoreSnapshot};
use tracing::{debug, trace};

use crate::error::{ScanError, ScanResult};
use crate::ports::{SlotQuery, StoreQuery};

/// Scans `tabs` of `store` into a fresh snapshot.
///
/// The returned snapshot wholly replaces any previous image of the store;
/// callers must not merge it with old contents.
///
/// # Errors
///
/// [`ScanError::StoreInaccessible`] when the tab list is non-empty and every
/// capacity query went unanswered. The caller keeps its existing snapshot in
/// that case.
pub fn scan_store(
    query: &dyn StoreQuery,
    store: StoreKind,
    tabs: &[ContainerId],
) -> ScanResult<StoreSnapshot> {
    let mut snapshot = StoreSnapshot::default();
    let mut answered_tabs = 0usize;

    for &tab in tabs {
        let Some(capacity) = query.tab_capacity(store, tab) else {
            trace!(%store, tab, "Tab capacity unavailable; skipping tab");
            continue;
        };
        answered_tabs += 1;
        let capacity = match SlotIndex::try_from(capacity) {
            Ok(cap) => cap,
            Err(_) => {
                trace!(%store, tab, capacity, "Capacity beyond slot addressing; clamped");
                SlotIndex::MAX
            }
        };
        snapshot.total_slots += u32::from(capacity);
        if capacity == 0 {
            continue;
        }

        let contents = snapshot.items.entry(tab).or_default();
        for slot in 1..=capacity {
            match query.slot_info(store, tab, slot) {
                SlotQuery::Unavailable => {
                    trace!(%store, tab, slot, "Slot query unavailable; skipping slot");
                }
                SlotQuery::Empty => {}
                SlotQuery::Occupied(record) => {
                    contents.insert(slot, record);
                    snapshot.used_slots += 1;
                }
            }
        }
        if contents.is_empty() {
            snapshot.items.remove(&tab);
        }
    }

    if answered_tabs == 0 && !tabs.is_empty() {
        return Err(ScanError::StoreInaccessible { store });
    }

    snapshot.gold = query.store_gold(store).unwrap_or(0);
    snapshot.last_scan = Some(unix_time_ms());

    debug!(
        %store,
        tabs = answered_tabs,
        total_slots = snapshot.total_slots,
        used_slots = snapshot.used_slots,
        "Store scanned"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ItemRecord, QualityTier, SlotIndex, SHARED_TABS};
    use std::collections::HashMap;

    /// Deterministic host fixture: explicit capacities and slot contents.
    struct FixtureHost {
        capacities: HashMap<(StoreKind, ContainerId), Option<u32>>,
        slots: HashMap<(StoreKind, ContainerId, SlotIndex), SlotQuery>,
        gold: u64,
    }

    impl FixtureHost {
        fn new() -> Self {
            FixtureHost {
                capacities: HashMap::new(),
                slots: HashMap::new(),
                gold: 0,
            }
        }

        fn capacity(mut self, store: StoreKind, tab: ContainerId, cap: Option<u32>) -> Self {
            self.capacities.insert((store, tab), cap);
            self
        }

        fn item(
            mut self,
            store: StoreKind,
            tab: ContainerId,
            slot: SlotIndex,
            item_id: u64,
            stack: u32,
        ) -> Self {
            self.slots.insert(
                (store, tab, slot),
                SlotQuery::Occupied(ItemRecord {
                    item_id,
                    stack_count: stack,
                    quality: QualityTier::Common,
                    name: format!("item-{item_id}"),
                    icon: 0,
                    class_id: 0,
                    subclass_id: 0,
                }),
            );
            self
        }

        fn unavailable_slot(mut self, store: StoreKind, tab: ContainerId, slot: SlotIndex) -> Self {
            self.slots
                .insert((store, tab, slot), SlotQuery::Unavailable);
            self
        }
    }

    impl StoreQuery for FixtureHost {
        fn tab_capacity(&self, store: StoreKind, tab: ContainerId) -> Option<u32> {
            self.capacities.get(&(store, tab)).copied().flatten()
        }

        fn slot_info(&self, store: StoreKind, tab: ContainerId, slot: SlotIndex) -> SlotQuery {
            self.slots
                .get(&(store, tab, slot))
                .cloned()
                .unwrap_or(SlotQuery::Empty)
        }

        fn store_gold(&self, _store: StoreKind) -> Option<u64> {
            Some(self.gold)
        }

        fn carried_gold(&self) -> Option<u64> {
            None
        }

        fn shared_store_enumerable(&self) -> bool {
            true
        }

        fn identity(&self) -> Option<shared_types::IdentityKey> {
            None
        }

        fn guild_name(&self) -> Option<String> {
            None
        }

        fn guild_tab_count(&self) -> u8 {
            0
        }
    }

    fn shared_tabs() -> Vec<ContainerId> {
        SHARED_TABS.collect()
    }

    #[test]
    fn test_two_purchased_tabs_of_five() {
        // Two tabs of 98 slots purchased, three answered-but-empty tabs.
        let host = FixtureHost::new()
            .capacity(StoreKind::Shared, 13, Some(98))
            .capacity(StoreKind::Shared, 14, Some(98))
            .capacity(StoreKind::Shared, 15, Some(0))
            .capacity(StoreKind::Shared, 16, Some(0))
            .capacity(StoreKind::Shared, 17, Some(0))
            .item(StoreKind::Shared, 13, 1, 6948, 1)
            .item(StoreKind::Shared, 14, 98, 2589, 20);

        let snapshot = scan_store(&host, StoreKind::Shared, &shared_tabs()).unwrap();
        assert_eq!(snapshot.total_slots, 196);
        assert_eq!(snapshot.used_slots, 2);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[&13][&1].item_id, 6948);
        assert_eq!(snapshot.items[&14][&98].stack_count, 20);
        assert!(snapshot.items.get(&15).is_none());
    }

    #[test]
    fn test_zero_capacity_differs_from_unavailable() {
        // Tab 13 answers zero; tab 14 does not answer at all.
        let host = FixtureHost::new()
            .capacity(StoreKind::Shared, 13, Some(0))
            .capacity(StoreKind::Shared, 14, None)
            .capacity(StoreKind::Shared, 15, Some(4))
            .capacity(StoreKind::Shared, 16, Some(0))
            .capacity(StoreKind::Shared, 17, Some(0))
            .item(StoreKind::Shared, 15, 2, 1234, 5);

        let snapshot = scan_store(&host, StoreKind::Shared, &shared_tabs()).unwrap();
        // The unavailable tab contributes nothing; the zero tabs contribute
        // zero; only tab 15's four slots count.
        assert_eq!(snapshot.total_slots, 4);
        assert_eq!(snapshot.used_slots, 1);
    }

    #[test]
    fn test_capacity_wider_than_slot_addressing_clamps() {
        // One tab claims more slots than a SlotIndex can address; the
        // credited total and the walked range clamp to the same value, so
        // every addressable occupied slot is still found.
        let host = FixtureHost::new()
            .capacity(StoreKind::Shared, 13, Some(u32::from(SlotIndex::MAX) + 2))
            .capacity(StoreKind::Shared, 14, Some(0))
            .capacity(StoreKind::Shared, 15, Some(0))
            .capacity(StoreKind::Shared, 16, Some(0))
            .capacity(StoreKind::Shared, 17, Some(0))
            .item(StoreKind::Shared, 13, 1, 929, 3)
            .item(StoreKind::Shared, 13, 2, 4338, 7);

        let snapshot = scan_store(&host, StoreKind::Shared, &shared_tabs()).unwrap();
        assert_eq!(snapshot.total_slots, u32::from(SlotIndex::MAX));
        assert_eq!(snapshot.used_slots, 2);
        assert_eq!(snapshot.items[&13][&1].item_id, 929);
        assert_eq!(snapshot.items[&13][&2].item_id, 4338);
    }

    #[test]
    fn test_all_tabs_unavailable_is_inaccessible() {
        let host = FixtureHost::new()
            .capacity(StoreKind::Shared, 13, None)
            .capacity(StoreKind::Shared, 14, None)
            .capacity(StoreKind::Shared, 15, None)
            .capacity(StoreKind::Shared, 16, None)
            .capacity(StoreKind::Shared, 17, None);

        let result = scan_store(&host, StoreKind::Shared, &shared_tabs());
        assert_eq!(
            result,
            Err(ScanError::StoreInaccessible {
                store: StoreKind::Shared
            })
        );
    }

    #[test]
    fn test_unavailable_slot_is_skipped_not_fatal() {
        let host = FixtureHost::new()
            .capacity(StoreKind::Shared, 13, Some(3))
            .capacity(StoreKind::Shared, 14, Some(0))
            .capacity(StoreKind::Shared, 15, Some(0))
            .capacity(StoreKind::Shared, 16, Some(0))
            .capacity(StoreKind::Shared, 17, Some(0))
            .item(StoreKind::Shared, 13, 1, 111, 1)
            .unavailable_slot(StoreKind::Shared, 13, 2)
            .item(StoreKind::Shared, 13, 3, 333, 1);

        let snapshot = scan_store(&host, StoreKind::Shared, &shared_tabs()).unwrap();
        assert_eq!(snapshot.total_slots, 3);
        assert_eq!(snapshot.used_slots, 2);
        assert!(snapshot.items[&13].get(&2).is_none());
    }

    #[test]
    fn test_rescan_of_unchanged_store_matches() {
        let host = FixtureHost::new()
            .capacity(StoreKind::Shared, 13, Some(98))
            .capacity(StoreKind::Shared, 14, Some(0))
            .capacity(StoreKind::Shared, 15, Some(0))
            .capacity(StoreKind::Shared, 16, Some(0))
            .capacity(StoreKind::Shared, 17, Some(0))
            .item(StoreKind::Shared, 13, 7, 6948, 3);

        let first = scan_store(&host, StoreKind::Shared, &shared_tabs()).unwrap();
        let second = scan_store(&host, StoreKind::Shared, &shared_tabs()).unwrap();
        assert!(first.contents_match(&second));
    }

    #[test]
    fn test_empty_tab_list_yields_empty_snapshot() {
        let host = FixtureHost::new();
        let snapshot = scan_store(&host, StoreKind::Guild, &[]).unwrap();
        assert_eq!(snapshot.total_slots, 0);
        assert!(snapshot.items.is_empty());
        assert!(!snapshot.is_unscanned());
    }

    #[test]
    fn test_gold_is_captured() {
        let mut host = FixtureHost::new().capacity(StoreKind::Personal, 6, Some(1));
        host.gold = 123_456_789;
        let snapshot = scan_store(&host, StoreKind::Personal, &[6]).unwrap();
        assert_eq!(snapshot.gold, 123_456_789);
    }
}
