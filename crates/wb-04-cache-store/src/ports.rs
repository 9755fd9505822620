//! Outbound (driven) port for host inventory queries.
//!
//! The scan algorithm and the engine know nothing about the host API; they
//! see only this trait. Adapters in the runtime translate it to real host
//! calls, and tests substitute deterministic fixtures.

use shared_types::{ContainerId, IdentityKey, ItemRecord, SlotIndex, StoreKind};

/// Answer to a single slot query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotQuery {
    /// The host could not answer right now; skip this slot silently.
    Unavailable,
    /// The slot exists and is empty.
    Empty,
    /// The slot holds an item.
    Occupied(ItemRecord),
}

/// Read access to the host's stores.
///
/// Every method is a point-in-time question with no side effects. "Could not
/// answer" is a routine condition, not an error: capacity queries return
/// `None` and slot queries return [`SlotQuery::Unavailable`] while the host
/// is mid-load or the character is out of teller range.
pub trait StoreQuery: Send + Sync {
    /// Slot capacity of one tab of a store.
    ///
    /// `Some(0)` means the tab exists with no purchased slots and counts as
    /// an answered query; `None` means the host could not answer. Conflating
    /// the two corrupts slot totals.
    fn tab_capacity(&self, store: StoreKind, tab: ContainerId) -> Option<u32>;

    /// Contents of one slot of a tab.
    fn slot_info(&self, store: StoreKind, tab: ContainerId, slot: SlotIndex) -> SlotQuery;

    /// Gold held in a store, in copper.
    fn store_gold(&self, store: StoreKind) -> Option<u64>;

    /// Gold the character carries on their person, in copper.
    fn carried_gold(&self) -> Option<u64>;

    /// Whether the shared store answers enumeration queries this session.
    fn shared_store_enumerable(&self) -> bool;

    /// The logged-in character's identity, if the host has resolved it.
    fn identity(&self) -> Option<IdentityKey>;

    /// The character's guild name, if any.
    fn guild_name(&self) -> Option<String>;

    /// Number of purchased guild vault tabs; zero without a guild.
    fn guild_tab_count(&self) -> u8;
}
