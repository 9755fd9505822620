//! # Container Identifiers and Store Classification
//!
//! The host addresses every bag, bank tab, and shared tab through a single
//! numeric container-id space. The engine never hardcodes raw ids outside
//! this module; all classification goes through the ranges defined here.
//!
//! ## Id Layout
//!
//! - `0..=5`: carried containers (backpack plus equipped bags)
//! - `6..=11`: personal bank tabs
//! - `13..=17`: shared (account-wide) bank tabs
//!
//! Ids outside these ranges (including the reserved gap at `12`) belong to
//! host containers the engine does not manage and classify as nothing.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A host container identifier (bag, bank tab, or shared tab).
pub type ContainerId = i32;

/// A 1-based slot position within a container.
pub type SlotIndex = u16;

/// Container ids the character physically carries.
pub const CARRIED_CONTAINERS: RangeInclusive<ContainerId> = 0..=5;

/// Container ids of the per-character bank tabs, in scan order.
pub const PERSONAL_TABS: RangeInclusive<ContainerId> = 6..=11;

/// Container ids of the account-wide shared bank tabs, in scan order.
pub const SHARED_TABS: RangeInclusive<ContainerId> = 13..=17;

/// Slot count of a single guild vault tab (fixed by the host).
pub const GUILD_TAB_SLOTS: SlotIndex = 98;

/// Maximum number of purchasable guild vault tabs.
pub const MAX_GUILD_TABS: u8 = 8;

/// Which logical store a session has open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    /// The per-character bank.
    Personal,
    /// The account-wide shared bank.
    Shared,
    /// The guild vault.
    Guild,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Personal => write!(f, "personal"),
            StoreKind::Shared => write!(f, "shared"),
            StoreKind::Guild => write!(f, "guild"),
        }
    }
}

/// Returns `true` if `id` is a container the character carries.
#[must_use]
pub fn is_carried_container(id: ContainerId) -> bool {
    CARRIED_CONTAINERS.contains(&id)
}

/// Returns `true` if `id` is a personal bank tab.
#[must_use]
pub fn is_personal_tab(id: ContainerId) -> bool {
    PERSONAL_TABS.contains(&id)
}

/// Returns `true` if `id` is a shared bank tab.
#[must_use]
pub fn is_shared_tab(id: ContainerId) -> bool {
    SHARED_TABS.contains(&id)
}
