//! # Item Records
//!
//! The immutable per-slot payload produced by a store scan. Records are
//! replaced wholesale with their snapshot; nothing mutates one in place.

use serde::{Deserialize, Serialize};

/// Host item quality tiers, ordered from junk to heirloom.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Grey vendor trash.
    Poor,
    /// White commodity items.
    #[default]
    Common,
    /// Green.
    Uncommon,
    /// Blue.
    Rare,
    /// Purple.
    Epic,
    /// Orange.
    Legendary,
    /// Artifact gold.
    Artifact,
    /// Account-bound heirlooms.
    Heirloom,
}

impl QualityTier {
    /// Maps the host's raw quality number to a tier.
    ///
    /// Out-of-range values clamp to [`QualityTier::Common`]; the host has
    /// historically shipped undocumented values and a scan must not fail
    /// over one.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => QualityTier::Poor,
            1 => QualityTier::Common,
            2 => QualityTier::Uncommon,
            3 => QualityTier::Rare,
            4 => QualityTier::Epic,
            5 => QualityTier::Legendary,
            6 => QualityTier::Artifact,
            7 => QualityTier::Heirloom,
            _ => QualityTier::Common,
        }
    }
}

/// A single occupied slot as captured by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// The host's stable item identifier.
    pub item_id: u64,
    /// Number of items stacked in this slot.
    pub stack_count: u32,
    /// Quality tier of the item.
    pub quality: QualityTier,
    /// Display name as reported at scan time.
    pub name: String,
    /// Icon texture id.
    pub icon: u32,
    /// Host item class (weapon, consumable, ...).
    pub class_id: u8,
    /// Host item subclass within the class.
    pub subclass_id: u8,
}
