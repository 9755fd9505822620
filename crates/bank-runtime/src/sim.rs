//! # Simulated Host
//!
//! A deterministic stand-in for the real host: one struct implements every
//! outbound port the engine requires, backed by a seeded demo world. The
//! console mutates the world through the same struct, so signals sent after
//! a mutation are picked up by the next scan exactly as they would be
//! against a live host.
//!
//! The window and chat capabilities live here too, as the sim's own
//! implementations of the optional ports.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{
    ContainerId, IdentityKey, ItemRecord, QualityTier, SlotIndex, StoreKind, GUILD_TAB_SLOTS,
    PERSONAL_TABS, SHARED_TABS,
};
use tracing::{debug, info};
use wb_01_session::{BankWindowHandle, ChatSink, NativeBankUi};
use wb_02_conflict_registry::{ConflictResult, ExtensionHost};
use wb_04_cache_store::{SlotQuery, StoreQuery};

use crate::config::SimConfig;

/// Slot capacity of a purchased personal bank tab in the demo world.
const PERSONAL_TAB_SLOTS: u32 = 28;

/// Demo item table: `(item_id, name, quality_raw, class_id, subclass_id,
/// max_stack, icon)`.
const ITEM_TABLE: &[(u64, &str, u8, u8, u8, u32, u32)] = &[
    (2589, "Silk Cloth", 1, 7, 5, 20, 132905),
    (4338, "Mageweave Cloth", 1, 7, 5, 20, 132907),
    (14047, "Runecloth", 1, 7, 5, 20, 132889),
    (12359, "Thorium Bar", 1, 7, 7, 20, 133223),
    (12363, "Arcane Crystal", 3, 7, 7, 10, 134087),
    (929, "Healing Potion", 1, 0, 1, 5, 134831),
    (13446, "Major Healing Potion", 1, 0, 1, 5, 134832),
    (7078, "Essence of Fire", 2, 7, 12, 10, 135805),
    (13468, "Black Lotus", 3, 7, 9, 1, 134194),
    (19019, "Thunderfury, Blessed Blade", 5, 2, 7, 1, 135349),
];

/// Everything mutable about the simulated world, under one lock.
struct SimWorld {
    rng: StdRng,
    identity: IdentityKey,
    carried_gold: u64,
    shared_enumerable: bool,
    guild: Option<(String, u8)>,
    capacities: HashMap<(StoreKind, ContainerId), u32>,
    slots: HashMap<(StoreKind, ContainerId, SlotIndex), ItemRecord>,
    gold: HashMap<StoreKind, u64>,
    extensions: HashSet<String>,
    features: HashSet<(String, String)>,
}

/// The simulated host; implements every engine port over [`SimWorld`].
pub struct SimHost {
    world: RwLock<SimWorld>,
    native_suppressed: AtomicBool,
}

impl SimHost {
    /// Builds the demo world described by `config`.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        let host = Self::with_seed(config.seed);
        if let Some(name) = &config.competitor {
            host.install_extension(name);
        }
        host
    }

    /// Builds the demo world from a bare seed, with no competitor active.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut world = SimWorld {
            rng: StdRng::seed_from_u64(seed),
            identity: IdentityKey::new("Thrall", "Durotar"),
            carried_gold: 52_314, // 5g 23s 14c
            shared_enumerable: true,
            guild: Some(("Ironforge Trading Co".to_owned(), 3)),
            capacities: HashMap::new(),
            slots: HashMap::new(),
            gold: HashMap::new(),
            extensions: HashSet::new(),
            features: HashSet::new(),
        };

        for tab in PERSONAL_TABS {
            let capacity = if tab <= 7 { PERSONAL_TAB_SLOTS } else { 0 };
            world.capacities.insert((StoreKind::Personal, tab), capacity);
        }
        for tab in SHARED_TABS {
            let capacity = if tab <= 14 { u32::from(GUILD_TAB_SLOTS) } else { 0 };
            world.capacities.insert((StoreKind::Shared, tab), capacity);
        }
        for tab in 1..=3 {
            world
                .capacities
                .insert((StoreKind::Guild, tab), u32::from(GUILD_TAB_SLOTS));
        }

        world.stock(StoreKind::Personal, 6, 9);
        world.stock(StoreKind::Personal, 7, 4);
        world.stock(StoreKind::Shared, 13, 22);
        world.stock(StoreKind::Shared, 14, 11);
        world.stock(StoreKind::Guild, 1, 30);
        world.stock(StoreKind::Guild, 2, 6);

        world.gold.insert(StoreKind::Shared, 9_876_543);
        world.gold.insert(StoreKind::Guild, 250_000_000);

        SimHost {
            world: RwLock::new(world),
            native_suppressed: AtomicBool::new(false),
        }
    }

    /// Marks a competitor extension as installed and active.
    pub fn install_extension(&self, name: &str) {
        info!(extension = name, "Sim: extension installed");
        self.world.write().extensions.insert(name.to_owned());
    }

    /// Flips whether the shared store answers enumeration this session.
    pub fn set_enumerable(&self, enumerable: bool) {
        info!(enumerable, "Sim: shared store enumerability changed");
        self.world.write().shared_enumerable = enumerable;
    }

    /// Puts one random item into a free slot of `store`, returning the tab
    /// it landed in. `None` when every purchased tab is full.
    pub fn deposit_random(&self, store: StoreKind) -> Option<ContainerId> {
        let mut world = self.world.write();
        let tabs: Vec<(ContainerId, u32)> = world
            .capacities
            .iter()
            .filter(|((kind, _), capacity)| *kind == store && **capacity > 0)
            .map(|((_, tab), capacity)| (*tab, *capacity))
            .collect();

        for (tab, capacity) in tabs {
            for slot in 1..=capacity as SlotIndex {
                if world.slots.contains_key(&(store, tab, slot)) {
                    continue;
                }
                let record = world.roll_item();
                debug!(%store, tab, slot, item = %record.name, "Sim: item deposited");
                world.slots.insert((store, tab, slot), record);
                return Some(tab);
            }
        }
        None
    }

    /// Moves the shared gold balance by a random amount, returning the new
    /// total in copper.
    pub fn jitter_gold(&self) -> u64 {
        let mut world = self.world.write();
        let delta = world.rng.gen_range(1_000..=500_000);
        let total = world
            .gold
            .get(&StoreKind::Shared)
            .copied()
            .unwrap_or(0)
            .saturating_add(delta);
        world.gold.insert(StoreKind::Shared, total);
        debug!(delta, total, "Sim: shared gold changed");
        total
    }

    /// Whether the native bank view is currently suppressed.
    #[must_use]
    pub fn native_suppressed(&self) -> bool {
        self.native_suppressed.load(Ordering::SeqCst)
    }
}

impl SimWorld {
    /// Fills `count` random free slots of one tab with random items.
    fn stock(&mut self, store: StoreKind, tab: ContainerId, count: u32) {
        let Some(&capacity) = self.capacities.get(&(store, tab)) else {
            return;
        };
        let mut placed = 0;
        while placed < count.min(capacity) {
            let slot = self.rng.gen_range(1..=capacity) as SlotIndex;
            if self.slots.contains_key(&(store, tab, slot)) {
                continue;
            }
            let record = self.roll_item();
            self.slots.insert((store, tab, slot), record);
            placed += 1;
        }
    }

    fn roll_item(&mut self) -> ItemRecord {
        let (item_id, name, quality_raw, class_id, subclass_id, max_stack, icon) =
            ITEM_TABLE[self.rng.gen_range(0..ITEM_TABLE.len())];
        ItemRecord {
            item_id,
            stack_count: self.rng.gen_range(1..=max_stack),
            quality: QualityTier::from_raw(quality_raw),
            name: name.to_owned(),
            icon,
            class_id,
            subclass_id,
        }
    }
}

impl StoreQuery for SimHost {
    fn tab_capacity(&self, store: StoreKind, tab: ContainerId) -> Option<u32> {
        let world = self.world.read();
        if store == StoreKind::Shared && !world.shared_enumerable {
            return None;
        }
        world.capacities.get(&(store, tab)).copied()
    }

    fn slot_info(&self, store: StoreKind, tab: ContainerId, slot: SlotIndex) -> SlotQuery {
        let world = self.world.read();
        if store == StoreKind::Shared && !world.shared_enumerable {
            return SlotQuery::Unavailable;
        }
        world
            .slots
            .get(&(store, tab, slot))
            .cloned()
            .map_or(SlotQuery::Empty, SlotQuery::Occupied)
    }

    fn store_gold(&self, store: StoreKind) -> Option<u64> {
        let world = self.world.read();
        if store == StoreKind::Shared && !world.shared_enumerable {
            return None;
        }
        world.gold.get(&store).copied()
    }

    fn carried_gold(&self) -> Option<u64> {
        Some(self.world.read().carried_gold)
    }

    fn shared_store_enumerable(&self) -> bool {
        self.world.read().shared_enumerable
    }

    fn identity(&self) -> Option<IdentityKey> {
        Some(self.world.read().identity.clone())
    }

    fn guild_name(&self) -> Option<String> {
        self.world.read().guild.as_ref().map(|(name, _)| name.clone())
    }

    fn guild_tab_count(&self) -> u8 {
        self.world.read().guild.as_ref().map_or(0, |(_, tabs)| *tabs)
    }
}

impl ExtensionHost for SimHost {
    fn is_extension_active(&self, extension: &str) -> bool {
        self.world.read().extensions.contains(extension)
    }

    fn is_feature_enabled(&self, extension: &str, feature: &str) -> bool {
        self.world
            .read()
            .features
            .contains(&(extension.to_owned(), feature.to_owned()))
    }

    fn set_extension_enabled(&self, extension: &str, enabled: bool) -> ConflictResult<()> {
        info!(extension, enabled, "Sim: extension toggled");
        let mut world = self.world.write();
        if enabled {
            world.extensions.insert(extension.to_owned());
        } else {
            world.extensions.remove(extension);
        }
        Ok(())
    }

    fn set_feature_enabled(
        &self,
        extension: &str,
        feature: &str,
        enabled: bool,
    ) -> ConflictResult<()> {
        info!(extension, feature, enabled, "Sim: feature toggled");
        let mut world = self.world.write();
        let key = (extension.to_owned(), feature.to_owned());
        if enabled {
            world.features.insert(key);
        } else {
            world.features.remove(&key);
        }
        Ok(())
    }
}

impl NativeBankUi for SimHost {
    fn suppress_native_view(&self) {
        debug!("Sim: native bank view suppressed");
        self.native_suppressed.store(true, Ordering::SeqCst);
    }

    fn restore_native_view(&self) {
        debug!("Sim: native bank view restored");
        self.native_suppressed.store(false, Ordering::SeqCst);
    }
}

/// The sim's own bank window: a visibility flag plus logs.
#[derive(Default)]
pub struct SimWindow {
    visible: AtomicBool,
}

impl SimWindow {
    /// Whether the window is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl BankWindowHandle for SimWindow {
    fn show(&self) {
        info!("Bank window shown");
        self.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        info!("Bank window hidden");
        self.visible.store(false, Ordering::SeqCst);
    }
}

/// Chat sink that echoes to the console and keeps a transcript.
pub struct SimChat {
    lines: Mutex<Vec<String>>,
    echo: bool,
}

impl SimChat {
    /// A chat sink that prints each message like a chat frame would.
    #[must_use]
    pub fn new() -> Self {
        SimChat {
            lines: Mutex::new(Vec::new()),
            echo: true,
        }
    }

    /// A chat sink that only records; used by tests.
    #[must_use]
    pub fn silent() -> Self {
        SimChat {
            lines: Mutex::new(Vec::new()),
            echo: false,
        }
    }

    /// Every message delivered so far, oldest first.
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Default for SimChat {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSink for SimChat {
    fn message(&self, text: &str) {
        if self.echo {
            println!("[bank] {text}");
        }
        self.lines.lock().push(text.to_owned());
    }
}
