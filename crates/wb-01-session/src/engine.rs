//! # Session Engine
//!
//! The single consumer of the engine queue. Owns the session value, the
//! saved-variables document, and the three subsystems (conflict registry,
//! scan scheduler, derived caches), and wires host signals and deferred
//! tasks into them.
//!
//! ## Dispatch Boundary
//!
//! [`SessionEngine::handle_event`] is the protected boundary: handlers
//! return `Result`, failures are recorded in the fault ring, and the loop
//! outside keeps running. The exposed operations below the handlers are
//! the same methods a command surface calls directly.

use std::path::PathBuf;
use std::sync::Arc;

use saved_vars::{save_to_path, AccountData, SavedVariables};
use serde::Serialize;
use shared_types::{
    unix_time_ms, ConflictStatus, ContainerId, IdentityKey, OwnerChoice, StoreKind, StoreSnapshot,
    PERSONAL_TABS, SHARED_TABS,
};
use signal_bus::{
    DeferredTask, EngineEvent, EngineNotice, EngineSender, HostSignal, NoticeHub, PendingAction,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;
use warbank_telemetry::{FaultLog, FaultRecord};
use wb_02_conflict_registry::{known_competitors, ConflictRegistry, ExtensionHost};
use wb_03_scan_scheduler::ScanScheduler;
use wb_04_cache_store::{scan_store, CacheReport, DerivedCaches, OwnedCount, SearchHit, StoreQuery};

use crate::config::EngineTuning;
use crate::error::EngineResult;
use crate::ports::{BankWindowHandle, ChatSink, NativeBankUi};
use crate::session::BankSession;

/// Owner label the shared bank carries in derived caches and tooltips.
const SHARED_OWNER_LABEL: &str = "warband";

/// The required host-side ports, bundled for construction.
#[derive(Clone)]
pub struct HostPorts {
    /// Read access to stores, identity, and guild facts.
    pub store_query: Arc<dyn StoreQuery>,
    /// Extension detection and enable/disable actions.
    pub extension_host: Arc<dyn ExtensionHost>,
    /// Suppress/restore of the host's native bank view.
    pub native_ui: Arc<dyn NativeBankUi>,
}

/// Snapshot sizes and cache counters for the diagnostics surface.
#[derive(Debug, Clone, Serialize)]
pub struct EngineCacheStats {
    /// Derived-cache counters and ages.
    pub derived: CacheReport,
    /// Slot capacity of the shared bank image.
    pub shared_total_slots: u32,
    /// Occupied slots in the shared bank image.
    pub shared_used_slots: u32,
    /// When the shared bank was last scanned (unix ms).
    pub shared_last_scan: Option<u64>,
    /// Guild vault images held.
    pub guild_banks: usize,
    /// Characters in the roster.
    pub characters_tracked: usize,
    /// Notices published since startup.
    pub notices_published: u64,
    /// Faults recorded since startup, including evicted ones.
    pub faults_recorded: u64,
}

/// The top-level controller.
pub struct SessionEngine {
    tuning: EngineTuning,
    session: BankSession,
    vars: SavedVariables,
    persist_path: Option<PathBuf>,
    hosts: HostPorts,
    window: Option<Arc<dyn BankWindowHandle>>,
    chat: Option<Arc<dyn ChatSink>>,
    conflicts: ConflictRegistry,
    scheduler: ScanScheduler,
    caches: DerivedCaches,
    notices: NoticeHub,
    queue_tx: EngineSender,
    show_timer: PendingAction,
    probe_timer: PendingAction,
    faults: FaultLog,
}

impl SessionEngine {
    /// Builds an engine over the given ports and persisted document.
    ///
    /// `queue_tx` must be the sender half of the queue whose receiver the
    /// caller will drain into [`SessionEngine::handle_event`]; deferred
    /// tasks re-enter through it.
    #[must_use]
    pub fn new(
        tuning: EngineTuning,
        hosts: HostPorts,
        vars: SavedVariables,
        queue_tx: EngineSender,
    ) -> Self {
        SessionEngine {
            session: BankSession::default(),
            vars,
            persist_path: None,
            hosts,
            window: None,
            chat: None,
            conflicts: ConflictRegistry::with_table(known_competitors(), tuning.conflicts),
            scheduler: ScanScheduler::with_delays(tuning.scheduler),
            caches: DerivedCaches::with_ttl(tuning.derived_ttl),
            notices: NoticeHub::new(),
            queue_tx,
            show_timer: PendingAction::new("show-own-window"),
            probe_timer: PendingAction::new("shared-access-probe"),
            faults: FaultLog::with_capacity(tuning.fault_capacity),
            tuning,
        }
    }

    /// Where the saved-variables document is written after mutations.
    /// Without a path the engine runs in-memory only.
    pub fn set_persist_path(&mut self, path: PathBuf) {
        self.persist_path = Some(path);
    }

    /// Registers the own-window capability. Call once at startup.
    pub fn register_window(&mut self, window: Arc<dyn BankWindowHandle>) {
        if self.window.is_some() {
            warn!("Window capability registered twice; replacing");
        }
        self.window = Some(window);
    }

    /// Registers the chat capability. Call once at startup.
    pub fn register_chat(&mut self, chat: Arc<dyn ChatSink>) {
        if self.chat.is_some() {
            warn!("Chat capability registered twice; replacing");
        }
        self.chat = Some(chat);
    }

    /// Runs the startup work that precedes any signal: the first
    /// (throttled) conflict detection pass.
    pub fn startup(&mut self) {
        info!(
            module_enabled = self.vars.profile.bank_module_enabled,
            characters = self.vars.account.characters.len(),
            "Session engine starting"
        );
        self.check_conflicts();
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Handles one engine event; the protected boundary.
    pub fn handle_event(&mut self, event: EngineEvent) {
        let kind = match &event {
            EngineEvent::Signal(signal) => signal.kind(),
            EngineEvent::Task(task) => task.kind(),
        };
        if let Err(err) = self.dispatch(event) {
            self.faults.record(kind, &err);
        }
    }

    fn dispatch(&mut self, event: EngineEvent) -> EngineResult<()> {
        match event {
            EngineEvent::Signal(signal) => match signal {
                HostSignal::SessionOpened { hint } => self.on_session_opened(hint),
                HostSignal::SessionClosed => self.on_session_closed(),
                HostSignal::GuildSessionOpened { guild } => self.on_guild_opened(&guild),
                HostSignal::GuildSessionClosed => {
                    debug!("Guild vault session closed");
                    self.session.guild_open = false;
                    Ok(())
                }
                HostSignal::SlotRangeChanged { containers } => {
                    self.scheduler
                        .on_slot_changes(&self.queue_tx, self.session.is_open, &containers);
                    Ok(())
                }
                HostSignal::ExtensionLoaded { name } => self.on_extension_loaded(&name),
                HostSignal::CombatEntered => {
                    self.session.in_combat = true;
                    Ok(())
                }
                HostSignal::CombatExited => {
                    self.on_combat_exited();
                    Ok(())
                }
                HostSignal::CurrencyChanged => {
                    self.scheduler
                        .on_currency_changed(&self.queue_tx, self.session.is_open);
                    Ok(())
                }
                HostSignal::ReputationChanged => {
                    self.scheduler
                        .on_reputation_changed(&self.queue_tx, self.session.is_open);
                    Ok(())
                }
            },
            EngineEvent::Task(task) => match task {
                DeferredTask::ShowOwnWindow => {
                    self.show_own_window();
                    Ok(())
                }
                DeferredTask::ProbeSharedAccess => self.probe_shared_access(),
                DeferredTask::FireRescan => self.fire_rescan(),
                DeferredTask::MoneyRefresh => self.fire_money_refresh(),
                DeferredTask::CollectionRefresh => {
                    self.fire_collection_refresh();
                    Ok(())
                }
                DeferredTask::NextConflictPrompt => {
                    self.maybe_begin_prompt();
                    Ok(())
                }
                DeferredTask::ConflictRecheck => {
                    self.check_conflicts();
                    Ok(())
                }
            },
        }
    }

    // =========================================================================
    // SIGNAL HANDLERS
    // =========================================================================

    fn on_session_opened(&mut self, hint: Option<StoreKind>) -> EngineResult<()> {
        // The host's tab report is unreliable; Personal is the policy
        // default, not an inference.
        let store = hint.unwrap_or(StoreKind::Personal);
        let correlation = Uuid::new_v4();
        info!(%store, hinted = hint.is_some(), %correlation, "Bank session opened");

        self.session.is_open = true;
        self.session.active_store = Some(store);
        self.session.correlation = Some(correlation);

        self.note_current_character();
        self.check_conflicts();

        if self.vars.profile.bank_module_enabled && !self.is_using_other_owner() {
            self.hosts.native_ui.suppress_native_view();
            self.session.suppressed = true;
            self.show_timer.schedule(
                &self.queue_tx,
                DeferredTask::ShowOwnWindow,
                self.tuning.show_settle,
            );
        } else {
            debug!("Background mode; native view left alone");
        }

        // Shared accessibility is only believed once the probe answers.
        self.probe_timer.schedule(
            &self.queue_tx,
            DeferredTask::ProbeSharedAccess,
            self.tuning.probe_settle,
        );

        if self.refresh_personal()? {
            self.after_snapshot_change(vec![StoreKind::Personal])?;
        }
        Ok(())
    }

    fn on_session_closed(&mut self) -> EngineResult<()> {
        info!(correlation = ?self.session.correlation, "Bank session closed");
        self.scheduler.cancel_rescan();
        self.show_timer.cancel();
        self.probe_timer.cancel();

        // Unconditional and idempotent; never leave the native view hidden.
        self.hosts.native_ui.restore_native_view();
        self.hide_own_window();

        self.session.reset_open_state();
        self.persist()
    }

    fn on_guild_opened(&mut self, guild: &str) -> EngineResult<()> {
        info!(guild, "Guild vault session opened");
        self.session.guild_open = true;
        if self.refresh_guild(guild)? {
            self.after_snapshot_change(vec![StoreKind::Guild])?;
        }
        Ok(())
    }

    fn on_extension_loaded(&mut self, name: &str) -> EngineResult<()> {
        debug!(extension = name, "Extension loaded");
        let reset = self.conflicts.note_extension_loaded(
            name,
            &mut self.vars.profile.bank_conflict_choices,
            &self.queue_tx,
        );
        if reset {
            self.persist()?;
        }
        Ok(())
    }

    fn on_combat_exited(&mut self) {
        self.session.in_combat = false;
        if self.session.show_deferred_by_combat {
            self.session.show_deferred_by_combat = false;
            if self.session.is_open {
                debug!("Combat ended; running the deferred window show");
                self.show_own_window();
            }
        }
    }

    // =========================================================================
    // DEFERRED-TASK HANDLERS
    // =========================================================================

    fn show_own_window(&mut self) {
        if !self.session.is_open {
            debug!("Window show fired after close; dropped");
            return;
        }
        if self.session.in_combat {
            debug!("Window show blocked by combat; one catch-up show owed");
            self.session.show_deferred_by_combat = true;
            return;
        }
        match &self.window {
            Some(window) => window.show(),
            None => debug!("No window capability registered; show skipped"),
        }
    }

    fn hide_own_window(&mut self) {
        if self.session.in_combat {
            debug!("Window hide blocked by combat; host hides it on reload");
            return;
        }
        if let Some(window) = &self.window {
            window.hide();
        }
    }

    fn probe_shared_access(&mut self) -> EngineResult<()> {
        if !self.session.is_open {
            return Ok(());
        }
        let accessible = self.hosts.store_query.shared_store_enumerable();
        self.session.shared_accessible = accessible;
        debug!(accessible, "Shared store probe answered");

        if accessible && self.refresh_shared()? {
            self.after_snapshot_change(vec![StoreKind::Shared])?;
        }
        Ok(())
    }

    fn fire_rescan(&mut self) -> EngineResult<()> {
        if !self.session.is_open {
            debug!("Rescan fired after close; dropped");
            return Ok(());
        }
        let mut refreshed = Vec::new();
        if self.session.shared_accessible {
            match self.refresh_shared() {
                Ok(true) => refreshed.push(StoreKind::Shared),
                Ok(false) => {}
                Err(err) => self.faults.record("rescan_shared", &err),
            }
        }
        match self.refresh_personal() {
            Ok(true) => refreshed.push(StoreKind::Personal),
            Ok(false) => {}
            Err(err) => self.faults.record("rescan_personal", &err),
        }
        if !refreshed.is_empty() {
            self.after_snapshot_change(refreshed)?;
        }
        Ok(())
    }

    fn fire_money_refresh(&mut self) -> EngineResult<()> {
        if !self.session.is_open {
            return Ok(());
        }
        if self.session.shared_accessible {
            if let Some(gold) = self.hosts.store_query.store_gold(StoreKind::Shared) {
                self.vars.account.warband_bank.gold = gold;
            }
        }
        if let Some(key) = self.hosts.store_query.identity() {
            let personal_gold = self.hosts.store_query.store_gold(StoreKind::Personal);
            let carried = self.hosts.store_query.carried_gold();
            let entry = self.vars.character_entry(&key);
            if let Some(gold) = personal_gold {
                entry.personal_bank.gold = gold;
            }
            if let Some(gold) = carried {
                entry.carried_gold = gold;
            }
        }
        debug!("Gold balances refreshed in place");
        self.notices.publish(EngineNotice::MoneyChanged);
        self.persist()
    }

    fn fire_collection_refresh(&mut self) {
        if !self.session.is_open {
            return;
        }
        self.notices.publish(EngineNotice::CollectionsChanged);
    }

    // =========================================================================
    // EXPOSED OPERATIONS
    // =========================================================================

    /// Scans the shared store now, if a session is open and the probe has
    /// answered. Returns whether a scan ran.
    ///
    /// # Errors
    ///
    /// Scan or persistence failures; the snapshot is untouched on error.
    pub fn scan_shared_store(&mut self) -> EngineResult<bool> {
        if !self.session.can_scan_shared() {
            debug!("Shared scan requested while unavailable; skipped");
            return Ok(false);
        }
        let scanned = self.refresh_shared()?;
        if scanned {
            self.after_snapshot_change(vec![StoreKind::Shared])?;
        }
        Ok(scanned)
    }

    /// Scans the personal store now, if a session is open. Returns whether
    /// a scan ran.
    ///
    /// # Errors
    ///
    /// Scan or persistence failures; the snapshot is untouched on error.
    pub fn scan_personal_store(&mut self) -> EngineResult<bool> {
        if !self.session.is_open {
            debug!("Personal scan requested while closed; skipped");
            return Ok(false);
        }
        let scanned = self.refresh_personal()?;
        if scanned {
            self.after_snapshot_change(vec![StoreKind::Personal])?;
        }
        Ok(scanned)
    }

    /// Diagnostics scan of every reachable store, bypassing the open check.
    /// Unreachable stores are skipped with a fault record, not an error.
    ///
    /// # Errors
    ///
    /// Only persistence failures; per-store scan failures are recorded.
    pub fn force_scan(&mut self) -> EngineResult<Vec<StoreKind>> {
        info!("Forced scan of every reachable store");
        let mut refreshed = Vec::new();
        match self.refresh_shared() {
            Ok(true) => refreshed.push(StoreKind::Shared),
            Ok(false) => {}
            Err(err) => self.faults.record("force_scan_shared", &err),
        }
        match self.refresh_personal() {
            Ok(true) => refreshed.push(StoreKind::Personal),
            Ok(false) => {}
            Err(err) => self.faults.record("force_scan_personal", &err),
        }
        if let Some(guild) = self.hosts.store_query.guild_name() {
            match self.refresh_guild(&guild) {
                Ok(true) => refreshed.push(StoreKind::Guild),
                Ok(false) => {}
                Err(err) => self.faults.record("force_scan_guild", &err),
            }
        }
        if !refreshed.is_empty() {
            self.after_snapshot_change(refreshed.clone())?;
        }
        Ok(refreshed)
    }

    /// Wipes every snapshot and derived cache, and zeroes cache counters.
    /// Roster entries survive with empty bank images.
    ///
    /// # Errors
    ///
    /// Persistence failures.
    pub fn clear_all_caches(&mut self) -> EngineResult<()> {
        info!("All cached store data cleared");
        self.vars.account.warband_bank = StoreSnapshot::default();
        self.vars.account.guild_banks.clear();
        for character in self.vars.account.characters.values_mut() {
            character.personal_bank = StoreSnapshot::default();
        }
        self.caches.reset();
        self.notices.publish(EngineNotice::StoresRefreshed {
            stores: vec![StoreKind::Personal, StoreKind::Shared, StoreKind::Guild],
        });
        self.persist()
    }

    /// Snapshot sizes and cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> EngineCacheStats {
        let account = &self.vars.account;
        EngineCacheStats {
            derived: self.caches.report(),
            shared_total_slots: account.warband_bank.total_slots,
            shared_used_slots: account.warband_bank.used_slots,
            shared_last_scan: account.warband_bank.last_scan,
            guild_banks: account.guild_banks.len(),
            characters_tracked: account.characters.len(),
            notices_published: self.notices.notices_published(),
            faults_recorded: self.faults.total_recorded(),
        }
    }

    /// Whether any persisted choice cedes bank UI to another extension.
    #[must_use]
    pub fn is_using_other_owner(&self) -> bool {
        self.vars
            .profile
            .bank_conflict_choices
            .values()
            .any(|choice| *choice == OwnerChoice::UseOther)
    }

    /// Flips a roster character's favorite marker. Returns the new state,
    /// or `None` for a character the roster has never seen.
    pub fn toggle_favorite(&mut self, key: &IdentityKey) -> Option<bool> {
        let entry = self.vars.account.characters.get_mut(key)?;
        entry.favorite = !entry.favorite;
        let favorite = entry.favorite;
        info!(character = %key, favorite, "Favorite toggled");
        if let Err(err) = self.persist() {
            self.faults.record("toggle_favorite", &err);
        }
        Some(favorite)
    }

    /// Point-in-time view of every known competitor.
    #[must_use]
    pub fn conflict_status(&self) -> Vec<ConflictStatus> {
        self.conflicts.status(
            self.hosts.extension_host.as_ref(),
            &self.vars.profile.bank_conflict_choices,
        )
    }

    /// Forgets every conflict choice, reclaims bank-UI management, and
    /// immediately re-runs detection so open questions get asked again.
    ///
    /// # Errors
    ///
    /// Persistence failures.
    pub fn reset_all_conflict_choices(&mut self) -> EngineResult<()> {
        info!("All conflict choices reset");
        self.vars.reset_all_choices();
        self.conflicts.reset_runtime_state();
        self.persist()?;
        self.check_conflicts();
        Ok(())
    }

    /// Applies the user's decision for the currently prompting extension.
    ///
    /// # Errors
    ///
    /// Rejections from the conflict protocol (wrong extension, nothing
    /// prompting). Host action failures are NOT errors here; the choice is
    /// persisted, the failure is recorded and surfaced once via chat.
    pub fn resolve_conflict(&mut self, extension: &str, choice: OwnerChoice) -> EngineResult<()> {
        let resolution = self.conflicts.resolve(
            extension,
            choice,
            self.hosts.extension_host.as_ref(),
            &mut self.vars.profile.bank_conflict_choices,
            &mut self.vars.profile.bank_module_enabled,
            &self.queue_tx,
        )?;
        if let Err(err) = self.persist() {
            self.faults.record("resolve_conflict", &err);
        }

        if let Some(action_error) = &resolution.action_error {
            self.faults.record("conflict_action", action_error);
            self.chat_message(&format!(
                "Could not apply the choice for {extension} automatically; \
                 please toggle it in the extension list."
            ));
        }

        if resolution.choice == OwnerChoice::UseOther {
            self.hand_over_session();
        }
        if resolution.reload_required && !resolution.next_prompt_scheduled {
            self.notices.publish(EngineNotice::ReloadSuggested);
        }
        Ok(())
    }

    /// Resets every transient flag and timer without touching persisted
    /// data: the way out of a wedged session.
    pub fn emergency_recovery(&mut self) {
        warn!("Emergency recovery requested");
        self.show_timer.cancel();
        self.probe_timer.cancel();
        self.scheduler.cancel_all();
        self.conflicts.reset_runtime_state();
        self.hosts.native_ui.restore_native_view();
        self.hide_own_window();
        self.session = BankSession::default();
        self.caches.invalidate_all();
        self.chat_message("Bank session state was reset; saved data is untouched.");
    }

    /// Recently recorded handler faults, oldest first.
    #[must_use]
    pub fn recent_faults(&self) -> Vec<FaultRecord> {
        self.faults.recent()
    }

    // =========================================================================
    // DERIVED LOOKUPS
    // =========================================================================

    /// Account-wide stack totals per item id.
    pub fn item_counts(&mut self) -> std::collections::BTreeMap<u64, u32> {
        let sources = snapshot_sources(&self.vars.account);
        self.caches.aggregates(&sources).clone()
    }

    /// Items whose name contains `needle`, across every owner.
    pub fn search_items(&mut self, needle: &str) -> Vec<SearchHit> {
        let sources = snapshot_sources(&self.vars.account);
        self.caches.search(&sources, needle)
    }

    /// Ownership lines for one item id.
    pub fn tooltip_lines(&mut self, item_id: u64) -> Vec<OwnedCount> {
        let sources = snapshot_sources(&self.vars.account);
        self.caches.tooltip_lines(&sources, item_id)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The current session value.
    #[must_use]
    pub fn session(&self) -> &BankSession {
        &self.session
    }

    /// The persisted document as currently held in memory.
    #[must_use]
    pub fn vars(&self) -> &SavedVariables {
        &self.vars
    }

    /// Registers a listener on the outbound notice stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineNotice> {
        self.notices.subscribe()
    }

    /// Whether a rescan timer is currently armed.
    #[must_use]
    pub fn rescan_pending(&self) -> bool {
        self.scheduler.rescan_pending()
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn check_conflicts(&mut self) {
        let outcome = self.conflicts.run_detection(
            self.hosts.extension_host.as_ref(),
            &self.vars.profile.bank_conflict_choices,
        );
        if outcome.throttled {
            return;
        }
        if !outcome.newly_queued.is_empty() {
            debug!(queued = outcome.newly_queued.len(), "Conflicts queued");
        }
        self.maybe_begin_prompt();
    }

    fn maybe_begin_prompt(&mut self) {
        if let Some(extension) = self.conflicts.try_begin_prompt() {
            self.notices
                .publish(EngineNotice::ConflictPromptRequired { extension });
        }
    }

    /// Stops owning the current session's UI after a `UseOther` decision.
    fn hand_over_session(&mut self) {
        if self.session.suppressed {
            self.hosts.native_ui.restore_native_view();
            self.session.suppressed = false;
        }
        self.show_timer.cancel();
        self.hide_own_window();
    }

    fn note_current_character(&mut self) {
        let Some(key) = self.hosts.store_query.identity() else {
            debug!("No identity resolved; roster not updated");
            return;
        };
        let carried = self.hosts.store_query.carried_gold();
        let entry = self.vars.character_entry(&key);
        entry.last_seen = unix_time_ms();
        if let Some(gold) = carried {
            entry.carried_gold = gold;
        }
    }

    fn refresh_shared(&mut self) -> EngineResult<bool> {
        let tabs: Vec<ContainerId> = SHARED_TABS.collect();
        let snapshot = scan_store(self.hosts.store_query.as_ref(), StoreKind::Shared, &tabs)?;
        self.vars.account.warband_bank = snapshot;
        Ok(true)
    }

    fn refresh_personal(&mut self) -> EngineResult<bool> {
        let Some(key) = self.hosts.store_query.identity() else {
            debug!("No identity resolved; personal scan skipped");
            return Ok(false);
        };
        let tabs: Vec<ContainerId> = PERSONAL_TABS.collect();
        let snapshot = scan_store(self.hosts.store_query.as_ref(), StoreKind::Personal, &tabs)?;
        self.vars.character_entry(&key).personal_bank = snapshot;
        Ok(true)
    }

    fn refresh_guild(&mut self, guild: &str) -> EngineResult<bool> {
        let tab_count = self.hosts.store_query.guild_tab_count();
        if tab_count == 0 {
            debug!(guild, "No guild tabs; guild scan skipped");
            return Ok(false);
        }
        let tabs: Vec<ContainerId> = (1..=i32::from(tab_count)).collect();
        let snapshot = scan_store(self.hosts.store_query.as_ref(), StoreKind::Guild, &tabs)?;
        self.vars.account.guild_banks.insert(guild.to_owned(), snapshot);
        Ok(true)
    }

    /// The common tail of every snapshot rebuild: push-invalidate the
    /// derived caches, announce once, persist.
    fn after_snapshot_change(&mut self, stores: Vec<StoreKind>) -> EngineResult<()> {
        self.caches.invalidate_all();
        self.notices.publish(EngineNotice::StoresRefreshed { stores });
        self.persist()
    }

    fn persist(&self) -> EngineResult<()> {
        if let Some(path) = &self.persist_path {
            save_to_path(path, &self.vars)?;
        }
        Ok(())
    }

    fn chat_message(&self, text: &str) {
        match &self.chat {
            Some(chat) => chat.message(text),
            None => debug!(text, "No chat capability; message dropped"),
        }
    }
}

/// Labels every persisted snapshot for the derived caches: the shared bank,
/// each roster character, each guild vault.
fn snapshot_sources(account: &AccountData) -> Vec<(&str, &StoreSnapshot)> {
    let mut sources: Vec<(&str, &StoreSnapshot)> =
        vec![(SHARED_OWNER_LABEL, &account.warband_bank)];
    for (key, character) in &account.characters {
        sources.push((key.as_str(), &character.personal_bank));
    }
    for (guild, snapshot) in &account.guild_banks {
        sources.push((guild.as_str(), snapshot));
    }
    sources
}
