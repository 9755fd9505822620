//! The transient session value.
//!
//! One of these exists for the engine's lifetime. It is a bundle of flags,
//! not an entity: nothing here is persisted, and a close signal resets the
//! open-session fields while leaving the ambient ones (combat, guild)
//! alone, since those track world state rather than the bank window.

use shared_types::StoreKind;
use uuid::Uuid;

/// All transient state of the bank session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankSession {
    /// A bank session is open at the teller.
    pub is_open: bool,
    /// Which store view the session opened on; `None` while closed.
    pub active_store: Option<StoreKind>,
    /// The native bank view is currently suppressed in our favor.
    pub suppressed: bool,
    /// The shared store answered the enumerability probe this session.
    pub shared_accessible: bool,
    /// The character is in combat; protected UI actions are blocked.
    pub in_combat: bool,
    /// A guild vault session is open.
    pub guild_open: bool,
    /// Our window show was blocked by combat and owes one catch-up show.
    pub show_deferred_by_combat: bool,
    /// Correlation id stamped on this session's log lines.
    pub correlation: Option<Uuid>,
}

impl BankSession {
    /// Clears the open-session fields on a close signal.
    ///
    /// Combat and guild flags survive: walking away from the teller ends
    /// the bank session, not the fight or the guild vault visit.
    pub fn reset_open_state(&mut self) {
        self.is_open = false;
        self.active_store = None;
        self.suppressed = false;
        self.shared_accessible = false;
        self.show_deferred_by_combat = false;
        self.correlation = None;
    }

    /// Whether shared-store scans may run right now.
    #[must_use]
    pub fn can_scan_shared(&self) -> bool {
        self.is_open && self.shared_accessible
    }
}
