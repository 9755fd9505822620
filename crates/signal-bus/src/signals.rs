//! # Host Signals
//!
//! External events the host delivers to the engine, one at a time, never
//! concurrently. The host's own ~150ms bucketing of slot changes happens
//! before delivery; [`HostSignal::SlotRangeChanged`] therefore carries a
//! batch of container ids, not a single slot.

use serde::{Deserialize, Serialize};
use shared_types::{ContainerId, StoreKind};

/// Every external event the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostSignal {
    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================
    /// A bank session opened at the teller.
    ///
    /// The hint is the host's guess at which store view the session opened
    /// on. It is unreliable and may be absent; the engine defaults to the
    /// personal store when in doubt.
    SessionOpened {
        /// Host-reported store, if it reported one.
        hint: Option<StoreKind>,
    },

    /// The bank session ended (walked away or closed the window).
    SessionClosed,

    /// A guild vault session opened.
    GuildSessionOpened {
        /// Guild name the vault belongs to.
        guild: String,
    },

    /// The guild vault session ended.
    GuildSessionClosed,

    // =========================================================================
    // INVENTORY CHANGE
    // =========================================================================
    /// Slots changed in one or more containers.
    ///
    /// Batched by the host; ids may repeat and may reference containers the
    /// engine does not manage.
    SlotRangeChanged {
        /// Container ids with at least one changed slot.
        containers: Vec<ContainerId>,
    },

    // =========================================================================
    // EXTENSION LIFECYCLE
    // =========================================================================
    /// Another extension finished loading or was enabled mid-session.
    ExtensionLoaded {
        /// Extension name as the host registers it.
        name: String,
    },

    // =========================================================================
    // COMBAT GATE
    // =========================================================================
    /// The character entered combat; protected UI actions are now blocked.
    CombatEntered,

    /// Combat ended; one catch-up UI action may run.
    CombatExited,

    // =========================================================================
    // COLLECTION CHANGE
    // =========================================================================
    /// The character's money changed.
    CurrencyChanged,

    /// A reputation or collection total changed.
    ReputationChanged,
}

impl HostSignal {
    /// Stable signal name for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HostSignal::SessionOpened { .. } => "session_opened",
            HostSignal::SessionClosed => "session_closed",
            HostSignal::GuildSessionOpened { .. } => "guild_session_opened",
            HostSignal::GuildSessionClosed => "guild_session_closed",
            HostSignal::SlotRangeChanged { .. } => "slot_range_changed",
            HostSignal::ExtensionLoaded { .. } => "extension_loaded",
            HostSignal::CombatEntered => "combat_entered",
            HostSignal::CombatExited => "combat_exited",
            HostSignal::CurrencyChanged => "currency_changed",
            HostSignal::ReputationChanged => "reputation_changed",
        }
    }
}
