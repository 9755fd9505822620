//! # Notice Hub
//!
//! The outbound side of the engine: refresh and prompt notices broadcast to
//! whoever renders them. The engine publishes without knowing its listeners;
//! windows, toasts, and test harnesses subscribe independently.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use shared_types::StoreKind;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::DEFAULT_NOTICE_CAPACITY;

/// Everything the engine announces to its listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineNotice {
    /// One or more store snapshots were rebuilt; listeners should re-render.
    StoresRefreshed {
        /// Which stores changed, in scan order.
        stores: Vec<StoreKind>,
    },

    /// Gold balances were re-queried without a full rescan.
    MoneyChanged,

    /// Collection data (reputations, currencies) should be re-read.
    CollectionsChanged,

    /// A UI-ownership conflict needs the user's binary decision.
    ConflictPromptRequired {
        /// The competing extension to decide about.
        extension: String,
    },

    /// A conflict resolution took effect that needs a UI reload to finish.
    ReloadSuggested,
}

impl EngineNotice {
    /// Stable notice name for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            EngineNotice::StoresRefreshed { .. } => "stores_refreshed",
            EngineNotice::MoneyChanged => "money_changed",
            EngineNotice::CollectionsChanged => "collections_changed",
            EngineNotice::ConflictPromptRequired { .. } => "conflict_prompt_required",
            EngineNotice::ReloadSuggested => "reload_suggested",
        }
    }
}

/// Broadcast channel for [`EngineNotice`] values.
///
/// Backed by `tokio::sync::broadcast`; slow subscribers lag and skip rather
/// than blocking the engine.
pub struct NoticeHub {
    sender: broadcast::Sender<EngineNotice>,
    published: AtomicU64,
    capacity: usize,
}

impl NoticeHub {
    /// Creates a hub with the default per-subscriber buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NOTICE_CAPACITY)
    }

    /// Creates a hub with an explicit per-subscriber buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        NoticeHub {
            sender,
            published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Publishes a notice to all current subscribers.
    ///
    /// Returns the number of subscribers that received it. Zero subscribers
    /// is normal during startup and teardown, not an error.
    pub fn publish(&self, notice: EngineNotice) -> usize {
        let kind = notice.kind();
        self.published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(notice) {
            Ok(receivers) => {
                debug!(notice = kind, receivers, "Notice published");
                receivers
            }
            Err(_) => {
                warn!(notice = kind, "Notice dropped (no subscribers)");
                0
            }
        }
    }

    /// Registers a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineNotice> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total notices published since creation.
    #[must_use]
    pub fn notices_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// The per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for NoticeHub {
    fn default() -> Self {
        Self::new()
    }
}
