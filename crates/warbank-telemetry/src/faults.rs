//! In-memory fault ring.
//!
//! The engine's dispatch loop is a protected boundary: a handler that fails
//! is recorded here and the loop moves on. The ring is bounded; when full,
//! the oldest fault is evicted. Nothing in this module ever panics or
//! allocates unboundedly, since it runs on the failure path.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How many faults the ring retains by default.
pub const DEFAULT_FAULT_CAPACITY: usize = 128;

/// One recorded handler fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Unix milliseconds when the fault was recorded.
    pub at_ms: u64,
    /// The handler or operation that failed.
    pub context: String,
    /// Rendered error detail.
    pub detail: String,
}

/// Bounded, oldest-evicted buffer of handler faults.
///
/// Interior mutability so the log can be shared between the engine and the
/// diagnostics surface without threading `&mut` through handler signatures.
#[derive(Debug)]
pub struct FaultLog {
    ring: Mutex<VecDeque<FaultRecord>>,
    capacity: usize,
    recorded: AtomicU64,
}

impl FaultLog {
    /// Ring with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FAULT_CAPACITY)
    }

    /// Ring with an explicit capacity; zero is clamped to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        FaultLog {
            ring: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            capacity: capacity.max(1),
            recorded: AtomicU64::new(0),
        }
    }

    /// Records one fault, evicting the oldest entry if the ring is full.
    pub fn record(&self, context: &str, detail: impl fmt::Display) {
        let record = FaultRecord {
            at_ms: now_ms(),
            context: context.to_owned(),
            detail: detail.to_string(),
        };
        warn!(context, detail = %record.detail, "Fault recorded");

        let mut ring = self.ring.lock();
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(record);
        self.recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Retained faults, oldest first.
    #[must_use]
    pub fn recent(&self) -> Vec<FaultRecord> {
        self.ring.lock().iter().cloned().collect()
    }

    /// Number of faults currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    /// Whether the ring holds no faults.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.lock().is_empty()
    }

    /// Total faults ever recorded, including evicted ones.
    #[must_use]
    pub fn total_recorded(&self) -> u64 {
        self.recorded.load(Ordering::Relaxed)
    }

    /// Empties the ring; the total counter keeps counting.
    pub fn clear(&self) {
        self.ring.lock().clear();
    }
}

impl Default for FaultLog {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
