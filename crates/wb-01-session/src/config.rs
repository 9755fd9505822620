//! Engine tuning knobs.
//!
//! Every delay and capacity the engine uses, gathered in one struct so the
//! runtime can override from its config layer and tests can tighten or
//! zero individual values.

use std::time::Duration;

use warbank_telemetry::DEFAULT_FAULT_CAPACITY;
use wb_02_conflict_registry::ConflictDelays;
use wb_03_scan_scheduler::SchedulerDelays;
use wb_04_cache_store::DEFAULT_DERIVED_TTL;

use crate::{DEFAULT_PROBE_SETTLE, DEFAULT_SHOW_SETTLE};

/// Delay table and capacities for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTuning {
    /// Delay between suppressing the native view and showing our window.
    pub show_settle: Duration,
    /// Delay before the shared-store accessibility probe runs.
    pub probe_settle: Duration,
    /// Debounce delays for rescan, money refresh, and collection refresh.
    pub scheduler: SchedulerDelays,
    /// Pacing for conflict prompts, re-checks, and the detection throttle.
    pub conflicts: ConflictDelays,
    /// TTL of the derived caches.
    pub derived_ttl: Duration,
    /// Size of the diagnostics fault ring.
    pub fault_capacity: usize,
}

impl Default for EngineTuning {
    fn default() -> Self {
        EngineTuning {
            show_settle: DEFAULT_SHOW_SETTLE,
            probe_settle: DEFAULT_PROBE_SETTLE,
            scheduler: SchedulerDelays::default(),
            conflicts: ConflictDelays::default(),
            derived_ttl: DEFAULT_DERIVED_TTL,
            fault_capacity: DEFAULT_FAULT_CAPACITY,
        }
    }
}
