//! # Scan Scheduler Subsystem
//!
//! Stands between the host's change signals and the expensive store scans.
//! Slot changes arrive in bursts (looting, mail, vendoring); scanning on
//! every signal would walk hundreds of slots dozens of times a second. The
//! scheduler classifies each batch by affected store and collapses bursts
//! into one deferred rescan per quiet period.
//!
//! ## Debounce Rule
//!
//! One timer slot per logical operation, cancel-and-replace on every new
//! trigger. The rescan fires a fixed delay after the *last* signal of a
//! burst, never once per signal.
//!
//! ## Closed-Session Rule
//!
//! Signals that arrive while no bank session is open are dropped outright:
//! no timer, no memory, no scan on the next open (the open itself scans).

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod classify;
pub mod scheduler;

// Re-export main types
pub use classify::{classify_containers, Classification};
pub use scheduler::{ScanScheduler, SchedulerDelays, SlotDecision};

use std::time::Duration;

/// Quiet period after the last slot-change signal before a rescan fires.
pub const DEFAULT_RESCAN_DEBOUNCE: Duration = Duration::from_millis(500);

/// Quiet period for gold re-queries after money changes.
pub const DEFAULT_MONEY_REFRESH_DELAY: Duration = Duration::from_millis(250);

/// Quiet period for collection re-announcements after reputation changes.
pub const DEFAULT_COLLECTION_REFRESH_DELAY: Duration = Duration::from_secs(1);
