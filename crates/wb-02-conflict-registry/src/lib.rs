//! # Conflict Registry Subsystem
//!
//! Two bag extensions fighting over the bank window is worse than either
//! alone: double windows, orphaned frames, taint errors. This subsystem
//! detects known competitors and walks the user through a one-at-a-time
//! binary decision per extension: keep this engine's bank UI, or keep the
//! competitor and let the engine fall back to background scanning.
//!
//! ## Resolution Protocol
//!
//! 1. Detection enqueues; it never starts a prompt by itself.
//! 2. A separate step dequeues the head only when no prompt is in flight.
//! 3. Exactly one prompt is outstanding at any moment, in FIFO order.
//! 4. Resolutions persist the choice first, then apply host actions; a
//!    failed host action keeps the choice (optimistic) and is surfaced once.
//!
//! ## Re-Enable Detection
//!
//! A competitor the user previously disabled can come back (reinstalls,
//! profile imports). An extension-load signal for a name with a persisted
//! keep-this-engine choice resets it to unresolved and re-runs detection
//! after a settle delay, so the user gets asked again instead of silently
//! losing their bank window.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod detectors;
pub mod error;
pub mod ports;
pub mod registry;

// Re-export main types
pub use detectors::{known_competitors, ConflictDetector, FeatureToggle, WholeExtension};
pub use error::{ConflictError, ConflictResult};
pub use ports::ExtensionHost;
pub use registry::{ConflictDelays, ConflictRegistry, DetectionOutcome, Resolution};

use std::time::Duration;

/// UX gap between one prompt resolving and the next appearing.
pub const DEFAULT_PROMPT_GAP: Duration = Duration::from_millis(400);

/// Settle delay before re-running detection after an extension loads.
pub const DEFAULT_RECHECK_DELAY: Duration = Duration::from_secs(1);

/// Minimum spacing between two detection passes.
pub const DEFAULT_CHECK_THROTTLE: Duration = Duration::from_secs(1);
