//! # Session Subsystem
//!
//! The engine's top-level controller. Everything external arrives here as an
//! ordered stream of engine events; everything outward leaves as a notice, a
//! capability call, or a saved-variables write.
//!
//! ## Session State Machine
//!
//! ```text
//!                 SessionOpened{hint}
//!        Closed ----------------------> Open(active_store)
//!          ^                              |        |
//!          |        SessionClosed         |        | module enabled &&
//!          +------------------------------+        | no UseOther choice
//!                                                  v
//!                                   Suppressed (native view hidden,
//!                                    own window shown after settle,
//!                                    combat-gated)
//! ```
//!
//! A session is a transient value, not a persistent entity: opened on the
//! open signal, reset on the close signal, never saved. The persisted side
//! (snapshots, roster, conflict choices) lives in saved-variables and
//! survives any number of sessions.
//!
//! ## Event Discipline
//!
//! One handler at a time, run to completion, in arrival order. Handlers
//! never block and never call each other re-entrantly; anything that must
//! happen "later" is a [`signal_bus::DeferredTask`] re-entering the same
//! queue. A failed handler is recorded in the fault ring and the loop moves
//! on; no error here is fatal.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod engine;
pub mod error;
pub mod ports;
pub mod session;

// Re-export main types
pub use config::EngineTuning;
pub use engine::{EngineCacheStats, HostPorts, SessionEngine};
pub use error::{EngineError, EngineResult};
pub use ports::{BankWindowHandle, ChatSink, NativeBankUi};
pub use session::BankSession;

use std::time::Duration;

/// Settle delay between suppressing the native view and showing our own
/// window. The host needs a beat to finish its own open animation.
pub const DEFAULT_SHOW_SETTLE: Duration = Duration::from_millis(250);

/// Settle delay before probing whether the shared store is enumerable.
pub const DEFAULT_PROBE_SETTLE: Duration = Duration::from_millis(250);
