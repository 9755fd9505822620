//! # Signal Bus - Event Plumbing for the Bank Engine
//!
//! Everything the engine reacts to travels through one ordered queue: host
//! signals arrive from the outside, and deferred tasks re-enter the same
//! queue when their timers expire. A single consumer drains the queue, so
//! handlers run strictly one at a time in arrival order.
//!
//! ## Event Flow
//!
//! ```text
//! ┌──────────────┐  signal()   ┌──────────────────┐
//! │ Host adapter │ ──────────► │                  │   recv()   ┌────────┐
//! └──────────────┘             │   EngineQueue    │ ─────────► │ Engine │
//! ┌──────────────┐   task()    │  (ordered mpsc)  │            └───┬────┘
//! │PendingAction │ ──────────► │                  │                │
//! │ timer fires  │             └──────────────────┘                │
//! └──────▲───────┘                                                 │
//!        └────────────── schedule() / cancel() ────────────────────┘
//! ```
//!
//! Refresh notices flow the other way: the engine publishes to the
//! [`NoticeHub`] broadcast channel and any number of UI listeners subscribe.
//!
//! ## Timer Discipline
//!
//! A [`PendingAction`] holds at most one live timer. Scheduling cancels the
//! previous timer first, which is the coalescing rule every debounced
//! operation in the engine relies on. Cancellation is only sound because the
//! engine never yields between observing and replacing a pending action; the
//! whole bus assumes a single consumer task.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod notices;
pub mod pending;
pub mod queue;
pub mod signals;
pub mod tasks;

// Re-export main types
pub use notices::{EngineNotice, NoticeHub};
pub use pending::PendingAction;
pub use queue::{EngineEvent, EngineQueue, EngineReceiver, EngineSender, QueueClosed};
pub use signals::HostSignal;
pub use tasks::DeferredTask;

/// Maximum notices buffered per subscriber before lag.
pub const DEFAULT_NOTICE_CAPACITY: usize = 256;
