//! # Shared Types Crate
//!
//! This crate contains the domain vocabulary shared by every engine
//! subsystem: container identifiers and their store classification,
//! item records, store snapshots, character identities, and conflict
//! ownership choices.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Deterministic Snapshots**: Scanned store contents use ordered maps so
//!   that equal stores always serialize and compare identically.
//! - **No Behavior**: This crate holds data and classification only; session
//!   policy, scheduling, and persistence live in their own subsystems.

pub mod containers;
pub mod conflicts;
pub mod identity;
pub mod items;
pub mod snapshot;

pub use containers::*;
pub use conflicts::*;
pub use identity::*;
pub use items::*;
pub use snapshot::*;
