//! # Saved Variables Crate
//!
//! The engine's persisted store. One JSON document, three scopes:
//!
//! - **install**: schema bookkeeping for the whole installation
//! - **account**: data shared by every character (shared bank image, guild
//!   vault images, the character roster)
//! - **profile**: the active profile's settings (conflict choices, whether
//!   the engine manages bank UI at all)
//!
//! ## Corruption Recovery
//!
//! Loads decode each scope independently. A scope that fails to decode is
//! reset to its default and reported; the other scopes survive untouched.
//! Only an unreadable file or a document that is not a JSON object resets
//! everything.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod io;
pub mod store;

// Re-export main types
pub use io::{load_from_path, save_to_path, LoadReport, SavedVarsError};
pub use store::{AccountData, InstallData, ProfileData, SavedVariables};

/// Schema version written by this build.
pub const CURRENT_SCHEMA: u32 = 1;
