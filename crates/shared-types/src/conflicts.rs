//! # Conflict Ownership Choices
//!
//! When a competing bag extension and this engine both want to own the bank
//! UI, the user picks a side once per extension. The choice is persisted
//! per-profile; *absence* of a persisted entry is the unresolved state, so
//! there is deliberately no `Unresolved` variant here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The user's persisted side in a UI-ownership conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerChoice {
    /// Keep this engine's bank window; disable the competitor.
    UseHost,
    /// Keep the competing extension; this engine stops managing bank UI.
    UseOther,
}

impl fmt::Display for OwnerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerChoice::UseHost => write!(f, "use-host"),
            OwnerChoice::UseOther => write!(f, "use-other"),
        }
    }
}

/// Point-in-time view of one known competitor, as reported to diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictStatus {
    /// Extension name as the host reports it.
    pub extension: String,
    /// The competitor (or its conflicting feature) is currently active.
    pub detected: bool,
    /// Persisted choice, if the user has resolved this conflict.
    pub choice: Option<OwnerChoice>,
    /// Waiting in the prompt queue.
    pub queued: bool,
    /// This competitor's modal is the one currently outstanding.
    pub prompting: bool,
}
