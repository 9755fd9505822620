//! # Character Identity
//!
//! Characters are keyed account-wide by `Name-Realm`. The key shape is part
//! of the persisted layout, so parsing is strict about the separator even
//! though names themselves are host-validated.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::StoreSnapshot;

/// An account-wide character key in `Name-Realm` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

/// Reasons an identity key failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The key carried no `-` separator between name and realm.
    #[error("identity key '{0}' is missing the Name-Realm separator")]
    MissingSeparator(String),
    /// Name or realm component was empty.
    #[error("identity key '{0}' has an empty name or realm component")]
    EmptyComponent(String),
}

impl IdentityKey {
    /// Builds a key from its components.
    #[must_use]
    pub fn new(name: &str, realm: &str) -> Self {
        IdentityKey(format!("{name}-{realm}"))
    }

    /// Parses a persisted `Name-Realm` string.
    ///
    /// Realm names may themselves contain `-`, so the split happens at the
    /// first separator only.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the separator is absent or either
    /// component is empty.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let (name, realm) = raw
            .split_once('-')
            .ok_or_else(|| IdentityError::MissingSeparator(raw.to_owned()))?;
        if name.is_empty() || realm.is_empty() {
            return Err(IdentityError::EmptyComponent(raw.to_owned()));
        }
        Ok(IdentityKey(raw.to_owned()))
    }

    /// The character-name component.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once('-').map_or(self.0.as_str(), |(n, _)| n)
    }

    /// The realm component.
    #[must_use]
    pub fn realm(&self) -> &str {
        self.0.split_once('-').map_or("", |(_, r)| r)
    }

    /// The raw `Name-Realm` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted per-character entry in the account roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// The `Name-Realm` key this record is filed under.
    pub key: IdentityKey,
    /// Marked as a favorite in roster listings.
    pub favorite: bool,
    /// Unix milliseconds the character last opened a bank session.
    pub last_seen: u64,
    /// Carried gold at last sighting, in copper.
    pub carried_gold: u64,
    /// The character's personal bank image.
    pub personal_bank: StoreSnapshot,
}

impl CharacterRecord {
    /// A fresh roster entry for a character seen for the first time.
    #[must_use]
    pub fn new(key: IdentityKey) -> Self {
        CharacterRecord {
            key,
            favorite: false,
            last_seen: 0,
            carried_gold: 0,
            personal_bank: StoreSnapshot::default(),
        }
    }
}
