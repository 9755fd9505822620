//! # Persisted Document Structure
//!
//! The concrete shape of the saved-variables document, plus the accessor
//! helpers the engine uses. All maps are ordered so the serialized document
//! is stable across saves of unchanged data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::{CharacterRecord, IdentityKey, OwnerChoice, StoreSnapshot};

use crate::CURRENT_SCHEMA;

/// Install-wide bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallData {
    /// Document schema version.
    pub schema_version: u32,
}

impl Default for InstallData {
    fn default() -> Self {
        InstallData {
            schema_version: CURRENT_SCHEMA,
        }
    }
}

/// Account-wide persisted data, shared by every character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccountData {
    /// The shared (account-wide) bank image.
    pub warband_bank: StoreSnapshot,
    /// Guild vault images keyed by guild name.
    pub guild_banks: BTreeMap<String, StoreSnapshot>,
    /// Character roster keyed by `Name-Realm`.
    pub characters: BTreeMap<IdentityKey, CharacterRecord>,
}

/// The active profile's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    /// Per-extension UI-ownership decisions; absence means unresolved.
    pub bank_conflict_choices: BTreeMap<String, OwnerChoice>,
    /// Whether the engine manages bank UI at all. Cleared when the user
    /// sides with a competing extension.
    pub bank_module_enabled: bool,
}

impl Default for ProfileData {
    fn default() -> Self {
        ProfileData {
            bank_conflict_choices: BTreeMap::new(),
            bank_module_enabled: true,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SavedVariables {
    /// Install scope.
    pub install: InstallData,
    /// Account scope.
    pub account: AccountData,
    /// Active profile scope.
    pub profile: ProfileData,
}

impl SavedVariables {
    /// The roster entry for `key`, created fresh on first sight.
    pub fn character_entry(&mut self, key: &IdentityKey) -> &mut CharacterRecord {
        self.account
            .characters
            .entry(key.clone())
            .or_insert_with(|| CharacterRecord::new(key.clone()))
    }

    /// The persisted ownership choice for an extension, if resolved.
    #[must_use]
    pub fn choice_for(&self, extension: &str) -> Option<OwnerChoice> {
        self.profile.bank_conflict_choices.get(extension).copied()
    }

    /// Persists an ownership choice.
    pub fn set_choice(&mut self, extension: &str, choice: OwnerChoice) {
        self.profile
            .bank_conflict_choices
            .insert(extension.to_owned(), choice);
    }

    /// Returns an extension's choice to unresolved. Returns the old choice.
    pub fn clear_choice(&mut self, extension: &str) -> Option<OwnerChoice> {
        self.profile.bank_conflict_choices.remove(extension)
    }

    /// Forgets every choice and reclaims bank-UI management.
    pub fn reset_all_choices(&mut self) {
        self.profile.bank_conflict_choices.clear();
        self.profile.bank_module_enabled = true;
    }
}
