//! # Document Load/Save
//!
//! JSON file IO with two properties the engine depends on:
//!
//! - **Per-section recovery**: a scope that fails to decode resets to its
//!   default; intact scopes load normally.
//! - **Atomic save**: writes go to a sibling temp file first, then rename
//!   over the target, so a crash mid-save never leaves a half-written
//!   document.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{AccountData, InstallData, ProfileData, SavedVariables};
use crate::CURRENT_SCHEMA;

/// Errors from document IO.
#[derive(Debug, Error)]
pub enum SavedVarsError {
    /// Filesystem failure reading or writing the document.
    #[error("saved variables io failure: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory document failed to serialize (indicates a bug, not
    /// user data damage).
    #[error("saved variables failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a load, including which sections had to be reset.
#[derive(Debug)]
pub struct LoadReport {
    /// The document, with any corrupt sections defaulted.
    pub vars: SavedVariables,
    /// Names of sections that were reset during this load.
    pub recovered_sections: Vec<&'static str>,
}

impl LoadReport {
    /// Whether the whole document loaded clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.recovered_sections.is_empty()
    }
}

/// Loads the document from `path`.
///
/// A missing file is a fresh install, not an error. An unreadable or
/// non-object document resets everything; a corrupt individual scope resets
/// only that scope.
///
/// # Errors
///
/// Returns [`SavedVarsError::Io`] only for filesystem failures other than
/// not-found; decode problems are handled by recovery, not surfaced.
pub fn load_from_path(path: &Path) -> Result<LoadReport, SavedVarsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No saved variables; starting fresh");
            return Ok(LoadReport {
                vars: SavedVariables::default(),
                recovered_sections: Vec::new(),
            });
        }
        Err(err) => return Err(SavedVarsError::Io(err)),
    };

    let document: Value = match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => {
            warn!(
                found = other_kind(&other),
                "Saved variables document is not an object; resetting"
            );
            return Ok(LoadReport {
                vars: SavedVariables::default(),
                recovered_sections: vec!["document"],
            });
        }
        Err(err) => {
            warn!(error = %err, "Saved variables document is unparseable; resetting");
            return Ok(LoadReport {
                vars: SavedVariables::default(),
                recovered_sections: vec!["document"],
            });
        }
    };

    let mut recovered = Vec::new();
    let install: InstallData = decode_section(&document, "install", &mut recovered);
    let account: AccountData = decode_section(&document, "account", &mut recovered);
    let profile: ProfileData = decode_section(&document, "profile", &mut recovered);

    // Documents from a newer build are unreadable by policy; keep only the
    // freshly defaulted shape rather than guessing at field meanings.
    if install.schema_version > CURRENT_SCHEMA {
        warn!(
            found = install.schema_version,
            supported = CURRENT_SCHEMA,
            "Saved variables schema is newer than this build; resetting"
        );
        return Ok(LoadReport {
            vars: SavedVariables::default(),
            recovered_sections: vec!["schema"],
        });
    }

    Ok(LoadReport {
        vars: SavedVariables {
            install,
            account,
            profile,
        },
        recovered_sections: recovered,
    })
}

/// Saves the document to `path` atomically.
///
/// # Errors
///
/// Returns [`SavedVarsError`] if serialization or any filesystem step fails.
pub fn save_to_path(path: &Path, vars: &SavedVariables) -> Result<(), SavedVarsError> {
    let serialized = serde_json::to_string_pretty(vars)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serialized.as_bytes())?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn decode_section<T: DeserializeOwned + Default>(
    document: &Value,
    section: &'static str,
    recovered: &mut Vec<&'static str>,
) -> T {
    match document.get(section) {
        None => T::default(),
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(
                    section,
                    error = %err,
                    "Saved variables section is corrupt; resetting that section"
                );
                recovered.push(section);
                T::default()
            }
        },
    }
}

fn other_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
