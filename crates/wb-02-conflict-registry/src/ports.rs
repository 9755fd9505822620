//! Outbound (driven) port for extension management.
//!
//! Detection and enable/disable actions go through this seam. The runtime
//! adapter translates to real host calls; tests substitute a scriptable
//! fake.

use crate::error::{ConflictError, ConflictResult};

/// The host's view of installed extensions.
///
/// "Active" means enabled in the host's extension list; a disable takes
/// effect in that list immediately even when the running code only unloads
/// at the next UI reload.
pub trait ExtensionHost: Send + Sync {
    /// Whether an extension is enabled.
    fn is_extension_active(&self, extension: &str) -> bool;

    /// Whether a named sub-feature of an extension is enabled.
    fn is_feature_enabled(&self, extension: &str, feature: &str) -> bool;

    /// Enables or disables a whole extension.
    ///
    /// # Errors
    ///
    /// [`ConflictError::ActionFailed`] when the host refuses (protected
    /// extension, secure context, missing permission).
    fn set_extension_enabled(&self, extension: &str, enabled: bool) -> ConflictResult<()>;

    /// Enables or disables one sub-feature, leaving the extension running.
    ///
    /// # Errors
    ///
    /// [`ConflictError::ActionFailed`] when the host refuses.
    fn set_feature_enabled(&self, extension: &str, feature: &str, enabled: bool)
        -> ConflictResult<()>;
}

/// Scriptable fake host for unit tests.
#[cfg(test)]
pub struct FakeExtensionHost {
    active: std::sync::Mutex<std::collections::HashSet<String>>,
    features: std::sync::Mutex<std::collections::HashSet<(String, String)>>,
    fail_actions: bool,
}

#[cfg(test)]
impl FakeExtensionHost {
    pub fn new() -> Self {
        FakeExtensionHost {
            active: std::sync::Mutex::new(std::collections::HashSet::new()),
            features: std::sync::Mutex::new(std::collections::HashSet::new()),
            fail_actions: false,
        }
    }

    pub fn failing() -> Self {
        FakeExtensionHost {
            fail_actions: true,
            ..Self::new()
        }
    }

    pub fn with_active(self, extension: &str) -> Self {
        self.active.lock().unwrap().insert(extension.to_owned());
        self
    }

    pub fn with_feature(self, extension: &str, feature: &str) -> Self {
        self.features
            .lock()
            .unwrap()
            .insert((extension.to_owned(), feature.to_owned()));
        self
    }
}

#[cfg(test)]
impl ExtensionHost for FakeExtensionHost {
    fn is_extension_active(&self, extension: &str) -> bool {
        self.active.lock().unwrap().contains(extension)
    }

    fn is_feature_enabled(&self, extension: &str, feature: &str) -> bool {
        self.features
            .lock()
            .unwrap()
            .contains(&(extension.to_owned(), feature.to_owned()))
    }

    fn set_extension_enabled(&self, extension: &str, enabled: bool) -> ConflictResult<()> {
        if self.fail_actions {
            return Err(ConflictError::ActionFailed {
                extension: extension.to_owned(),
                reason: "scripted failure".to_owned(),
            });
        }
        let mut active = self.active.lock().unwrap();
        if enabled {
            active.insert(extension.to_owned());
        } else {
            active.remove(extension);
        }
        Ok(())
    }

    fn set_feature_enabled(
        &self,
        extension: &str,
        feature: &str,
        enabled: bool,
    ) -> ConflictResult<()> {
        if self.fail_actions {
            return Err(ConflictError::ActionFailed {
                extension: extension.to_owned(),
                reason: "scripted failure".to_owned(),
            });
        }
        let mut features = self.features.lock().unwrap();
        let key = (extension.to_owned(), feature.to_owned());
        if enabled {
            features.insert(key);
        } else {
            features.remove(&key);
        }
        Ok(())
    }
}
