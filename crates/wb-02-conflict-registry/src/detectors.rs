//! # Conflict Detectors
//!
//! One detector per known competitor. Almost every competitor conflicts as
//! a whole extension: if it is enabled, it owns the bags. The exception is
//! ElvUI, a full UI suite whose bag module is one toggle among dozens;
//! disabling all of ElvUI over a bag conflict would be wildly destructive,
//! so its detector watches and toggles only the "bags" feature.

use crate::error::ConflictResult;
use crate::ports::ExtensionHost;

/// Detection and enable/disable behavior for one known competitor.
pub trait ConflictDetector: Send + Sync {
    /// Extension name as the host registers it.
    fn extension_name(&self) -> &str;

    /// Whether this competitor currently conflicts.
    fn detect(&self, host: &dyn ExtensionHost) -> bool;

    /// Removes the conflict in the user's favor.
    ///
    /// # Errors
    ///
    /// Propagates the host's refusal; the caller surfaces it once and keeps
    /// the user's persisted choice.
    fn disable(&self, host: &dyn ExtensionHost) -> ConflictResult<()>;

    /// Restores the competitor after the user sided with it.
    ///
    /// # Errors
    ///
    /// Propagates the host's refusal.
    fn enable(&self, host: &dyn ExtensionHost) -> ConflictResult<()>;
}

/// Default detector: the whole extension is the conflict.
pub struct WholeExtension {
    name: &'static str,
}

impl WholeExtension {
    /// Detector for a competitor that conflicts whenever it is enabled.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        WholeExtension { name }
    }
}

impl ConflictDetector for WholeExtension {
    fn extension_name(&self) -> &str {
        self.name
    }

    fn detect(&self, host: &dyn ExtensionHost) -> bool {
        host.is_extension_active(self.name)
    }

    fn disable(&self, host: &dyn ExtensionHost) -> ConflictResult<()> {
        host.set_extension_enabled(self.name, false)
    }

    fn enable(&self, host: &dyn ExtensionHost) -> ConflictResult<()> {
        host.set_extension_enabled(self.name, true)
    }
}

/// Override detector: only one named sub-feature conflicts.
pub struct FeatureToggle {
    extension: &'static str,
    feature: &'static str,
}

impl FeatureToggle {
    /// Detector for a competitor whose conflict is one toggleable feature.
    #[must_use]
    pub fn new(extension: &'static str, feature: &'static str) -> Self {
        FeatureToggle { extension, feature }
    }
}

impl ConflictDetector for FeatureToggle {
    fn extension_name(&self) -> &str {
        self.extension
    }

    fn detect(&self, host: &dyn ExtensionHost) -> bool {
        host.is_extension_active(self.extension)
            && host.is_feature_enabled(self.extension, self.feature)
    }

    fn disable(&self, host: &dyn ExtensionHost) -> ConflictResult<()> {
        host.set_feature_enabled(self.extension, self.feature, false)
    }

    fn enable(&self, host: &dyn ExtensionHost) -> ConflictResult<()> {
        host.set_feature_enabled(self.extension, self.feature, true)
    }
}

/// The known competitor table, in prompt order.
#[must_use]
pub fn known_competitors() -> Vec<Box<dyn ConflictDetector>> {
    vec![
        Box::new(WholeExtension::new("Bagnon")),
        Box::new(WholeExtension::new("AdiBags")),
        Box::new(WholeExtension::new("ArkInventory")),
        Box::new(WholeExtension::new("Baganator")),
        Box::new(WholeExtension::new("Inventorian")),
        Box::new(WholeExtension::new("LiteBag")),
        Box::new(FeatureToggle::new("ElvUI", "bags")),
    ]
}
