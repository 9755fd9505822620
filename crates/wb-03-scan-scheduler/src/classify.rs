//! # Container Batch Classification
//!
//! Pure functions mapping a batch of changed container ids onto the stores
//! they affect. Unknown ids (host containers the engine does not manage)
//! classify as nothing and never trigger work.

use serde::{Deserialize, Serialize};
use shared_types::{is_carried_container, is_personal_tab, is_shared_tab, ContainerId};

/// Which stores a batch of container changes touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Classification {
    /// At least one shared bank tab changed.
    pub shared: bool,
    /// At least one personal bank tab changed.
    pub personal: bool,
    /// At least one carried container changed.
    pub carried: bool,
}

impl Classification {
    /// Whether the batch affects anything the engine manages.
    #[must_use]
    pub fn affects_any(&self) -> bool {
        self.shared || self.personal || self.carried
    }
}

/// Classifies a batch of changed container ids.
///
/// Ids may repeat and may be outside every managed range; both are normal.
#[must_use]
pub fn classify_containers(containers: &[ContainerId]) -> Classification {
    let mut classification = Classification::default();
    for &id in containers {
        if is_shared_tab(id) {
            classification.shared = true;
        }
        if is_personal_tab(id) {
            classification.personal = true;
        }
        if is_carried_container(id) {
            classification.carried = true;
        }
    }
    classification
}
