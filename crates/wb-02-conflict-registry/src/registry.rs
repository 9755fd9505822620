//! # Conflict Registry
//!
//! Runtime state of the conflict protocol: the detection throttle, the FIFO
//! prompt queue, the single in-flight prompt marker, and the deferred
//! timers that pace prompts and re-checks.
//!
//! Persisted choices live in the saved-variables profile; the registry
//! reads and writes them through the maps its callers pass in, so this
//! crate stays free of persistence concerns.

use std::collections::{BTreeMap, VecDeque};

use shared_types::{ConflictStatus, OwnerChoice};
use signal_bus::{DeferredTask, EngineSender, PendingAction};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::detectors::{known_competitors, ConflictDetector};
use crate::error::{ConflictError, ConflictResult};
use crate::ports::ExtensionHost;
use crate::{DEFAULT_CHECK_THROTTLE, DEFAULT_PROMPT_GAP, DEFAULT_RECHECK_DELAY};

use std::time::Duration;

/// Delay table for prompt pacing and re-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictDelays {
    /// Gap between one prompt resolving and the next appearing.
    pub prompt_gap: Duration,
    /// Settle delay before re-running detection after an extension loads.
    pub recheck_delay: Duration,
    /// Minimum spacing between two detection passes.
    pub check_throttle: Duration,
}

impl Default for ConflictDelays {
    fn default() -> Self {
        ConflictDelays {
            prompt_gap: DEFAULT_PROMPT_GAP,
            recheck_delay: DEFAULT_RECHECK_DELAY,
            check_throttle: DEFAULT_CHECK_THROTTLE,
        }
    }
}

/// What one detection pass found and queued.
#[derive(Debug, Default)]
pub struct DetectionOutcome {
    /// The pass was skipped by the throttle.
    pub throttled: bool,
    /// Every competitor currently detected, resolved or not.
    pub detected: Vec<String>,
    /// Competitors newly added to the prompt queue by this pass.
    pub newly_queued: Vec<String>,
}

/// The outcome of resolving one prompt.
#[derive(Debug)]
pub struct Resolution {
    /// Extension the resolution applied to.
    pub extension: String,
    /// The side the user took.
    pub choice: OwnerChoice,
    /// A UI reload is needed to finish applying resolutions.
    pub reload_required: bool,
    /// The host action failed; the choice is persisted anyway and the
    /// failure should be surfaced to the user once.
    pub action_error: Option<ConflictError>,
    /// Another prompt was scheduled behind the UX gap.
    pub next_prompt_scheduled: bool,
}

/// Runtime state of the conflict-resolution protocol.
pub struct ConflictRegistry {
    detectors: Vec<Box<dyn ConflictDetector>>,
    delays: ConflictDelays,
    queue: VecDeque<String>,
    in_flight: Option<String>,
    reload_required: bool,
    last_check: Option<Instant>,
    prompt_timer: PendingAction,
    recheck_timer: PendingAction,
}

impl ConflictRegistry {
    /// Registry over the built-in competitor table with default pacing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(known_competitors(), ConflictDelays::default())
    }

    /// Registry over an explicit table and pacing; used by tests and by
    /// hosts with trimmed competitor lists.
    #[must_use]
    pub fn with_table(detectors: Vec<Box<dyn ConflictDetector>>, delays: ConflictDelays) -> Self {
        ConflictRegistry {
            detectors,
            delays,
            queue: VecDeque::new(),
            in_flight: None,
            reload_required: false,
            last_check: None,
            prompt_timer: PendingAction::new("conflict-prompt"),
            recheck_timer: PendingAction::new("conflict-recheck"),
        }
    }

    /// Runs one detection pass and enqueues unresolved conflicts.
    ///
    /// Enqueueing never starts a prompt; callers follow up with
    /// [`ConflictRegistry::try_begin_prompt`]. Passes inside the throttle
    /// window are skipped wholesale, which keeps the login burst (start,
    /// extension loads, first open) down to one pass.
    pub fn run_detection(
        &mut self,
        host: &dyn ExtensionHost,
        choices: &BTreeMap<String, OwnerChoice>,
    ) -> DetectionOutcome {
        if let Some(last) = self.last_check {
            if last.elapsed() < self.delays.check_throttle {
                debug!("Conflict detection throttled");
                return DetectionOutcome {
                    throttled: true,
                    ..DetectionOutcome::default()
                };
            }
        }
        self.last_check = Some(Instant::now());

        let mut outcome = DetectionOutcome::default();
        for detector in &self.detectors {
            if !detector.detect(host) {
                continue;
            }
            let name = detector.extension_name().to_owned();
            outcome.detected.push(name.clone());

            // UseOther is a settled conflict. UseHost with the competitor
            // still active means the disable never stuck or the user turned
            // it back on, so the question is open again.
            let settled = matches!(choices.get(&name), Some(OwnerChoice::UseOther));
            let already_tracked =
                self.queue.contains(&name) || self.in_flight.as_deref() == Some(&name);
            if !settled && !already_tracked {
                info!(extension = %name, "Conflict queued for resolution");
                self.queue.push_back(name.clone());
                outcome.newly_queued.push(name);
            }
        }
        outcome
    }

    /// Starts the next prompt if none is in flight.
    ///
    /// Returns the extension to prompt about; the caller owns presenting it.
    pub fn try_begin_prompt(&mut self) -> Option<String> {
        if self.in_flight.is_some() {
            return None;
        }
        let next = self.queue.pop_front()?;
        debug!(extension = %next, "Conflict prompt started");
        self.in_flight = Some(next.clone());
        Some(next)
    }

    /// Applies the user's decision for the currently prompting extension.
    ///
    /// The choice is persisted into `choices` before any host action, so a
    /// failed action never loses the decision. When more prompts wait, the
    /// next one is scheduled behind the UX gap through `queue_tx`.
    ///
    /// # Errors
    ///
    /// [`ConflictError::NotPrompting`] if `extension` is not the in-flight
    /// prompt; [`ConflictError::UnknownExtension`] if it is not in the
    /// competitor table.
    pub fn resolve(
        &mut self,
        extension: &str,
        choice: OwnerChoice,
        host: &dyn ExtensionHost,
        choices: &mut BTreeMap<String, OwnerChoice>,
        module_enabled: &mut bool,
        queue_tx: &EngineSender,
    ) -> ConflictResult<Resolution> {
        if self.in_flight.as_deref() != Some(extension) {
            return Err(ConflictError::NotPrompting {
                extension: extension.to_owned(),
            });
        }
        let detector = self
            .detectors
            .iter()
            .find(|detector| detector.extension_name() == extension)
            .ok_or_else(|| ConflictError::UnknownExtension {
                extension: extension.to_owned(),
            })?;

        choices.insert(extension.to_owned(), choice);
        info!(extension, %choice, "Conflict choice persisted");

        let action_error = match choice {
            OwnerChoice::UseHost => match detector.disable(host) {
                Ok(()) => {
                    self.reload_required = true;
                    None
                }
                Err(err) => {
                    warn!(extension, error = %err, "Competitor disable failed");
                    Some(err)
                }
            },
            OwnerChoice::UseOther => {
                *module_enabled = false;
                match detector.enable(host) {
                    Ok(()) => None,
                    Err(err) => {
                        warn!(extension, error = %err, "Competitor re-enable failed");
                        Some(err)
                    }
                }
            }
        };

        self.in_flight = None;
        let next_prompt_scheduled = !self.queue.is_empty();
        if next_prompt_scheduled {
            self.prompt_timer.schedule(
                queue_tx,
                DeferredTask::NextConflictPrompt,
                self.delays.prompt_gap,
            );
        }

        Ok(Resolution {
            extension: extension.to_owned(),
            choice,
            reload_required: self.reload_required,
            action_error,
            next_prompt_scheduled,
        })
    }

    /// Reacts to an extension load: a re-enabled competitor the user had
    /// chosen to disable gets its choice reset, and a re-check is scheduled
    /// behind the settle delay. Returns `true` if a reset happened.
    pub fn note_extension_loaded(
        &mut self,
        name: &str,
        choices: &mut BTreeMap<String, OwnerChoice>,
        queue_tx: &EngineSender,
    ) -> bool {
        if choices.get(name) != Some(&OwnerChoice::UseHost) {
            return false;
        }
        info!(extension = name, "Disabled competitor came back; choice reset");
        choices.remove(name);
        self.recheck_timer.schedule(
            queue_tx,
            DeferredTask::ConflictRecheck,
            self.delays.recheck_delay,
        );
        true
    }

    /// Point-in-time view of every known competitor.
    #[must_use]
    pub fn status(
        &self,
        host: &dyn ExtensionHost,
        choices: &BTreeMap<String, OwnerChoice>,
    ) -> Vec<ConflictStatus> {
        self.detectors
            .iter()
            .map(|detector| {
                let name = detector.extension_name();
                ConflictStatus {
                    extension: name.to_owned(),
                    detected: detector.detect(host),
                    choice: choices.get(name).copied(),
                    queued: self.queue.iter().any(|queued| queued == name),
                    prompting: self.in_flight.as_deref() == Some(name),
                }
            })
            .collect()
    }

    /// Drops all transient protocol state: queue, in-flight marker, reload
    /// flag, throttle, and timers. Persisted choices are untouched.
    pub fn reset_runtime_state(&mut self) {
        self.queue.clear();
        self.in_flight = None;
        self.reload_required = false;
        self.last_check = None;
        self.prompt_timer.cancel();
        self.recheck_timer.cancel();
    }

    /// Whether a prompt is currently outstanding.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The extension currently prompting, if any.
    #[must_use]
    pub fn current_prompt(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// Prompts still waiting behind the current one.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether any applied resolution still needs a UI reload.
    #[must_use]
    pub fn reload_required(&self) -> bool {
        self.reload_required
    }
}

impl Default for ConflictRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FakeExtensionHost;
    use signal_bus::{EngineEvent, EngineQueue};
    use tokio::time::advance;

    fn no_throttle() -> ConflictDelays {
        ConflictDelays {
            check_throttle: Duration::ZERO,
            ..ConflictDelays::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_detection_enqueues_without_starting() {
        let host = FakeExtensionHost::new()
            .with_active("Bagnon")
            .with_active("AdiBags");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let choices = BTreeMap::new();

        let outcome = registry.run_detection(&host, &choices);
        assert_eq!(outcome.newly_queued, vec!["Bagnon", "AdiBags"]);
        assert!(!registry.is_processing());
        assert_eq!(registry.queue_len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompts_are_fifo_and_exclusive() {
        let host = FakeExtensionHost::new()
            .with_active("Bagnon")
            .with_active("AdiBags");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let choices = BTreeMap::new();
        registry.run_detection(&host, &choices);

        assert_eq!(registry.try_begin_prompt().as_deref(), Some("Bagnon"));
        // Second attempt while the first is outstanding yields nothing.
        assert_eq!(registry.try_begin_prompt(), None);
        assert!(registry.is_processing());
        assert_eq!(registry.current_prompt(), Some("Bagnon"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_use_host_disables_and_flags_reload() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let (tx, _rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        let mut module_enabled = true;

        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();
        let resolution = registry
            .resolve(
                "Bagnon",
                OwnerChoice::UseHost,
                &host,
                &mut choices,
                &mut module_enabled,
                &tx,
            )
            .unwrap();

        assert_eq!(choices.get("Bagnon"), Some(&OwnerChoice::UseHost));
        assert!(!host.is_extension_active("Bagnon"));
        assert!(resolution.reload_required);
        assert!(resolution.action_error.is_none());
        assert!(!resolution.next_prompt_scheduled);
        assert!(module_enabled);
        assert!(!registry.is_processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_use_other_disables_module_and_keeps_competitor() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let (tx, _rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        let mut module_enabled = true;

        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();
        let resolution = registry
            .resolve(
                "Bagnon",
                OwnerChoice::UseOther,
                &host,
                &mut choices,
                &mut module_enabled,
                &tx,
            )
            .unwrap();

        assert_eq!(choices.get("Bagnon"), Some(&OwnerChoice::UseOther));
        assert!(host.is_extension_active("Bagnon"));
        assert!(!module_enabled);
        assert!(!resolution.reload_required);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_continues_behind_ux_gap() {
        let host = FakeExtensionHost::new()
            .with_active("Bagnon")
            .with_active("AdiBags");
        let (tx, mut rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        let mut module_enabled = true;

        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();
        let resolution = registry
            .resolve(
                "Bagnon",
                OwnerChoice::UseHost,
                &host,
                &mut choices,
                &mut module_enabled,
                &tx,
            )
            .unwrap();
        assert!(resolution.next_prompt_scheduled);

        advance(DEFAULT_PROMPT_GAP).await;
        tokio::task::yield_now().await;
        assert_eq!(
            rx.try_recv(),
            Some(EngineEvent::Task(DeferredTask::NextConflictPrompt))
        );
        assert_eq!(registry.try_begin_prompt().as_deref(), Some("AdiBags"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_wrong_extension_is_rejected() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let (tx, _rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        let mut module_enabled = true;

        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();
        let err = registry
            .resolve(
                "AdiBags",
                OwnerChoice::UseHost,
                &host,
                &mut choices,
                &mut module_enabled,
                &tx,
            )
            .unwrap_err();
        assert!(matches!(err, ConflictError::NotPrompting { .. }));
        // The outstanding prompt is unaffected.
        assert_eq!(registry.current_prompt(), Some("Bagnon"));
        assert!(choices.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_disable_keeps_choice_and_reports() {
        let host = FakeExtensionHost::failing().with_active("Bagnon");
        let (tx, _rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        let mut module_enabled = true;

        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();
        let resolution = registry
            .resolve(
                "Bagnon",
                OwnerChoice::UseHost,
                &host,
                &mut choices,
                &mut module_enabled,
                &tx,
            )
            .unwrap();

        assert_eq!(choices.get("Bagnon"), Some(&OwnerChoice::UseHost));
        assert!(matches!(
            resolution.action_error,
            Some(ConflictError::ActionFailed { .. })
        ));
        assert!(
            !resolution.reload_required,
            "nothing changed, nothing to reload"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_use_other_suppresses_future_enqueues() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        choices.insert("Bagnon".to_owned(), OwnerChoice::UseOther);

        let outcome = registry.run_detection(&host, &choices);
        assert_eq!(outcome.detected, vec!["Bagnon"]);
        assert!(outcome.newly_queued.is_empty());
        assert_eq!(registry.queue_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_use_host_with_still_active_competitor_requeues() {
        // Simulates a disable that never stuck (e.g. the user re-enabled
        // manually without a load signal).
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        choices.insert("Bagnon".to_owned(), OwnerChoice::UseHost);

        let outcome = registry.run_detection(&host, &choices);
        assert_eq!(outcome.newly_queued, vec!["Bagnon"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extension_load_resets_use_host_choice() {
        let (tx, mut rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        choices.insert("Bagnon".to_owned(), OwnerChoice::UseHost);

        assert!(registry.note_extension_loaded("Bagnon", &mut choices, &tx));
        assert!(choices.get("Bagnon").is_none());

        advance(DEFAULT_RECHECK_DELAY).await;
        tokio::task::yield_now().await;
        assert_eq!(
            rx.try_recv(),
            Some(EngineEvent::Task(DeferredTask::ConflictRecheck))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_extension_load_ignores_other_choices() {
        let (tx, _rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        choices.insert("Bagnon".to_owned(), OwnerChoice::UseOther);

        assert!(!registry.note_extension_loaded("Bagnon", &mut choices, &tx));
        assert!(!registry.note_extension_loaded("AdiBags", &mut choices, &tx));
        assert_eq!(choices.get("Bagnon"), Some(&OwnerChoice::UseOther));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detection_throttle_window() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let mut registry =
            ConflictRegistry::with_table(known_competitors(), ConflictDelays::default());
        let choices = BTreeMap::new();

        let first = registry.run_detection(&host, &choices);
        assert!(!first.throttled);

        let second = registry.run_detection(&host, &choices);
        assert!(second.throttled);
        assert!(second.detected.is_empty());

        advance(DEFAULT_CHECK_THROTTLE).await;
        let third = registry.run_detection(&host, &choices);
        assert!(!third.throttled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detection_never_double_queues() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let choices = BTreeMap::new();

        registry.run_detection(&host, &choices);
        registry.run_detection(&host, &choices);
        assert_eq!(registry.queue_len(), 1);

        // Also not while the prompt is in flight.
        registry.try_begin_prompt();
        registry.run_detection(&host, &choices);
        assert_eq!(registry.queue_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feature_toggle_resolution_touches_only_feature() {
        let host = FakeExtensionHost::new()
            .with_active("ElvUI")
            .with_feature("ElvUI", "bags");
        let (tx, _rx) = EngineQueue::channel();
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        let mut module_enabled = true;

        registry.run_detection(&host, &choices);
        assert_eq!(registry.try_begin_prompt().as_deref(), Some("ElvUI"));
        registry
            .resolve(
                "ElvUI",
                OwnerChoice::UseHost,
                &host,
                &mut choices,
                &mut module_enabled,
                &tx,
            )
            .unwrap();

        assert!(host.is_extension_active("ElvUI"));
        assert!(!host.is_feature_enabled("ElvUI", "bags"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reflects_protocol_state() {
        let host = FakeExtensionHost::new()
            .with_active("Bagnon")
            .with_active("AdiBags");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let choices = BTreeMap::new();
        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();

        let status = registry.status(&host, &choices);
        let bagnon = status.iter().find(|s| s.extension == "Bagnon").unwrap();
        assert!(bagnon.detected && bagnon.prompting && !bagnon.queued);
        let adibags = status.iter().find(|s| s.extension == "AdiBags").unwrap();
        assert!(adibags.detected && adibags.queued && !adibags.prompting);
        let ark = status.iter().find(|s| s.extension == "ArkInventory").unwrap();
        assert!(!ark.detected && !ark.queued && !ark.prompting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_runtime_state_clears_transients_only() {
        let host = FakeExtensionHost::new().with_active("Bagnon");
        let mut registry = ConflictRegistry::with_table(known_competitors(), no_throttle());
        let mut choices = BTreeMap::new();
        choices.insert("AdiBags".to_owned(), OwnerChoice::UseOther);
        registry.run_detection(&host, &choices);
        registry.try_begin_prompt();

        registry.reset_runtime_state();
        assert!(!registry.is_processing());
        assert_eq!(registry.queue_len(), 0);
        assert!(!registry.reload_required());
        // Persisted choices are not the registry's to clear.
        assert_eq!(choices.get("AdiBags"), Some(&OwnerChoice::UseOther));
    }
}
