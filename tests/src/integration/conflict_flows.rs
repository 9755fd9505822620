//! # Conflict Arbitration Flows
//!
//! Competitor detection through the full loop: prompts arrive as notices,
//! answers come in through the console, and the sim host records the
//! disable actions the registry takes.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bank_runtime::SimHost;
    use signal_bus::{EngineNotice, HostSignal};
    use wb_02_conflict_registry::ExtensionHost;

    use crate::integration::harness::{prompted_extensions, Stage};

    fn world_with(extensions: &[&str]) -> SimHost {
        let host = SimHost::with_seed(11);
        for name in extensions {
            host.install_extension(name);
        }
        host
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeping_our_ui_disables_the_competitor() {
        let mut stage = Stage::boot_world(world_with(&["Bagnon"])).await;

        // Startup detection asks about the one active competitor.
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["Bagnon"]);

        let reply = stage.command("resolve Bagnon ours").await;
        assert_eq!(reply, "Recorded: Bagnon -> ours.");
        assert!(!stage.host.is_extension_active("Bagnon"));

        let notices = stage.drain_notices();
        assert!(notices.contains(&EngineNotice::ReloadSuggested));

        let listing = stage.command("conflicts").await;
        assert!(listing.contains("Bagnon: active=false choice=ours"));

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompts_are_serialized_in_detection_order() {
        let mut stage = Stage::boot_world(world_with(&["Bagnon", "AdiBags"])).await;

        // Both are queued, but only the first may prompt.
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["Bagnon"]);
        stage.settle(2000).await;
        assert!(prompted_extensions(&stage.drain_notices()).is_empty());

        // Answering the first frees the second after the prompt gap.
        stage.command("resolve Bagnon ours").await;
        stage.settle(300).await;
        assert!(prompted_extensions(&stage.drain_notices()).is_empty());
        stage.settle(100).await;
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["AdiBags"]);

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_yielding_hands_over_and_survives_restart() {
        let mut stage = Stage::boot_world(world_with(&["Bagnon"])).await;
        stage.drain_notices();

        stage.command("resolve Bagnon theirs").await;
        assert!(
            stage.host.is_extension_active("Bagnon"),
            "yielding must not disable the competitor"
        );

        // Subsequent opens run in background mode: scans happen, but the
        // native view stays and our window never appears.
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        assert!(!stage.host.native_suppressed());
        assert!(!stage.window.is_visible());
        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 196"));
        assert_eq!(
            stage.command("using-other").await,
            "Yes; a competitor extension owns the bank UI."
        );

        // The choice is persisted, not session-scoped.
        let dir = stage.stop().await;
        let mut stage = Stage::boot_in(dir, Arc::new(world_with(&["Bagnon"]))).await;
        assert!(prompted_extensions(&stage.drain_notices()).is_empty());
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        assert!(!stage.host.native_suppressed());

        // Forgetting choices re-opens the question immediately.
        stage.command("reset-choices").await;
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["Bagnon"]);

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_feature_competitor_loses_only_the_feature() {
        let host = world_with(&["ElvUI"]);
        host.set_feature_enabled("ElvUI", "bags", true).unwrap();
        let mut stage = Stage::boot_world(host).await;

        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["ElvUI"]);
        stage.command("resolve ElvUI ours").await;

        // The extension keeps running; only its bag feature is turned off.
        assert!(stage.host.is_extension_active("ElvUI"));
        assert!(!stage.host.is_feature_enabled("ElvUI", "bags"));

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenabled_competitor_is_asked_again() {
        let mut stage = Stage::boot_world(world_with(&["Bagnon"])).await;
        stage.drain_notices();
        stage.command("resolve Bagnon ours").await;
        assert!(!stage.host.is_extension_active("Bagnon"));
        stage.drain_notices();

        // The user re-enables it in the extension list; the old answer no
        // longer applies.
        stage.host.install_extension("Bagnon");
        stage.signal(HostSignal::ExtensionLoaded {
            name: "Bagnon".to_owned(),
        });
        stage.settle(0).await;
        let listing = stage.command("conflicts").await;
        assert!(listing.contains("Bagnon: active=true choice=unresolved"));

        // A fresh prompt arrives once the re-check delay passes.
        stage.settle(1200).await;
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["Bagnon"]);

        stage.stop().await;
    }
}
