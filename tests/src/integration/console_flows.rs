//! # Console Flows
//!
//! The command surface through the runtime loop: every token lands on its
//! operation, unknown tokens change nothing, and replies are what a user
//! at the console actually reads.

#[cfg(test)]
mod tests {
    use signal_bus::HostSignal;

    use crate::integration::harness::Stage;

    #[tokio::test(start_paused = true)]
    async fn test_unknown_token_changes_nothing() {
        let mut stage = Stage::boot().await;
        let before = stage.command("cache-stats").await;

        let reply = stage.command("frobnicate").await;
        assert_eq!(reply, "Unknown command: frobnicate. Try 'help'.");

        let after = stage.command("cache-stats").await;
        assert_eq!(before, after);
        assert!(stage.drain_notices().is_empty());

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_advertised_token_dispatches() {
        let mut stage = Stage::boot().await;

        let help = stage.command("help").await;
        let tokens = [
            "scan-shared",
            "scan-personal",
            "force-scan",
            "clear-caches",
            "cache-stats",
            "using-other",
            "favorite",
            "conflicts",
            "resolve",
            "reset-choices",
            "recovery",
            "faults",
            "search",
            "tooltip",
        ];
        for token in tokens {
            assert!(help.contains(token), "help must advertise {token}");
            let reply = stage.command(token).await;
            assert!(
                !reply.starts_with("Unknown command"),
                "{token} must dispatch, got: {reply}"
            );
        }

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_scans_respect_session_state() {
        let mut stage = Stage::boot().await;

        assert_eq!(
            stage.command("scan-shared").await,
            "Shared bank is not available right now; nothing scanned."
        );
        assert_eq!(
            stage.command("scan-personal").await,
            "No bank session open; nothing scanned."
        );

        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;

        assert_eq!(stage.command("scan-shared").await, "Shared bank scanned.");
        assert_eq!(
            stage.command("scan-personal").await,
            "Personal bank scanned."
        );

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_favorites_and_lookups() {
        let mut stage = Stage::boot().await;

        assert_eq!(
            stage.command("using-other").await,
            "No; this engine owns the bank UI."
        );
        assert_eq!(
            stage.command("favorite Thrall-Durotar").await,
            "No record of Thrall-Durotar; favorites only apply to seen characters."
        );

        assert_eq!(
            stage.command("force-scan").await,
            "Scanned stores: shared, personal, guild."
        );
        assert_eq!(
            stage.command("favorite Thrall-Durotar").await,
            "Thrall-Durotar is now a favorite."
        );
        assert_eq!(
            stage.command("favorite Thrall-Durotar").await,
            "Thrall-Durotar is no longer a favorite."
        );
        assert!(stage
            .command("favorite Thrall")
            .await
            .starts_with("Bad character key:"));

        assert_eq!(
            stage.command("search zzz").await,
            "No items matching 'zzz'."
        );
        assert_eq!(
            stage.command("tooltip abc").await,
            "'abc' is not an item id."
        );
        assert_eq!(
            stage.command("tooltip 55555").await,
            "Nobody owns item 55555."
        );

        assert_eq!(
            stage.command("clear-caches").await,
            "All cached store data cleared."
        );
        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 0"));
        assert!(stats.contains("\"characters_tracked\": 1"));

        stage.stop().await;
    }
}
