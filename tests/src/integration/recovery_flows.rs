//! # Recovery Flows
//!
//! What survives what: per-section document corruption, schema resets,
//! emergency recovery of a wedged session, and fault surfacing for scans
//! that cannot run.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bank_runtime::SimHost;
    use signal_bus::HostSignal;

    use crate::integration::harness::{prompted_extensions, Stage};

    fn competitor_world() -> SimHost {
        let host = SimHost::with_seed(11);
        host.install_extension("Bagnon");
        host
    }

    #[tokio::test(start_paused = true)]
    async fn test_corrupt_profile_section_recovers_alone() {
        let mut stage = Stage::boot_world(competitor_world()).await;
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["Bagnon"]);
        stage.command("resolve Bagnon ours").await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        let dir = stage.stop().await;

        // Damage only the profile scope of the document.
        let path = dir.path().join("warbank.json");
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["profile"] = serde_json::json!(["not", "a", "profile"]);
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let mut stage = Stage::boot_in(dir, Arc::new(competitor_world())).await;

        // The account scope survived untouched.
        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 196"));
        assert!(stats.contains("\"characters_tracked\": 1"));

        // The profile scope went back to defaults, so the settled conflict
        // question is open again.
        assert_eq!(prompted_extensions(&stage.drain_notices()), vec!["Bagnon"]);

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_schema_resets_the_document() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        let dir = stage.stop().await;

        let path = dir.path().join("warbank.json");
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["install"]["schema_version"] = serde_json::json!(99);
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        // A document from a newer build is not partially decoded.
        let mut stage = Stage::boot_in(dir, Arc::new(SimHost::with_seed(11))).await;
        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 0"));
        assert!(stats.contains("\"characters_tracked\": 0"));

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_emergency_recovery_keeps_saved_data() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        stage.drain_notices();

        let reply = stage.command("recovery").await;
        assert_eq!(reply, "Session state reset. Saved data is untouched.");
        assert!(!stage.host.native_suppressed());
        assert!(!stage.window.is_visible());
        assert!(stage
            .chat
            .transcript()
            .iter()
            .any(|line| line.contains("saved data is untouched")));

        // Snapshots are persisted state, not session state.
        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 196"));
        assert!(stats.contains("\"characters_tracked\": 1"));

        // The engine is usable again without a restart.
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        assert!(stage.window.is_visible());

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_store_surfaces_as_fault() {
        let host = SimHost::with_seed(11);
        host.set_enumerable(false);
        let mut stage = Stage::boot_world(host).await;

        let reply = stage.command("force-scan").await;
        assert_eq!(reply, "Scanned stores: personal, guild.");

        let faults = stage.command("faults").await;
        assert!(faults.contains("force_scan_shared"));

        stage.stop().await;
    }
}
