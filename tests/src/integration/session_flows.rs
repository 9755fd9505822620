//! # Session Lifecycle Flows
//!
//! The full open, probe, scan, and close cycle through the runtime loop:
//! host signals go in through the queue, refresh notices and sim-side
//! effects come out. Paused time makes every settle and debounce exact.

#[cfg(test)]
mod tests {
    use signal_bus::{EngineNotice, HostSignal};
    use shared_types::StoreKind;

    use crate::integration::harness::{refreshed_stores, Stage};

    #[tokio::test(start_paused = true)]
    async fn test_open_probe_scan_close_cycle() {
        let mut stage = Stage::boot().await;

        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(0).await;

        // The native view is taken over at once; our window waits for the
        // settle delay.
        assert!(stage.host.native_suppressed());
        assert!(!stage.window.is_visible());

        stage.settle(250).await;
        assert!(stage.window.is_visible());

        // Personal scan at open, shared scan once the probe confirms access.
        let refreshes = refreshed_stores(&stage.drain_notices());
        assert_eq!(
            refreshes,
            vec![vec![StoreKind::Personal], vec![StoreKind::Shared]]
        );

        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 196"));
        assert!(stats.contains("\"characters_tracked\": 1"));

        stage.signal(HostSignal::SessionClosed);
        stage.settle(0).await;
        assert!(!stage.host.native_suppressed());
        assert!(!stage.window.is_visible());

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_capacity_tabs_hold_nothing() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;

        // Two purchased shared tabs of 98 slots; the other three report
        // zero capacity and contribute no slots and no items.
        let stats = stage.command("cache-stats").await;
        assert!(stats.contains("\"shared_total_slots\": 196"));
        assert!(stats.contains("\"shared_used_slots\": 33"));

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_bursts_coalesce_into_one_rescan() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        stage.drain_notices();

        // A carried-container change and a shared-tab change 100ms apart.
        stage.signal(HostSignal::SlotRangeChanged {
            containers: vec![2],
        });
        stage.settle(100).await;
        stage.signal(HostSignal::SlotRangeChanged {
            containers: vec![13],
        });

        // The debounce restarts at the second signal, so nothing has fired
        // 500ms after the first.
        stage.settle(400).await;
        assert!(refreshed_stores(&stage.drain_notices()).is_empty());

        // One rescan covering both affected stores, one notice.
        stage.settle(100).await;
        let refreshes = refreshed_stores(&stage.drain_notices());
        assert_eq!(refreshes.len(), 1);
        assert_eq!(refreshes[0].len(), 2);
        assert!(refreshes[0].contains(&StoreKind::Shared));
        assert!(refreshes[0].contains(&StoreKind::Personal));

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_drops_pending_rescan() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        stage.drain_notices();

        stage.signal(HostSignal::SlotRangeChanged {
            containers: vec![13],
        });
        stage.settle(100).await;
        stage.signal(HostSignal::SessionClosed);

        // The debounced rescan was canceled by the close; waiting past its
        // deadline produces nothing.
        stage.settle(1000).await;
        assert!(refreshed_stores(&stage.drain_notices()).is_empty());

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_combat_defers_window_until_exit() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.signal(HostSignal::CombatEntered);
        stage.settle(300).await;

        // Suppression is immediate, but our own window may not appear
        // during combat.
        assert!(stage.host.native_suppressed());
        assert!(!stage.window.is_visible());

        stage.signal(HostSignal::CombatExited);
        stage.settle(0).await;
        assert!(stage.window.is_visible());

        stage.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_money_and_collection_changes_debounce() {
        let mut stage = Stage::boot().await;
        stage.signal(HostSignal::SessionOpened { hint: None });
        stage.settle(300).await;
        stage.drain_notices();

        stage.host.jitter_gold();
        stage.signal(HostSignal::CurrencyChanged);
        stage.settle(100).await;
        stage.host.jitter_gold();
        stage.signal(HostSignal::CurrencyChanged);

        // 250ms from the second signal, not the first.
        stage.settle(200).await;
        assert!(stage.drain_notices().is_empty());
        stage.settle(50).await;
        let notices = stage.drain_notices();
        assert_eq!(notices, vec![EngineNotice::MoneyChanged]);

        stage.signal(HostSignal::ReputationChanged);
        stage.settle(1000).await;
        let notices = stage.drain_notices();
        assert_eq!(notices, vec![EngineNotice::CollectionsChanged]);

        stage.stop().await;
    }
}
