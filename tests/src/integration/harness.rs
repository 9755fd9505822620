//! Shared fixture: a booted runtime over the simulated host, with every
//! observable side (window, chat, notices, data dir) held by the test.
//!
//! All flows run under `#[tokio::test(start_paused = true)]`; [`Stage::settle`]
//! advances the paused clock and then yields until the loop task and any
//! expired timer tasks have caught up.

use std::sync::Arc;
use std::time::Duration;

use bank_runtime::{BankRuntime, RuntimeConfig, RuntimeHandle, SimChat, SimHost, SimWindow};
use signal_bus::{EngineNotice, HostSignal};
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A running engine loop plus handles to everything around it.
pub struct Stage {
    pub handle: RuntimeHandle,
    pub host: Arc<SimHost>,
    pub window: Arc<SimWindow>,
    pub chat: Arc<SimChat>,
    pub notices: broadcast::Receiver<EngineNotice>,
    dir: TempDir,
    task: JoinHandle<()>,
}

impl Stage {
    /// Boots over a fresh data directory and the default demo world.
    pub async fn boot() -> Stage {
        Self::boot_world(SimHost::with_seed(11)).await
    }

    /// Boots over a caller-prepared world and a fresh data directory.
    pub async fn boot_world(host: SimHost) -> Stage {
        let dir = tempfile::tempdir().expect("tempdir");
        Self::boot_in(dir, Arc::new(host)).await
    }

    /// Boots over an existing data directory, for restart flows.
    pub async fn boot_in(dir: TempDir, host: Arc<SimHost>) -> Stage {
        let mut config = RuntimeConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();

        let window = Arc::new(SimWindow::default());
        let chat = Arc::new(SimChat::silent());
        let (runtime, handle) = BankRuntime::bootstrap_with_capabilities(
            &config,
            Arc::clone(&host),
            Arc::clone(&window),
            Arc::clone(&chat),
        )
        .expect("bootstrap");
        let notices = runtime.subscribe();
        let task = tokio::spawn(runtime.run());

        let mut stage = Stage {
            handle,
            host,
            window,
            chat,
            notices,
            dir,
            task,
        };
        // Let startup (and any startup conflict detection) run.
        stage.settle(0).await;
        stage
    }

    /// Sends one host signal into the engine queue.
    pub fn signal(&self, signal: HostSignal) {
        self.handle.signals().signal(signal).expect("queue open");
    }

    /// Runs a console line on the engine task and returns the reply.
    pub async fn command(&self, line: &str) -> String {
        self.handle.command(line).await.expect("runtime alive")
    }

    /// Lets the loop process everything already queued at the current
    /// instant, advances paused time, then yields until the loop and any
    /// timer tasks woken by the advance have run to completion.
    pub async fn settle(&mut self, millis: u64) {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        if millis > 0 {
            tokio::time::advance(Duration::from_millis(millis)).await;
        }
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    /// Takes every notice published so far.
    pub fn drain_notices(&mut self) -> Vec<EngineNotice> {
        let mut drained = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            drained.push(notice);
        }
        drained
    }

    /// Stops the loop, waits for it, and hands back the data directory so a
    /// follow-up boot can reuse it.
    pub async fn stop(self) -> TempDir {
        self.handle.shutdown();
        self.task.await.expect("engine task");
        self.dir
    }
}

/// The notice subset that announces store refreshes, flattened for asserts.
pub fn refreshed_stores(notices: &[EngineNotice]) -> Vec<Vec<shared_types::StoreKind>> {
    notices
        .iter()
        .filter_map(|notice| match notice {
            EngineNotice::StoresRefreshed { stores } => Some(stores.clone()),
            _ => None,
        })
        .collect()
}

/// The extensions named by prompt notices, in publish order.
pub fn prompted_extensions(notices: &[EngineNotice]) -> Vec<String> {
    notices
        .iter()
        .filter_map(|notice| match notice {
            EngineNotice::ConflictPromptRequired { extension } => Some(extension.clone()),
            _ => None,
        })
        .collect()
}
