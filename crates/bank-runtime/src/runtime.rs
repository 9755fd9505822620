//! # Runtime Bootstrap and Event Loop
//!
//! Builds the engine over the simulated host and runs the single-consumer
//! loop: engine events, console commands, and notices are all serviced by
//! one task, so every handler runs to completion before the next starts.

use std::sync::Arc;

use anyhow::{Context, Result};
use saved_vars::load_from_path;
use signal_bus::{EngineNotice, EngineQueue, EngineReceiver, EngineSender};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{info, warn};
use wb_01_session::{HostPorts, SessionEngine};

use crate::commands;
use crate::config::RuntimeConfig;
use crate::sim::{SimChat, SimHost, SimWindow};

/// One console line awaiting execution on the engine task.
pub struct ConsoleCommand {
    line: String,
    reply: oneshot::Sender<String>,
}

/// Producer-side handle the console holds on the runtime.
pub struct RuntimeHandle {
    signals: EngineSender,
    commands: mpsc::UnboundedSender<ConsoleCommand>,
    shutdown_tx: watch::Sender<bool>,
}

impl RuntimeHandle {
    /// The signal entrance; what a host adapter would hold.
    #[must_use]
    pub fn signals(&self) -> &EngineSender {
        &self.signals
    }

    /// Runs one console line on the engine task and waits for the reply.
    /// Returns `None` once the runtime has stopped.
    pub async fn command(&self, line: &str) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(ConsoleCommand {
                line: line.to_owned(),
                reply: tx,
            })
            .ok()?;
        rx.await.ok()
    }

    /// Asks the runtime loop to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// The engine task: owns the engine and everything it consumes.
pub struct BankRuntime {
    engine: SessionEngine,
    events: EngineReceiver,
    commands: mpsc::UnboundedReceiver<ConsoleCommand>,
    shutdown: watch::Receiver<bool>,
}

impl BankRuntime {
    /// Wires the engine to `host` with fresh sim window and chat
    /// capabilities.
    ///
    /// # Errors
    ///
    /// Filesystem failures creating the data directory or reading the
    /// document. A corrupt document is recovered, not an error.
    pub fn bootstrap(config: &RuntimeConfig, host: Arc<SimHost>) -> Result<(Self, RuntimeHandle)> {
        Self::bootstrap_with_capabilities(
            config,
            host,
            Arc::new(SimWindow::default()),
            Arc::new(SimChat::new()),
        )
    }

    /// [`Self::bootstrap`] with caller-owned window and chat capabilities,
    /// for harnesses that need to observe them.
    ///
    /// # Errors
    ///
    /// Same as [`Self::bootstrap`].
    pub fn bootstrap_with_capabilities(
        config: &RuntimeConfig,
        host: Arc<SimHost>,
        window: Arc<SimWindow>,
        chat: Arc<SimChat>,
    ) -> Result<(Self, RuntimeHandle)> {
        std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
            format!(
                "failed to create data directory {}",
                config.storage.data_dir.display()
            )
        })?;

        let persist_path = config.persist_path();
        let report = load_from_path(&persist_path)
            .with_context(|| format!("failed to load {}", persist_path.display()))?;
        if !report.is_clean() {
            warn!(
                sections = ?report.recovered_sections,
                "Parts of the saved document were reset during load"
            );
        }
        info!(
            characters = report.vars.account.characters.len(),
            guilds = report.vars.account.guild_banks.len(),
            "Saved document loaded"
        );

        let (signals, events) = EngineQueue::channel();
        let ports = HostPorts {
            store_query: host.clone(),
            extension_host: host.clone(),
            native_ui: host,
        };
        let mut engine = SessionEngine::new(config.tuning, ports, report.vars, signals.clone());
        engine.set_persist_path(persist_path);
        engine.register_window(window);
        engine.register_chat(chat);

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok((
            BankRuntime {
                engine,
                events,
                commands: cmd_rx,
                shutdown: shutdown_rx,
            },
            RuntimeHandle {
                signals,
                commands: cmd_tx,
                shutdown_tx,
            },
        ))
    }

    /// Opens a notice subscription. Call before [`Self::run`] consumes the
    /// runtime; notices published earlier are not replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineNotice> {
        self.engine.subscribe()
    }

    /// Runs the loop until shutdown or until every producer is gone.
    pub async fn run(mut self) {
        self.engine.startup();
        let mut notices = self.engine.subscribe();

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.engine.handle_event(event),
                    None => {
                        info!("Engine queue closed; stopping");
                        break;
                    }
                },
                Some(command) = self.commands.recv() => {
                    let reply = commands::dispatch(&mut self.engine, &command.line);
                    let _ = command.reply.send(reply);
                },
                notice = notices.recv() => {
                    if let Ok(notice) = notice {
                        info!(notice = notice.kind(), "Engine notice");
                    }
                },
                _ = self.shutdown.changed() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    }
}
