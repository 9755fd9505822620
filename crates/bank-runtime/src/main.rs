//! # Warbank Runtime
//!
//! Development harness for the bank engine: builds the engine over the
//! simulated host and exposes a line console on stdin.
//!
//! ## Console
//!
//! Engine commands (`help` lists them) run on the engine task and print
//! their reply. `sim ...` lines drive the simulated host instead:
//!
//! ```text
//! sim open | close          bank session lifecycle
//! sim guild-open [name]     guild vault session (defaults to the sim guild)
//! sim guild-close
//! sim combat | calm         combat gate
//! sim deposit [store]       drop a random item in (shared|personal|guild)
//! sim gold                  jitter the shared gold balance
//! sim rep                   reputation change (collection refresh path)
//! sim extension <name>      load a bank extension mid-session
//! sim enumerable on|off     shared store enumerability for the next probe
//! ```
//!
//! `quit`, `exit`, or Ctrl+C stops the runtime and persists on the way out.

use std::sync::Arc;

use anyhow::{Context, Result};
use bank_runtime::{BankRuntime, RuntimeConfig, RuntimeHandle, SimHost};
use signal_bus::HostSignal;
use shared_types::StoreKind;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use warbank_telemetry::{init_telemetry, TelemetryConfig};
use wb_04_cache_store::StoreQuery;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env())
        .map_err(|err| anyhow::anyhow!("Failed to init telemetry: {err}"))?;

    let config = RuntimeConfig::load_from_env();
    let host = Arc::new(SimHost::new(&config.sim));
    let (runtime, handle) = BankRuntime::bootstrap(&config, Arc::clone(&host))
        .context("Failed to bootstrap the bank runtime")?;
    let engine_task = tokio::spawn(runtime.run());

    info!("===========================================");
    info!("  Warbank Runtime v0.1.0");
    info!("  Data Dir: {:?}", config.storage.data_dir);
    info!("===========================================");
    info!("Console ready. Type 'help' for commands, 'quit' to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line == "quit" || line == "exit" {
                        break;
                    }
                    if let Some(rest) = line.strip_prefix("sim ") {
                        sim_command(&host, &handle, rest.trim());
                        continue;
                    }
                    match handle.command(line).await {
                        Some(reply) => println!("{reply}"),
                        None => break,
                    }
                }
                // Stdin closed; keep serving signals until interrupted.
                Ok(None) => {
                    tokio::signal::ctrl_c().await?;
                    break;
                }
                Err(err) => {
                    error!(error = %err, "Console read failed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                break;
            }
        }
    }

    handle.shutdown();
    engine_task.await.context("Engine task failed")?;
    info!("Shutdown complete");
    Ok(())
}

/// Applies one `sim ...` console line to the simulated host, emitting the
/// signal a real host would emit for that change.
fn sim_command(host: &SimHost, handle: &RuntimeHandle, rest: &str) {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let sent = match verb {
        "open" => handle
            .signals()
            .signal(HostSignal::SessionOpened { hint: None }),
        "close" => handle.signals().signal(HostSignal::SessionClosed),
        "guild-open" => {
            let guild = if arg.is_empty() {
                host.guild_name()
            } else {
                Some(arg.to_owned())
            };
            match guild {
                Some(guild) => handle
                    .signals()
                    .signal(HostSignal::GuildSessionOpened { guild }),
                None => {
                    println!("The sim character has no guild; pass a name.");
                    return;
                }
            }
        }
        "guild-close" => handle.signals().signal(HostSignal::GuildSessionClosed),
        "combat" => handle.signals().signal(HostSignal::CombatEntered),
        "calm" => handle.signals().signal(HostSignal::CombatExited),
        "deposit" => {
            let store = match arg {
                "" | "shared" => StoreKind::Shared,
                "personal" => StoreKind::Personal,
                "guild" => StoreKind::Guild,
                other => {
                    println!("Unknown store '{other}'; use shared, personal, or guild.");
                    return;
                }
            };
            match host.deposit_random(store) {
                Some(container) => handle.signals().signal(HostSignal::SlotRangeChanged {
                    containers: vec![container],
                }),
                None => {
                    println!("No open slot in the {store} store.");
                    return;
                }
            }
        }
        "gold" => {
            let total = host.jitter_gold();
            println!("Shared gold is now {total} copper.");
            handle.signals().signal(HostSignal::CurrencyChanged)
        }
        "rep" => handle.signals().signal(HostSignal::ReputationChanged),
        "extension" => {
            if arg.is_empty() {
                println!("Usage: sim extension <name>");
                return;
            }
            host.install_extension(arg);
            handle.signals().signal(HostSignal::ExtensionLoaded {
                name: arg.to_owned(),
            })
        }
        "enumerable" => {
            match arg {
                "on" => host.set_enumerable(true),
                "off" => host.set_enumerable(false),
                _ => println!("Usage: sim enumerable on|off"),
            }
            return;
        }
        other => {
            println!("Unknown sim verb '{other}'.");
            return;
        }
    };

    if sent.is_err() {
        error!("Engine queue closed; signal dropped");
    }
}
