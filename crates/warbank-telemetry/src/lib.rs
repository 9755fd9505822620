//! # Warbank Telemetry
//!
//! Logging and diagnostics plumbing shared by every crate in the workspace.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with an env-filter, pretty console
//!   output for development and JSON for containers.
//! - **Fault ring**: a bounded in-memory buffer of handler faults. No error
//!   in the engine is fatal; faults land here and are readable through the
//!   engine's diagnostics operation instead of crashing the loop.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warbank_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WB_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `WB_CONSOLE_OUTPUT` | `true` | Enable console output |
//! | `WB_JSON_LOGS` | `false` (dev) | JSON formatted logs |

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod faults;
mod logging;

pub use config::TelemetryConfig;
pub use faults::{FaultLog, FaultRecord, DEFAULT_FAULT_CAPACITY};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log level filter could not be parsed.
    #[error("Failed to build log filter: {0}")]
    FilterInit(String),

    /// A global subscriber was already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Initializes the global logging subscriber.
///
/// Call once at process start, before any engine work. Tests skip this and
/// rely on the default no-op subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the filter is malformed or a subscriber is
/// already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}
