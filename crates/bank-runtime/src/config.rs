//! # Runtime Configuration
//!
//! Environment-driven settings for the binary. Every knob has a working
//! default; a malformed override is logged and ignored rather than fatal.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WB_DATA_DIR` | `./data` | Directory holding the persisted document |
//! | `WB_RESCAN_DEBOUNCE_MS` | `500` | Quiet period before a bank rescan |
//! | `WB_SHOW_SETTLE_MS` | `250` | Delay before the own window shows |
//! | `WB_SIM_SEED` | `7` | Seed for the simulated host's demo stock |
//! | `WB_SIM_COMPETITOR` | unset | Competitor extension active at startup |

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use wb_01_session::EngineTuning;

/// Name of the persisted document inside the data directory.
const SAVED_VARS_FILE: &str = "warbank.json";

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Storage settings.
    pub storage: StorageConfig,
    /// Engine delay table and capacities.
    pub tuning: EngineTuning,
    /// Simulated-host settings.
    pub sim: SimConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            storage: StorageConfig::default(),
            tuning: EngineTuning::default(),
            sim: SimConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Loads configuration from the environment over the defaults.
    #[must_use]
    pub fn load_from_env() -> Self {
        let mut config = RuntimeConfig::default();

        if let Ok(dir) = std::env::var("WB_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = env_millis("WB_RESCAN_DEBOUNCE_MS") {
            config.tuning.scheduler.rescan_debounce = ms;
        }
        if let Some(ms) = env_millis("WB_SHOW_SETTLE_MS") {
            config.tuning.show_settle = ms;
        }
        if let Ok(seed) = std::env::var("WB_SIM_SEED") {
            match seed.parse() {
                Ok(seed) => config.sim.seed = seed,
                Err(_) => warn!(value = %seed, "WB_SIM_SEED is not a number; ignored"),
            }
        }
        if let Ok(name) = std::env::var("WB_SIM_COMPETITOR") {
            if !name.is_empty() {
                config.sim.competitor = Some(name);
            }
        }

        config
    }

    /// Full path of the persisted saved-variables document.
    #[must_use]
    pub fn persist_path(&self) -> PathBuf {
        self.storage.data_dir.join(SAVED_VARS_FILE)
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory the persisted document lives in. Created at bootstrap.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Simulated-host configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Seed for the demo world generator.
    pub seed: u64,
    /// A competitor extension the sim reports as active from the start.
    pub competitor: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            seed: 7,
            competitor: None,
        }
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            warn!(variable = name, value = %raw, "Not a millisecond count; ignored");
            None
        }
    }
}
