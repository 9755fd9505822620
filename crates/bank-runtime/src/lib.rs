//! # Bank Runtime Library
//!
//! Internal modules of the runtime binary, exposed for the integration
//! suite. The binary entry point is `main.rs`.
//!
//! ## Structure
//!
//! - `config` - Runtime configuration from environment variables
//! - `sim` - Simulated host implementing the engine's outbound ports
//! - `commands` - Console token dispatch onto engine operations
//! - `runtime` - Bootstrap and the single-consumer event loop

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod commands;
pub mod config;
pub mod runtime;
pub mod sim;

// Re-export main types
pub use config::RuntimeConfig;
pub use runtime::{BankRuntime, ConsoleCommand, RuntimeHandle};
pub use sim::{SimChat, SimHost, SimWindow};
