//! # Warbank Test Suite
//!
//! Unified integration crate: full-runtime flows over the simulated host,
//! driven with paused time so every delay is exact.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── session_flows.rs    # Open, probe, scan, and close lifecycles
//!     ├── conflict_flows.rs   # Competitor arbitration end to end
//!     ├── recovery_flows.rs   # Corrupt documents and emergency recovery
//!     └── console_flows.rs    # Command dispatch through the runtime loop
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All flows
//! cargo test -p warbank-tests
//!
//! # By category
//! cargo test -p warbank-tests integration::session_flows
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod integration;
