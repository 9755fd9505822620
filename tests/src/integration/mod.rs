//! Cross-crate flows driving the full runtime loop over the simulated host.

#[cfg(test)]
pub mod harness;

pub mod conflict_flows;
pub mod console_flows;
pub mod recovery_flows;
pub mod session_flows;
