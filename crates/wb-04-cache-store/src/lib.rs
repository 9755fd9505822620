//! # Cache Store Subsystem
//!
//! Two layers of caching over the host's slot-addressed stores:
//!
//! 1. **Primary snapshots** ([`scan::scan_store`]): a full wipe-then-rebuild
//!    image of one store, built by walking its tab list through the
//!    [`ports::StoreQuery`] seam. Snapshots are never patched in place;
//!    partial updates were the historical source of phantom-item bugs.
//! 2. **Derived caches** ([`derived::DerivedCaches`]): aggregate counts, a
//!    search index, and tooltip ownership lines, rebuilt lazily from the
//!    snapshots and bounded by a TTL plus explicit invalidation whenever a
//!    snapshot changes.
//!
//! ## Failure Policy
//!
//! Host queries go unavailable routinely (loading screens, teller range).
//! A single unavailable tab is skipped; only a store whose every tab is
//! unavailable aborts the scan, leaving the previous snapshot untouched.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod derived;
pub mod error;
pub mod ports;
pub mod scan;

// Re-export main types
pub use derived::{CacheReport, DerivedCacheKind, DerivedCaches, OwnedCount, SearchHit};
pub use error::{ScanError, ScanResult};
pub use ports::{SlotQuery, StoreQuery};
pub use scan::scan_store;

use std::time::Duration;

/// How long a derived cache stays fresh without explicit invalidation.
pub const DEFAULT_DERIVED_TTL: Duration = Duration::from_secs(30);
