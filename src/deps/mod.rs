//! Dependency fetching and updating.
//!
//! This module holds the core of `scl get`:
//!
//! - **Resolution**: turn a token into a remote URL and a vendor path
//! - **Sync**: clone missing dependencies, pull or skip existing ones
//! - **Reporting**: per-dependency lines and the run summary

mod descriptor;
mod report;
mod sync;

pub use descriptor::{Descriptor, resolve, resolve_all};
pub use report::Reporter;
pub use sync::{
    SyncAborted, SyncCounts, SyncObserver, SyncOptions, SyncOutcome, SyncResult, SyncStatus,
    sync_dependencies,
};
