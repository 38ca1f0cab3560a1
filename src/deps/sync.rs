//! Dependency synchronization engine.
//!
//! Walks the resolved descriptors in order and, for each one, either clones a
//! fresh checkout, pulls an existing one, or leaves it alone:
//!
//! - not present locally -> fetch -> `Created` / `Failed`
//! - present, no `--update` -> `Skipped`
//! - present, `--update` -> update -> `Updated` / `Failed`
//!
//! A failure for one dependency never stops the others. Only a directory that
//! cannot be created under the vendor root aborts the run.

use super::descriptor::Descriptor;
use crate::error::{SyncError, VcsError};
use crate::vcs::VcsAdapter;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, info_span, warn};

/// Terminal state of one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Created,
    Updated,
    Skipped,
    Failed,
}

/// What happened to one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub token: String,
    pub status: SyncStatus,
    /// Cause for `Failed`, informational otherwise
    pub detail: String,
}

impl SyncOutcome {
    fn new(descriptor: &Descriptor, status: SyncStatus, detail: impl Into<String>) -> Self {
        Self {
            token: descriptor.token().to_string(),
            status,
            detail: detail.into(),
        }
    }

    fn failed(descriptor: &Descriptor, action: &str, err: &VcsError) -> Self {
        warn!(error = %err, "{}", action);
        Self::new(descriptor, SyncStatus::Failed, format!("{}: {}", action, err))
    }
}

/// Per-status totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncCounts {
    fn tally(mut self, status: SyncStatus) -> Self {
        match status {
            SyncStatus::Created => self.created += 1,
            SyncStatus::Updated => self.updated += 1,
            SyncStatus::Skipped => self.skipped += 1,
            SyncStatus::Failed => self.failed += 1,
        }
        self
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }
}

/// Outcomes of a whole run, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    outcomes: Vec<SyncOutcome>,
    counts: SyncCounts,
}

impl SyncResult {
    pub fn from_outcomes(outcomes: Vec<SyncOutcome>) -> Self {
        let counts = outcomes
            .iter()
            .fold(SyncCounts::default(), |counts, o| counts.tally(o.status));
        Self { outcomes, counts }
    }

    pub fn outcomes(&self) -> &[SyncOutcome] {
        &self.outcomes
    }

    pub fn counts(&self) -> SyncCounts {
        self.counts
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }
}

/// A fatal precondition failure, with everything finished before it.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct SyncAborted {
    pub completed: Vec<SyncOutcome>,
    pub error: SyncError,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Pull existing checkouts instead of skipping them
    pub update: bool,
}

/// Progress hooks, called in input order.
pub trait SyncObserver {
    fn on_start(&mut self, _descriptor: &Descriptor) {}
    fn on_outcome(&mut self, _outcome: &SyncOutcome) {}
}

impl SyncObserver for () {}

/// Synchronize every descriptor, one at a time.
///
/// The vendor root is created first; if that fails nothing is processed.
/// Each dependency directory is created before the adapter sees it, and a
/// failure there aborts the remaining dependencies.
pub fn sync_dependencies<A: VcsAdapter + ?Sized>(
    descriptors: &[Descriptor],
    vendor_root: &Path,
    adapter: &A,
    options: SyncOptions,
    observer: &mut dyn SyncObserver,
) -> Result<SyncResult, SyncAborted> {
    ensure_dir(vendor_root).map_err(|error| SyncAborted {
        completed: Vec::new(),
        error,
    })?;

    let mut outcomes = Vec::with_capacity(descriptors.len());
    let mut claimed: HashMap<&Path, &str> = HashMap::new();

    for descriptor in descriptors {
        let span = info_span!("dependency", token = descriptor.token());
        let _enter = span.enter();
        observer.on_start(descriptor);

        let outcome = if let Some(owner) = claimed.get(descriptor.local_path()) {
            warn!(owner = %owner, "local path already used by an earlier dependency");
            SyncOutcome::new(
                descriptor,
                SyncStatus::Failed,
                format!("duplicate of {}", owner),
            )
        } else {
            claimed.insert(descriptor.local_path(), descriptor.token());

            if let Err(error) = ensure_dir(descriptor.local_path()) {
                return Err(SyncAborted {
                    completed: outcomes,
                    error,
                });
            }
            sync_one(descriptor, adapter, options)
        };

        observer.on_outcome(&outcome);
        outcomes.push(outcome);
    }

    Ok(SyncResult::from_outcomes(outcomes))
}

fn sync_one<A: VcsAdapter + ?Sized>(
    descriptor: &Descriptor,
    adapter: &A,
    options: SyncOptions,
) -> SyncOutcome {
    let remote = descriptor.remote_url();
    let path = descriptor.local_path();

    let kind = match adapter.detect_kind(remote, path) {
        Ok(kind) => kind,
        Err(err) => return SyncOutcome::failed(descriptor, "Can't create repo", &err),
    };

    let present = adapter.is_present_locally(kind, path);
    debug!(%kind, present, "checked local checkout");

    if !present {
        return match adapter.fetch(kind, remote, path) {
            Ok(()) => {
                info!(%remote, path = %path.display(), "fetched");
                SyncOutcome::new(descriptor, SyncStatus::Created, format!("cloned {}", remote))
            }
            Err(err) => SyncOutcome::failed(descriptor, "Can't fetch repo", &err),
        };
    }

    if !options.update {
        return SyncOutcome::new(descriptor, SyncStatus::Skipped, "already present");
    }

    match adapter.update(kind, path) {
        Ok(()) => {
            info!(path = %path.display(), "updated");
            SyncOutcome::new(descriptor, SyncStatus::Updated, format!("pulled {}", remote))
        }
        Err(err) => SyncOutcome::failed(descriptor, "Can't update repo", &err),
    }
}

fn ensure_dir(path: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(path).map_err(|source| {
        warn!(path = %path.display(), error = %source, "cannot create directory");
        SyncError::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    })
}
