//! In-memory adapter for engine and command tests.

use super::{VcsAdapter, VcsKind};
use crate::error::VcsError;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Detect(String),
    IsPresent(PathBuf),
    Fetch(String, PathBuf),
    Update(PathBuf),
}

/// Treats every remote as git unless listed as unrecognized. A successful
/// fetch marks the path as present, so a second run sees the checkout.
#[derive(Default)]
pub(crate) struct MockVcs {
    calls: RefCell<Vec<Call>>,
    present: RefCell<HashSet<PathBuf>>,
    unrecognized: HashSet<String>,
    failing_fetch: HashSet<String>,
    failing_update: HashSet<PathBuf>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unrecognized(mut self, remote_url: &str) -> Self {
        self.unrecognized.insert(remote_url.to_string());
        self
    }

    pub fn failing_fetch(mut self, remote_url: &str) -> Self {
        self.failing_fetch.insert(remote_url.to_string());
        self
    }

    pub fn failing_update(mut self, local_path: &Path) -> Self {
        self.failing_update.insert(local_path.to_path_buf());
        self
    }

    pub fn with_present(self, local_path: &Path) -> Self {
        self.present.borrow_mut().insert(local_path.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn fetch_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Fetch(..)))
            .count()
    }

    pub fn update_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Update(..)))
            .count()
    }
}

impl VcsAdapter for MockVcs {
    fn detect_kind(&self, remote_url: &str, _local_path: &Path) -> Result<VcsKind, VcsError> {
        self.calls
            .borrow_mut()
            .push(Call::Detect(remote_url.to_string()));
        if self.unrecognized.contains(remote_url) {
            Err(VcsError::UnrecognizedRemote {
                remote: remote_url.to_string(),
            })
        } else {
            Ok(VcsKind::Git)
        }
    }

    fn is_present_locally(&self, _kind: VcsKind, local_path: &Path) -> bool {
        self.calls
            .borrow_mut()
            .push(Call::IsPresent(local_path.to_path_buf()));
        self.present.borrow().contains(local_path)
    }

    fn fetch(&self, _kind: VcsKind, remote_url: &str, local_path: &Path) -> Result<(), VcsError> {
        self.calls.borrow_mut().push(Call::Fetch(
            remote_url.to_string(),
            local_path.to_path_buf(),
        ));
        if self.failing_fetch.contains(remote_url) {
            return Err(VcsError::fetch("authentication required"));
        }
        self.present.borrow_mut().insert(local_path.to_path_buf());
        Ok(())
    }

    fn update(&self, _kind: VcsKind, local_path: &Path) -> Result<(), VcsError> {
        self.calls
            .borrow_mut()
            .push(Call::Update(local_path.to_path_buf()));
        if self.failing_update.contains(local_path) {
            return Err(VcsError::update("network unreachable"));
        }
        Ok(())
    }
}
