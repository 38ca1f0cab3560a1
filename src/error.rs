//! Error types shared by the dependency engine and its backends.

use std::path::PathBuf;

/// Failures confined to a single dependency.
///
/// These never abort a run: the engine records them as a failed outcome and
/// moves on to the next dependency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VcsError {
    /// No backend claims the remote URL
    #[error("cannot detect VCS for {remote}")]
    UnrecognizedRemote { remote: String },

    /// Initial clone/checkout failed
    #[error("{reason}")]
    Fetch { reason: String },

    /// Pull/update of an existing checkout failed
    #[error("{reason}")]
    Update { reason: String },
}

impl VcsError {
    pub fn fetch(reason: impl ToString) -> Self {
        Self::Fetch {
            reason: reason.to_string(),
        }
    }

    pub fn update(reason: impl ToString) -> Self {
        Self::Update {
            reason: reason.to_string(),
        }
    }
}

/// Failures that stop the whole run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A directory under the vendor root could not be created
    #[error("Can't create path {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
