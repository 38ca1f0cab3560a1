//! Run configuration for `scl get`.
//!
//! Assembled once by the CLI from parsed arguments and handed to the command
//! by value. Nothing below the CLI reads the environment or the working
//! directory on its own.

use crate::vcs::VcsKind;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_VENDOR_DIR: &str = "vendor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetConfig {
    /// Vendor root as given on the command line, possibly relative
    pub output_path: PathBuf,
    pub update: bool,
    pub verbose: bool,
    /// Exit non-zero when any dependency fails
    pub strict: bool,
    /// Backend for remotes that cannot be detected
    pub fallback_kind: Option<VcsKind>,
}

impl Default for GetConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_VENDOR_DIR),
            update: false,
            verbose: false,
            strict: false,
            fallback_kind: None,
        }
    }
}

impl GetConfig {
    /// Absolute vendor root, resolved against `cwd`.
    pub fn vendor_root(&self, cwd: &Path) -> PathBuf {
        resolve_vendor_root(&self.output_path, cwd)
    }
}

/// Make `path` absolute against `cwd` and lexically clean it.
pub fn resolve_vendor_root(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
