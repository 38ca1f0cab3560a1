//! Dependency descriptor resolution.
//!
//! Turns a raw token such as `github.com/org/repo` into the remote URL to
//! clone from and the directory under the vendor root that holds the checkout.

use std::path::{Path, PathBuf};

const HTTPS_SCHEME: &str = "https://";

/// A resolved dependency. Built once by [`resolve`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    token: String,
    remote_url: String,
    local_path: PathBuf,
}

impl Descriptor {
    /// The token as supplied by the caller.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

/// Resolve `token` against `vendor_root`.
///
/// `vendor_root` must already be absolute. No validation of the token is
/// performed; it is joined under the root as-is.
pub fn resolve(token: &str, vendor_root: &Path) -> Descriptor {
    debug_assert!(vendor_root.is_absolute(), "vendor root must be absolute");

    Descriptor {
        token: token.to_string(),
        remote_url: remote_url_for(token),
        local_path: local_path_for(token, vendor_root),
    }
}

/// Resolve every token, keeping the caller's order.
pub fn resolve_all<S: AsRef<str>>(tokens: &[S], vendor_root: &Path) -> Vec<Descriptor> {
    tokens
        .iter()
        .map(|token| resolve(token.as_ref(), vendor_root))
        .collect()
}

fn remote_url_for(token: &str) -> String {
    format!(
        "{}{}",
        HTTPS_SCHEME,
        token.strip_prefix(HTTPS_SCHEME).unwrap_or(token)
    )
}

fn local_path_for(token: &str, vendor_root: &Path) -> PathBuf {
    // A leading separator would make `join` replace the root entirely
    vendor_root.join(token.trim_start_matches(['/', '\\']))
}
