//! Version-control adapter.
//!
//! The sync engine only talks to the [`VcsAdapter`] trait. [`SystemVcs`] is the
//! real implementation: it detects a backend from the remote URL and hands
//! clone/update work to one of the backend modules.
//!
//! ## Backends
//!
//! - **Git** - `git2` (libgit2), no `git` binary needed
//! - **Mercurial**, **Subversion**, **Bazaar** - the `hg`, `svn` and `bzr` binaries

mod bazaar;
mod git;
mod mercurial;
#[cfg(test)]
pub(crate) mod mock;
mod subversion;
mod tool;

use crate::error::VcsError;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Supported version-control systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Mercurial,
    Subversion,
    Bazaar,
}

impl VcsKind {
    pub const ALL: [VcsKind; 4] = [
        VcsKind::Git,
        VcsKind::Mercurial,
        VcsKind::Subversion,
        VcsKind::Bazaar,
    ];

    /// Metadata directory a checkout of this kind keeps at its root.
    pub fn marker_dir(self) -> &'static str {
        match self {
            VcsKind::Git => ".git",
            VcsKind::Mercurial => ".hg",
            VcsKind::Subversion => ".svn",
            VcsKind::Bazaar => ".bzr",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "git" => Some(VcsKind::Git),
            "hg" => Some(VcsKind::Mercurial),
            "svn" => Some(VcsKind::Subversion),
            "bzr" => Some(VcsKind::Bazaar),
            _ => None,
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VcsKind::Git => "git",
            VcsKind::Mercurial => "hg",
            VcsKind::Subversion => "svn",
            VcsKind::Bazaar => "bzr",
        };
        f.write_str(name)
    }
}

/// Hosting services whose repositories are always of one kind.
/// Matched against `host/path` with any scheme and user info removed.
static HOST_RULES: LazyLock<Vec<(Regex, VcsKind)>> = LazyLock::new(|| {
    [
        (r"^(www\.)?github\.com(/|$)", VcsKind::Git),
        (r"^gitlab\.com(/|$)", VcsKind::Git),
        (r"^bitbucket\.org(/|$)", VcsKind::Git),
        (r"^git\.openstack\.org(/|$)", VcsKind::Git),
        (r"^go\.googlesource\.com(/|$)", VcsKind::Git),
        (r"^git\.apache\.org(/|$)", VcsKind::Git),
        (r"^hub\.jazz\.net/git(/|$)", VcsKind::Git),
        (r"^git\.launchpad\.net(/|$)", VcsKind::Git),
        (r"^(code\.)?launchpad\.net(/|$)", VcsKind::Bazaar),
    ]
    .into_iter()
    .filter_map(|(pattern, kind)| Regex::new(pattern).ok().map(|re| (re, kind)))
    .collect()
});

/// A path segment such as `lib.git` or `tools.hg`.
static SUFFIX_RULE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\.(git|hg|svn|bzr)(/|$)").ok());

/// Detect the backend for a remote URL from its text alone.
///
/// Checks known hosts, then the URL scheme, then a `.git`/`.hg`/`.svn`/`.bzr`
/// path segment. Never touches the network or the filesystem.
pub fn detect_kind(remote_url: &str) -> Result<VcsKind, VcsError> {
    let (scheme, rest) = split_scheme(remote_url);
    let (user, host_and_path) = split_user(rest);

    if let Some((_, kind)) = HOST_RULES.iter().find(|(re, _)| re.is_match(host_and_path)) {
        return Ok(*kind);
    }

    if let Some(kind) = kind_for_scheme(scheme, user) {
        return Ok(kind);
    }

    // scp-like `git@host:path`
    if scheme.is_none() && user == Some("git") && host_and_path.contains(':') {
        return Ok(VcsKind::Git);
    }

    let path = host_and_path
        .split_once('/')
        .map(|(_, path)| path)
        .unwrap_or_default();
    if let Some(re) = SUFFIX_RULE.as_ref()
        && let Some(caps) = re.captures(path)
        && let Some(kind) = caps.get(1).and_then(|m| VcsKind::from_suffix(m.as_str()))
    {
        return Ok(kind);
    }

    Err(VcsError::UnrecognizedRemote {
        remote: remote_url.to_string(),
    })
}

/// Kind of the checkout already living at `local_path`, if any.
pub fn detect_local_kind(local_path: &Path) -> Option<VcsKind> {
    VcsKind::ALL
        .into_iter()
        .find(|kind| local_path.join(kind.marker_dir()).is_dir())
}

fn split_scheme(url: &str) -> (Option<&str>, &str) {
    match url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, url),
    }
}

fn split_user(rest: &str) -> (Option<&str>, &str) {
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => (Some(&rest[..at]), &rest[at + 1..]),
        None => (None, rest),
    }
}

fn kind_for_scheme(scheme: Option<&str>, user: Option<&str>) -> Option<VcsKind> {
    match scheme? {
        "git" | "git+ssh" => Some(VcsKind::Git),
        "ssh" if user == Some("git") => Some(VcsKind::Git),
        "svn" | "svn+ssh" => Some(VcsKind::Subversion),
        "bzr" | "bzr+ssh" => Some(VcsKind::Bazaar),
        _ => None,
    }
}

/// The operations the sync engine needs from a version-control toolchain.
pub trait VcsAdapter {
    /// Pick the backend for a dependency.
    fn detect_kind(&self, remote_url: &str, local_path: &Path) -> Result<VcsKind, VcsError>;

    /// Whether `local_path` already holds a checkout of `kind`.
    fn is_present_locally(&self, kind: VcsKind, local_path: &Path) -> bool;

    /// Initial clone of `remote_url` into `local_path`.
    fn fetch(&self, kind: VcsKind, remote_url: &str, local_path: &Path) -> Result<(), VcsError>;

    /// Pull the latest changes into an existing checkout.
    fn update(&self, kind: VcsKind, local_path: &Path) -> Result<(), VcsError>;
}

/// A single backend. Kind dispatch happens in [`SystemVcs`].
trait Backend: Sync {
    fn is_present(&self, local_path: &Path) -> bool;
    fn fetch(&self, remote_url: &str, local_path: &Path) -> Result<(), VcsError>;
    fn update(&self, local_path: &Path) -> Result<(), VcsError>;
}

static GIT: git::Git = git::Git;
static MERCURIAL: mercurial::Mercurial = mercurial::Mercurial;
static SUBVERSION: subversion::Subversion = subversion::Subversion;
static BAZAAR: bazaar::Bazaar = bazaar::Bazaar;

fn backend(kind: VcsKind) -> &'static dyn Backend {
    match kind {
        VcsKind::Git => &GIT,
        VcsKind::Mercurial => &MERCURIAL,
        VcsKind::Subversion => &SUBVERSION,
        VcsKind::Bazaar => &BAZAAR,
    }
}

/// Adapter backed by libgit2 and the system `hg`/`svn`/`bzr` tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVcs {
    fallback: Option<VcsKind>,
}

impl SystemVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend to use when neither the URL nor an existing checkout names one.
    pub fn with_fallback(mut self, fallback: Option<VcsKind>) -> Self {
        self.fallback = fallback;
        self
    }
}

impl VcsAdapter for SystemVcs {
    fn detect_kind(&self, remote_url: &str, local_path: &Path) -> Result<VcsKind, VcsError> {
        detect_kind(remote_url).or_else(|err| {
            detect_local_kind(local_path)
                .or(self.fallback)
                .ok_or(err)
        })
    }

    fn is_present_locally(&self, kind: VcsKind, local_path: &Path) -> bool {
        backend(kind).is_present(local_path)
    }

    fn fetch(&self, kind: VcsKind, remote_url: &str, local_path: &Path) -> Result<(), VcsError> {
        backend(kind).fetch(remote_url, local_path)
    }

    fn update(&self, kind: VcsKind, local_path: &Path) -> Result<(), VcsError> {
        backend(kind).update(local_path)
    }
}
