//! Git backend on top of libgit2.

use super::Backend;
use crate::error::VcsError;
use git2::{BranchType, Repository};
use std::path::Path;
use tracing::debug;

pub(super) struct Git;

impl Backend for Git {
    fn is_present(&self, local_path: &Path) -> bool {
        local_path.join(".git").exists() && Repository::open(local_path).is_ok()
    }

    fn fetch(&self, remote_url: &str, local_path: &Path) -> Result<(), VcsError> {
        Repository::clone(remote_url, local_path)
            .map(|_| ())
            .map_err(|e| VcsError::fetch(e.message()))
    }

    fn update(&self, local_path: &Path) -> Result<(), VcsError> {
        pull(local_path).map_err(|e| VcsError::update(e.message()))
    }
}

/// Fetch the upstream of the checked-out branch and fast-forward onto it.
fn pull(local_path: &Path) -> Result<(), git2::Error> {
    let repo = Repository::open(local_path)?;

    let head = repo.head()?;
    if !head.is_branch() {
        return Err(git2::Error::from_str("HEAD is detached, no branch to update"));
    }
    let branch_name = head
        .shorthand()
        .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8"))?
        .to_string();
    let refname = format!("refs/heads/{}", branch_name);

    let remote_name = repo
        .branch_upstream_remote(&refname)
        .ok()
        .and_then(|buf| buf.as_str().map(str::to_string))
        .unwrap_or_else(|| "origin".to_string());

    let mut remote = repo.find_remote(&remote_name)?;
    remote.fetch::<&str>(&[], None, None)?;

    let branch = repo.find_branch(&branch_name, BranchType::Local)?;
    let upstream = branch.upstream()?;
    let target = upstream
        .get()
        .target()
        .ok_or_else(|| git2::Error::from_str("upstream branch has no target"))?;

    let annotated = repo.find_annotated_commit(target)?;
    let (analysis, _) = repo.merge_analysis(&[&annotated])?;

    if analysis.is_up_to_date() {
        debug!(branch = %branch_name, "already up to date");
        return Ok(());
    }
    if !analysis.is_fast_forward() {
        return Err(git2::Error::from_str(&format!(
            "branch '{}' has diverged from its upstream",
            branch_name
        )));
    }

    // Safe checkout leaves the branch untouched when local edits would be overwritten.
    let commit = repo.find_object(target, None)?;
    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(&commit, Some(&mut checkout))?;

    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(target, "scl get: fast-forward")?;
    repo.set_head(&refname)?;

    debug!(branch = %branch_name, commit = %target, "fast-forwarded");
    Ok(())
}
