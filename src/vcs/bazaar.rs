use super::{Backend, tool};
use crate::error::VcsError;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

pub(super) struct Bazaar;

impl Backend for Bazaar {
    fn is_present(&self, local_path: &Path) -> bool {
        local_path.join(".bzr").is_dir()
    }

    fn fetch(&self, remote_url: &str, local_path: &Path) -> Result<(), VcsError> {
        // `bzr branch` refuses an existing target, even an empty one.
        // remove_dir only succeeds on empty directories; anything else is left for bzr to report.
        let _ = fs::remove_dir(local_path);

        tool::run(
            "bzr",
            [OsStr::new("branch"), OsStr::new(remote_url), local_path.as_os_str()],
            tool::clone_cwd(local_path),
        )
        .map_err(VcsError::fetch)
    }

    fn update(&self, local_path: &Path) -> Result<(), VcsError> {
        tool::run("bzr", ["pull"], local_path).map_err(VcsError::update)
    }
}
