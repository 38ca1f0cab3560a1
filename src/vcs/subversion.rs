use super::{Backend, tool};
use crate::error::VcsError;
use std::ffi::OsStr;
use std::path::Path;

pub(super) struct Subversion;

impl Backend for Subversion {
    fn is_present(&self, local_path: &Path) -> bool {
        local_path.join(".svn").is_dir()
    }

    fn fetch(&self, remote_url: &str, local_path: &Path) -> Result<(), VcsError> {
        tool::run(
            "svn",
            [
                OsStr::new("checkout"),
                OsStr::new("--non-interactive"),
                OsStr::new(remote_url),
                local_path.as_os_str(),
            ],
            tool::clone_cwd(local_path),
        )
        .map_err(VcsError::fetch)
    }

    fn update(&self, local_path: &Path) -> Result<(), VcsError> {
        tool::run("svn", ["update", "--non-interactive"], local_path).map_err(VcsError::update)
    }
}
