use super::{Backend, tool};
use crate::error::VcsError;
use std::ffi::OsStr;
use std::path::Path;

pub(super) struct Mercurial;

impl Backend for Mercurial {
    fn is_present(&self, local_path: &Path) -> bool {
        local_path.join(".hg").is_dir()
    }

    fn fetch(&self, remote_url: &str, local_path: &Path) -> Result<(), VcsError> {
        tool::run(
            "hg",
            [OsStr::new("clone"), OsStr::new(remote_url), local_path.as_os_str()],
            tool::clone_cwd(local_path),
        )
        .map_err(VcsError::fetch)
    }

    fn update(&self, local_path: &Path) -> Result<(), VcsError> {
        tool::run("hg", ["pull", "-u"], local_path).map_err(VcsError::update)
    }
}
