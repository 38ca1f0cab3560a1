//! Runner for command-line VCS tools.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run `program` with `args` inside `cwd`, returning the failure reason on error.
pub(super) fn run<I, S>(program: &str, args: I, cwd: &Path) -> Result<(), String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).current_dir(cwd);
    debug!(?command, "running vcs tool");

    let output = command.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => format!("{} not found, is it installed and on PATH?", program),
        _ => format!("failed to run {}: {}", program, e),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        Err(format!("{} exited with {}", program, output.status))
    } else {
        Err(format!("{} failed: {}", program, stderr))
    }
}

/// Directory to run a clone from: the parent of the destination.
pub(super) fn clone_cwd(local_path: &Path) -> &Path {
    local_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}
