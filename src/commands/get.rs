//! `scl get` command handler.
//!
//! Resolves the dependency tokens, runs the sync engine and maps the result
//! to a process exit status.

use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::GetConfig;
use crate::deps::{Reporter, SyncOptions, SyncResult, resolve_all, sync_dependencies};
use crate::vcs::VcsAdapter;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Run `scl get` and return the exit status.
///
/// `cwd` is the caller's working directory, used to make the vendor root
/// absolute. An error there is reported as a path resolution failure.
pub fn run_get<A, O, E>(
    tokens: &[String],
    config: &GetConfig,
    cwd: io::Result<PathBuf>,
    adapter: &A,
    reporter: &mut Reporter<O, E>,
) -> u8
where
    A: VcsAdapter + ?Sized,
    O: Write,
    E: Write,
{
    if tokens.is_empty() {
        log_write(
            reporter
                .report_fatal("At least one dependency is required. See `scl help get` for syntax"),
        );
        return EXIT_FAILURE;
    }

    let cwd = match cwd {
        Ok(cwd) => cwd,
        Err(e) => {
            log_write(reporter.report_fatal(&format!("Can't get path: {}", e)));
            return EXIT_FAILURE;
        }
    };

    let vendor_root = config.vendor_root(&cwd);
    info!(vendor_root = %vendor_root.display(), count = tokens.len(), "syncing dependencies");

    let descriptors = resolve_all(tokens, &vendor_root);
    let options = SyncOptions {
        update: config.update,
    };

    let result = sync_dependencies(&descriptors, &vendor_root, adapter, options, &mut *reporter);
    let code = match result {
        Ok(result) => {
            log_write(reporter.report_summary(result.counts()));
            exit_status(&result, config.strict)
        }
        Err(aborted) => {
            log_write(reporter.report_fatal(&aborted.to_string()));
            EXIT_FAILURE
        }
    };

    log_write(reporter.finish());
    code
}

fn log_write(result: io::Result<()>) {
    if let Err(e) = result {
        debug!(error = %e, "failed to write report");
    }
}

/// Per-dependency failures only affect the exit status in strict mode.
pub fn exit_status(result: &SyncResult, strict: bool) -> u8 {
    if strict && result.has_failures() {
        EXIT_FAILURE
    } else {
        EXIT_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::mock::MockVcs;
    use std::fs;
    use std::path::Path;

    struct Run {
        code: u8,
        out: String,
        err: String,
    }

    fn get(tokens: &[&str], config: &GetConfig, cwd: &Path, vcs: &MockVcs) -> Run {
        colored::control::set_override(false);
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        let mut reporter = Reporter::new(Vec::new(), Vec::new(), config.verbose);
        let code = run_get(&tokens, config, Ok(cwd.to_path_buf()), vcs, &mut reporter);
        let (out, err) = reporter.into_writers();
        Run {
            code,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn verbose() -> GetConfig {
        GetConfig {
            verbose: true,
            ..GetConfig::default()
        }
    }

    #[test]
    fn test_first_run_fetches_into_default_vendor_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let vcs = MockVcs::new();

        let run = get(&["example.com/lib"], &verbose(), tmp.path(), &vcs);

        assert_eq!(run.code, EXIT_OK);
        assert!(tmp.path().join("vendor/example.com/lib").is_dir());
        assert_eq!(
            run.out,
            "example.com/lib fetched successfully.\n\nDone. 1 dependencie(s) created, 0 dependencie(s) updated.\n"
        );
        assert!(run.err.is_empty());
    }

    #[test]
    fn test_rerun_without_update_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let vcs = MockVcs::new();

        get(&["example.com/lib"], &verbose(), tmp.path(), &vcs);
        let run = get(&["example.com/lib"], &verbose(), tmp.path(), &vcs);

        assert_eq!(run.code, EXIT_OK);
        assert!(run.out.starts_with("example.com/lib already present, run with -u to update\n"));
        assert!(run.out.contains("Done. 0 dependencie(s) created, 0 dependencie(s) updated."));
        assert_eq!(vcs.fetch_count(), 1);
    }

    #[test]
    fn test_rerun_with_update_pulls() {
        let tmp = tempfile::tempdir().unwrap();
        let vcs = MockVcs::new();
        let config = GetConfig {
            update: true,
            ..verbose()
        };

        get(&["example.com/lib"], &config, tmp.path(), &vcs);
        let run = get(&["example.com/lib"], &config, tmp.path(), &vcs);

        assert!(run.out.starts_with("example.com/lib updated successfully\n"));
        assert!(run.out.contains("Done. 0 dependencie(s) created, 1 dependencie(s) updated."));
        assert_eq!(vcs.fetch_count(), 1);
        assert_eq!(vcs.update_count(), 1);
    }

    #[test]
    fn test_no_tokens_is_an_argument_error() {
        let tmp = tempfile::tempdir().unwrap();
        let vcs = MockVcs::new();

        let run = get(&[], &verbose(), tmp.path(), &vcs);

        assert_eq!(run.code, EXIT_FAILURE);
        assert!(run.err.starts_with("At least one dependency is required."));
        assert!(vcs.calls().is_empty());
        assert!(!tmp.path().join("vendor").exists());
    }

    #[test]
    fn test_unresolvable_cwd_fails() {
        let vcs = MockVcs::new();
        let mut reporter = Reporter::new(Vec::new(), Vec::new(), false);
        let cwd = Err(io::Error::new(io::ErrorKind::NotFound, "cwd removed"));

        let code = run_get(
            &["example.com/lib".to_string()],
            &GetConfig::default(),
            cwd,
            &vcs,
            &mut reporter,
        );

        assert_eq!(code, EXIT_FAILURE);
        let (_, err) = reporter.into_writers();
        assert!(String::from_utf8(err).unwrap().contains("Can't get path: cwd removed"));
        assert!(vcs.calls().is_empty());
    }

    #[test]
    fn test_uncreatable_vendor_root_fails_before_any_dependency() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("read-only"), "").unwrap();
        let config = GetConfig {
            output_path: PathBuf::from("read-only/vendor"),
            ..verbose()
        };
        let vcs = MockVcs::new();

        let run = get(&["example.com/lib"], &config, tmp.path(), &vcs);

        assert_eq!(run.code, EXIT_FAILURE);
        assert!(run.err.starts_with("Can't create path "), "{}", run.err);
        assert!(run.out.is_empty());
        assert!(vcs.calls().is_empty());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_write_errors_do_not_change_exit_status() {
        let tmp = tempfile::tempdir().unwrap();
        let vcs = MockVcs::new();
        let mut reporter = Reporter::new(ClosedPipe, ClosedPipe, true);

        let code = run_get(
            &["example.com/lib".to_string()],
            &verbose(),
            Ok(tmp.path().to_path_buf()),
            &vcs,
            &mut reporter,
        );
        assert_eq!(code, EXIT_OK);
        assert_eq!(vcs.fetch_count(), 1);

        let code = run_get(&[], &verbose(), Ok(tmp.path().to_path_buf()), &vcs, &mut reporter);
        assert_eq!(code, EXIT_FAILURE);
    }

    #[test]
    fn test_failures_exit_zero_unless_strict() {
        let tmp = tempfile::tempdir().unwrap();
        let vcs = MockVcs::new().failing_fetch("https://a.com/broken");

        let run = get(&["a.com/broken", "b.com/ok"], &GetConfig::default(), tmp.path(), &vcs);
        assert_eq!(run.code, EXIT_OK);
        assert_eq!(run.err, "[a.com/broken] Can't fetch repo: authentication required\n");
        assert!(run.out.is_empty());

        let strict = GetConfig {
            strict: true,
            ..GetConfig::default()
        };
        let vcs = MockVcs::new().failing_fetch("https://c.com/broken");
        let run = get(&["c.com/broken"], &strict, tmp.path(), &vcs);
        assert_eq!(run.code, EXIT_FAILURE);
    }
}
