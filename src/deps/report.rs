//! Outcome reporting for `scl get`.
//!
//! Per-dependency lines and the final summary go to the informational stream
//! and only when verbose. Failures always go to the error stream.

use super::descriptor::Descriptor;
use super::sync::{SyncCounts, SyncObserver, SyncOutcome, SyncStatus};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;

pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    verbose: bool,
    spinner: ProgressBar,
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, verbose: bool) -> Self {
        Self {
            out,
            err,
            verbose,
            spinner: ProgressBar::hidden(),
        }
    }

    /// Show a spinner for the dependency in progress. Only takes effect when verbose.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        if enabled && self.verbose {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.blue} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷"),
            );
            self.spinner = pb;
        }
        self
    }

    /// Render the line for one finished dependency.
    pub fn report_outcome(&mut self, outcome: &SyncOutcome) -> io::Result<()> {
        let token = outcome.token.as_str();
        let spinner = self.spinner.clone();

        match outcome.status {
            SyncStatus::Failed => spinner.suspend(|| {
                writeln!(
                    self.err,
                    "{}",
                    format!("[{}] {}", token, outcome.detail).red()
                )
            }),
            _ if !self.verbose => Ok(()),
            SyncStatus::Created => spinner.suspend(|| {
                writeln!(self.out, "{} fetched successfully.", token.bold())
            }),
            SyncStatus::Updated => spinner.suspend(|| {
                writeln!(self.out, "{} updated successfully", token.bold())
            }),
            SyncStatus::Skipped => spinner.suspend(|| {
                writeln!(
                    self.out,
                    "{} already present, run with -u to update",
                    token.bold()
                )
            }),
        }
    }

    /// Final totals line. Verbose only.
    pub fn report_summary(&mut self, counts: SyncCounts) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} {} dependencie(s) created, {} dependencie(s) updated.",
            "Done.".green(),
            counts.created,
            counts.updated
        )
    }

    /// A run-stopping error. Always printed.
    pub fn report_fatal(&mut self, message: &str) -> io::Result<()> {
        self.spinner.finish_and_clear();
        writeln!(self.err, "{}", message.red())
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.spinner.finish_and_clear();
        self.out.flush()?;
        self.err.flush()
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> SyncObserver for Reporter<O, E> {
    fn on_start(&mut self, descriptor: &Descriptor) {
        if self.spinner.is_hidden() {
            return;
        }
        self.spinner
            .set_message(format!("Fetching {}...", descriptor.token()));
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_outcome(&mut self, outcome: &SyncOutcome) {
        if let Err(e) = self.report_outcome(outcome) {
            debug!(error = %e, "failed to write outcome");
        }
    }
}
