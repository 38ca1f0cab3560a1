//! # scl - SCL source code tool
//!
//! This crate holds the dependency side of the `scl` command-line tool: the
//! `scl get` command that clones library dependencies from version control
//! into a vendor directory, or updates the ones already there.
//!
//! ## Quick Start
//!
//! ```bash
//! # Clone into ./vendor/github.com/org/lib
//! scl get -v github.com/org/lib
//!
//! # Pull existing checkouts instead of skipping them
//! scl get -u -o third_party github.com/org/lib
//! ```
//!
//! ## Module Organization
//!
//! - [`deps`] - Descriptor resolution, the sync engine and reporting
//! - [`vcs`] - Version-control adapter and backends (git, hg, svn, bzr)
//! - [`config`] - Run configuration assembled by the CLI
//! - [`commands`] - CLI command handlers

/// CLI command handlers extracted from main.
pub mod commands;

/// Run configuration for `scl get`.
pub mod config;

/// Dependency resolution, synchronization and reporting.
pub mod deps;

/// Error types.
pub mod error;

/// Tracing subscriber setup.
pub mod logging;

/// Version-control adapter and backends.
pub mod vcs;
