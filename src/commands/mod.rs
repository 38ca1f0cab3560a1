//! CLI command handlers
//!
//! Handlers are kept out of main.rs so they can be driven from tests with
//! in-memory writers and a mock VCS adapter.

pub mod get;
