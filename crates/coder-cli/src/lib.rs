//! Coder CLI
//!
//! Command line definition, TOML job files and report output for the
//! `coder` binary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cli;
mod config;
mod report;

// Re-exports
pub use cli::{build_cli, job_from_args, value_from_args};
pub use config::{ConfigError, JobFile, JobSpec, PathSpec, SegmentSpec, ValueError, ValueSpec};
pub use report::{render_json, render_text};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
