//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Per-packet report rendering and run statistics

mod args;
mod output;

pub use args::Args;
pub use output::{ReportWriter, RunStats};
