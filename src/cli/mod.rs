//! CLI module
//!
//! Command-line interface for the staging ETL.
//!
//! # Commands
//!
//! - `run` - Load every spreadsheet in the folder (default)
//! - `list` - Show candidate files and their table names
//! - `check` - Test the destination connection
//! - `combine` - Union stage tables with an `origin_file` column

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
