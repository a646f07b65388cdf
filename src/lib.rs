// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # sheet-stager
//!
//! Batch ETL that stages spreadsheets from a Google Drive folder into
//! DuckDB / MotherDuck tables.
//!
//! For every `.xlsx` file in the folder the first worksheet is read, its
//! headers are normalized into `[a-z0-9_]` identifiers, and the rows replace
//! the contents of a table named `stg_<file name>`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheet_stager::config::Settings;
//! use sheet_stager::cli::Runner;
//! use sheet_stager::engine::{EtlEngine, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> sheet_stager::Result<()> {
//!     let settings = Settings::from_env("config.json".as_ref())?;
//!     let engine = EtlEngine::new(
//!         Runner::build_source(&settings)?,
//!         Runner::build_loader(&settings),
//!         RunConfig::from_settings(&settings),
//!     );
//!
//!     let report = engine.run().await;
//!     println!("{} loaded, {} skipped", report.loaded(), report.skipped());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌────────────┐
//! │  drive   │──▶│  sheet   │──▶│ normalize │──▶│   loader   │
//! │ list +   │   │ first    │   │ headers + │   │ drop/create│
//! │ download │   │ worksheet│   │ types     │   │ /insert    │
//! └──────────┘   └──────────┘   └───────────┘   └─────┬──────┘
//!      │                                              │
//! ┌────┴─────┐                                  ┌─────┴──────┐
//! │ auth+http│                                  │  database  │
//! └──────────┘                                  │  (DuckDB)  │
//!                                               └────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common policy enums
pub mod types;

/// Settings resolved from environment and config file
pub mod config;

/// Google service account and bearer authentication
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Folder listing and download (Drive, local directory)
pub mod drive;

/// First-sheet xlsx reader
pub mod sheet;

/// Column and table name normalization
pub mod normalize;

/// Destination sessions via DuckDB
pub mod database;

/// Drop/create/insert replace-loader
pub mod loader;

/// Per-file pipeline
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::Settings;
pub use engine::{EtlEngine, RunConfig, RunReport};
pub use normalize::{normalize_identifier, normalize_table, target_table_name};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
