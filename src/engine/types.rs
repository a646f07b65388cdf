//! Engine types
//!
//! Run configuration and the per-file report produced by a run.

use crate::config::Settings;
use crate::drive::SourceFile;
use crate::loader::LoadReport;
use crate::types::CollisionPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Pipeline step a file failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Download,
    Parse,
    Normalize,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Download => "download",
            Stage::Parse => "parse",
            Stage::Normalize => "normalize",
            Stage::Load => "load",
        };
        f.write_str(name)
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The table was replaced
    Loaded {
        file: SourceFile,
        report: LoadReport,
    },
    /// The file was skipped after a recoverable error
    Skipped {
        file: SourceFile,
        table: String,
        stage: Stage,
        error: String,
    },
}

impl FileOutcome {
    /// The source file this outcome is for
    pub fn file(&self) -> &SourceFile {
        match self {
            FileOutcome::Loaded { file, .. } | FileOutcome::Skipped { file, .. } => file,
        }
    }

    /// Check if the file was loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, FileOutcome::Loaded { .. })
    }
}

/// Summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Files returned by the listing
    pub files_listed: usize,
    /// Listing failure, if the run ended early
    pub list_error: Option<String>,
    /// One entry per candidate file, in processing order
    pub outcomes: Vec<FileOutcome>,
    /// Wall clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Create an empty report
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            files_listed: 0,
            list_error: None,
            outcomes: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Number of files loaded
    pub fn loaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    /// Number of files skipped
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.loaded()
    }

    /// Rows loaded across all tables
    pub fn total_rows(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Loaded { report, .. } => report.rows,
                FileOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// Per-run configuration of the engine
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Folder to list
    pub folder_id: String,
    /// File name suffix that marks a spreadsheet
    pub spreadsheet_suffix: String,
    /// Prefix for destination tables
    pub table_prefix: String,
    /// Header collision policy
    pub collisions: CollisionPolicy,
    /// Directory that receives a copy of each download
    pub download_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Create a config with default naming for a folder
    pub fn new(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            spreadsheet_suffix: ".xlsx".to_string(),
            table_prefix: "stg_".to_string(),
            collisions: CollisionPolicy::default(),
            download_dir: None,
        }
    }

    /// Take folder and naming from resolved settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            folder_id: settings.folder_id.clone(),
            spreadsheet_suffix: settings.naming.spreadsheet_suffix.clone(),
            table_prefix: settings.naming.table_prefix.clone(),
            collisions: settings.naming.collisions,
            download_dir: settings.download_dir.clone(),
        }
    }

    /// Set the collision policy
    #[must_use]
    pub fn with_collisions(mut self, policy: CollisionPolicy) -> Self {
        self.collisions = policy;
        self
    }

    /// Save downloads into a directory
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }
}
