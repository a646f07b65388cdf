//! Execution engine module
//!
//! Runs the per-file pipeline: list, filter, then for each candidate
//! download, read the first sheet, normalize, and replace-load.
//!
//! # Overview
//!
//! The engine module provides:
//! - `EtlEngine` - Orchestrates one run over a folder
//! - `RunConfig` - Folder and naming configuration for a run
//! - `RunReport` / `FileOutcome` - What happened to every file
//!
//! Listing failures end the run with no files processed. Download, parse,
//! normalize and load failures skip that file only.

mod types;

pub use types::{FileOutcome, RunConfig, RunReport, Stage};

use crate::drive::{is_spreadsheet_candidate, save_download, FileSource, SourceFile};
use crate::error::{Error, Result};
use crate::loader::{LoadReport, ReplaceLoader};
use crate::normalize::{normalize_table, target_table_name, TargetTableName};
use crate::sheet::read_first_sheet;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Orchestrates a run over one folder
pub struct EtlEngine {
    /// File listing and download
    source: Arc<dyn FileSource>,
    /// Destination loader
    loader: ReplaceLoader,
    /// Run configuration
    config: RunConfig,
}

impl EtlEngine {
    /// Create a new engine
    pub fn new(source: Arc<dyn FileSource>, loader: ReplaceLoader, config: RunConfig) -> Self {
        Self {
            source,
            loader,
            config,
        }
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Get the loader
    pub fn loader(&self) -> &ReplaceLoader {
        &self.loader
    }

    /// Destination table for a file name under this configuration
    pub fn table_name_for(&self, file_name: &str) -> TargetTableName {
        target_table_name(
            file_name,
            &self.config.spreadsheet_suffix,
            &self.config.table_prefix,
        )
    }

    /// List the folder and keep only spreadsheet candidates
    ///
    /// Returns the number of files listed alongside the candidates.
    pub async fn list_candidates(&self) -> Result<(usize, Vec<SourceFile>)> {
        let files = self.source.list_files(&self.config.folder_id).await?;
        let listed = files.len();

        let candidates = files
            .into_iter()
            .filter(|f| {
                let keep = is_spreadsheet_candidate(&f.name, &self.config.spreadsheet_suffix);
                if !keep {
                    debug!(file = %f.name, "Ignoring non-spreadsheet file");
                }
                keep
            })
            .collect();

        Ok((listed, candidates))
    }

    /// Run the pipeline over every candidate file
    ///
    /// Never fails: listing errors and per-file errors are recorded in the
    /// returned report.
    pub async fn run(&self) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::new(Utc::now());

        info!(
            "Starting ETL run at {} (folder {}, destination {}, strategy {})",
            report.started_at,
            self.config.folder_id,
            self.loader.describe(),
            self.loader.strategy()
        );

        match self.list_candidates().await {
            Ok((listed, candidates)) => {
                report.files_listed = listed;
                info!(
                    "Found {} spreadsheet(s) among {} file(s)",
                    candidates.len(),
                    listed
                );

                for file in candidates {
                    let outcome = self.process_file(file).await;
                    report.outcomes.push(outcome);
                }
            }
            Err(e) => {
                error!("Listing failed, no files processed: {}", e);
                report.list_error = Some(e.to_string());
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "ETL run finished: {} loaded, {} skipped, {} rows in {}ms",
            report.loaded(),
            report.skipped(),
            report.total_rows(),
            report.duration_ms
        );

        report
    }

    /// Process one file and record the outcome
    pub async fn process_file(&self, file: SourceFile) -> FileOutcome {
        let table = self.table_name_for(&file.name);
        info!(file = %file.name, file_id = %file.id, table = %table, "Processing file");

        match self.load_file(&file, &table).await {
            Ok(report) => {
                info!(
                    file = %file.name,
                    table = %table,
                    rows = report.rows,
                    "Loaded {} rows into {}",
                    report.rows,
                    table
                );
                FileOutcome::Loaded { file, report }
            }
            Err((stage, e)) => {
                warn!(
                    file = %file.name,
                    file_id = %file.id,
                    table = %table,
                    stage = %stage,
                    "Skipping file: {}",
                    e
                );
                FileOutcome::Skipped {
                    file,
                    table: table.to_string(),
                    stage,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn load_file(
        &self,
        file: &SourceFile,
        table: &TargetTableName,
    ) -> std::result::Result<LoadReport, (Stage, Error)> {
        let bytes = self
            .source
            .download(file)
            .await
            .map_err(|e| (Stage::Download, e))?;
        debug!(file = %file.name, "Downloaded {} bytes", bytes.len());

        if let Some(dir) = &self.config.download_dir {
            let path = save_download(dir, file, &bytes)
                .await
                .map_err(|e| (Stage::Download, e))?;
            debug!(file = %file.name, "Saved copy to {}", path.display());
        }

        let raw = read_first_sheet(&bytes).map_err(|e| (Stage::Parse, e))?;
        let normalized =
            normalize_table(raw, self.config.collisions).map_err(|e| (Stage::Normalize, e))?;

        let loader = self.loader.clone();
        let name = table.clone();
        tokio::task::spawn_blocking(move || loader.replace_load(&normalized, &name))
            .await
            .map_err(|e| (Stage::Load, Error::load(table.as_str(), e.to_string())))?
            .map_err(|e| (Stage::Load, e))
    }
}

impl std::fmt::Debug for EtlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtlEngine")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
