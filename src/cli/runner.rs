//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::database::DuckDbDestination;
use crate::drive::{DriveClient, FileSource, LocalFolder};
use crate::engine::{EtlEngine, RunConfig};
use crate::error::{Error, Result};
use crate::loader::ReplaceLoader;
use crate::types::SourceKind;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    ///
    /// Only configuration problems and failed `list`, `check` or `combine`
    /// commands are errors. A run that skipped files still succeeds.
    pub async fn run(&self) -> Result<()> {
        let settings = Settings::from_env(&self.cli.config)?;

        match self.cli.command() {
            Commands::Run => self.run_etl(&settings).await,
            Commands::List => self.list(&settings).await,
            Commands::Check => self.check(&settings).await,
            Commands::Combine { target, sources } => {
                self.combine(&settings, target, sources).await
            }
        }
    }

    /// Build the file source for the configured folder
    pub fn build_source(settings: &Settings) -> Result<Arc<dyn FileSource>> {
        Ok(match settings.source {
            SourceKind::Local => Arc::new(LocalFolder::new()),
            SourceKind::Drive => Arc::new(DriveClient::from_settings(settings)?),
        })
    }

    /// Build the replace-loader for the configured destination
    pub fn build_loader(settings: &Settings) -> ReplaceLoader {
        ReplaceLoader::new(
            Arc::new(DuckDbDestination::new(settings.destination.clone())),
            settings.load_strategy,
        )
    }

    fn build_engine(settings: &Settings) -> Result<EtlEngine> {
        Ok(EtlEngine::new(
            Self::build_source(settings)?,
            Self::build_loader(settings),
            RunConfig::from_settings(settings),
        ))
    }

    async fn run_etl(&self, settings: &Settings) -> Result<()> {
        let engine = Self::build_engine(settings)?;
        let report = engine.run().await;

        self.output_message(&json!({
            "type": "REPORT",
            "report": report
        }));

        Ok(())
    }

    async fn list(&self, settings: &Settings) -> Result<()> {
        let engine = Self::build_engine(settings)?;
        let (listed, candidates) = engine.list_candidates().await?;

        let files: Vec<Value> = candidates
            .iter()
            .map(|f| {
                json!({
                    "id": f.id,
                    "name": f.name,
                    "table": engine.table_name_for(&f.name).as_str()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "FILES",
            "folder": settings.folder_id,
            "listed": listed,
            "files": files
        }));

        Ok(())
    }

    async fn check(&self, settings: &Settings) -> Result<()> {
        let loader = Self::build_loader(settings);
        info!("Checking connection to {}", loader.describe());

        let checked = loader.clone();
        let result = tokio::task::spawn_blocking(move || checked.check())
            .await
            .map_err(|e| Error::Other(format!("check task failed: {e}")))?;

        match result {
            Ok(()) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "destination": loader.describe()
                    }
                }));
                Ok(())
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "destination": loader.describe(),
                        "message": e.to_string()
                    }
                }));
                Err(e)
            }
        }
    }

    async fn combine(
        &self,
        settings: &Settings,
        target: &str,
        sources: &[(String, String)],
    ) -> Result<()> {
        let loader = Self::build_loader(settings);
        info!("Combining {} table(s) into {}", sources.len(), target);

        let target_name = target.to_string();
        let source_tables = sources.to_vec();
        let report =
            tokio::task::spawn_blocking(move || loader.combine(&target_name, &source_tables))
                .await
                .map_err(|e| Error::load(target, format!("combine task failed: {e}")))??;

        info!("Loaded {} rows into {}", report.rows, report.table);
        self.output_message(&json!({
            "type": "LOAD",
            "load": report
        }));

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
