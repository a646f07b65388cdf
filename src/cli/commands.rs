//! CLI commands and argument parsing

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stage spreadsheets from a Drive folder into DuckDB / MotherDuck
#[derive(Parser, Debug)]
#[command(name = "sheet-stager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or YAML); environment variables take precedence
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output format for reports
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The selected command, `run` when none was given
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List, download, normalize and load every spreadsheet in the folder
    Run,

    /// Show the spreadsheets that would be loaded and their table names
    List,

    /// Test the destination connection
    Check,

    /// Union stage tables into one table with an origin_file column
    Combine {
        /// Table to replace with the union
        #[arg(long)]
        target: String,

        /// Source stage table and its label, as `table=label`
        #[arg(long = "source", value_parser = parse_source, required = true)]
        sources: Vec<(String, String)>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse `table=label`; a bare table name is its own label
fn parse_source(value: &str) -> std::result::Result<(String, String), String> {
    let (table, label) = match value.split_once('=') {
        Some((table, label)) => (table.trim(), label.trim()),
        None => (value.trim(), value.trim()),
    };

    if table.is_empty() {
        return Err(format!("missing table name in '{value}'"));
    }

    Ok((table.to_string(), label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::try_parse_from(["sheet-stager"]).unwrap();
        assert_eq!(cli.command(), &Commands::Run);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sheet-stager", "list", "-C", "stager.yaml", "-v"]).unwrap();
        assert_eq!(cli.command(), &Commands::List);
        assert_eq!(cli.config, PathBuf::from("stager.yaml"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_combine_sources() {
        let cli = Cli::try_parse_from([
            "sheet-stager",
            "combine",
            "--target",
            "movies",
            "--source",
            "stg_best_movies=Best Movies",
            "--source",
            "stg_worst_movies",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            &Commands::Combine {
                target: "movies".to_string(),
                sources: vec![
                    ("stg_best_movies".to_string(), "Best Movies".to_string()),
                    ("stg_worst_movies".to_string(), "stg_worst_movies".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_combine_requires_source() {
        assert!(Cli::try_parse_from(["sheet-stager", "combine", "--target", "movies"]).is_err());
        assert!(Cli::try_parse_from([
            "sheet-stager",
            "combine",
            "--target",
            "movies",
            "--source",
            "=label"
        ])
        .is_err());
    }
}
