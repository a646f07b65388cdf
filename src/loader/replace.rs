//! Drop/create/insert replace-load

use super::types::LoadReport;
use crate::database::{quote_ident, quote_literal, Destination, Session};
use crate::error::{Error, Result};
use crate::normalize::{NormalizedTable, TargetTableName};
use crate::types::LoadStrategy;
use std::sync::Arc;
use tracing::{debug, warn};

/// Session-local name the normalized table is registered under
const SOURCE_TABLE: &str = "sheet_stager_source";

/// Column added by `combine` naming the stage a row came from
pub const ORIGIN_COLUMN: &str = "origin_file";

/// Replaces destination tables one at a time
#[derive(Clone)]
pub struct ReplaceLoader {
    destination: Arc<dyn Destination>,
    strategy: LoadStrategy,
}

impl ReplaceLoader {
    /// Create a loader over a destination
    pub fn new(destination: Arc<dyn Destination>, strategy: LoadStrategy) -> Self {
        Self {
            destination,
            strategy,
        }
    }

    /// The configured strategy
    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Replace table `name` with the rows of `table`
    pub fn replace_load(
        &self,
        table: &NormalizedTable,
        name: &TargetTableName,
    ) -> Result<LoadReport> {
        let target = quote_ident(name.as_str());
        let source = format!("temp.main.{}", quote_ident(SOURCE_TABLE));

        let rows = self
            .open_session()
            .and_then(|mut session| {
                session.register(SOURCE_TABLE, table)?;
                self.run(
                    session.as_mut(),
                    &[
                        format!("DROP TABLE IF EXISTS {target}"),
                        format!("CREATE TABLE {target} AS SELECT * FROM {source} LIMIT 0"),
                        format!("INSERT INTO {target} SELECT * FROM {source}"),
                    ],
                )?;
                session.query_count(&format!("SELECT count(*) FROM {target}"))
            })
            .map_err(|e| Error::load(name.as_str(), e.to_string()))?;

        Ok(LoadReport {
            table: name.to_string(),
            rows,
            columns: table.columns.len(),
        })
    }

    /// Replace `target` with the union of stage tables
    ///
    /// Each entry of `sources` is `(table, label)`; every row gets the label
    /// in an `origin_file` column. Columns are matched by name.
    pub fn combine(&self, target: &str, sources: &[(String, String)]) -> Result<LoadReport> {
        if sources.is_empty() {
            return Err(Error::load(target, "no source tables given"));
        }

        let union = sources
            .iter()
            .map(|(table, label)| {
                format!(
                    "SELECT *, {} AS {} FROM {}",
                    quote_literal(label),
                    quote_ident(ORIGIN_COLUMN),
                    quote_ident(table)
                )
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL BY NAME ");
        let quoted = quote_ident(target);

        let (rows, columns) = self
            .open_session()
            .and_then(|mut session| {
                self.run(
                    session.as_mut(),
                    &[
                        format!("DROP TABLE IF EXISTS {quoted}"),
                        format!("CREATE TABLE {quoted} AS {union}"),
                    ],
                )?;
                let rows = session.query_count(&format!("SELECT count(*) FROM {quoted}"))?;
                let columns = session.query_count(&format!(
                    "SELECT count(*) FROM information_schema.columns WHERE table_name = {}",
                    quote_literal(target)
                ))?;
                Ok((rows, columns as usize))
            })
            .map_err(|e| Error::load(target, e.to_string()))?;

        Ok(LoadReport {
            table: target.to_string(),
            rows,
            columns,
        })
    }

    /// Verify the destination accepts connections and queries
    pub fn check(&self) -> Result<()> {
        let mut session = self.open_session()?;
        session.query_count("SELECT 1")?;
        Ok(())
    }

    /// Describe the destination for logs
    pub fn describe(&self) -> String {
        self.destination.describe()
    }

    fn open_session(&self) -> Result<Box<dyn Session>> {
        self.destination.open()
    }

    /// Run statements in order under the configured strategy
    fn run(&self, session: &mut dyn Session, statements: &[String]) -> Result<()> {
        match self.strategy {
            LoadStrategy::Replace => {
                for sql in statements {
                    session.execute(sql)?;
                }
                Ok(())
            }
            LoadStrategy::Transactional => {
                session.execute("BEGIN TRANSACTION")?;
                for sql in statements {
                    if let Err(err) = session.execute(sql) {
                        debug!("Rolling back after failed statement: {}", sql);
                        if let Err(rollback) = session.execute("ROLLBACK") {
                            warn!("Rollback failed: {}", rollback);
                        }
                        return Err(err);
                    }
                }
                session.execute("COMMIT")
            }
        }
    }
}

impl std::fmt::Debug for ReplaceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaceLoader")
            .field("destination", &self.destination.describe())
            .field("strategy", &self.strategy)
            .finish()
    }
}
