//! Identifier and table name normalization

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Runs of characters that are not ASCII word characters
static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Normalize a column header into a lowercase identifier
///
/// `"Revenue (USD)'s Total "` becomes `revenue_usd_s_total`.
pub fn normalize_identifier(raw: &str) -> String {
    let without_quotes = raw.trim().replace('\'', "");
    NON_WORD_RUN
        .replace_all(&without_quotes, "_")
        .to_ascii_lowercase()
}

/// Destination table name derived from a file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetTableName(String);

impl TargetTableName {
    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetTableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the staging table name for a file
///
/// Strips `suffix` from the end of the name, trims, lowercases and collapses
/// non-word runs, then prepends `prefix`. `"Q1 Report.xlsx"` with the
/// defaults becomes `stg_q1_report`.
pub fn target_table_name(file_name: &str, suffix: &str, prefix: &str) -> TargetTableName {
    let stem = file_name.strip_suffix(suffix).unwrap_or(file_name).trim();
    let lowered = stem.to_ascii_lowercase();
    let collapsed = NON_WORD_RUN.replace_all(&lowered, "_");
    TargetTableName(format!("{prefix}{collapsed}"))
}
