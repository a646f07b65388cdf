//! Common types used throughout sheet-stager
//!
//! This module contains the small policy enums that are chosen in
//! configuration and consumed by several modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Column Collision Policy
// ============================================================================

/// What to do when two source columns normalize to the same identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep the duplicate identifiers as they are
    Preserve,
    /// Append `_1`, `_2`, ... to later occurrences
    #[default]
    Suffix,
    /// Reject the file
    Fail,
}

// ============================================================================
// Load Strategy
// ============================================================================

/// How the drop/create/insert sequence is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Each statement auto-commits on its own
    Replace,
    /// All three statements run inside one transaction
    #[default]
    Transactional,
}

// ============================================================================
// Source Kind
// ============================================================================

/// Where spreadsheet files are listed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Google Drive folder
    #[default]
    Drive,
    /// Directory on the local filesystem
    Local,
}

macro_rules! impl_from_str {
    ($ty:ty, $field:literal, { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(crate::error::Error::invalid_value(
                        $field,
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

impl_from_str!(CollisionPolicy, "column_collisions", {
    "preserve" => CollisionPolicy::Preserve,
    "suffix" => CollisionPolicy::Suffix,
    "fail" => CollisionPolicy::Fail,
});

impl_from_str!(LoadStrategy, "load_strategy", {
    "replace" => LoadStrategy::Replace,
    "transactional" => LoadStrategy::Transactional,
});

impl_from_str!(SourceKind, "source", {
    "drive" => SourceKind::Drive,
    "local" => SourceKind::Local,
});

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::Replace => write!(f, "replace"),
            LoadStrategy::Transactional => write!(f, "transactional"),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty or only whitespace
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}
