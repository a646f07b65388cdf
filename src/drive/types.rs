//! File source types

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file discovered in the source folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Opaque identifier used for download
    pub id: String,
    /// Display name, including the extension
    pub name: String,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Listing and download of the files in a folder
#[async_trait]
pub trait FileSource: Send + Sync {
    /// List the files directly inside `folder_id`, in source order
    async fn list_files(&self, folder_id: &str) -> Result<Vec<SourceFile>>;

    /// Download the full content of a file
    async fn download(&self, file: &SourceFile) -> Result<Bytes>;
}

/// Whether a listed file should be processed
///
/// Keeps names ending with `suffix` and drops editor lock files (any `~`).
pub fn is_spreadsheet_candidate(name: &str, suffix: &str) -> bool {
    name.ends_with(suffix) && !name.contains('~')
}

/// Write a downloaded copy under `dir`, creating the directory if needed
pub async fn save_download(dir: &Path, file: &SourceFile, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        Error::download(
            &file.name,
            format!("cannot create download dir '{}': {e}", dir.display()),
        )
    })?;

    // Only the final path component, so names cannot escape the directory
    let file_name = Path::new(&file.name)
        .file_name()
        .map_or_else(|| file.id.clone().into(), |n| n.to_os_string());
    let path = dir.join(file_name);

    tokio::fs::write(&path, bytes).await.map_err(|e| {
        Error::download(
            &file.name,
            format!("cannot write '{}': {e}", path.display()),
        )
    })?;

    Ok(path)
}
