//! Local directory file source

use super::types::{FileSource, SourceFile};
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

/// Reads files from a directory on disk
///
/// Folder ids are plain paths or `file://` URLs. File ids are full paths.
#[derive(Debug, Clone, Default)]
pub struct LocalFolder;

impl LocalFolder {
    /// Create a local folder source
    pub fn new() -> Self {
        Self
    }

    /// Resolve a folder id to a directory path
    pub fn folder_path(folder_id: &str) -> PathBuf {
        PathBuf::from(folder_id.strip_prefix("file://").unwrap_or(folder_id))
    }
}

#[async_trait]
impl FileSource for LocalFolder {
    async fn list_files(&self, folder_id: &str) -> Result<Vec<SourceFile>> {
        let dir = Self::folder_path(folder_id);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Error::list(folder_id, e.to_string()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::list(folder_id, e.to_string()))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            files.push(SourceFile::new(
                entry.path().to_string_lossy(),
                entry.file_name().to_string_lossy(),
            ));
        }

        // read_dir order is platform dependent
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn download(&self, file: &SourceFile) -> Result<Bytes> {
        tokio::fs::read(&file.id)
            .await
            .map(Bytes::from)
            .map_err(|e| Error::download(&file.name, e.to_string()))
    }
}
