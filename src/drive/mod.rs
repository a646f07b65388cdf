//! File source module
//!
//! Lists spreadsheet files in a folder and downloads their contents.
//!
//! # Overview
//!
//! - `FileSource` - the listing/download seam the engine works against
//! - `DriveClient` - Google Drive v3 over the crate's HTTP client
//! - `LocalFolder` - a directory on disk, for `file://` folders and tests
//! - `is_spreadsheet_candidate` - the listing filter applied by the engine

mod client;
mod local;
mod types;

pub use client::DriveClient;
pub use local::LocalFolder;
pub use types::{is_spreadsheet_candidate, save_download, FileSource, SourceFile};

#[cfg(test)]
mod tests;
