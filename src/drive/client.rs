//! Google Drive v3 file source

use super::types::{FileSource, SourceFile};
use crate::auth::{AuthConfig, ServiceAccountKey};
use crate::config::{Credentials, Settings, DRIVE_READONLY_SCOPE};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, RequestConfig};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One page of a `files.list` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<SourceFile>,
}

/// Drive v3 REST client
#[derive(Debug)]
pub struct DriveClient {
    http: HttpClient,
    api_url: String,
    page_size: u32,
}

impl DriveClient {
    /// Create a client over an existing HTTP client
    pub fn new(http: HttpClient, api_url: impl Into<String>, page_size: u32) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            page_size,
        }
    }

    /// Build the client from resolved settings
    ///
    /// Reads the service account key up front, so a missing or malformed key
    /// is a configuration error rather than a listing failure.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        url::Url::parse(&settings.drive.api_url)?;

        let auth = match &settings.credentials {
            Credentials::AccessToken(token) => AuthConfig::Bearer {
                token: token.clone(),
            },
            Credentials::ServiceAccount {
                key_file,
                token_url,
            } => {
                let key = ServiceAccountKey::from_file(key_file)?;
                let mut auth =
                    AuthConfig::service_account(key, vec![DRIVE_READONLY_SCOPE.to_string()]);
                if let AuthConfig::ServiceAccount { token_url: url, .. } = &mut auth {
                    url.clone_from(token_url);
                }
                auth
            }
        };

        let defaults = HttpClientConfig::default();
        let http_config = HttpClientConfig::builder()
            .timeout(Duration::from_secs(settings.http.timeout_seconds))
            .max_retries(settings.http.max_retries)
            .backoff(
                settings.http.backoff,
                defaults.initial_backoff,
                defaults.max_backoff,
            )
            .rate_limit(RateLimiterConfig::new(
                settings.http.requests_per_second,
                settings.http.requests_per_second,
            ))
            .build();

        let http = HttpClient::with_auth(http_config, auth)?;
        Ok(Self::new(
            http,
            settings.drive.api_url.clone(),
            settings.drive.page_size,
        ))
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.api_url)
    }

    async fn list_pages(&self, folder_id: &str) -> Result<Vec<SourceFile>> {
        let query = format!(
            "'{}' in parents and trashed = false",
            folder_id.replace('\'', "\\'")
        );
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = RequestConfig::new()
                .query("q", &query)
                .query("fields", "nextPageToken, files(id, name)")
                .query("pageSize", self.page_size.to_string())
                .query("supportsAllDrives", "true")
                .query("includeItemsFromAllDrives", "true");
            if let Some(token) = &page_token {
                request = request.query("pageToken", token);
            }

            let page: FileListPage = self
                .http
                .get_json_with_config(&self.files_url(), request)
                .await?;

            debug!("Listed {} files from folder {}", page.files.len(), folder_id);
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl FileSource for DriveClient {
    async fn list_files(&self, folder_id: &str) -> Result<Vec<SourceFile>> {
        self.list_pages(folder_id)
            .await
            .map_err(|e| Error::list(folder_id, e.to_string()))
    }

    async fn download(&self, file: &SourceFile) -> Result<Bytes> {
        let url = format!("{}/{}", self.files_url(), file.id);
        let request = RequestConfig::new()
            .query("alt", "media")
            .query("supportsAllDrives", "true");

        self.http
            .get_bytes(&url, request)
            .await
            .map_err(|e| Error::download(&file.name, e.to_string()))
    }
}
