//! Run configuration
//!
//! Settings are resolved once at start-up from the process environment first
//! and a local configuration file second, then passed by reference to the
//! components that need them. Nothing below this module reads the
//! environment.

use crate::error::{Error, Result};
use crate::types::{BackoffType, CollisionPolicy, LoadStrategy, OptionStringExt, SourceKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up when no `--config` flag is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Service account key looked up when nothing else is configured
pub const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "service_account.json";

/// Google APIs root
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com";

/// Read-only Drive scope requested for service account tokens
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

// Environment variable names, in lookup order per setting
const ENV_FOLDER_ID: &[&str] = &["SHARED_FOLDER_ID", "shared_folder_id"];
const ENV_DSN: &[&str] = &["MOTHERDUCK_DSN", "motherduck_dsn"];
const ENV_SERVICE_ACCOUNT: &[&str] = &["GOOGLE_APPLICATION_CREDENTIALS", "SERVICE_ACCOUNT_FILE"];
const ENV_ACCESS_TOKEN: &[&str] = &["GOOGLE_ACCESS_TOKEN"];
const ENV_SOURCE: &[&str] = &["SHEET_STAGER_SOURCE"];
const ENV_LOAD_STRATEGY: &[&str] = &["SHEET_STAGER_LOAD_STRATEGY"];
const ENV_COLLISIONS: &[&str] = &["SHEET_STAGER_COLUMN_COLLISIONS"];
const ENV_DOWNLOAD_DIR: &[&str] = &["SHEET_STAGER_DOWNLOAD_DIR"];

// ============================================================================
// Config File
// ============================================================================

/// Contents of the local configuration file (JSON or YAML)
///
/// Every field is optional; anything missing falls back to a default or,
/// for required values, to a configuration error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Drive folder to read spreadsheets from
    #[serde(default, alias = "SHARED_FOLDER_ID")]
    pub shared_folder_id: Option<String>,

    /// DuckDB / MotherDuck connection string
    #[serde(default, alias = "MOTHERDUCK_DSN")]
    pub motherduck_dsn: Option<String>,

    /// Path to the service account key (JSON)
    #[serde(default)]
    pub service_account_file: Option<PathBuf>,

    /// Pre-issued OAuth access token (skips the service account exchange)
    #[serde(default)]
    pub access_token: Option<String>,

    /// File source kind
    #[serde(default)]
    pub source: Option<SourceKind>,

    /// Drive API root URL
    #[serde(default)]
    pub drive_api_url: Option<String>,

    /// OAuth token endpoint override
    #[serde(default)]
    pub token_url: Option<String>,

    /// Suffix that marks a file as a spreadsheet to stage
    #[serde(default)]
    pub spreadsheet_suffix: Option<String>,

    /// Prefix for destination table names
    #[serde(default)]
    pub table_prefix: Option<String>,

    /// Column collision policy
    #[serde(default)]
    pub column_collisions: Option<CollisionPolicy>,

    /// Replace-load strategy
    #[serde(default)]
    pub load_strategy: Option<LoadStrategy>,

    /// Directory to keep a copy of every downloaded file in
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpFileConfig,

    /// Drive listing settings
    #[serde(default)]
    pub drive: DriveFileConfig,
}

/// `http` section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpFileConfig {
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub requests_per_second: Option<u32>,
    /// Delay growth between retries
    #[serde(default)]
    pub backoff: Option<BackoffType>,
}

/// `drive` section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveFileConfig {
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl ConfigFile {
    /// Load a config file, treating a missing file as empty
    ///
    /// `.yaml` / `.yml` files are parsed as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(
                "Config file {} not found, using environment only",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file '{}': {e}", path.display()))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
            });

        if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                Error::config(format!("Error decoding YAML from '{}': {e}", path.display()))
            })
        } else {
            serde_json::from_str(&content).map_err(|e| {
                Error::config(format!("Error decoding JSON from '{}': {e}", path.display()))
            })
        }
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// How Drive requests are authenticated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Service account key exchanged for an access token
    ServiceAccount {
        /// Path to the key file
        key_file: PathBuf,
        /// Token endpoint override (otherwise the key's `token_uri`)
        token_url: Option<String>,
    },
    /// Static bearer token
    AccessToken(String),
}

/// Drive API settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveSettings {
    /// API root, e.g. `https://www.googleapis.com`
    pub api_url: String,
    /// Files requested per listing page
    pub page_size: u32,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_seconds: u64,
    /// Zero means every request is tried exactly once
    pub max_retries: u32,
    pub requests_per_second: u32,
    pub backoff: BackoffType,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            max_retries: 0,
            requests_per_second: 10,
            backoff: BackoffType::Exponential,
        }
    }
}

/// File selection and naming settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingSettings {
    pub spreadsheet_suffix: String,
    pub table_prefix: String,
    pub collisions: CollisionPolicy,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            spreadsheet_suffix: ".xlsx".to_string(),
            table_prefix: "stg_".to_string(),
            collisions: CollisionPolicy::default(),
        }
    }
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Folder to list (Drive folder id or local directory)
    pub folder_id: String,
    /// Destination connection string
    pub destination: String,
    /// File source kind
    pub source: SourceKind,
    /// Drive credentials
    pub credentials: Credentials,
    /// Drive API settings
    pub drive: DriveSettings,
    /// HTTP client settings
    pub http: HttpSettings,
    /// File filter and table naming
    pub naming: NamingSettings,
    /// Replace-load strategy
    pub load_strategy: LoadStrategy,
    /// Optional directory for downloaded copies
    pub download_dir: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from the process environment and a config file
    pub fn from_env(config_path: &Path) -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), config_path)
    }

    /// Resolve settings from an environment lookup and a config file
    ///
    /// Environment values win over file values. A required value missing
    /// from both is a fatal configuration error.
    pub fn resolve<F>(env: F, config_path: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = ConfigFile::load(config_path)?;
        let lookup = |keys: &[&str]| {
            keys.iter()
                .copied()
                .find_map(|key| env(key).none_if_empty())
        };

        let folder_id = lookup(ENV_FOLDER_ID)
            .or_else(|| file.shared_folder_id.clone().none_if_empty())
            .ok_or_else(|| Error::missing_field("shared_folder_id (env SHARED_FOLDER_ID)"))?;

        let destination = lookup(ENV_DSN)
            .or_else(|| file.motherduck_dsn.clone().none_if_empty())
            .ok_or_else(|| Error::missing_field("motherduck_dsn (env MOTHERDUCK_DSN)"))?;

        let source = match lookup(ENV_SOURCE) {
            Some(value) => value.parse()?,
            None => file.source.unwrap_or_else(|| {
                if folder_id.starts_with("file://") {
                    SourceKind::Local
                } else {
                    SourceKind::Drive
                }
            }),
        };

        let access_token =
            lookup(ENV_ACCESS_TOKEN).or_else(|| file.access_token.clone().none_if_empty());
        let credentials = match access_token {
            Some(token) => Credentials::AccessToken(token),
            None => Credentials::ServiceAccount {
                key_file: lookup(ENV_SERVICE_ACCOUNT)
                    .map(PathBuf::from)
                    .or_else(|| file.service_account_file.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_FILE)),
                token_url: file.token_url.clone().none_if_empty(),
            },
        };

        let load_strategy = match lookup(ENV_LOAD_STRATEGY) {
            Some(value) => value.parse()?,
            None => file.load_strategy.unwrap_or_default(),
        };

        let collisions = match lookup(ENV_COLLISIONS) {
            Some(value) => value.parse()?,
            None => file.column_collisions.unwrap_or_default(),
        };

        let defaults = NamingSettings::default();
        let spreadsheet_suffix = file
            .spreadsheet_suffix
            .clone()
            .none_if_empty()
            .unwrap_or(defaults.spreadsheet_suffix);
        if !spreadsheet_suffix.starts_with('.') {
            return Err(Error::invalid_value(
                "spreadsheet_suffix",
                format!("'{spreadsheet_suffix}' must start with '.'"),
            ));
        }

        let http_defaults = HttpSettings::default();
        let http = HttpSettings {
            timeout_seconds: file
                .http
                .timeout_seconds
                .unwrap_or(http_defaults.timeout_seconds),
            max_retries: file.http.max_retries.unwrap_or(http_defaults.max_retries),
            requests_per_second: file
                .http
                .requests_per_second
                .unwrap_or(http_defaults.requests_per_second),
            backoff: file.http.backoff.unwrap_or(http_defaults.backoff),
        };
        if http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be greater than zero",
            ));
        }

        let page_size = file.drive.page_size.unwrap_or(100);
        if !(1..=1000).contains(&page_size) {
            return Err(Error::invalid_value(
                "drive.page_size",
                format!("{page_size} is outside 1..=1000"),
            ));
        }

        Ok(Self {
            folder_id,
            destination,
            source,
            credentials,
            drive: DriveSettings {
                api_url: file
                    .drive_api_url
                    .clone()
                    .none_if_empty()
                    .unwrap_or_else(|| DEFAULT_DRIVE_API_URL.to_string()),
                page_size,
            },
            http,
            naming: NamingSettings {
                spreadsheet_suffix,
                table_prefix: file.table_prefix.clone().unwrap_or(defaults.table_prefix),
                collisions,
            },
            load_strategy,
            download_dir: lookup(ENV_DOWNLOAD_DIR)
                .map(PathBuf::from)
                .or_else(|| file.download_dir.clone()),
        })
    }
}
