//! Feed configuration
//!
//! A feed is described in YAML: where the API lives, how to talk to it, which
//! query parameters carry the paging cursors, and where fetched content is
//! persisted.
//!
//! ```yaml
//! base_url: https://social.example/api/v1
//! http:
//!   timeout_secs: 10
//!   headers:
//!     Authorization: Bearer abc123
//! paging:
//!   limit: 20
//! storage:
//!   path: ~/.cache/feedkit/storage.json
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Feed Config
// ============================================================================

/// Complete feed configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL that endpoint paths are resolved against
    pub base_url: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Cursor parameter names
    #[serde(default)]
    pub paging: PagingConfig,

    /// Content persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl FeedConfig {
    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)?;

        if self.paging.older_param.is_empty() || self.paging.newer_param.is_empty() {
            return Err(Error::config("paging cursor parameter names cannot be empty"));
        }
        if self.paging.older_param == self.paging.newer_param {
            return Err(Error::config(
                "paging.older_param and paging.newer_param must differ",
            ));
        }
        Ok(())
    }

    /// HTTP client settings for this feed
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ============================================================================
// Paging
// ============================================================================

/// Names of the query parameters that carry paging cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size sent with every request, if any
    #[serde(default)]
    pub limit: Option<u32>,

    /// Parameter carrying the page size
    #[serde(default = "default_limit_param")]
    pub limit_param: String,

    /// Parameter bound to the oldest ID to fetch older elements
    #[serde(default = "default_older_param")]
    pub older_param: String,

    /// Parameter bound to the newest ID to fetch newer elements
    #[serde(default = "default_newer_param")]
    pub newer_param: String,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            limit: None,
            limit_param: default_limit_param(),
            older_param: default_older_param(),
            newer_param: default_newer_param(),
        }
    }
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_older_param() -> String {
    "max_id".to_string()
}

fn default_newer_param() -> String {
    "min_id".to_string()
}

// ============================================================================
// Storage
// ============================================================================

/// Where fetched content is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file path
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("feedkit-storage.json")
}
