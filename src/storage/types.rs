//! Storage file format
//!
//! Values are arbitrary bytes, kept base64-encoded inside a JSON document.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk representation of a storage instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFile {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Base64-encoded values by key
    #[serde(default)]
    pub items: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

impl StorageFile {
    /// Encode in-memory items
    pub fn encode(items: &BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            version: default_version(),
            items: items
                .iter()
                .map(|(key, value)| (key.clone(), STANDARD.encode(value)))
                .collect(),
        }
    }

    /// Decode into in-memory items
    pub fn decode(self) -> Result<BTreeMap<String, Vec<u8>>> {
        self.items
            .into_iter()
            .map(|(key, value)| {
                STANDARD
                    .decode(value.as_bytes())
                    .map(|bytes| (key.clone(), bytes))
                    .map_err(|e| Error::storage(format!("Invalid value for key '{key}': {e}")))
            })
            .collect()
    }
}
