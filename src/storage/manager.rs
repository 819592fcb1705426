//! Storage implementation
//!
//! Provides file-backed key-value persistence with atomic writes.

use super::types::StorageFile;
use crate::error::{Error, Result};
use crate::paging::{Fetch, PagedContent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Key→bytes store, constructed and passed explicitly by its owner
#[derive(Debug)]
pub struct Storage {
    /// Path to the storage file (empty in memory mode)
    path: PathBuf,
    /// Current items (cached)
    items: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    /// Serializes snapshot, write and rename across clones
    save_lock: Arc<Mutex<()>>,
    /// Whether to save on every mutation
    auto_save: bool,
}

impl Storage {
    /// Create a storage backed by `path`, starting empty
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            items: Arc::new(RwLock::new(BTreeMap::new())),
            save_lock: Arc::new(Mutex::new(())),
            auto_save: true,
        }
    }

    /// Create a file-backed storage that only writes on explicit `save`
    pub fn without_auto_save(path: impl AsRef<Path>) -> Self {
        Self {
            auto_save: false,
            ..Self::new(path)
        }
    }

    /// Create an in-memory storage (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            items: Arc::new(RwLock::new(BTreeMap::new())),
            save_lock: Arc::new(Mutex::new(())),
            auto_save: false,
        }
    }

    /// Open a storage file, loading existing items if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::Storage {
                message: format!("Failed to read storage file: {e}"),
            })?;
            parse_file(&contents)?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), items = items.len(), "Opened storage");
        Ok(Self {
            path,
            items: Arc::new(RwLock::new(items)),
            save_lock: Arc::new(Mutex::new(())),
            auto_save: true,
        })
    }

    /// Reload items from the storage file
    pub async fn load(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to read storage file: {e}"),
            })?;
        let loaded = parse_file(&contents)?;

        let mut items = self.items.write().await;
        *items = loaded;
        Ok(())
    }

    /// Write all items to the storage file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        // Held until the rename so a stale snapshot never lands last
        let _guard = self.save_lock.lock().await;
        let contents = {
            let items = self.items.read().await;
            serde_json::to_string_pretty(&StorageFile::encode(&items)).map_err(|e| {
                Error::Storage {
                    message: format!("Failed to serialize storage: {e}"),
                }
            })?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage {
                    message: format!("Failed to create storage directory: {e}"),
                })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to write storage file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to rename storage file: {e}"),
            })?;

        debug!(path = %self.path.display(), "Saved storage");
        Ok(())
    }

    /// Get the bytes stored under `key`
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let items = self.items.read().await;
        let value = items.get(key).cloned();
        debug!(key, hit = value.is_some(), "Storage lookup");
        value
    }

    /// Store bytes under `key`
    pub async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        {
            let mut items = self.items.write().await;
            items.insert(key.to_string(), value);
        }
        debug!(key, "Storage set");

        if self.auto_save {
            self.save().await?;
        }

        Ok(())
    }

    /// Remove `key`, returning whether it was present
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let removed = {
            let mut items = self.items.write().await;
            items.remove(key).is_some()
        };
        debug!(key, removed, "Storage delete");

        if removed && self.auto_save {
            self.save().await?;
        }

        Ok(removed)
    }

    /// Whether `key` is present
    pub async fn contains(&self, key: &str) -> bool {
        self.items.read().await.contains_key(key)
    }

    /// All keys in sorted order
    pub async fn keys(&self) -> Vec<String> {
        self.items.read().await.keys().cloned().collect()
    }

    /// Remove every item
    pub async fn clear(&self) -> Result<()> {
        {
            let mut items = self.items.write().await;
            items.clear();
        }

        if self.auto_save {
            self.save().await?;
        }

        Ok(())
    }

    /// Decode the JSON value stored under `key`
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| Error::Storage {
                    message: format!("Failed to decode value for key '{key}': {e}"),
                }),
            None => Ok(None),
        }
    }

    /// Store `value` as JSON under `key`
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| Error::Storage {
            message: format!("Failed to encode value for key '{key}': {e}"),
        })?;
        self.set(key, bytes).await
    }

    /// Restore paged content, re-checking its ordering invariants
    pub async fn get_content<F>(&self, key: &str) -> Result<Option<PagedContent<F>>>
    where
        F: Fetch + DeserializeOwned,
        F::Element: DeserializeOwned,
    {
        let content: Option<PagedContent<F>> = self.get_json(key).await?;
        if let Some(content) = &content {
            content.validate()?;
        }
        Ok(content)
    }

    /// Persist paged content
    pub async fn set_content<F>(&self, key: &str, content: &PagedContent<F>) -> Result<()>
    where
        F: Fetch + Serialize,
        F::Element: Serialize,
    {
        self.set_json(key, content).await
    }

    /// Get the storage file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for Storage {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            items: Arc::clone(&self.items),
            save_lock: Arc::clone(&self.save_lock),
            auto_save: self.auto_save,
        }
    }
}

fn parse_file(contents: &str) -> Result<BTreeMap<String, Vec<u8>>> {
    let file: StorageFile = serde_json::from_str(contents).map_err(|e| Error::Storage {
        message: format!("Failed to parse storage file: {e}"),
    })?;
    file.decode()
}
