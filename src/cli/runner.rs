//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, Direction, OutputFormat};
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpFetcher};
use crate::paging::{Feed, PagedContent};
use crate::storage::Storage;
use crate::types::Entry;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Content type persisted by the CLI
type EntryContent = PagedContent<HttpFetcher<Entry>>;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                endpoint,
                key,
                direction,
                pages,
                query,
            } => {
                self.fetch(
                    endpoint,
                    key.as_deref().unwrap_or(endpoint),
                    *direction,
                    *pages,
                    query,
                )
                .await
            }
            Commands::Show { key, limit } => self.show(key, *limit).await,
            Commands::Clear { key } => self.clear(key.as_deref()).await,
            Commands::Keys => self.keys().await,
        }
    }

    /// Load the feed config
    fn load_config(&self) -> Result<FeedConfig> {
        FeedConfig::from_file(&self.cli.config)
    }

    /// Resolve the storage path, preferring the command-line override
    fn storage_path(&self, config: Option<&FeedConfig>) -> Result<PathBuf> {
        if let Some(path) = &self.cli.storage {
            return Ok(path.clone());
        }
        match config {
            Some(config) => Ok(config.storage.path.clone()),
            None => Ok(self.load_config()?.storage.path),
        }
    }

    fn open_storage(&self, config: Option<&FeedConfig>) -> Result<Storage> {
        let path = self.storage_path(config)?;
        debug!(path = %path.display(), "Opening storage");
        Storage::from_file(path)
    }

    /// Fetch pages and merge them into stored content
    async fn fetch(
        &self,
        endpoint: &str,
        key: &str,
        direction: Direction,
        pages: usize,
        query: &[String],
    ) -> Result<()> {
        let config = self.load_config()?;
        let storage = self.open_storage(Some(&config))?;
        let client = Arc::new(HttpClient::with_config(config.client_config())?);

        let mut initial = HttpFetcher::<Entry>::new(endpoint, config.paging.clone())
            .with_client(Arc::clone(&client));
        for pair in query {
            let (name, value) = parse_query_pair(pair)?;
            initial = initial.with_query(name, value);
        }

        let feed = match storage.get_content::<HttpFetcher<Entry>>(key).await? {
            Some(mut content) => {
                HttpFetcher::attach_all(&mut content, &client);
                debug!(key, stored = content.len(), "Restored content");
                Feed::with_content(initial, content)
            }
            None => Feed::new(initial),
        };

        let mut added = 0;
        let mut requests = 0;
        while requests < pages {
            requests += 1;
            let count = feed.load(direction.into()).await?;
            added += count;
            if count == 0 {
                break;
            }
        }

        let content = feed.snapshot().await;
        storage.set_content(key, &*content).await?;
        info!(key, added, total = content.len(), "Fetch complete");

        self.output_message(&json!({
            "type": "FETCH",
            "key": key,
            "requests": requests,
            "added": added,
            "total": content.len(),
            "pages": content.page_count()
        }));

        Ok(())
    }

    /// Print stored entries
    async fn show(&self, key: &str, limit: Option<usize>) -> Result<()> {
        let storage = self.open_storage(None)?;
        let content: EntryContent = storage
            .get_content(key)
            .await?
            .ok_or_else(|| Error::storage(format!("No content stored under '{key}'")))?;

        let entries: Vec<&Entry> = content
            .iter_elements()
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        self.output_message(&json!({
            "type": "ENTRIES",
            "key": key,
            "total": content.len(),
            "entries": entries
        }));

        Ok(())
    }

    /// Remove stored content
    async fn clear(&self, key: Option<&str>) -> Result<()> {
        let storage = self.open_storage(None)?;

        let removed: Vec<String> = match key {
            Some(key) => {
                if storage.delete(key).await? {
                    vec![key.to_string()]
                } else {
                    Vec::new()
                }
            }
            None => {
                let keys = storage.keys().await;
                storage.clear().await?;
                keys
            }
        };

        self.output_message(&json!({
            "type": "CLEARED",
            "keys": removed
        }));

        Ok(())
    }

    /// List storage keys
    async fn keys(&self) -> Result<()> {
        let storage = self.open_storage(None)?;

        self.output_message(&json!({
            "type": "KEYS",
            "keys": storage.keys().await
        }));

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Split a `key=value` query argument
fn parse_query_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| Error::config(format!("Invalid query parameter '{pair}', expected key=value")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_pair() {
        assert_eq!(parse_query_pair("local=true").unwrap(), ("local", "true"));
        assert_eq!(parse_query_pair("tag=a=b").unwrap(), ("tag", "a=b"));
        assert_eq!(parse_query_pair("empty=").unwrap(), ("empty", ""));
        assert!(parse_query_pair("novalue").is_err());
        assert!(parse_query_pair("=x").is_err());
    }
}
