//! Single-writer owner of a feed's paged content
//!
//! Readers take cheap `Arc` snapshots. Merges are serialized through a mutex
//! and publish a fully validated content by swapping the snapshot, so no
//! reader ever observes a half-merged state.

use super::content::PagedContent;
use super::page::Page;
use super::types::{Element, Fetch, PagingDirection};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Feed controller: fetches continuation pages and merges them in order
pub struct Feed<F: Fetch> {
    /// Fetcher used while no content has been accumulated
    initial: F,
    content: RwLock<Arc<PagedContent<F>>>,
    merge_lock: Mutex<()>,
}

impl<F: Fetch> Feed<F> {
    /// Create an empty feed that starts from `initial`
    pub fn new(initial: F) -> Self {
        Self::with_content(initial, PagedContent::new())
    }

    /// Create a feed over previously accumulated (e.g. restored) content
    pub fn with_content(initial: F, content: PagedContent<F>) -> Self {
        Self {
            initial,
            content: RwLock::new(Arc::new(content)),
            merge_lock: Mutex::new(()),
        }
    }

    /// The fetcher used for the first load
    pub fn initial(&self) -> &F {
        &self.initial
    }

    /// Current content
    pub async fn snapshot(&self) -> Arc<PagedContent<F>> {
        Arc::clone(&*self.content.read().await)
    }

    /// Current elements, newest first
    pub async fn all_elements(&self) -> Vec<F::Element> {
        self.snapshot().await.all_elements()
    }

    /// Fetch the adjacent window in `direction` and merge it
    ///
    /// Uses the initial fetcher when the feed is empty. Returns the number of
    /// new elements, or 0 when no fetcher is known in that direction.
    pub async fn load(&self, direction: PagingDirection) -> Result<usize> {
        let fetcher = {
            let current = self.snapshot().await;
            if current.is_empty() {
                Some(self.initial.clone())
            } else {
                current.fetcher(direction).cloned()
            }
        };

        let Some(fetcher) = fetcher else {
            debug!(?direction, "No fetcher known for direction");
            return Ok(0);
        };

        let page = fetcher.fetch().await?;
        self.merge(page, direction).await
    }

    /// Load newer elements
    pub async fn load_newer(&self) -> Result<usize> {
        self.load(PagingDirection::Previous).await
    }

    /// Load older elements
    pub async fn load_older(&self) -> Result<usize> {
        self.load(PagingDirection::Next).await
    }

    /// Merge an already fetched page
    pub async fn merge(&self, page: Page<F>, direction: PagingDirection) -> Result<usize> {
        let _guard = self.merge_lock.lock().await;
        let mut next = PagedContent::clone(&*self.snapshot().await);
        let added = next.merge_in(page, direction)?;
        if added > 0 {
            *self.content.write().await = Arc::new(next);
        }
        Ok(added)
    }

    /// Update one element's fields, returning whether it was found
    pub async fn replace_element(&self, element: F::Element) -> bool {
        let _guard = self.merge_lock.lock().await;
        let mut next = PagedContent::clone(&*self.snapshot().await);
        let replaced = next.replace_element(element);
        if replaced {
            *self.content.write().await = Arc::new(next);
        }
        replaced
    }

    /// Whether an element with this ID is present
    pub async fn contains(&self, id: &<F::Element as Element>::Id) -> bool {
        self.snapshot().await.contains(id)
    }

    /// Discard all accumulated content
    pub async fn reset(&self) {
        let _guard = self.merge_lock.lock().await;
        *self.content.write().await = Arc::new(PagedContent::new());
    }
}

impl<F: Fetch + std::fmt::Debug> std::fmt::Debug for Feed<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}
