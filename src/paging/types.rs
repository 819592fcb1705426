//! Paging types and traits
//!
//! Defines the element and fetcher abstractions shared by pages and content.

use super::page::Page;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A value with a stable, totally ordered identifier
///
/// Higher IDs are newer. Pages hold elements in strictly descending ID order.
pub trait Element: Clone + Send + Sync + 'static {
    /// Identifier type
    type Id: Ord + Hash + Clone + Debug + Send + Sync;

    /// This element's identifier
    fn id(&self) -> &Self::Id;
}

/// A capability that performs one paginated request
///
/// Fetchers are produced outside the paging core (usually by binding a cursor
/// into a request) and are only stored and invoked here.
#[async_trait]
pub trait Fetch: Clone + Send + Sync + Sized + 'static {
    /// Element type of the pages this fetcher produces
    type Element: Element;

    /// Perform the request and return the fetched window
    async fn fetch(&self) -> Result<Page<Self>>;
}

/// Which way a page extends the accumulated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingDirection {
    /// Newer elements (higher IDs), prepended
    Previous,
    /// Older elements (lower IDs), appended
    Next,
}

impl PagingDirection {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            Self::Previous => Self::Next,
            Self::Next => Self::Previous,
        }
    }
}

/// Find the first position where `ids` stops being strictly descending
///
/// Returns the index of the offending element (never 0).
pub fn find_order_violation<'a, T, I>(ids: I) -> Option<usize>
where
    T: Ord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut ids = ids.into_iter();
    let mut prev = ids.next()?;
    for (offset, id) in ids.enumerate() {
        if id >= prev {
            return Some(offset + 1);
        }
        prev = id;
    }
    None
}
