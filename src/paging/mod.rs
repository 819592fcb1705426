//! Paged content module
//!
//! Accumulates fetched windows of strictly ordered, uniquely identified
//! elements into one deduplicated collection.
//!
//! # Overview
//!
//! - [`Page`] - one validated window plus its `previous`/`next` fetchers
//! - [`PagedContent`] - the merged pages of a feed, globally descending by ID
//! - [`Feed`] - serializes merges over a `PagedContent` and drives fetchers
//! - [`Fetch`] / [`Element`] - the capabilities supplied by the caller

mod content;
mod feed;
mod page;
mod types;

pub use content::PagedContent;
pub use feed::Feed;
pub use page::Page;
pub use types::{find_order_violation, Element, Fetch, PagingDirection};
