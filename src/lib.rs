//! # feedkit
//!
//! A client-side data layer for cursor-paginated REST APIs whose items carry
//! monotonically comparable IDs (timelines, notification lists).
//!
//! ## Features
//!
//! - **Typed response dispatch**: declarative status guards decode raw HTTP
//!   responses into typed values, first match wins
//! - **Paged content**: fetched windows are merged into one deduplicated,
//!   strictly ordered collection with forward/backward continuation fetchers
//! - **Serialized merges**: `Feed` lets readers take snapshots while loads run
//! - **Persistence**: accumulated content survives restarts via `Storage`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use feedkit::{Entry, Feed, HttpClient, HttpFetcher, PagingConfig, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(HttpClient::new()?);
//!     let home = HttpFetcher::<Entry>::new(
//!         "https://social.example/api/v1/timelines/home",
//!         PagingConfig::default(),
//!     )
//!     .with_client(client);
//!
//!     let feed = Feed::new(home);
//!     feed.load_older().await?; // first window
//!     feed.load_older().await?; // the one below it
//!     feed.load_newer().await?; // anything posted since
//!
//!     for entry in feed.all_elements().await {
//!         println!("{}", entry.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         cli / storage                        │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴───────────┬───────────────────┐
//! │     http      │          paging          │     response      │
//! ├───────────────┼──────────────────────────┼───────────────────┤
//! │ HttpClient    │ Page      (one window)   │ IfStatus          │
//! │ HttpFetcher ──┼▶ Fetch    (continuation) │ Constant          │
//! │ Link headers  │ PagedContent (merge)     │ Composite         │
//! │               │ Feed      (owner)        │                   │
//! └───────────────┴──────────────────────────┴───────────────────┘
//!                                │
//!                    identity (CompositeIdentity)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for feedkit
pub mod error;

/// Common types and type aliases
pub mod types;

/// Order-sensitive identities over ID sequences
pub mod identity;

/// Guarded response handlers
pub mod response;

/// Pages, paged content and the feed owner
pub mod paging;

/// Key-value persistence
pub mod storage;

/// HTTP transport and fetchers
pub mod http;

/// Feed configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{FeedConfig, PagingConfig};
pub use http::{HttpClient, HttpClientConfig, HttpFetcher};
pub use identity::CompositeIdentity;
pub use paging::{Element, Feed, Fetch, Page, PagedContent, PagingDirection};
pub use response::{Composite, Constant, Handler, IfStatus, RawResponse};
pub use storage::Storage;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
