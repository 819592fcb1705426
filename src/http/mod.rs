//! HTTP transport module
//!
//! Connects the paging core to a real REST API.
//!
//! # Features
//!
//! - **Raw responses**: `HttpClient` captures status, headers and body without
//!   judging the status
//! - **Dispatch**: `HttpClient::perform` decodes through a response handler
//! - **Link headers**: RFC 5988 `rel="prev"` / `rel="next"` continuations
//! - **Fetchers**: `HttpFetcher` binds cursors into requests and implements
//!   `Fetch`

mod client;
mod fetcher;
mod link;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use fetcher::HttpFetcher;
pub use link::{parse_link_header, Links};

#[cfg(test)]
mod tests;
