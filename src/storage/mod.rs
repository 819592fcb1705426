//! Key-value storage module
//!
//! Persists arbitrary encoded state (typically cached paged content) across
//! process restarts.
//!
//! # Overview
//!
//! The storage module provides:
//! - `Storage` - an explicitly constructed key→bytes store with file or
//!   in-memory backing
//! - `StorageFile` - the on-disk document format
//! - Typed JSON helpers, including validated `PagedContent` round-trips

mod manager;
mod types;

pub use manager::Storage;
pub use types::StorageFile;
