//! CLI module
//!
//! Command-line interface for fetching and inspecting feeds.
//!
//! # Commands
//!
//! - `fetch` - Fetch pages from an endpoint and merge them into storage
//! - `show` - Print stored entries
//! - `clear` - Drop stored content
//! - `keys` - List storage keys

mod commands;
mod runner;

pub use commands::{Cli, Commands, Direction, OutputFormat};
pub use runner::Runner;
