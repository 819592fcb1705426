//! CLI commands and argument parsing

use crate::paging::PagingDirection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// feedkit CLI
#[derive(Parser, Debug)]
#[command(name = "feedkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Feed configuration file (YAML)
    #[arg(short = 'C', long, global = true, default_value = "feedkit.yaml")]
    pub config: PathBuf,

    /// Storage file (overrides `storage.path` from the config)
    #[arg(short, long, global = true)]
    pub storage: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch pages from an endpoint and merge them into stored content
    Fetch {
        /// Endpoint path, relative to `base_url`
        endpoint: String,

        /// Storage key (defaults to the endpoint)
        #[arg(long)]
        key: Option<String>,

        /// Which way to extend already stored content
        #[arg(short, long, default_value = "older")]
        direction: Direction,

        /// Maximum number of pages to fetch
        #[arg(short, long, default_value = "1")]
        pages: usize,

        /// Extra query parameters (key=value, repeatable)
        #[arg(short, long)]
        query: Vec<String>,
    },

    /// Print stored entries, newest first
    Show {
        /// Storage key
        key: String,

        /// Maximum entries to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Drop stored content for a key, or everything
    Clear {
        /// Storage key (all keys when omitted)
        key: Option<String>,
    },

    /// List storage keys
    Keys,
}

/// Paging direction as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    /// Entries newer than the stored ones
    Newer,
    /// Entries older than the stored ones
    Older,
}

impl From<Direction> for PagingDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Newer => PagingDirection::Previous,
            Direction::Older => PagingDirection::Next,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
