use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cineref")]
#[command(author, version, about = "Link previews for The Movie Database URLs")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve text into a preview and print it as JSON
    Resolve {
        /// Text to resolve, usually a TMDB URL
        text: String,

        /// Act as this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Check whether text is a recognized reference
    Match {
        /// Text to check
        text: String,

        /// Act as this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Run a catalog search provider
    Search {
        /// Search provider id (e.g. tmdb-search-movie)
        provider_id: String,

        /// Search term
        term: String,

        /// Act as this user
        #[arg(short, long)]
        user: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
