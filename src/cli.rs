//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use verse_search::catalog::BookCategory;
use verse_search::config::{ProviderConfig, DEFAULT_TIMEOUT_SECS};

/// verse-search CLI
#[derive(Parser, Debug)]
#[command(name = "verse-search")]
#[command(about = "Resolve fuzzy scripture references like \"jn 3:16\"", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a query into ranked book, chapter and verse results
    Resolve(ResolveArgs),
    /// Fetch a single verse by key, e.g. JHN.3.16
    Verse(VerseArgs),
    /// List the books of the canon
    Books(BooksArgs),
    /// Print the effective configuration and where it is read from
    Config,
}

/// Resolve command arguments
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Query text, e.g. "John 3:16", "gen", or "1, 2:3" with --scope
    #[arg(short = 'q', long)]
    pub query: String,

    /// Restrict the query to one book (three-letter id, e.g. GEN)
    #[arg(short = 's', long)]
    pub scope: Option<String>,

    /// Fetch verse previews from the verse database
    #[arg(short = 'p', long)]
    pub prefetch: bool,

    /// How long to wait for previews, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub wait_ms: u64,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Translation to fetch previews in
    #[arg(short = 't', long, env = "VERSE_TRANSLATION")]
    pub translation: Option<String>,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Verse command arguments
#[derive(Args, Debug)]
pub struct VerseArgs {
    /// Verse key, e.g. JHN.3.16
    pub reference: String,

    /// Translation to fetch
    #[arg(short = 't', long, env = "VERSE_TRANSLATION")]
    pub translation: Option<String>,

    /// Print the raw content instead of cleaned text
    #[arg(long)]
    pub raw: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Books command arguments
#[derive(Args, Debug)]
pub struct BooksArgs {
    /// Only list books in this category
    #[arg(short = 'c', long, value_enum)]
    pub category: Option<BookCategory>,
}

/// Verse database connection, overriding the config file
#[derive(Args, Debug, Default)]
pub struct ProviderArgs {
    /// Verse database base URL
    #[arg(long, env = "VERSE_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Verse database user id
    #[arg(long, env = "VERSE_API_USER_ID")]
    pub user_id: Option<String>,

    /// Verse database password
    #[arg(long, env = "VERSE_API_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ProviderArgs {
    /// Layer the flags over `existing`. Without a base URL from either side
    /// there is no provider.
    pub fn merge(&self, existing: Option<ProviderConfig>) -> Option<ProviderConfig> {
        let base_url = self
            .base_url
            .clone()
            .or_else(|| existing.as_ref().map(|p| p.base_url.clone()))?;

        Some(ProviderConfig {
            base_url,
            user_id: self
                .user_id
                .clone()
                .or_else(|| existing.as_ref().map(|p| p.user_id.clone()))
                .unwrap_or_default(),
            password: self
                .password
                .clone()
                .or_else(|| existing.as_ref().map(|p| p.password.clone()))
                .unwrap_or_default(),
            timeout_secs: self
                .timeout_secs
                .or_else(|| existing.as_ref().map(|p| p.timeout_secs))
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}
