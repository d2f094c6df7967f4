//! verse-search CLI
//!
//! Commands:
//! - `resolve --query <q>` - Ranked book/chapter/verse results for a query
//! - `verse <KEY>` - Fetch one verse from the verse database
//! - `books` - List the canon
//! - `config` - Show the effective configuration

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{BooksArgs, Cli, Commands, ProviderArgs, ResolveArgs, VerseArgs};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use verse_search::catalog::{Book, BookCatalog, BookCategory, BookId, CatalogError};
use verse_search::config::{config_path, load_config, SearchConfig};
use verse_search::error::{ConfigError, ProviderError};
use verse_search::search::{Route, SearchEngine, SearchResult, SearchSession, SessionPhase};
use verse_search::{HttpVerseProvider, VerseProvider};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => execute_resolve(args).await,
        Commands::Verse(args) => execute_verse(args).await,
        Commands::Books(args) => execute_books(args),
        Commands::Config => execute_config(),
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

/// Config file plus flag and environment overrides
fn effective_config(translation: Option<&str>, provider: &ProviderArgs) -> Result<SearchConfig> {
    let mut config = load_config().context("Failed to load configuration")?;
    if let Some(translation) = translation {
        config.translation_id = translation.to_string();
    }
    config.provider = provider.merge(config.provider.take());
    config.validate()?;
    Ok(config)
}

fn verse_provider(config: &SearchConfig) -> Result<HttpVerseProvider> {
    let provider = config.provider.as_ref().ok_or_else(|| {
        anyhow!("Invalid usage: no verse database configured (use --base-url or VERSE_API_BASE_URL)")
    })?;
    Ok(HttpVerseProvider::new(provider)?)
}

fn resolve_scope(catalog: &BookCatalog, id: &str) -> Result<Book> {
    let id: BookId = id.parse()?;
    catalog
        .lookup(id)
        .copied()
        .ok_or_else(|| anyhow!("Book not found: {}", id))
}

/// Execute resolve command
async fn execute_resolve(args: ResolveArgs) -> Result<String> {
    let mut config = effective_config(args.translation.as_deref(), &args.provider)?;
    // One-shot query; nothing to debounce
    config.debounce_ms = 0;

    let catalog = Arc::new(BookCatalog::standard());
    let scope = args
        .scope
        .as_deref()
        .map(|id| resolve_scope(&catalog, id))
        .transpose()?;
    let engine = SearchEngine::from_config(catalog, &config);

    let session = if args.prefetch {
        let provider: Arc<dyn VerseProvider> = Arc::new(verse_provider(&config)?);
        SearchSession::with_provider(engine, &config, provider)?
    } else {
        SearchSession::new(engine, &config)?
    };

    session.set_scope(scope);
    session.set_query(&args.query);

    let mut rx = session.subscribe();
    if rx.borrow().phase == SessionPhase::Idle {
        debug!("Blank query, nothing to resolve");
        return Ok(String::new());
    }
    rx.wait_for(|s| s.phase == SessionPhase::Resulted)
        .await
        .context("Search session stopped")?;

    if args.prefetch {
        // Failed fetches leave gaps, so wait for the prefetch to finish rather
        // than for every preview
        let finished = rx.wait_for(|s| !s.is_prefetching);
        if tokio::time::timeout(Duration::from_millis(args.wait_ms), finished)
            .await
            .is_err()
        {
            info!("Some previews did not arrive within {} ms", args.wait_ms);
        }
    }

    let state = session.state();
    if args.json {
        let views: Vec<ResultView> = state.results.iter().map(ResultView::from).collect();
        return Ok(serde_json::to_string_pretty(&views)?);
    }
    Ok(format_results(&state.query_text, &state.results))
}

/// JSON shape of a result
#[derive(Serialize)]
struct ResultView<'a> {
    #[serde(flatten)]
    result: &'a SearchResult,
    path: String,
    summary: Option<String>,
    route: Route,
}

impl<'a> From<&'a SearchResult> for ResultView<'a> {
    fn from(result: &'a SearchResult) -> Self {
        Self {
            result,
            path: result.hierarchy_path(),
            summary: result.summary(),
            route: result.route(),
        }
    }
}

fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results for \"{}\"", query.trim());
    }

    let mut output = String::new();
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!("{:>2}. {}", i + 1, result.hierarchy_path()));
        if let Some(summary) = result.summary() {
            output.push_str(&format!(" ({})", summary));
        }
        output.push('\n');
        if let Some(preview) = &result.preview {
            output.push_str(&format!("    {}\n", preview));
        }
    }
    output.truncate(output.trim_end().len());
    output
}

/// Execute verse command
async fn execute_verse(args: VerseArgs) -> Result<String> {
    let config = effective_config(args.translation.as_deref(), &args.provider)?;
    let provider = verse_provider(&config)?;

    let key = args.reference.trim().to_uppercase();
    let verse = provider.fetch(&key, &config.translation_id).await?;

    let text = if args.raw {
        verse.content.clone()
    } else {
        verse.cleaned_text()
    };
    Ok(format!("{} ({})\n{}", verse.reference, config.translation_id, text))
}

/// Execute books command
fn execute_books(args: BooksArgs) -> Result<String> {
    let catalog = BookCatalog::standard();
    let mut output = String::new();
    let mut current: Option<BookCategory> = None;

    for book in catalog.all_books() {
        if args.category.is_some_and(|c| c != book.category) {
            continue;
        }
        if current != Some(book.category) {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("{}\n", book.category.display_name()));
            current = Some(book.category);
        }
        output.push_str(&format!(
            "  {}  {} ({} chapters)\n",
            book.id, book.name, book.chapter_count
        ));
    }

    output.truncate(output.trim_end().len());
    Ok(output)
}

/// Execute config command
fn execute_config() -> Result<String> {
    let path = config_path()?;
    let config = load_config().context("Failed to load configuration")?;
    Ok(format!(
        "# {}\n{}",
        path.display(),
        serde_json::to_string_pretty(&config.redacted())?
    ))
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ProviderError>() {
            return match e {
                ProviderError::NotFound(_) => 3,
                ProviderError::RequestFailed(_) | ProviderError::InvalidResponse(_) => 2,
            };
        }
        if cause.downcast_ref::<CatalogError>().is_some() {
            return 1;
        }
        if let Some(ConfigError::Invalid(_)) = cause.downcast_ref::<ConfigError>() {
            return 1;
        }
    }

    let err_str = err.to_string().to_lowercase();
    if err_str.contains("invalid") || err_str.contains("usage") {
        1 // Invalid arguments or usage error
    } else if err_str.contains("not found") {
        3
    } else {
        5 // Other application errors
    }
}
