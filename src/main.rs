//! Onion-Spider main entry point
//!
//! This is the command-line interface for the Onion-Spider search crawler.

use anyhow::{bail, Context};
use clap::Parser;
use onion_spider::config::{load_config_with_hash, Config};
use onion_spider::crawler::Coordinator;
use onion_spider::page::ResultPage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Onion-Spider: crawls every result page of an onion search engine query
///
/// Requests go through a local Tor SOCKS5 proxy. Pages are printed as soon as
/// they arrive, which is not necessarily in page order.
#[derive(Parser, Debug)]
#[command(name = "onion-spider")]
#[command(version = "1.0.0")]
#[command(about = "Crawls paginated onion search results", long_about = None)]
struct Cli {
    /// Search term, or an absolute path starting with '/'
    #[arg(value_name = "QUERY")]
    query: String,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the configuration and the first request without connecting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if cli.query.trim().is_empty() {
        bail!("Search query cannot be empty");
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.query)
    } else {
        handle_crawl(&config, &cli.query).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("onion_spider=info,warn"),
            1 => EnvFilter::new("onion_spider=debug,info"),
            2 => EnvFilter::new("onion_spider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be sent
fn handle_dry_run(config: &Config, query: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;

    println!("=== Onion-Spider Dry Run ===\n");

    println!("Engine:");
    println!("  Address: {}", config.engine.address);
    println!("  Search prefix: {}", config.engine.search_prefix);
    println!("  Delimiter: {:?}", config.engine.delimiter);

    println!("\nProxy:");
    println!("  Address: {}", config.proxy.address);
    println!("  Connect timeout: {}s", config.proxy.connect_timeout_secs);
    println!("  Read timeout: {}s", config.proxy.read_timeout_secs);

    println!("\nMarkup:");
    println!("  No results: {}", config.markup.no_results);
    println!("  Pagination: {}", config.markup.pagination);
    println!("  Current page: {}", config.markup.current);
    println!("  Last page: {}", config.markup.disabled);
    println!("  Total: {}", config.markup.total);
    println!("  Page links: {}", config.markup.link);
    println!("  Result: {}", config.markup.result);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would send: {:?}",
        coordinator.builder().build(query).as_str()
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, query: &str) -> anyhow::Result<()> {
    let mut crawl = Coordinator::new(config)?.start(query);

    while let Some(page) = crawl.next_page().await {
        print_page(&page);
    }

    match crawl.finish().await {
        Ok(summary) => {
            println!(
                "\n✓ {} pages ({} requests) in {:.1}s",
                summary.pages,
                summary.dispatched,
                summary.elapsed.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_page(page: &ResultPage) {
    if page.is_root {
        if let Some(total) = &page.total {
            println!("Total results: {}", total);
        }
    }

    println!("\n=== Page {} ({} results) ===", page.page_index(), page.hits.len());
    for hit in &page.hits {
        match &hit.link {
            Some(link) => println!("  {}  <{}>", hit.title, link),
            None => println!("  {}", hit.title),
        }
    }
}
