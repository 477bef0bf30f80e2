//! Driftnet main entry point
//!
//! This is the command-line interface for the Driftnet bounded web crawler.

use anyhow::Context;
use clap::Parser;
use driftnet::config::{load_config_with_hash, validate, Config};
use driftnet::crawler::{crawl, CrawlSummary};
use driftnet::report::{render_report, write_report};
use driftnet::url::extract_host;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Driftnet: A bounded breadth-first web crawler
///
/// Driftnet crawls one site breadth-first from a seed URL, bounded by page
/// and depth caps, and records every fetch, visit, and discovered link to
/// CSV audit logs. A text report can be generated from a finished run.
#[derive(Parser, Debug)]
#[command(name = "driftnet")]
#[command(version = "1.0.0")]
#[command(about = "A bounded breadth-first web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: Url,

    /// Path to TOML configuration file (defaults used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured page cap
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Override the configured depth cap
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Override the configured worker count
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Override the configured audit log directory
    #[arg(long, value_name = "DIR")]
    audit_dir: Option<PathBuf>,

    /// Generate the text report after the crawl completes
    #[arg(long)]
    report: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to built-in defaults
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    let summary = handle_crawl(&config, cli.seed.clone()).await?;
    print_summary(&summary);

    if cli.report {
        handle_report(&config, &cli.seed)?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("driftnet=info,warn"),
            1 => EnvFilter::new("driftnet=debug,info"),
            2 => EnvFilter::new("driftnet=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(audit_dir) = &cli.audit_dir {
        config.output.audit_dir = audit_dir.display().to_string();
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, seed: Url) -> anyhow::Result<CrawlSummary> {
    tracing::info!(
        "Crawl bounds: max pages {}, max depth {}, workers {}",
        config.crawler.max_pages,
        config.crawler.max_depth,
        config.crawler.workers
    );

    match crawl(config, seed).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            Ok(summary)
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===");
    println!("Pages crawled: {}", summary.pages_crawled);
    println!("Successful fetches: {}", summary.successful_fetches);
    println!("Failed fetches: {}", summary.failed_fetches);
    println!("Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
}

/// Handles the --report mode: aggregates the audit logs into a text report
fn handle_report(config: &Config, seed: &Url) -> anyhow::Result<()> {
    let root_domain =
        extract_host(seed).with_context(|| format!("seed URL has no host: {}", seed))?;
    let audit_dir = Path::new(&config.output.audit_dir);
    let report_path = Path::new(&config.output.report_path);

    let report = write_report(audit_dir, &root_domain, report_path)?;

    println!();
    print!("{}", render_report(&report));
    println!("Report written to: {}", config.output.report_path);

    Ok(())
}
