//! Thread-Ripple main entry point
//!
//! This is the command-line interface for the Thread-Ripple subreddit
//! harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use thread_ripple::config::{resolve_config, CommentSort, Config, ListingSort, Overrides, TimeWindow};
use thread_ripple::crawler::harvest;
use thread_ripple::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Thread-Ripple: a polite subreddit harvester
///
/// Pulls posts from one or more subreddits through the public listing JSON,
/// fetches each post's comment tree, flattens all nested replies into
/// parent/child rows and writes posts and comments to CSV or JSON Lines.
/// "Load more comments" placeholders are not expanded.
#[derive(Parser, Debug)]
#[command(name = "thread-ripple")]
#[command(version)]
#[command(about = "A polite subreddit post and comment harvester", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subreddits (no r/), e.g. travel solotravel
    #[arg(long, num_args = 1.., value_name = "SUB")]
    subs: Option<Vec<String>>,

    /// Post listing sort
    #[arg(long, value_enum)]
    sort: Option<ListingSort>,

    /// Time window for the top sort
    #[arg(long = "t", value_enum)]
    time_window: Option<TimeWindow>,

    /// Posts per subreddit
    #[arg(long)]
    post_limit: Option<usize>,

    /// Comment sort requested from the comments endpoint
    #[arg(long, value_enum)]
    comment_sort: Option<CommentSort>,

    /// Cap on flattened comments per post
    #[arg(long)]
    max_comments_per_post: Option<usize>,

    /// Deepest reply level to keep (top-level comments are 0)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Minimum seconds between requests
    #[arg(long)]
    min_sleep: Option<f64>,

    /// Maximum seconds between requests
    #[arg(long)]
    max_sleep: Option<f64>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Posts output (.csv or .jsonl)
    #[arg(long, value_name = "PATH")]
    posts_out: Option<String>,

    /// Comments output (.csv or .jsonl)
    #[arg(long, value_name = "PATH")]
    comments_out: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// API root, e.g. https://www.reddit.com
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without any requests
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            subreddits: self.subs.clone(),
            sort: self.sort,
            time_window: self.time_window,
            post_limit: self.post_limit,
            comment_sort: self.comment_sort,
            max_comments_per_post: self.max_comments_per_post,
            max_depth: self.max_depth,
            min_sleep: self.min_sleep,
            max_sleep: self.max_sleep,
            timeout_secs: self.timeout,
            user_agent: self.user_agent.clone(),
            base_url: self.base_url.clone(),
            posts_path: self.posts_out.clone(),
            comments_path: self.comments_out.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = resolve_config(cli.config.as_deref(), cli.overrides())
        .context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!(
        "Harvesting {} subreddit(s), sort={}, post_limit={}",
        config.scrape.subreddits.len(),
        config.scrape.sort,
        config.scrape.post_limit
    );

    let stats = match harvest(config).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("thread_ripple=info,warn"),
            1 => EnvFilter::new("thread_ripple=debug,info"),
            2 => EnvFilter::new("thread_ripple=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let scrape = &config.scrape;

    println!("=== Thread-Ripple Dry Run ===\n");

    println!("Subreddits ({}):", scrape.subreddits.len());
    for sub in &scrape.subreddits {
        println!("  - r/{}", sub);
    }

    println!("\nListing:");
    println!("  Sort: {}", scrape.sort);
    if scrape.sort == ListingSort::Top {
        println!("  Time window: {}", scrape.time_window);
    }
    println!("  Posts per subreddit: {}", scrape.post_limit);

    println!("\nComments:");
    println!("  Sort: {}", scrape.comment_sort);
    match scrape.max_comments_per_post {
        Some(cap) => println!("  Max per post: {}", cap),
        None => println!("  Max per post: unlimited"),
    }
    match scrape.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }

    println!("\nClient:");
    println!("  Base URL: {}", config.client.base_url);
    println!("  User agent: {}", config.client.user_agent);
    println!("  Timeout: {}s", config.client.timeout_secs);
    println!(
        "  Delay between requests: {:.1}s - {:.1}s",
        scrape.min_sleep, scrape.max_sleep
    );

    println!("\nOutput:");
    println!("  Posts: {}", config.output.posts_path);
    println!("  Comments: {}", config.output.comments_path);

    println!("\n✓ Configuration is valid");
}
