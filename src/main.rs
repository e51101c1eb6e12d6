use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{error, info};
use uuid::Uuid;

use webrss::config::{Config, RunArgs, DEFAULT_DATABASE_PATH};
use webrss::db::Database;
use webrss::logging;
use webrss::models::{JobPosting, Post};
use webrss::rss::{is_valid_url, preview, probe_feed, FeedClient, ProbeReport};
use webrss::scraper::Scheduler;
use webrss::store::FeedStore;
use webrss::{ScrapeError, TARGET_SCRAPER};

#[derive(Parser)]
#[command(
    author,
    version,
    long_version = env!("WEBRSS_LONG_VERSION"),
    about = "Scrape RSS feeds and a remote job board into SQLite",
    long_about = None
)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, env = "DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    database: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the feed and job board schedulers until interrupted
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Run a single cycle of each scheduler, then exit
        #[arg(long)]
        once: bool,
    },

    /// Register a feed for scraping
    AddFeed {
        /// Display name of the feed
        #[arg(short, long)]
        name: String,

        /// Feed URL (http or https)
        #[arg(short, long)]
        url: String,

        /// Owning user; a new id is generated when omitted
        #[arg(long)]
        user_id: Option<Uuid>,
    },

    /// List recently ingested posts of a feed
    Posts {
        /// Feed to list posts for
        #[arg(short, long)]
        feed_id: Uuid,

        /// Number of posts to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List recently ingested job postings
    Jobs {
        /// Number of postings to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch a URL once and report how it parses, without storing anything
    Probe {
        url: String,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Settings may live in .env; a missing file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::configure_logging();

    match cli.command {
        Commands::Run { args, once } => run(Config::from_args(&cli.database, &args), once).await,
        Commands::AddFeed { name, url, user_id } => {
            add_feed(&cli.database, &name, &url, user_id).await
        }
        Commands::Posts {
            feed_id,
            limit,
            json,
        } => list_posts(&cli.database, feed_id, limit, json).await,
        Commands::Jobs { limit, json } => list_jobs(&cli.database, limit, json).await,
        Commands::Probe { url, json } => probe(&url, json).await,
    }
}

async fn open_database(path: &str) -> Result<Database> {
    Database::new(path)
        .await
        .with_context(|| format!("Failed to open database at {}", path))
}

async fn run(config: Config, once: bool) -> Result<()> {
    info!(target: TARGET_SCRAPER, "Starting webrss with {:?}", config);

    let store: Arc<dyn FeedStore> = Arc::new(open_database(&config.database_path).await?);
    let client = Arc::new(
        FeedClient::with_timeout(config.fetch_timeout).context("Failed to build HTTP client")?,
    );

    let mut schedulers = vec![Scheduler::feeds(
        Arc::clone(&store),
        Arc::clone(&client),
        config.feed_interval,
        config.concurrency,
    )];
    match &config.job_board {
        Some(job_board) => schedulers.push(Scheduler::job_board(
            Arc::clone(&store),
            Arc::clone(&client),
            job_board.interval,
            job_board.url.clone(),
        )),
        None => info!(target: TARGET_SCRAPER, "Job board scraping disabled"),
    }

    if once {
        for scheduler in &schedulers {
            let finished = scheduler.run_cycle().await;
            info!(target: TARGET_SCRAPER, "{} scheduler ran {} workers", scheduler.name(), finished);
        }
        return Ok(());
    }

    let mut tasks = JoinSet::new();
    for scheduler in schedulers {
        tasks.spawn(async move { scheduler.run().await });
    }

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            info!(target: TARGET_SCRAPER, "Received Ctrl-C, shutting down");
        }
        Some(joined) = tasks.join_next() => {
            // Schedulers loop forever, so this only happens on a panic.
            if let Err(err) = joined {
                error!(target: TARGET_SCRAPER, "Scheduler stopped unexpectedly: {}", err);
            }
        }
    }

    tasks.shutdown().await;
    Ok(())
}

async fn add_feed(database: &str, name: &str, url: &str, user_id: Option<Uuid>) -> Result<()> {
    if !is_valid_url(url) {
        bail!("'{}' is not an http(s) URL", url);
    }

    let db = open_database(database).await?;
    let user_id = user_id.unwrap_or_else(Uuid::new_v4);

    match db.create_feed(name, url, user_id).await.map_err(ScrapeError::from) {
        Ok(feed) => {
            println!("{} {} ({})", "Added feed".bright_green(), feed.name, feed.id);
        }
        Err(err) if err.is_duplicate() => {
            println!("{} {}", "Feed already registered:".bright_yellow(), url);
        }
        Err(err) => return Err(err).context("Failed to add feed"),
    }

    Ok(())
}

fn format_date(date: Option<chrono::DateTime<chrono::Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

async fn list_posts(database: &str, feed_id: Uuid, limit: i64, json: bool) -> Result<()> {
    let db = open_database(database).await?;
    let feed = db
        .find_feed(feed_id)
        .await
        .context("Failed to look up feed")?
        .with_context(|| format!("No feed with id {}", feed_id))?;
    let posts = db
        .posts_for_feed(feed_id, limit)
        .await
        .context("Failed to load posts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("{} {} ({})", "Feed".bright_blue(), feed.name.bright_yellow(), feed.url);
    println!("{}", "─".repeat(100).dimmed());
    if posts.is_empty() {
        println!("{}", "No posts yet".dimmed());
    }
    for Post {
        title,
        url,
        published_at,
        ..
    } in &posts
    {
        println!(
            "{:<16}  {:<50}  {}",
            format_date(*published_at).dimmed(),
            preview(title, 48),
            url.bright_cyan()
        );
    }

    Ok(())
}

async fn list_jobs(database: &str, limit: i64, json: bool) -> Result<()> {
    let db = open_database(database).await?;
    let jobs = db
        .job_postings(limit)
        .await
        .context("Failed to load job postings")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    if jobs.is_empty() {
        println!("{}", "No job postings yet".dimmed());
    }
    for JobPosting {
        title,
        company,
        url,
        tag,
        location,
        published_at,
        ..
    } in &jobs
    {
        println!(
            "{:<16}  {:<40}  {:<24}  {:<16}  {}",
            format_date(*published_at).dimmed(),
            preview(title, 38),
            preview(company, 22).bright_yellow(),
            preview(location, 14),
            tag.as_deref().filter(|tag| !tag.is_empty()).unwrap_or("-").bright_magenta()
        );
        println!("{:<16}  {}", "", url.bright_cyan());
    }

    Ok(())
}

async fn probe(url: &str, json: bool) -> Result<()> {
    let client = FeedClient::new().context("Failed to build HTTP client")?;
    let report = probe_feed(&client, url)
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ProbeReport) {
    println!("\n{}", "═".repeat(100).bright_blue());
    println!(
        "{}  {}",
        "FEED DIAGNOSTICS".bright_blue(),
        report.url.bright_yellow()
    );
    println!("{}", "═".repeat(100).bright_blue());

    println!("{}: {}", "Bytes".bright_blue(), report.bytes);
    match &report.parse_error {
        None => println!("{}: {}", "Generic parser".bright_blue(), "ok".bright_green()),
        Some(err) => println!("{}: {}", "Generic parser".bright_blue(), err.bright_red()),
    }
    println!(
        "{}: {}",
        "Title".bright_blue(),
        report.title.as_deref().unwrap_or("None")
    );
    println!("{}: {}", "Entries Found".bright_blue(), report.entries_found);

    if !report.entries.is_empty() {
        println!("\n{}", "Entries".bright_blue());
        println!("{}", "─".repeat(80).dimmed());
        for (i, entry) in report.entries.iter().enumerate() {
            println!(
                "{}. {}",
                i + 1,
                entry.title.as_deref().unwrap_or("(untitled)").bright_white()
            );
            if let Some(url) = &entry.url {
                println!("   {}", url.bright_cyan());
            }
            if let Some(date) = &entry.pub_date {
                println!("   {}", date.dimmed());
            }
        }
    }

    println!("\n{}", "Dialects".bright_blue());
    println!("{}", "─".repeat(80).dimmed());
    for check in &report.dialects {
        match (check.items, &check.error) {
            (Some(items), _) => println!(
                "{:<10} {}",
                check.dialect.name(),
                format!("{} items", items).bright_green()
            ),
            (None, Some(err)) => println!("{:<10} {}", check.dialect.name(), err.bright_red()),
            (None, None) => println!("{:<10} {}", check.dialect.name(), "no result".dimmed()),
        }
    }
}
