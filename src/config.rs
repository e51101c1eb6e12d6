//! Runtime configuration for the scrape schedulers.
//!
//! Values come from command line flags, falling back to environment variables
//! (optionally loaded from `.env` by the binary) and then to defaults. Library
//! code only ever sees the resolved [`Config`].

use clap::Args;
use std::time::Duration;

use crate::rss::is_valid_url;

pub const DEFAULT_DATABASE_PATH: &str = "webrss.db";
pub const DEFAULT_JOB_BOARD_URL: &str = "https://remoteok.com/rss";

/// Scheduler settings as accepted on the command line.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Seconds between feed scrape cycles
    #[arg(
        long,
        env = "FEED_INTERVAL_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub feed_interval: u64,

    /// Maximum number of feeds fetched per cycle
    #[arg(
        long,
        env = "FEED_CONCURRENCY",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub concurrency: u64,

    /// Job board feed URL
    #[arg(
        long,
        env = "JOB_BOARD_URL",
        default_value = DEFAULT_JOB_BOARD_URL,
        value_parser = parse_http_url
    )]
    pub job_board_url: String,

    /// Seconds between job board scrapes
    #[arg(
        long,
        env = "JOB_BOARD_INTERVAL_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub job_board_interval: u64,

    /// Do not scrape the job board
    #[arg(long, env = "JOB_BOARD_DISABLED")]
    pub no_job_board: bool,

    /// Per-request fetch timeout in seconds
    #[arg(
        long,
        env = "FETCH_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub fetch_timeout: u64,
}

fn parse_http_url(value: &str) -> Result<String, String> {
    if is_valid_url(value) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not an http(s) URL", value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobBoardConfig {
    pub url: String,
    pub interval: Duration,
}

/// Resolved settings for a `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: String,
    pub feed_interval: Duration,
    pub concurrency: usize,
    /// `None` when the job board is disabled.
    pub job_board: Option<JobBoardConfig>,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_args(database_path: &str, args: &RunArgs) -> Self {
        let job_board = (!args.no_job_board).then(|| JobBoardConfig {
            url: args.job_board_url.clone(),
            interval: Duration::from_secs(args.job_board_interval),
        });

        Self {
            database_path: database_path.to_string(),
            feed_interval: Duration::from_secs(args.feed_interval),
            concurrency: usize::try_from(args.concurrency).unwrap_or(usize::MAX),
            job_board,
            fetch_timeout: Duration::from_secs(args.fetch_timeout),
        }
    }
}
