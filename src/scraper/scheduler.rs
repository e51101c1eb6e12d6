//! Recurring scrape cycles.
//!
//! Each tick selects a batch of targets, runs one worker per target
//! concurrently and waits for the whole batch before the next tick. Batches
//! never overlap, so outbound requests are bounded by the batch size.

use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use super::worker::{scrape_target, ScrapeTarget};
use crate::error::Result;
use crate::rss::FeedClient;
use crate::store::FeedStore;
use crate::TARGET_SCRAPER;

/// How a scheduler picks the targets of a cycle.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Up to `limit` stored feeds, least recently fetched first.
    DueFeeds { limit: i64 },
    /// One fixed job-board URL every cycle.
    JobBoard { url: String },
}

pub struct Scheduler {
    name: &'static str,
    store: Arc<dyn FeedStore>,
    client: Arc<FeedClient>,
    period: Duration,
    selection: Selection,
}

impl Scheduler {
    pub fn new(
        name: &'static str,
        store: Arc<dyn FeedStore>,
        client: Arc<FeedClient>,
        period: Duration,
        selection: Selection,
    ) -> Self {
        Self {
            name,
            store,
            client,
            period,
            selection,
        }
    }

    /// Scheduler over the stored standard-dialect feeds.
    pub fn feeds(
        store: Arc<dyn FeedStore>,
        client: Arc<FeedClient>,
        period: Duration,
        concurrency: usize,
    ) -> Self {
        let limit = i64::try_from(concurrency.max(1)).unwrap_or(i64::MAX);
        Self::new("feeds", store, client, period, Selection::DueFeeds { limit })
    }

    /// Scheduler over a single job-board URL.
    pub fn job_board(
        store: Arc<dyn FeedStore>,
        client: Arc<FeedClient>,
        period: Duration,
        url: String,
    ) -> Self {
        Self::new("job board", store, client, period, Selection::JobBoard { url })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run cycles forever, the first one immediately.
    pub async fn run(&self) {
        info!(target: TARGET_SCRAPER, "Starting {} scheduler every {:?}", self.name, self.period);

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// Select, dispatch and drain one batch. Returns how many workers ran.
    pub async fn run_cycle(&self) -> usize {
        let targets = match self.select().await {
            Ok(targets) => targets,
            Err(err) => {
                error!(target: TARGET_SCRAPER, "Couldn't get next feeds to fetch for {} scheduler: {}", self.name, err);
                return 0;
            }
        };

        info!(target: TARGET_SCRAPER, "Found {} feeds to fetch", targets.len());

        let mut workers = JoinSet::new();
        for target in targets {
            let store = Arc::clone(&self.store);
            let client = Arc::clone(&self.client);
            workers.spawn(async move {
                scrape_target(store.as_ref(), client.as_ref(), &target).await;
            });
        }

        let mut finished = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(()) => finished += 1,
                Err(err) => error!(target: TARGET_SCRAPER, "Scrape worker aborted: {}", err),
            }
        }

        debug!(target: TARGET_SCRAPER, "{} scheduler cycle complete, {} workers finished", self.name, finished);
        finished
    }

    async fn select(&self) -> Result<Vec<ScrapeTarget>> {
        match &self.selection {
            Selection::DueFeeds { limit } => {
                let feeds = self.store.select_feeds_due(*limit).await?;
                Ok(feeds.into_iter().map(ScrapeTarget::Feed).collect())
            }
            Selection::JobBoard { url } => Ok(vec![ScrapeTarget::JobBoard { url: url.clone() }]),
        }
    }
}
