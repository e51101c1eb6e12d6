//! Shared fixtures for unit tests: sample payloads, a local feed server and an
//! in-memory store with switchable failures.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::error::{Result, ScrapeError};
use crate::models::{Feed, JobPosting, Post};
use crate::store::FeedStore;

pub const STANDARD_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Blog</title>
    <link>https://blog.example.com</link>
    <description>Posts about things</description>
    <item>
      <title>  First post  </title>
      <link>https://blog.example.com/first</link>
      <description><![CDATA[Hello <b>world</b>]]></description>
      <pubDate>Mon, 04 Mar 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Second post</title>
      <link>https://blog.example.com/second</link>
      <description>More words</description>
      <pubDate>Tue, 05 Mar 2024 09:30:00 GMT</pubDate>
    </item>
    <item>
      <title>Third post</title>
      <link>https://blog.example.com/third</link>
    </item>
  </channel>
</rss>
"#;

pub const JOB_BOARD_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Remote OK Jobs</title>
    <link>https://remoteok.com</link>
    <description>Remote jobs</description>
    <item>
      <title>Senior Rust Engineer</title>
      <company>Ferrous Systems</company>
      <link>https://remoteok.com/remote-jobs/1001</link>
      <image>https://remoteok.com/assets/logo.png</image>
      <description>Build fast things.</description>
      <tag>rust</tag>
      <location>Worldwide</location>
      <pubDate>Wed, 06 Mar 2024 12:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Backend Developer</title>
      <company>Acme</company>
      <link>https://remoteok.com/remote-jobs/1002</link>
      <description>APIs all day.</description>
      <location>Europe</location>
      <pubDate>Thu, 07 Mar 2024 08:15:00 +0000</pubDate>
    </item>
  </channel>
</rss>
"#;

const BROKEN_FEED: &str = "<rss><channel><item><title>oops</channel></rss>";

/// How long `/slow.xml` stalls before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);
/// How long `/delayed.xml` stalls before answering.
pub const SHORT_DELAY: Duration = Duration::from_millis(150);

#[derive(Default)]
struct ServerState {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct ServerTask(JoinHandle<()>);

impl Drop for ServerTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Local HTTP server serving the fixtures above.
///
/// Routes: `/standard.xml`, `/jobs.xml`, `/broken.xml`, `/slow.xml` and
/// `/delayed.xml`. Anything else is a 404. Query strings are ignored, so
/// distinct feed URLs can share one route.
#[derive(Clone)]
pub struct FeedServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    _task: Arc<ServerTask>,
}

impl FeedServer {
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());
        let app = Router::new()
            .route("/standard.xml", get(standard))
            .route("/jobs.xml", get(jobs))
            .route("/broken.xml", get(broken))
            .route("/slow.xml", get(slow))
            .route("/delayed.xml", get(delayed))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            _task: Arc::new(ServerTask(task)),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests answered by any fixture route.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// `/delayed.xml` requests currently stalled.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

fn rss(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/rss+xml")], body)
}

async fn standard(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    rss(STANDARD_FEED)
}

async fn jobs(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    rss(JOB_BOARD_FEED)
}

async fn broken(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    rss(BROKEN_FEED)
}

async fn slow(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    sleep(SLOW_DELAY).await;
    rss(STANDARD_FEED)
}

async fn delayed(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);
    sleep(SHORT_DELAY).await;
    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    rss(STANDARD_FEED)
}

/// Store counters captured when a batch selection starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// Feeds handed out by earlier selections.
    pub dispatched: usize,
    /// Post inserts attempted so far, duplicates included.
    pub inserts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    None,
    Select,
    Mark,
    Url(String),
}

/// In-memory [`FeedStore`] that can be told to fail one kind of call.
pub struct MemoryStore {
    failure: Failure,
    feeds: Mutex<Vec<Feed>>,
    posts: Mutex<Vec<Post>>,
    jobs: Mutex<Vec<JobPosting>>,
    dispatched: AtomicUsize,
    inserts: AtomicUsize,
    selections: Mutex<Vec<SelectionSnapshot>>,
}

impl MemoryStore {
    fn with_failure(failure: Failure) -> Self {
        Self {
            failure,
            feeds: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
            jobs: Mutex::new(Vec::new()),
            dispatched: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            selections: Mutex::new(Vec::new()),
        }
    }

    pub fn new() -> Self {
        Self::with_failure(Failure::None)
    }

    pub fn failing_select() -> Self {
        Self::with_failure(Failure::Select)
    }

    pub fn failing_mark() -> Self {
        Self::with_failure(Failure::Mark)
    }

    /// Fails every insert whose url equals `url`.
    pub fn failing_url(url: &str) -> Self {
        Self::with_failure(Failure::Url(url.to_string()))
    }

    pub fn add_feed(&self, name: &str, url: &str) -> Feed {
        let now = Utc::now();
        let feed = Feed {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            url: url.to_string(),
            user_id: Uuid::new_v4(),
            last_fetched_at: None,
        };
        self.feeds.lock().unwrap().push(feed.clone());
        feed
    }

    /// Stored posts in insertion order.
    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    /// One snapshot per `select_feeds_due` call, in call order.
    pub fn selections(&self) -> Vec<SelectionSnapshot> {
        self.selections.lock().unwrap().clone()
    }

    fn injected(&self, what: &str) -> ScrapeError {
        ScrapeError::Persistence(sqlx::Error::Protocol(format!("injected {} failure", what)))
    }

    fn fails_url(&self, url: &str) -> bool {
        matches!(&self.failure, Failure::Url(failing) if failing == url)
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn select_feeds_due(&self, limit: i64) -> Result<Vec<Feed>> {
        if self.failure == Failure::Select {
            return Err(self.injected("select"));
        }
        self.selections.lock().unwrap().push(SelectionSnapshot {
            dispatched: self.dispatched.load(Ordering::SeqCst),
            inserts: self.inserts.load(Ordering::SeqCst),
        });

        let mut feeds = self.feeds.lock().unwrap().clone();
        feeds.sort_by_key(|feed| (feed.last_fetched_at, feed.created_at));
        feeds.truncate(usize::try_from(limit).unwrap_or(0));
        self.dispatched.fetch_add(feeds.len(), Ordering::SeqCst);
        Ok(feeds)
    }

    async fn mark_feed_fetched(&self, feed_id: Uuid) -> Result<Feed> {
        if self.failure == Failure::Mark {
            return Err(self.injected("mark"));
        }

        let mut feeds = self.feeds.lock().unwrap();
        let feed = feeds
            .iter_mut()
            .find(|feed| feed.id == feed_id)
            .ok_or(ScrapeError::Persistence(sqlx::Error::RowNotFound))?;
        let now = Utc::now();
        feed.last_fetched_at = Some(now);
        feed.updated_at = now;
        Ok(feed.clone())
    }

    async fn insert_post(&self, post: &Post) -> Result<Post> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fails_url(&post.url) {
            return Err(self.injected("insert"));
        }

        let mut posts = self.posts.lock().unwrap();
        if posts
            .iter()
            .any(|stored| stored.feed_id == post.feed_id && stored.url == post.url)
        {
            return Err(ScrapeError::DuplicateItem);
        }
        posts.push(post.clone());
        Ok(post.clone())
    }

    async fn insert_job_posting(&self, job: &JobPosting) -> Result<JobPosting> {
        if self.fails_url(&job.url) {
            return Err(self.injected("insert"));
        }

        let mut jobs = self.jobs.lock().unwrap();
        if jobs.iter().any(|stored| stored.url == job.url) {
            return Err(ScrapeError::DuplicateItem);
        }
        jobs.push(job.clone());
        Ok(job.clone())
    }
}
