//! Scheduling and per-target scrape workers.

pub mod ingest;
pub mod scheduler;
pub mod worker;

pub use self::ingest::{ingest_job_posting, ingest_post, IngestOutcome};
pub use self::scheduler::{Scheduler, Selection};
pub use self::worker::{scrape_target, ScrapeTarget};
