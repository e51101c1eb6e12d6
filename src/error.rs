use std::time::Duration;
use thiserror::Error;

/// Failures the ingestion pipeline can observe.
///
/// `DuplicateItem` is benign: the ingestor absorbs it. Everything else is
/// absorbed at the worker boundary and only ever logged.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} timed out after {} seconds", .timeout.as_secs())]
    FetchTimeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {message}")]
    FetchTransport { url: String, message: String },

    #[error("malformed feed payload: {0}")]
    MalformedPayload(String),

    #[error("item already stored")]
    DuplicateItem,

    #[error("persistence failure: {0}")]
    Persistence(#[source] sqlx::Error),
}

impl ScrapeError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ScrapeError::DuplicateItem)
    }
}

impl From<sqlx::Error> for ScrapeError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                ScrapeError::DuplicateItem
            }
            _ => ScrapeError::Persistence(error),
        }
    }
}

impl From<quick_xml::DeError> for ScrapeError {
    fn from(error: quick_xml::DeError) -> Self {
        ScrapeError::MalformedPayload(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
