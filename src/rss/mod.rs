//! Feed retrieval and decoding.
//!
//! This module fetches feed payloads over HTTP and decodes them into
//! [`NormalizedItem`]s for either of the two supported dialects.

mod client;
mod parser;
mod probe;
mod types;
mod util;

pub use self::client::FeedClient;
pub use self::parser::{decode_job_board, decode_standard};
pub use self::probe::{inspect_payload, probe_feed};
pub use self::types::*;
pub use self::util::{is_valid_url, parse_pub_date, preview, PUB_DATE_FORMAT};
