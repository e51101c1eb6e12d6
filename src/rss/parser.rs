//! Feed-schema decoders for the standard and job-board dialects.
//!
//! Both decoders are pure: they take the raw payload and return normalized
//! items in document order. Missing fields decode as empty strings; only a
//! payload that is not well-formed XML with a `channel` element fails.
//!
//! Item fields may repeat (a second `<tag>`, or an `<atom:link>` next to
//! `<link>`, which shares its local name). The first non-blank occurrence wins.
//! Items need not be contiguous inside the channel.

use serde::{Deserialize, Deserializer};

use super::types::{Dialect, NormalizedItem};
use super::util::parse_pub_date;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct RssDocument<I> {
    channel: Channel<I>,
}

#[derive(Debug, Deserialize)]
struct Channel<I> {
    #[serde(rename = "item", default = "Vec::new")]
    items: Vec<I>,
}

/// Collect every occurrence of an element and keep the first non-blank one.
fn first_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StandardItem {
    #[serde(deserialize_with = "first_text")]
    title: String,
    #[serde(deserialize_with = "first_text")]
    link: String,
    #[serde(deserialize_with = "first_text")]
    description: String,
    #[serde(rename = "pubDate", deserialize_with = "first_text")]
    pub_date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JobBoardItem {
    #[serde(deserialize_with = "first_text")]
    title: String,
    #[serde(deserialize_with = "first_text")]
    company: String,
    #[serde(deserialize_with = "first_text")]
    link: String,
    #[serde(deserialize_with = "first_text")]
    image: String,
    #[serde(deserialize_with = "first_text")]
    tag: String,
    #[serde(deserialize_with = "first_text")]
    location: String,
    #[serde(deserialize_with = "first_text")]
    description: String,
    #[serde(rename = "pubDate", deserialize_with = "first_text")]
    pub_date: String,
}

impl From<StandardItem> for NormalizedItem {
    fn from(item: StandardItem) -> Self {
        NormalizedItem {
            title: item.title.trim().to_string(),
            link: item.link.trim().to_string(),
            description: item.description,
            published_at: parse_pub_date(&item.pub_date),
            ..Default::default()
        }
    }
}

impl From<JobBoardItem> for NormalizedItem {
    fn from(item: JobBoardItem) -> Self {
        NormalizedItem {
            title: item.title.trim().to_string(),
            link: item.link.trim().to_string(),
            description: item.description,
            published_at: parse_pub_date(&item.pub_date),
            company: item.company.trim().to_string(),
            image: item.image.trim().to_string(),
            tag: item.tag.trim().to_string(),
            location: item.location.trim().to_string(),
        }
    }
}

fn decode_items<I>(payload: &[u8]) -> Result<Vec<NormalizedItem>>
where
    I: for<'de> Deserialize<'de> + Into<NormalizedItem>,
{
    let document: RssDocument<I> = quick_xml::de::from_reader(payload)?;
    Ok(document.channel.items.into_iter().map(Into::into).collect())
}

/// Decode a standard `rss/channel/item` payload.
pub fn decode_standard(payload: &[u8]) -> Result<Vec<NormalizedItem>> {
    decode_items::<StandardItem>(payload)
}

/// Decode a job-board payload.
pub fn decode_job_board(payload: &[u8]) -> Result<Vec<NormalizedItem>> {
    decode_items::<JobBoardItem>(payload)
}

impl Dialect {
    /// Run the decoder matching this dialect.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<NormalizedItem>> {
        match self {
            Dialect::Standard => decode_standard(payload),
            Dialect::JobBoard => decode_job_board(payload),
        }
    }
}
