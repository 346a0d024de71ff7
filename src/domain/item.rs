use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized feed entry.
///
/// `summary` is always plain text capped at 500 characters;
/// `permanent_link` carries no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub permanent_link: String,
    pub guid: Option<String>,
    pub content: String,
    pub summary: String,
    pub topic_picture_uri: Option<String>,
    pub pub_date: DateTime<Utc>,
}
