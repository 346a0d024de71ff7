use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::dates;
use crate::domain::{FeedFormat, FeedInfo, FeedItem};
use crate::errors::{ParseError, ParseResult};
use crate::heuristics;
use crate::parsers::traits::FeedParser;

// https://jsonfeed.org/version/1.1
#[derive(Debug, Deserialize)]
struct JsonFeedDocument {
    title: Option<String>,
    home_page_url: Option<String>,
    description: Option<String>,
    user_comment: Option<String>,
    icon: Option<String>,
    favicon: Option<String>,
    #[serde(default)]
    items: Vec<JsonFeedEntry>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedEntry {
    id: Option<String>,
    url: Option<String>,
    title: Option<String>,
    content_html: Option<String>,
    content_text: Option<String>,
    summary: Option<String>,
    image: Option<String>,
    banner_image: Option<String>,
    date_published: Option<String>,
    date_modified: Option<String>,
}

/// Parser for JSON Feed v1.1 documents.
#[derive(Debug)]
pub struct JsonFeedParser {
    info: FeedInfo,
    items: Vec<FeedItem>,
}

impl JsonFeedParser {
    pub(crate) fn parse(content: &str) -> ParseResult<Self> {
        let doc: JsonFeedDocument =
            serde_json::from_str(content).map_err(|e| ParseError::Format(e.to_string()))?;

        let name = doc
            .title
            .ok_or_else(|| ParseError::MissingField("feed title".to_string()))?;
        let info = FeedInfo {
            name,
            description: doc.description.or(doc.user_comment),
            website_link: doc.home_page_url,
            icon_uri: doc.icon.or(doc.favicon),
        };

        let items = doc
            .items
            .into_iter()
            .map(Self::parse_entry)
            .collect::<ParseResult<Vec<_>>>()?;

        debug!(items = items.len(), "parsed JSON Feed document");
        Ok(Self { info, items })
    }

    fn parse_entry(entry: JsonFeedEntry) -> ParseResult<FeedItem> {
        let title = entry.title.unwrap_or_default();
        let guid = entry.id.clone();

        let content = entry
            .content_text
            .filter(|s| !s.is_empty())
            .or(entry.content_html.filter(|s| !s.is_empty()))
            .unwrap_or_default();

        let summary = entry
            .summary
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| heuristics::summarize(&content));

        let permanent_link = entry
            .url
            .filter(|s| !s.is_empty())
            .or(entry.id.filter(|s| !s.is_empty()))
            .unwrap_or_default()
            .trim()
            .to_string();

        let topic_picture_uri = entry
            .image
            .filter(|s| !s.is_empty())
            .or(entry.banner_image.filter(|s| !s.is_empty()))
            .or_else(|| heuristics::find_image_url(&content))
            .or_else(|| heuristics::find_image_url(&summary));

        // A dateless item keeps the epoch default rather than failing.
        let date_text = entry
            .date_published
            .filter(|s| !s.is_empty())
            .or(entry.date_modified.filter(|s| !s.is_empty()));
        let pub_date = match date_text {
            Some(text) => dates::parse_rfc3339(&text)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        Ok(FeedItem {
            title,
            permanent_link,
            guid,
            content,
            summary,
            topic_picture_uri,
            pub_date,
        })
    }
}

impl FeedParser for JsonFeedParser {
    fn format(&self) -> FeedFormat {
        FeedFormat::Json
    }

    fn parse_feed_info(&self) -> FeedInfo {
        self.info.clone()
    }

    fn parse_feed_items(&self) -> Vec<FeedItem> {
        self.items.clone()
    }
}
