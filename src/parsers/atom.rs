use roxmltree::{Document, Node};
use tracing::debug;

use crate::dates;
use crate::domain::{FeedFormat, FeedInfo, FeedItem};
use crate::errors::{ParseError, ParseResult};
use crate::heuristics;
use crate::parsers::traits::FeedParser;
use crate::parsers::xml::{child, child_text};

/// Parser for Atom `<feed>`/`<entry>` documents.
#[derive(Debug)]
pub struct AtomParser {
    info: FeedInfo,
    items: Vec<FeedItem>,
}

impl AtomParser {
    pub(crate) fn from_document(doc: &Document, source: &str) -> ParseResult<Self> {
        let feed = doc.root_element();
        let info = Self::parse_info(feed)?;
        let items = feed
            .children()
            .filter(|n| n.has_tag_name("entry"))
            .map(|entry| Self::parse_entry(entry, source))
            .collect::<ParseResult<Vec<_>>>()?;

        debug!(items = items.len(), "parsed Atom document");
        Ok(Self { info, items })
    }

    fn parse_info(feed: Node) -> ParseResult<FeedInfo> {
        let name = child_text(feed, "title")
            .ok_or_else(|| ParseError::MissingField("feed title".to_string()))?;

        let mut website_link = Self::link_ref(feed);
        if website_link.as_deref().map_or(true, |s| s.trim().is_empty()) {
            website_link = child(feed, "author").and_then(|author| child_text(author, "uri"));
        }

        let description = child_text(feed, "subtitle");

        // Feed icon extraction is not wired up for Atom.
        Ok(FeedInfo {
            name,
            description,
            website_link,
            icon_uri: None,
        })
    }

    fn parse_entry(entry: Node, source: &str) -> ParseResult<FeedItem> {
        let title = child_text(entry, "title")
            .ok_or_else(|| ParseError::MissingField("entry title".to_string()))?;
        let permanent_link = Self::link_ref(entry).unwrap_or_default();
        let guid = child_text(entry, "id");

        // Either of summary and content may be missing; each fills in for
        // the other before the summary gets sanitized.
        let summary_raw = child_text(entry, "summary").filter(|s| !s.trim().is_empty());
        let content_raw = child_text(entry, "content").filter(|s| !s.trim().is_empty());
        let content = content_raw
            .or_else(|| summary_raw.clone())
            .unwrap_or_default();
        let summary_source = summary_raw.unwrap_or_else(|| content.clone());
        let summary = heuristics::summarize(&summary_source);

        let date_text = child_text(entry, "updated")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| child_text(entry, "published").filter(|s| !s.trim().is_empty()))
            .ok_or_else(|| ParseError::MissingField("entry updated/published".to_string()))?;
        let pub_date = dates::parse_rfc3339(&date_text)?;

        let raw_markup = &source[entry.range()];
        let topic_picture_uri = heuristics::find_image_url(raw_markup)
            .or_else(|| heuristics::find_image_url(&content));

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

    /// Resolves the alternate link of a feed or entry: the first `<link>`
    /// whose `rel` is `"alternate"`, or one with no `rel` at all (the
    /// default relation), with its `href` trimmed.
    fn link_ref(node: Node) -> Option<String> {
        node.children()
            .filter(|c| c.is_element() && c.tag_name().name() == "link")
            .find(|link| match link.attribute("rel") {
                Some(rel) => rel == "alternate",
                None => true,
            })
            .and_then(|link| link.attribute("href"))
            .map(|href| href.trim().to_string())
    }
}

impl FeedParser for AtomParser {
    fn format(&self) -> FeedFormat {
        FeedFormat::Atom
    }

    fn parse_feed_info(&self) -> FeedInfo {
        self.info.clone()
    }

    fn parse_feed_items(&self) -> Vec<FeedItem> {
        self.items.clone()
    }
}
