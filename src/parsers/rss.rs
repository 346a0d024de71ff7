use std::collections::HashSet;

use roxmltree::{Document, Node};
use tracing::debug;

use crate::dates;
use crate::domain::{FeedFormat, FeedInfo, FeedItem};
use crate::errors::{ParseError, ParseResult};
use crate::heuristics;
use crate::parsers::traits::FeedParser;
use crate::parsers::xml::{child, child_text, inner_text};

// RSS content module, carries full HTML bodies next to <description>
const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Parser for RSS 2.0 `<channel>`/`<item>` documents.
#[derive(Debug)]
pub struct RssParser {
    info: FeedInfo,
    items: Vec<FeedItem>,
}

impl RssParser {
    pub(crate) fn from_document(doc: &Document, source: &str) -> ParseResult<Self> {
        let channel = doc
            .root()
            .descendants()
            .find(|n| n.has_tag_name("channel"))
            .ok_or_else(|| ParseError::MissingField("rss channel".to_string()))?;

        let info = Self::parse_info(channel)?;

        let mut items = channel
            .children()
            .filter(|n| n.has_tag_name("item"))
            .map(|item| Self::parse_item(item, source))
            .collect::<ParseResult<Vec<_>>>()?;

        // Newest first; when several revisions share a permanent link, only
        // the latest one survives.
        items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        let mut seen = HashSet::new();
        items.retain(|item| seen.insert(item.permanent_link.clone()));

        debug!(items = items.len(), "parsed RSS document");
        Ok(Self { info, items })
    }

    fn parse_info(channel: Node) -> ParseResult<FeedInfo> {
        let name = child_text(channel, "title")
            .ok_or_else(|| ParseError::MissingField("channel title".to_string()))?;
        let website_link = child_text(channel, "link")
            .ok_or_else(|| ParseError::MissingField("channel link".to_string()))?;
        let description = child_text(channel, "description")
            .ok_or_else(|| ParseError::MissingField("channel description".to_string()))?;
        let icon_uri = child(channel, "image").and_then(|image| child_text(image, "url"));

        Ok(FeedInfo {
            name,
            description: Some(description),
            website_link: Some(website_link),
            icon_uri,
        })
    }

    fn parse_item(item: Node, source: &str) -> ParseResult<FeedItem> {
        let title = child_text(item, "title")
            .ok_or_else(|| ParseError::MissingField("item title".to_string()))?;
        let permanent_link = child_text(item, "link")
            .ok_or_else(|| ParseError::MissingField("item link".to_string()))?
            .trim()
            .to_string();
        let pub_date_text = child_text(item, "pubDate")
            .ok_or_else(|| ParseError::MissingField("item pubDate".to_string()))?;
        let pub_date = dates::parse_rfc822(&pub_date_text)?;
        let guid = child_text(item, "guid");

        let encoded = item
            .children()
            .find(|c| c.has_tag_name((CONTENT_NS, "encoded")))
            .map(inner_text);

        let content = child_text(item, "description")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| encoded.clone().filter(|s| !s.trim().is_empty()))
            .unwrap_or_default();

        // Topic image, first hit wins: raw item markup, decoded
        // content:encoded, a literal <image> child, an image/* enclosure,
        // and finally the resolved content.
        let raw_markup = &source[item.range()];
        let topic_picture_uri = heuristics::find_image_url(raw_markup)
            .or_else(|| encoded.as_deref().and_then(heuristics::find_image_url))
            .or_else(|| child_text(item, "image").filter(|s| !s.trim().is_empty()))
            .or_else(|| Self::enclosure_image(item))
            .or_else(|| heuristics::find_image_url(&content));

        let summary = heuristics::summarize(&content);

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

    fn enclosure_image(item: Node) -> Option<String> {
        let enclosure = child(item, "enclosure")?;
        let mime = enclosure.attribute("type")?;
        if mime.starts_with("image/") {
            enclosure.attribute("url").map(str::to_string)
        } else {
            None
        }
    }
}

impl FeedParser for RssParser {
    fn format(&self) -> FeedFormat {
        FeedFormat::Rss
    }

    fn parse_feed_info(&self) -> FeedInfo {
        self.info.clone()
    }

    fn parse_feed_items(&self) -> Vec<FeedItem> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> RssParser {
        let doc = Document::parse(source).unwrap();
        RssParser::from_document(&doc, source).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        let doc = Document::parse(source).unwrap();
        RssParser::from_document(&doc, source).unwrap_err()
    }

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Rust Blog</title>
    <link>https://blog.rust-lang.org/</link>
    <description>Empowering everyone to build reliable and efficient software.</description>
    <image>
      <url>https://blog.rust-lang.org/favicon.png</url>
      <title>Rust Blog</title>
      <link>https://blog.rust-lang.org/</link>
    </image>
    <item>
      <title>Announcing Rust 1.75.0</title>
      <link>  https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html  </link>
      <description><![CDATA[<p>The Rust team is happy to announce a new version of Rust, 1.75.0.</p><img src="https://blog.rust-lang.org/images/1.75.jpg">]]></description>
      <pubDate>Thu, 28 Dec 2023 00:00:00 +0000</pubDate>
      <guid>https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html</guid>
    </item>
    <item>
      <title>Rust 2024 Call for Testing</title>
      <link>https://blog.rust-lang.org/2024/01/10/Rust-2024-CFT.html</link>
      <description></description>
      <content:encoded><![CDATA[<p>We're testing the next edition of Rust!</p>]]></content:encoded>
      <pubDate>Wed, 10 Jan 2024 00:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_channel_info() {
        let parser = parse(SAMPLE_RSS);
        let info = parser.parse_feed_info();
        assert_eq!(info.name, "Rust Blog");
        assert_eq!(
            info.website_link.as_deref(),
            Some("https://blog.rust-lang.org/")
        );
        assert_eq!(
            info.description.as_deref(),
            Some("Empowering everyone to build reliable and efficient software.")
        );
        assert_eq!(
            info.icon_uri.as_deref(),
            Some("https://blog.rust-lang.org/favicon.png")
        );
    }

    #[test]
    fn test_items_sorted_newest_first() {
        let parser = parse(SAMPLE_RSS);
        let items = parser.parse_feed_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Rust 2024 Call for Testing");
        assert_eq!(items[1].title, "Announcing Rust 1.75.0");
        assert!(items[0].pub_date >= items[1].pub_date);
    }

    #[test]
    fn test_permanent_link_is_trimmed() {
        let parser = parse(SAMPLE_RSS);
        let items = parser.parse_feed_items();
        assert_eq!(
            items[1].permanent_link,
            "https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html"
        );
    }

    #[test]
    fn test_guid_is_optional() {
        let parser = parse(SAMPLE_RSS);
        let items = parser.parse_feed_items();
        assert_eq!(
            items[1].guid.as_deref(),
            Some("https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html")
        );
        assert_eq!(items[0].guid, None);
    }

    #[test]
    fn test_blank_description_falls_back_to_content_encoded() {
        let parser = parse(SAMPLE_RSS);
        let items = parser.parse_feed_items();
        assert_eq!(
            items[0].content,
            "<p>We're testing the next edition of Rust!</p>"
        );
        assert_eq!(items[0].summary, "We're testing the next edition of Rust!");
    }

    #[test]
    fn test_summary_derived_from_content_is_sanitized() {
        let parser = parse(SAMPLE_RSS);
        let items = parser.parse_feed_items();
        assert_eq!(
            items[1].summary,
            "The Rust team is happy to announce a new version of Rust, 1.75.0."
        );
        assert!(!items[1].summary.contains('<'));
    }

    #[test]
    fn test_image_found_in_raw_item_markup() {
        let parser = parse(SAMPLE_RSS);
        let items = parser.parse_feed_items();
        assert_eq!(
            items[1].topic_picture_uri.as_deref(),
            Some("https://blog.rust-lang.org/images/1.75.jpg")
        );
    }

    fn feed_with_item(item_body: &str) -> String {
        format!(
            r#"<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>T</title>
    <link>https://example.com/</link>
    <description>D</description>
    <item>
      <title>Post</title>
      <link>https://example.com/post</link>
      <pubDate>Sun, 02 Aug 2020 12:00:00 +0000</pubDate>
      {}
    </item>
  </channel>
</rss>"#,
            item_body
        )
    }

    #[test]
    fn test_image_from_entity_escaped_content_encoded() {
        // No literal <img in the raw markup, only inside the decoded text
        let source = feed_with_item(
            r#"<content:encoded>&lt;img src="https://example.com/pic.png"&gt;</content:encoded>"#,
        );
        let items = parse(&source).parse_feed_items();
        assert_eq!(
            items[0].topic_picture_uri.as_deref(),
            Some("https://example.com/pic.png")
        );
    }

    #[test]
    fn test_image_from_literal_image_element() {
        let source = feed_with_item("<image>https://example.com/topic.png</image>");
        let items = parse(&source).parse_feed_items();
        assert_eq!(
            items[0].topic_picture_uri.as_deref(),
            Some("https://example.com/topic.png")
        );
    }

    #[test]
    fn test_image_from_enclosure() {
        let source = feed_with_item(
            r#"<enclosure type="image/jpeg" url="https://example.com/enclosed.jpg" length="1024"/>"#,
        );
        let items = parse(&source).parse_feed_items();
        assert_eq!(
            items[0].topic_picture_uri.as_deref(),
            Some("https://example.com/enclosed.jpg")
        );
    }

    #[test]
    fn test_non_image_enclosure_is_skipped() {
        let source = feed_with_item(
            r#"<enclosure type="audio/mpeg" url="https://example.com/episode.mp3" length="1024"/>"#,
        );
        let items = parse(&source).parse_feed_items();
        assert_eq!(items[0].topic_picture_uri, None);
    }

    #[test]
    fn test_image_from_resolved_content_as_last_resort() {
        // Entity-escaped description: raw markup scan misses, content scan hits
        let source = feed_with_item(
            r#"<description>&lt;img src="https://example.com/late.png"&gt;</description>"#,
        );
        let items = parse(&source).parse_feed_items();
        assert_eq!(
            items[0].topic_picture_uri.as_deref(),
            Some("https://example.com/late.png")
        );
    }

    #[test]
    fn test_no_image_anywhere() {
        let source = feed_with_item("<description>Plain words only.</description>");
        let items = parse(&source).parse_feed_items();
        assert_eq!(items[0].topic_picture_uri, None);
    }

    #[test]
    fn test_duplicate_links_keep_latest_revision() {
        let source = r#"<rss version="2.0">
  <channel>
    <title>T</title>
    <link>https://example.com/</link>
    <description>D</description>
    <item>
      <title>First revision</title>
      <link>https://example.com/story</link>
      <description>old</description>
      <pubDate>Mon, 27 Jul 2020 09:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Other story</title>
      <link>https://example.com/other</link>
      <description>other</description>
      <pubDate>Tue, 28 Jul 2020 09:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Second revision</title>
      <link>https://example.com/story</link>
      <description>new</description>
      <pubDate>Wed, 29 Jul 2020 09:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;
        let items = parse(source).parse_feed_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Second revision");
        assert_eq!(items[1].title, "Other story");
        let links: Vec<_> = items.iter().map(|i| i.permanent_link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://example.com/story", "https://example.com/other"]
        );
    }

    #[test]
    fn test_missing_channel_title_is_an_error() {
        let source = r#"<rss version="2.0">
  <channel>
    <link>https://example.com/</link>
    <description>D</description>
  </channel>
</rss>"#;
        assert!(matches!(parse_err(source), ParseError::MissingField(_)));
    }

    #[test]
    fn test_missing_item_link_is_an_error() {
        let source = r#"<rss version="2.0">
  <channel>
    <title>T</title>
    <link>https://example.com/</link>
    <description>D</description>
    <item>
      <title>Post</title>
      <pubDate>Sun, 02 Aug 2020 12:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;
        assert!(matches!(parse_err(source), ParseError::MissingField(_)));
    }

    #[test]
    fn test_unparseable_pub_date_fails_the_parse() {
        let source = feed_with_item("<description>x</description>")
            .replace("Sun, 02 Aug 2020 12:00:00 +0000", "sometime last week");
        let doc = Document::parse(&source).unwrap();
        let err = RssParser::from_document(&doc, &source).unwrap_err();
        assert!(matches!(err, ParseError::DateFormat(_)));
    }
}
