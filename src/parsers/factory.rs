use roxmltree::Document;
use tracing::debug;

use crate::errors::{ParseError, ParseResult};
use crate::parsers::atom::AtomParser;
use crate::parsers::jsonfeed::JsonFeedParser;
use crate::parsers::rss::RssParser;
use crate::parsers::traits::FeedParser;

/// Classifies a raw feed document and returns the matching parser, already
/// bound to the fully extracted results.
///
/// After trimming, a leading `{` means JSON Feed. Anything else must be
/// well-formed XML: a `feed` root element is Atom, any other root is RSS.
/// Text that is neither valid JSON nor well-formed XML fails with
/// [`ParseError::Format`].
pub fn create(content: &str) -> ParseResult<Box<dyn FeedParser>> {
    let trimmed = content.trim();
    if trimmed.starts_with('{') {
        debug!("classified document as JSON Feed");
        return Ok(Box::new(JsonFeedParser::parse(trimmed)?));
    }

    let doc = Document::parse(trimmed).map_err(|e| ParseError::Format(e.to_string()))?;
    if doc.root_element().tag_name().name() == "feed" {
        debug!("classified document as Atom");
        Ok(Box::new(AtomParser::from_document(&doc, trimmed)?))
    } else {
        debug!("classified document as RSS");
        Ok(Box::new(RssParser::from_document(&doc, trimmed)?))
    }
}
