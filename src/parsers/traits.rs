use crate::domain::{FeedFormat, FeedInfo, FeedItem};

/// Contract shared by the three format parsers.
///
/// A parser is bound to a single document and extracts everything once at
/// construction; both operations hand back the cached results, so they can
/// be called independently, in any order, any number of times.
pub trait FeedParser: Send + Sync + std::fmt::Debug {
    /// Identifies the detected document format
    fn format(&self) -> FeedFormat;

    /// Feed-level metadata
    fn parse_feed_info(&self) -> FeedInfo;

    /// Normalized items, in the order the format prescribes
    fn parse_feed_items(&self) -> Vec<FeedItem>;
}
