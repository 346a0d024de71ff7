pub mod dates;
pub mod domain;
pub mod errors;
pub mod heuristics;
pub mod parsers;

pub use domain::{FeedFormat, FeedInfo, FeedItem};
pub use errors::{ParseError, ParseResult};
pub use parsers::{create, FeedParser};
