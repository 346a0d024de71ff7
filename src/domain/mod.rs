pub mod feed;
pub mod item;

pub use feed::{FeedFormat, FeedInfo};
pub use item::FeedItem;
