pub mod atom;
pub mod factory;
pub mod jsonfeed;
pub mod rss;
pub mod traits;
mod xml;

pub use factory::create;
pub use traits::FeedParser;
