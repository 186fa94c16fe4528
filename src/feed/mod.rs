mod fetch;
mod parse;

pub use fetch::fetch_feed;
pub use parse::{episodes_from_entries, parse_feed, Episode, FeedEntry, MediaLink};
