pub mod json_feed;
pub mod rss;

pub use json_feed::{JsonFeed, JsonFeedItem, JsonFeedRenderer};
pub use rss::RssRenderer;

use crate::types::{FeedError, Result};
use feed_rs::parser;
use tracing::debug;

/// Re-parse a rendered document and check it carries the expected number of
/// entries. Guards the published files against a malformed rewrite.
pub fn verify_feed(format_name: &str, document: &str, expected_items: usize) -> Result<()> {
    let feed = parser::parse(document.as_bytes())
        .map_err(|e| FeedError::Render(format!("{} feed does not parse: {}", format_name, e)))?;

    if feed.entries.len() != expected_items {
        return Err(FeedError::Render(format!(
            "{} feed has {} entries, expected {}",
            format_name,
            feed.entries.len(),
            expected_items
        )));
    }

    debug!("Verified {} feed with {} entries", format_name, expected_items);
    Ok(())
}
