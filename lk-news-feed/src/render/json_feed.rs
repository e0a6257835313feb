use crate::config::FeedMetadata;
use crate::edition::Edition;
use crate::summary::summarize;
use crate::traits::FeedRenderer;
use crate::types::Result;
use serde::{Deserialize, Serialize};

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

/// JSON Feed 1.1 document. See <https://jsonfeed.org/version/1.1>.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonFeed {
    pub version: String,
    pub title: String,
    pub home_page_url: String,
    pub feed_url: String,
    pub description: String,
    pub language: String,
    pub items: Vec<JsonFeedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonFeedItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub date_published: String,
    pub content_html: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
}

impl JsonFeed {
    pub fn from_editions(editions: &[Edition], metadata: &FeedMetadata) -> Self {
        let items = editions
            .iter()
            .map(|edition| JsonFeedItem {
                id: edition.guid(&metadata.guid_prefix),
                title: edition.title(&metadata.title),
                url: edition.url().to_string(),
                date_published: edition.pub_date_iso(),
                content_html: edition.content_html().to_string(),
                summary: summarize(edition.content_html(), &metadata.title),
            })
            .collect();

        Self {
            version: JSON_FEED_VERSION.to_string(),
            title: metadata.title.clone(),
            home_page_url: metadata.home_page_url.clone(),
            feed_url: metadata.json_url.clone(),
            description: metadata.description.clone(),
            language: metadata.language.clone(),
            items,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFeedRenderer;

impl FeedRenderer for JsonFeedRenderer {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn render(&self, editions: &[Edition], metadata: &FeedMetadata) -> Result<String> {
        let feed = JsonFeed::from_editions(editions, metadata);
        let mut document = serde_json::to_string_pretty(&feed)?;
        document.push('\n');
        Ok(document)
    }
}
