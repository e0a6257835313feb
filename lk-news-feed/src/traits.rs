use crate::config::FeedMetadata;
use crate::edition::Edition;
use crate::types::{HistoryEntry, RawDocument, Result};
use async_trait::async_trait;

/// Trait for pulling digest editions from an upstream repository
#[async_trait]
pub trait DigestSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch the current edition. Failure here is fatal to a run.
    async fn fetch_latest(&self) -> Result<RawDocument>;

    /// List candidate history files, sorted by name ascending.
    async fn list_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Fetch one history file previously returned by `list_history`.
    async fn fetch_history_file(&self, entry: &HistoryEntry) -> Result<RawDocument>;
}

/// Markdown to HTML transform, injected so tests can swap it out.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String>;
}

/// Serializes the canonical edition list into one feed format.
pub trait FeedRenderer: Send + Sync {
    /// Short format name used in logs, e.g. `rss`.
    fn format_name(&self) -> &'static str;

    fn render(&self, editions: &[Edition], metadata: &FeedMetadata) -> Result<String>;
}
