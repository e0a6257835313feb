use crate::config::UpstreamConfig;
use crate::traits::DigestSource;
use crate::types::{FeedError, FetchConfig, HistoryEntry, RawDocument, Result, SourceId};
use crate::Fetcher;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Digest editions hosted in a GitHub repository: the current edition at a
/// fixed path plus a directory of historical snapshots.
pub struct GithubDigestSource {
    upstream: UpstreamConfig,
    fetcher: Fetcher,
}

impl GithubDigestSource {
    pub fn new(upstream: UpstreamConfig, fetch_config: FetchConfig) -> Result<Self> {
        let fetcher = Fetcher::new(fetch_config)?;
        Ok(Self { upstream, fetcher })
    }
}

#[async_trait]
impl DigestSource for GithubDigestSource {
    fn source_name(&self) -> String {
        format!("github:{}@{}", self.upstream.repo, self.upstream.branch)
    }

    async fn fetch_latest(&self) -> Result<RawDocument> {
        let url = self.upstream.latest_raw_url()?;
        let raw_text = self.fetcher.fetch_text(url.as_str()).await?;

        Ok(RawDocument {
            source_id: SourceId::latest(self.upstream.latest_path.as_str()),
            page_url: self.upstream.latest_page_url()?.to_string(),
            raw_text,
        })
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let url = self.upstream.history_listing_url()?;
        let listing: serde_json::Value = self.fetcher.fetch_json(url.as_str()).await?;
        let total = listing.as_array().map_or(0, Vec::len);
        let entries = history_entries_from_listing(listing)?;

        info!(
            "Listed {} history entries in {}, {} markdown files",
            total,
            self.upstream.history_dir,
            entries.len()
        );
        Ok(entries)
    }

    async fn fetch_history_file(&self, entry: &HistoryEntry) -> Result<RawDocument> {
        let download_url = entry.download_url.as_deref().ok_or_else(|| FeedError::Network {
            url: entry.name.clone(),
            reason: "history entry has no download_url".to_string(),
        })?;

        debug!("Fetching history file {}", entry.name);
        let raw_text = self.fetcher.fetch_text(download_url).await?;

        Ok(RawDocument {
            source_id: SourceId::history(entry.name.as_str()),
            page_url: entry.page_url().to_string(),
            raw_text,
        })
    }
}

/// Markdown files of a contents API directory listing, sorted by name.
///
/// Directories, other extensions, entries without a download URL and
/// elements that do not look like listing entries are dropped. A response
/// that is not an array (a path naming a single file comes back as an
/// object) is an error.
pub fn history_entries_from_listing(listing: serde_json::Value) -> Result<Vec<HistoryEntry>> {
    let raw_entries = match listing {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(FeedError::Listing(format!(
                "expected a directory listing, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut entries: Vec<HistoryEntry> = raw_entries
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<HistoryEntry>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Ignoring malformed history listing entry: {}", e);
                None
            }
        })
        .filter(HistoryEntry::is_markdown_file)
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
