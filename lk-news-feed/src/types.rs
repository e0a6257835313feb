use serde::Deserialize;
use std::fmt;

/// Identity of a fetched document. The current edition ranks before every
/// history file, so a history snapshot for the same date supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// The current edition, by its path in the repository.
    Latest(String),
    /// A file in the history directory, by its name.
    History(String),
}

impl SourceId {
    pub fn latest(path: impl Into<String>) -> Self {
        SourceId::Latest(path.into())
    }

    pub fn history(name: impl Into<String>) -> Self {
        SourceId::History(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            SourceId::Latest(name) | SourceId::History(name) => name,
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, SourceId::Latest(_))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw Markdown as fetched from upstream, before any parsing.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source_id: SourceId,
    /// Human-facing page for the document, used as the feed item link.
    pub page_url: String,
    pub raw_text: String,
}

/// One entry of a GitHub contents API directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
    pub html_url: Option<String>,
}

impl HistoryEntry {
    /// Any regular file with a Markdown extension is a candidate edition,
    /// whatever its naming scheme.
    pub fn is_markdown_file(&self) -> bool {
        self.kind == "file"
            && self.name.to_lowercase().ends_with(".md")
            && self.download_url.is_some()
    }

    pub fn page_url(&self) -> &str {
        self.html_url
            .as_deref()
            .or(self.download_url.as_deref())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_document_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "lk-news-digest-feed-builder/1.0 (+https://github.com/nandulak/lk-news-weekly-feed)".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_seconds: 2,
            max_document_size_mb: 5,
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    pub fn max_document_bytes(&self) -> u64 {
        self.max_document_size_mb as u64 * 1024 * 1024
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected history listing: {0}")]
    Listing(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No edition date found in {source_id}")]
    Parse { source_id: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;
