use crate::types::{FeedError, FetchConfig, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_CUTOFF_DATE: &str = "2025-10-17";
pub const DEFAULT_MAX_ITEMS: usize = 12;
pub const DEFAULT_HISTORY_CONCURRENCY: usize = 4;

const DEFAULT_SOURCE_REPO: &str = "nuuuwan/lk_news_digest";
const DEFAULT_FEED_BASE_URL: &str = "https://nandulak.github.io/lk-news-weekly-feed";

/// Coordinates of the upstream digest repository.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// `owner/name`
    pub repo: String,
    pub branch: String,
    pub latest_path: String,
    pub history_dir: String,
    pub raw_base_url: String,
    pub api_base_url: String,
    pub web_base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            repo: DEFAULT_SOURCE_REPO.to_string(),
            branch: "main".to_string(),
            latest_path: "README.md".to_string(),
            history_dir: "data/history".to_string(),
            raw_base_url: "https://raw.githubusercontent.com".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            web_base_url: "https://github.com".to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn latest_raw_url(&self) -> Result<Url> {
        join_url(
            &self.raw_base_url,
            &format!("{}/{}/{}", self.repo, self.branch, self.latest_path),
        )
    }

    pub fn latest_page_url(&self) -> Result<Url> {
        join_url(
            &self.web_base_url,
            &format!("{}/blob/{}/{}", self.repo, self.branch, self.latest_path),
        )
    }

    pub fn history_listing_url(&self) -> Result<Url> {
        let mut url = join_url(
            &self.api_base_url,
            &format!("repos/{}/contents/{}", self.repo, self.history_dir),
        )?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }

    pub fn home_page_url(&self) -> Result<Url> {
        join_url(&self.web_base_url, &self.repo)
    }
}

/// Channel-level metadata shared by both feed formats.
#[derive(Debug, Clone)]
pub struct FeedMetadata {
    pub title: String,
    pub description: String,
    pub home_page_url: String,
    pub rss_url: String,
    pub json_url: String,
    pub language: String,
    pub guid_prefix: String,
    pub generator: String,
}

impl Default for FeedMetadata {
    fn default() -> Self {
        Self {
            title: "Sri Lanka This Week".to_string(),
            description: "Curated weekly digest of Sri Lanka news, generated from vetted English-language sources.".to_string(),
            home_page_url: format!("https://github.com/{}", DEFAULT_SOURCE_REPO),
            rss_url: format!("{}/feed.xml", DEFAULT_FEED_BASE_URL),
            json_url: format!("{}/feed.json", DEFAULT_FEED_BASE_URL),
            language: "en-LK".to_string(),
            guid_prefix: "lk-news-weekly".to_string(),
            generator: "lk-news-digest-feed-builder".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub rss_file: String,
    pub json_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            rss_file: "feed.xml".to_string(),
            json_file: "feed.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn rss_path(&self) -> PathBuf {
        self.dir.join(&self.rss_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(&self.json_file)
    }
}

/// Immutable run configuration, validated once before any network activity.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub cutoff_date: NaiveDate,
    pub max_items: usize,
    pub history_concurrency: usize,
    pub upstream: UpstreamConfig,
    pub feed: FeedMetadata,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
}

impl FeedConfig {
    /// Configuration with deployment defaults for everything but the window.
    pub fn new(cutoff_date: NaiveDate, max_items: usize) -> Result<Self> {
        let config = Self {
            cutoff_date,
            max_items,
            history_concurrency: DEFAULT_HISTORY_CONCURRENCY,
            upstream: UpstreamConfig::default(),
            feed: FeedMetadata::default(),
            output: OutputConfig::default(),
            fetch: FetchConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_items == 0 {
            return Err(FeedError::Config("max_items must be a positive integer".to_string()));
        }
        if self.history_concurrency == 0 {
            return Err(FeedError::Config("history_concurrency must be at least 1".to_string()));
        }
        if self.upstream.repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(FeedError::Config(format!(
                "source repository must look like owner/name, got {:?}",
                self.upstream.repo
            )));
        }

        for (name, value) in [
            ("home_page_url", &self.feed.home_page_url),
            ("rss_url", &self.feed.rss_url),
            ("json_url", &self.feed.json_url),
        ] {
            Url::parse(value).map_err(|e| FeedError::Config(format!("{name} {value:?}: {e}")))?;
        }

        self.upstream.latest_raw_url()?;
        self.upstream.history_listing_url()?;
        Ok(())
    }
}

pub fn parse_cutoff_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| FeedError::Config(format!("cutoff date {value:?} is not YYYY-MM-DD: {e}")))
}

fn join_url(base: &str, path: &str) -> Result<Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| FeedError::Config(format!("upstream URL {joined:?}: {e}")))
}

/// Build RSS 2.0 and JSON Feed 1.1 documents from the weekly Sri Lanka news digest.
#[derive(Debug, Parser)]
#[command(name = "lk-news-feed", version)]
pub struct Cli {
    /// Earliest edition date (YYYY-MM-DD) included in the feeds
    #[arg(long, env = "LK_FEED_CUTOFF_DATE", default_value = DEFAULT_CUTOFF_DATE)]
    pub cutoff_date: String,

    /// Number of most recent editions kept in the feeds
    #[arg(long, env = "LK_FEED_MAX_ITEMS", default_value_t = DEFAULT_MAX_ITEMS)]
    pub max_items: usize,

    /// Upstream repository as owner/name
    #[arg(long, env = "LK_FEED_SOURCE_REPO", default_value = DEFAULT_SOURCE_REPO)]
    pub source_repo: String,

    #[arg(long, env = "LK_FEED_SOURCE_BRANCH", default_value = "main")]
    pub source_branch: String,

    /// Path of the current edition inside the upstream repository
    #[arg(long, env = "LK_FEED_LATEST_PATH", default_value = "README.md")]
    pub latest_path: String,

    /// Directory holding historical editions inside the upstream repository
    #[arg(long, env = "LK_FEED_HISTORY_DIR", default_value = "data/history")]
    pub history_dir: String,

    /// Public URL the feeds are served from
    #[arg(long, env = "LK_FEED_BASE_URL", default_value = DEFAULT_FEED_BASE_URL)]
    pub feed_base_url: String,

    #[arg(long, env = "LK_FEED_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum concurrent history file downloads
    #[arg(long, env = "LK_FEED_HISTORY_CONCURRENCY", default_value_t = DEFAULT_HISTORY_CONCURRENCY)]
    pub history_concurrency: usize,

    #[arg(long, env = "LK_FEED_TIMEOUT_SECONDS", default_value_t = 30)]
    pub timeout_seconds: u64,

    #[arg(long, env = "LK_FEED_MAX_RETRIES", default_value_t = 2)]
    pub max_retries: u32,
}

impl Cli {
    pub fn into_config(self) -> Result<FeedConfig> {
        let cutoff_date = parse_cutoff_date(&self.cutoff_date)?;

        let upstream = UpstreamConfig {
            repo: self.source_repo,
            branch: self.source_branch,
            latest_path: self.latest_path,
            history_dir: self.history_dir,
            ..UpstreamConfig::default()
        };

        let feed_base = self.feed_base_url.trim_end_matches('/');
        let feed = FeedMetadata {
            home_page_url: upstream.home_page_url()?.to_string(),
            rss_url: format!("{}/feed.xml", feed_base),
            json_url: format!("{}/feed.json", feed_base),
            ..FeedMetadata::default()
        };

        let fetch = FetchConfig {
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
            ..FetchConfig::default()
        };

        let config = FeedConfig {
            cutoff_date,
            max_items: self.max_items,
            history_concurrency: self.history_concurrency,
            upstream,
            feed,
            output: OutputConfig {
                dir: self.output_dir,
                ..OutputConfig::default()
            },
            fetch,
        };
        config.validate()?;
        Ok(config)
    }
}
