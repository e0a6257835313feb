#![allow(dead_code)]

// Shared fixtures: digest Markdown builders and in-memory sources.
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use lk_news_feed::{
    DigestSource, Edition, FeedConfig, FeedError, HistoryEntry, MarkdownRenderer, RawDocument, Result,
    SourceId,
};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// A digest shaped like the upstream README for the week starting `edition`.
pub fn digest_markdown(edition: &str, source_count: u32, lead: &str) -> String {
    let start = date(edition);
    let end = start + Duration::days(7);
    format!(
        "# 🇱🇰 Sri Lanka This Week — {start}\r\n\
         \r\n\
         ![LastUpdated](https://img.shields.io/badge/LastUpdated-{start}-green)\r\n\
         \r\n\
         *Generated by AI from **{source_count}** English News Articles published between **{start}** & **{end}***\r\n\
         \r\n\
         {lead}\r\n\
         \r\n\
         ## Economy\r\n\
         \r\n\
         - Treasury bill yields eased for a third week\r\n\
         - Tourist arrivals passed the annual target\r\n\
         \r\n\
         ## Model Prompt\r\n\
         \r\n\
         Summarise the following articles...\r\n",
        start = start.format("%Y-%m-%d"),
        end = end.format("%Y-%m-%d"),
    )
}

pub fn raw_document(source_id: &str, raw_text: impl Into<String>) -> RawDocument {
    RawDocument {
        source_id: SourceId::history(source_id),
        page_url: format!("https://github.com/nuuuwan/lk_news_digest/blob/main/data/history/{}", source_id),
        raw_text: raw_text.into(),
    }
}

pub fn history_entry(name: &str) -> HistoryEntry {
    HistoryEntry {
        name: name.to_string(),
        kind: "file".to_string(),
        download_url: Some(format!(
            "https://raw.githubusercontent.com/nuuuwan/lk_news_digest/main/data/history/{}",
            name
        )),
        html_url: Some(format!(
            "https://github.com/nuuuwan/lk_news_digest/blob/main/data/history/{}",
            name
        )),
    }
}

pub fn edition(edition_date: &str, source_id: &str, content_html: &str) -> Edition {
    Edition::new(
        date(edition_date),
        SourceId::history(source_id),
        Some(100),
        content_html,
        format!("https://example.com/{}", source_id),
    )
}

pub fn latest_edition(edition_date: &str, content_html: &str) -> Edition {
    Edition::new(
        date(edition_date),
        SourceId::latest("README.md"),
        Some(100),
        content_html,
        "https://github.com/nuuuwan/lk_news_digest/blob/main/README.md",
    )
}

pub fn test_config(cutoff: &str, max_items: usize) -> FeedConfig {
    FeedConfig::new(date(cutoff), max_items).unwrap()
}

/// Upstream held in memory. History files without a body fail to fetch.
#[derive(Default)]
pub struct MemorySource {
    pub latest: Option<RawDocument>,
    pub history: Vec<(HistoryEntry, Option<String>)>,
    pub listing_fails: bool,
}

impl MemorySource {
    pub fn with_latest(raw_text: impl Into<String>) -> Self {
        Self {
            latest: Some(RawDocument {
                source_id: SourceId::latest("README.md"),
                page_url: "https://github.com/nuuuwan/lk_news_digest/blob/main/README.md".to_string(),
                raw_text: raw_text.into(),
            }),
            ..Self::default()
        }
    }

    pub fn history_file(mut self, name: &str, raw_text: impl Into<String>) -> Self {
        self.history.push((history_entry(name), Some(raw_text.into())));
        self
    }

    pub fn broken_history_file(mut self, name: &str) -> Self {
        self.history.push((history_entry(name), None));
        self
    }
}

#[async_trait]
impl DigestSource for MemorySource {
    fn source_name(&self) -> String {
        "memory".to_string()
    }

    async fn fetch_latest(&self) -> Result<RawDocument> {
        self.latest.clone().ok_or_else(|| FeedError::Network {
            url: "memory://README.md".to_string(),
            reason: "connection refused".to_string(),
        })
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        if self.listing_fails {
            return Err(FeedError::Network {
                url: "memory://data/history".to_string(),
                reason: "HTTP 403 Forbidden".to_string(),
            });
        }
        let mut entries: Vec<HistoryEntry> = self.history.iter().map(|(entry, _)| entry.clone()).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn fetch_history_file(&self, entry: &HistoryEntry) -> Result<RawDocument> {
        let body = self
            .history
            .iter()
            .find(|(candidate, _)| candidate.name == entry.name)
            .and_then(|(_, body)| body.clone());

        match body {
            Some(raw_text) => Ok(raw_document(&entry.name, raw_text)),
            None => Err(FeedError::Network {
                url: format!("memory://data/history/{}", entry.name),
                reason: "connection reset".to_string(),
            }),
        }
    }
}

pub struct FailingRenderer;

impl MarkdownRenderer for FailingRenderer {
    fn render(&self, _markdown: &str) -> Result<String> {
        Err(FeedError::Render("renderer unavailable".to_string()))
    }
}
