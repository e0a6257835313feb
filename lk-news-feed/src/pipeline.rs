use crate::config::FeedConfig;
use crate::edition::Edition;
use crate::parser::EditionParser;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::render::{verify_feed, JsonFeedRenderer, RssRenderer};
use crate::traits::{DigestSource, FeedRenderer, MarkdownRenderer};
use crate::types::{RawDocument, Result};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of one run, logged by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub latest_date: NaiveDate,
    pub history_listed: usize,
    pub history_fetched: usize,
    pub history_failed: usize,
    pub parse_failures: usize,
    pub reconcile: ReconcileReport,
    pub items_written: usize,
}

/// A serialized feed ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedFeed {
    pub format_name: &'static str,
    pub path: PathBuf,
    pub document: String,
}

/// Every history document that could be fetched, in listing order.
#[derive(Debug, Default)]
pub struct HistoryGather {
    pub documents: Vec<RawDocument>,
    pub listed: usize,
    pub failed: usize,
}

/// Fetch → parse → reconcile → render → write.
pub struct FeedPipeline<S, M> {
    config: FeedConfig,
    source: S,
    parser: EditionParser<M>,
    reconciler: Reconciler,
    renderers: Vec<(Box<dyn FeedRenderer>, PathBuf)>,
}

impl<S: DigestSource, M: MarkdownRenderer> FeedPipeline<S, M> {
    pub fn new(config: FeedConfig, source: S, markdown: M) -> Self {
        let reconciler = Reconciler::new(config.cutoff_date, config.max_items);
        let renderers: Vec<(Box<dyn FeedRenderer>, PathBuf)> = vec![
            (Box::new(RssRenderer), config.output.rss_path()),
            (Box::new(JsonFeedRenderer), config.output.json_path()),
        ];

        Self {
            config,
            source,
            parser: EditionParser::new(markdown),
            reconciler,
            renderers,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Run the whole pipeline and overwrite both feed files.
    pub async fn run(&self) -> Result<RunSummary> {
        let (feeds, summary) = self.build().await?;

        write_all_atomically(&feeds).await?;
        for feed in &feeds {
            info!("Wrote {} feed to {}", feed.format_name, feed.path.display());
        }

        info!(
            "Run complete: latest edition {}, {} items, history {}/{} fetched ({} failed), {} unparseable",
            summary.latest_date,
            summary.items_written,
            summary.history_fetched,
            summary.history_listed,
            summary.history_failed,
            summary.parse_failures
        );
        Ok(summary)
    }

    /// Everything up to, but not including, writing the files.
    pub async fn build(&self) -> Result<(Vec<RenderedFeed>, RunSummary)> {
        info!("Building feeds from {}", self.source.source_name());

        // The latest edition is mandatory: without it the feed would silently go stale.
        let latest_document = self.source.fetch_latest().await.map_err(|e| {
            error!("Failed to fetch latest edition: {}", e);
            e
        })?;
        let latest = self.parser.parse(&latest_document).map_err(|e| {
            error!("Failed to parse latest edition {}: {}", latest_document.source_id, e);
            e
        })?;
        let latest_date = latest.edition_date();
        info!("Latest edition is {} ({})", latest_date, latest.source_id());

        let history = self.gather_history().await;
        let history_fetched = history.documents.len();
        let (historical, parse_failures) = self.parse_history(&history.documents);

        let candidates = std::iter::once(latest).chain(historical);
        let (editions, reconcile) = self.reconciler.reconcile(candidates);

        let feeds = self.render(&editions)?;

        let summary = RunSummary {
            latest_date,
            history_listed: history.listed,
            history_fetched,
            history_failed: history.failed,
            parse_failures,
            reconcile,
            items_written: editions.len(),
        };
        Ok((feeds, summary))
    }

    /// Fetch all history files with bounded parallelism. Results are
    /// collected in listing order before anything downstream sees them.
    pub async fn gather_history(&self) -> HistoryGather {
        let entries = match self.source.list_history().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list history editions, continuing with latest only: {}", e);
                return HistoryGather::default();
            }
        };

        let results: Vec<_> = stream::iter(entries.iter())
            .map(|entry| async move { (entry.name.as_str(), self.source.fetch_history_file(entry).await) })
            .buffered(self.config.history_concurrency)
            .collect()
            .await;

        let mut gather = HistoryGather {
            listed: entries.len(),
            ..HistoryGather::default()
        };

        for (name, result) in results {
            match result {
                Ok(document) => gather.documents.push(document),
                Err(e) => {
                    warn!("Skipping history file {}: {}", name, e);
                    gather.failed += 1;
                }
            }
        }

        info!(
            "Fetched {} of {} history files ({} failed)",
            gather.documents.len(),
            gather.listed,
            gather.failed
        );
        gather
    }

    fn parse_history(&self, documents: &[RawDocument]) -> (Vec<Edition>, usize) {
        let mut editions = Vec::with_capacity(documents.len());
        let mut failures = 0;

        for document in documents {
            match self.parser.parse(document) {
                Ok(edition) => editions.push(edition),
                Err(e) => {
                    warn!("Dropping history file {}: {}", document.source_id, e);
                    failures += 1;
                }
            }
        }

        debug!("Parsed {} history editions, {} failures", editions.len(), failures);
        (editions, failures)
    }

    /// Render every format and verify each before anything is written.
    pub fn render(&self, editions: &[Edition]) -> Result<Vec<RenderedFeed>> {
        self.renderers
            .iter()
            .map(|(renderer, path)| {
                let document = renderer.render(editions, &self.config.feed)?;
                verify_feed(renderer.format_name(), &document, editions.len())?;
                Ok(RenderedFeed {
                    format_name: renderer.format_name(),
                    path: path.clone(),
                    document,
                })
            })
            .collect()
    }
}

/// Write every feed through a sibling temp file so readers never see a
/// partial feed. Renames start only once all of them are staged, so the
/// published files always come from the same run.
/// Staged files are removed if any write fails.
pub async fn write_all_atomically(feeds: &[RenderedFeed]) -> Result<()> {
    let mut staged = Vec::with_capacity(feeds.len());

    for feed in feeds {
        match stage(&feed.path, &feed.document).await {
            Ok(tmp_path) => staged.push((tmp_path, feed.path.as_path())),
            Err(e) => {
                error!("Failed to stage {} feed at {}: {}", feed.format_name, feed.path.display(), e);
                discard(staged.iter().map(|(tmp_path, _)| tmp_path.as_path())).await;
                return Err(e);
            }
        }
    }

    for (tmp_path, path) in &staged {
        tokio::fs::rename(tmp_path, path).await?;
    }
    Ok(())
}

async fn stage(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp_path = temp_path(path);
    tokio::fs::write(&tmp_path, contents).await?;
    Ok(tmp_path)
}

async fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Could not remove staged file {}: {}", path.display(), e);
        }
    }
}

/// `.feed.xml.tmp` next to `feed.xml`.
pub fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feed".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
