use anyhow::Context;
use clap::Parser;
use lk_news_feed::{Cli, ComrakRenderer, FeedPipeline, GithubDigestSource};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Configuration problems are fatal before any network activity.
    let config = Cli::parse()
        .into_config()
        .context("loading configuration")?;

    info!(
        "Starting feed build (cutoff {}, max {} items, output {})",
        config.cutoff_date,
        config.max_items,
        config.output.dir.display()
    );

    let source = GithubDigestSource::new(config.upstream.clone(), config.fetch.clone())
        .context("creating HTTP client")?;
    let pipeline = FeedPipeline::new(config, source, ComrakRenderer::new());

    match pipeline.run().await {
        Ok(summary) => {
            info!("Published {} editions", summary.items_written);
            Ok(())
        }
        Err(e) => {
            error!("Feed build failed: {}", e);
            Err(e).context("building feeds")
        }
    }
}
