pub mod types;
pub mod config;
pub mod traits;
pub mod fetcher;
pub mod sources;
pub mod extract;
pub mod markdown;
pub mod edition;
pub mod parser;
pub mod reconcile;
pub mod summary;
pub mod render;
pub mod pipeline;

pub use types::*;
pub use config::{Cli, FeedConfig, FeedMetadata, OutputConfig, UpstreamConfig};
pub use traits::{DigestSource, FeedRenderer, MarkdownRenderer};
pub use fetcher::Fetcher;
pub use sources::GithubDigestSource;
pub use markdown::ComrakRenderer;
pub use edition::Edition;
pub use parser::EditionParser;
pub use reconcile::{ReconcileReport, Reconciler};
pub use render::{JsonFeedRenderer, RssRenderer};
pub use pipeline::{FeedPipeline, RunSummary};
