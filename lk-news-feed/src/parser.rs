use crate::edition::Edition;
use crate::extract::{extract_edition_date, extract_source_count};
use crate::markdown::clean_digest_markdown;
use crate::traits::MarkdownRenderer;
use crate::types::{FeedError, RawDocument, Result};
use tracing::{debug, warn};

pub struct EditionParser<R> {
    renderer: R,
}

impl<R: MarkdownRenderer> EditionParser<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Turn one fetched document into an [`Edition`].
    ///
    /// Fails only when no edition date can be found. A missing source count
    /// is left unset, and a renderer failure degrades to escaped raw text.
    pub fn parse(&self, document: &RawDocument) -> Result<Edition> {
        let markdown = clean_digest_markdown(&document.raw_text);

        let edition_date = extract_edition_date(&markdown).ok_or_else(|| FeedError::Parse {
            source_id: document.source_id.to_string(),
        })?;
        let source_count = extract_source_count(&markdown);

        let content_html = match self.renderer.render(&markdown) {
            Ok(html) if !html.trim().is_empty() => html,
            Ok(_) => {
                warn!("Renderer produced empty HTML for {}, using raw text", document.source_id);
                fallback_html(&markdown)
            }
            Err(e) => {
                warn!("Failed to render {}: {}, using raw text", document.source_id, e);
                fallback_html(&markdown)
            }
        };

        debug!(
            "Parsed {}: edition {} with {:?} sources ({} bytes HTML)",
            document.source_id,
            edition_date,
            source_count,
            content_html.len()
        );

        Ok(Edition::new(
            edition_date,
            document.source_id.clone(),
            source_count,
            content_html,
            document.page_url.clone(),
        ))
    }
}

fn fallback_html(markdown: &str) -> String {
    format!("<pre>{}</pre>", html_escape::encode_text(markdown))
}
