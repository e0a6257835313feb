use crate::traits::MarkdownRenderer;
use crate::types::Result;
use comrak::{markdown_to_html, Options};
use once_cell::sync::Lazy;
use regex::Regex;

static LAST_UPDATED_BADGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*!\[LastUpdated\]\([^)]+\)[ \t]*$").expect("badge regex")
});

static MODEL_PROMPT_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^##[ \t]*Model Prompt.*\z").expect("model prompt regex"));

/// Strip repository furniture so the feed carries only the digest itself:
/// line endings are normalised, `LastUpdated` badges dropped, and the
/// trailing `## Model Prompt` section removed.
pub fn clean_digest_markdown(markdown: &str) -> String {
    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let without_badges = LAST_UPDATED_BADGE_RE.replace_all(&normalized, "");
    let without_prompt = MODEL_PROMPT_SECTION_RE.replace(&without_badges, "");
    without_prompt.trim().to_string()
}

/// GitHub-flavoured Markdown via comrak.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComrakRenderer;

impl ComrakRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.tasklist = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.footnotes = true;
        options.extension.tagfilter = true;
        options.parse.smart = true;
        options.render.unsafe_ = true;

        Ok(markdown_to_html(markdown, &options).trim().to_string())
    }
}
