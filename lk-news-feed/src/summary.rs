use once_cell::sync::Lazy;
use regex::Regex;

pub const SUMMARY_MAX_CHARS: usize = 400;

static BLOCK_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(?:p|h[1-6]|li|blockquote|pre|tr|table|ul|ol|div|section)\s*>").expect("block end regex")
});
static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex"));

/// Plain-text paragraphs of an HTML fragment, tags stripped and entities
/// decoded. Block-level elements become paragraph boundaries.
pub fn html_paragraphs(html: &str) -> Vec<String> {
    let with_breaks = BLOCK_END_RE.replace_all(html, "$0\n\n");
    let with_breaks = LINE_BREAK_RE.replace_all(&with_breaks, "\n");
    let text = TAG_RE.replace_all(&with_breaks, "");
    let text = html_escape::decode_html_entities(&text);

    PARAGRAPH_BREAK_RE
        .split(&text)
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect()
}

/// First substantial paragraph of the digest, shortened for feed readers.
///
/// Structural paragraphs (the digest heading, the "generated by" line,
/// reference and prompt sections) are skipped when anything else remains.
pub fn summarize(html: &str, feed_title: &str) -> String {
    let paragraphs = html_paragraphs(html);
    let title = feed_title.to_lowercase();

    let first = paragraphs
        .iter()
        .find(|p| !is_structural(p, &title))
        .or_else(|| paragraphs.first())
        .map(String::as_str)
        .unwrap_or("");

    truncate_at_word(first, SUMMARY_MAX_CHARS)
}

fn is_structural(paragraph: &str, title: &str) -> bool {
    let lower = paragraph.to_lowercase();
    let bare = lower.trim_start_matches(|c: char| !c.is_alphanumeric());

    (!title.is_empty() && bare.starts_with(title))
        || (lower.contains("generated by") && lower.contains("english news articles"))
        || bare.starts_with("previous editions")
        || bare.starts_with("references")
        || bare.starts_with("model prompt")
}

/// Cut `text` to at most `max_chars` characters, backing up to the last
/// space and appending an ellipsis.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    let cut = match truncated.rfind(' ') {
        Some(last_space) => &truncated[..last_space],
        None => truncated.as_str(),
    };
    format!("{}…", cut.trim_end())
}
