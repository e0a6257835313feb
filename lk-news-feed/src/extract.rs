//! Heuristic scanners for the loosely formatted digest Markdown.
//!
//! Each field has an ordered list of matchers. They are tried in order and
//! the first one that yields a value wins.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

pub type DateMatcher = fn(&str) -> Option<NaiveDate>;
pub type CountMatcher = fn(&str) -> Option<u32>;

/// `between **2025-10-10** & **2025-10-17**`
static PROMPT_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)between\s+\*\*(\d{4}-\d{2}-\d{2})\*\*\s*&?\s*\*\*(\d{4}-\d{2}-\d{2})\*\*")
        .expect("prompt range regex")
});

/// `# 🇱🇰 Sri Lanka This Week — 2025-10-17`
static HEADING_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+[^\n]*?(\d{4}-\d{2}-\d{2})").expect("heading date regex")
});

static TITLE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)This\s+Week\s*[—–-]\s*(\d{4}-\d{2}-\d{2})").expect("title date regex")
});

/// `English News Articles: 175`
static LABELLED_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)English\s+News\s+Articles\s*\**\s*[:：]\s*\**\s*(\d[\d,]*)").expect("labelled count regex")
});

/// `from **175** English News Articles`
static INLINE_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:from\s+)?\*{0,2}\s*(\d[\d,]*)\s*\*{0,2}\s+English\s+News\s+Articles").expect("inline count regex")
});

pub const DATE_MATCHERS: &[(&str, DateMatcher)] = &[
    ("prompt_range", match_prompt_range),
    ("heading", match_heading_date),
    ("title_line", match_title_date),
];

pub const COUNT_MATCHERS: &[(&str, CountMatcher)] = &[
    ("labelled", match_labelled_count),
    ("inline", match_inline_count),
];

/// Edition date of a digest, if any matcher recognises one.
pub fn extract_edition_date(markdown: &str) -> Option<NaiveDate> {
    DATE_MATCHERS.iter().find_map(|(_, matcher)| matcher(markdown))
}

/// Number of English news articles the digest was generated from.
pub fn extract_source_count(markdown: &str) -> Option<u32> {
    COUNT_MATCHERS.iter().find_map(|(_, matcher)| matcher(markdown))
}

/// The range's start date is the edition date.
pub fn match_prompt_range(markdown: &str) -> Option<NaiveDate> {
    PROMPT_RANGE_RE
        .captures_iter(markdown)
        .find_map(|caps| parse_iso_date(&caps[1]))
}

pub fn match_heading_date(markdown: &str) -> Option<NaiveDate> {
    HEADING_DATE_RE
        .captures_iter(markdown)
        .find_map(|caps| parse_iso_date(&caps[1]))
}

pub fn match_title_date(markdown: &str) -> Option<NaiveDate> {
    TITLE_DATE_RE
        .captures_iter(markdown)
        .find_map(|caps| parse_iso_date(&caps[1]))
}

pub fn match_labelled_count(markdown: &str) -> Option<u32> {
    LABELLED_COUNT_RE
        .captures_iter(markdown)
        .find_map(|caps| parse_count(&caps[1]))
}

pub fn match_inline_count(markdown: &str) -> Option<u32> {
    INLINE_COUNT_RE
        .captures_iter(markdown)
        .find_map(|caps| parse_count(&caps[1]))
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_count(value: &str) -> Option<u32> {
    value.replace(',', "").parse().ok()
}
