use crate::types::SourceId;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Editions are published at 06:00 Sri Lanka time.
pub const PUBLISH_MINUTES_AFTER_MIDNIGHT: i64 = 6 * 60;

/// Sri Lanka Standard Time is UTC+05:30 all year round.
pub const LKT_OFFSET_MINUTES: i64 = 5 * 60 + 30;

/// One weekly digest, identified by its edition date.
///
/// The date is fixed at construction; publication time, title and guid are
/// always derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    edition_date: NaiveDate,
    source_id: SourceId,
    source_count: Option<u32>,
    content_html: String,
    url: String,
}

impl Edition {
    pub fn new(
        edition_date: NaiveDate,
        source_id: SourceId,
        source_count: Option<u32>,
        content_html: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            edition_date,
            source_id,
            source_count,
            content_html: content_html.into(),
            url: url.into(),
        }
    }

    pub fn edition_date(&self) -> NaiveDate {
        self.edition_date
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    pub fn source_count(&self) -> Option<u32> {
        self.source_count
    }

    pub fn content_html(&self) -> &str {
        &self.content_html
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        publication_time(self.edition_date)
    }

    /// `Sri Lanka This Week — 2025-10-17 (175 sources)`
    pub fn title(&self, feed_title: &str) -> String {
        match self.source_count {
            Some(count) if count > 0 => {
                format!("{} — {} ({} sources)", feed_title, self.date_label(), count)
            }
            _ => format!("{} — {}", feed_title, self.date_label()),
        }
    }

    /// Stable across rebuilds so readers never see a date twice.
    pub fn guid(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.date_label())
    }

    /// RFC 822 form used by RSS `pubDate`.
    pub fn pub_date_rfc822(&self) -> String {
        self.published_at()
            .format("%a, %d %b %Y %H:%M:%S +0000")
            .to_string()
    }

    /// RFC 3339 form used by JSON Feed `date_published`.
    pub fn pub_date_iso(&self) -> String {
        self.published_at()
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }

    fn date_label(&self) -> String {
        self.edition_date.format("%Y-%m-%d").to_string()
    }
}

/// 06:00 at UTC+05:30 on `date`, expressed in UTC (00:30 the same day).
pub fn publication_time(date: NaiveDate) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN) + Duration::minutes(PUBLISH_MINUTES_AFTER_MIDNIGHT);
    let utc = local - Duration::minutes(LKT_OFFSET_MINUTES);
    Utc.from_utc_datetime(&utc)
}
