use crate::edition::Edition;
use crate::types::SourceId;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Order candidate sources; later means a newer revision of the same
/// edition. The current edition comes first, as it does in encounter order,
/// and history files follow by name in plain byte-wise order, the same order
/// the listing is sorted in. Names whose order does not track recency will
/// pick the wrong revision.
pub fn compare_source_ids(a: &SourceId, b: &SourceId) -> Ordering {
    match (a, b) {
        (SourceId::Latest(_), SourceId::History(_)) => Ordering::Less,
        (SourceId::History(_), SourceId::Latest(_)) => Ordering::Greater,
        _ => a.name().cmp(b.name()),
    }
}

/// Whether `candidate` should replace `current` as the canonical edition for
/// their shared date. Later source name first, then longer HTML; a full tie
/// keeps `current`.
pub fn prefers(candidate: &Edition, current: &Edition) -> bool {
    match compare_source_ids(candidate.source_id(), current.source_id()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate.content_html().len() > current.content_html().len(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub candidates: usize,
    pub duplicates_collapsed: usize,
    pub before_cutoff: usize,
    pub beyond_window: usize,
}

pub struct Reconciler {
    cutoff_date: NaiveDate,
    max_items: usize,
}

impl Reconciler {
    pub fn new(cutoff_date: NaiveDate, max_items: usize) -> Self {
        Self {
            cutoff_date,
            max_items,
        }
    }

    /// Collapse candidates to one edition per date, newest first, honouring
    /// the cutoff and the rolling window. Candidates are taken in encounter
    /// order; the latest edition gets no special treatment.
    pub fn reconcile<I>(&self, candidates: I) -> (Vec<Edition>, ReconcileReport)
    where
        I: IntoIterator<Item = Edition>,
    {
        let mut report = ReconcileReport::default();
        let mut by_date: BTreeMap<NaiveDate, Edition> = BTreeMap::new();

        for candidate in candidates {
            report.candidates += 1;

            match by_date.get_mut(&candidate.edition_date()) {
                None => {
                    by_date.insert(candidate.edition_date(), candidate);
                }
                Some(current) => {
                    report.duplicates_collapsed += 1;
                    if prefers(&candidate, current) {
                        debug!(
                            "Edition {}: {} supersedes {}",
                            candidate.edition_date(),
                            candidate.source_id(),
                            current.source_id()
                        );
                        *current = candidate;
                    } else {
                        debug!(
                            "Edition {}: keeping {} over {}",
                            current.edition_date(),
                            current.source_id(),
                            candidate.source_id()
                        );
                    }
                }
            }
        }

        let eligible: Vec<Edition> = by_date
            .into_values()
            .rev()
            .filter(|edition| edition.edition_date() >= self.cutoff_date)
            .collect();
        report.before_cutoff = report.candidates - report.duplicates_collapsed - eligible.len();

        let mut editions = eligible;
        if editions.len() > self.max_items {
            report.beyond_window = editions.len() - self.max_items;
            editions.truncate(self.max_items);
        }

        info!(
            "Reconciled {} candidates into {} editions ({} duplicates, {} before {}, {} beyond window)",
            report.candidates,
            editions.len(),
            report.duplicates_collapsed,
            report.before_cutoff,
            self.cutoff_date,
            report.beyond_window
        );

        (editions, report)
    }
}
