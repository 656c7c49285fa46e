//! Entry grouping: the validation boundary and the partition of occurrences
//! into candidate series.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use weekwise_core::{GroupKey, Occurrence, RawOccurrence, Warning};

/// Occurrences sharing a [`GroupKey`], sorted ascending by date (ties broken
/// by start time, then input order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesGroup {
    pub key: GroupKey,
    pub occurrences: Vec<Occurrence>,
}

impl SeriesGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Dates of the occurrences, in group order. Unique after grouping.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.occurrences.iter().map(|o| o.date).collect()
    }
}

/// ## Summary
/// Validates scraped records into typed occurrences.
///
/// Records with an unparseable date/time, malformed period range, or missing
/// class code are excluded and reported as [`Warning::InvalidOccurrence`];
/// nothing is ever silently merged into a group.
#[must_use]
pub fn ingest(raw: &[RawOccurrence]) -> (Vec<Occurrence>, Vec<Warning>) {
    let mut occurrences = Vec::with_capacity(raw.len());
    let mut warnings = Vec::new();

    for (index, record) in raw.iter().enumerate() {
        match Occurrence::from_raw(record) {
            Ok(occ) => occurrences.push(occ),
            Err(err) => {
                tracing::debug!(index, error = %err, "skipping invalid occurrence");
                warnings.push(Warning::InvalidOccurrence {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    (occurrences, warnings)
}

/// ## Summary
/// Partitions occurrences into candidate series keyed by [`GroupKey`].
///
/// Duplicate (key, date) pairs keep the first-scraped record and report a
/// [`Warning::DuplicateScrape`]. Each group is sorted by (date, start time),
/// with input order breaking any remaining ties, so downstream stages see a
/// fully deterministic sequence regardless of scrape order.
#[must_use]
pub fn group_occurrences(
    occurrences: Vec<Occurrence>,
) -> (BTreeMap<GroupKey, SeriesGroup>, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut seen: HashSet<(GroupKey, NaiveDate)> = HashSet::new();
    let mut buckets: BTreeMap<GroupKey, Vec<Occurrence>> = BTreeMap::new();

    let total = occurrences.len();
    for occ in occurrences {
        let key = occ.group_key();
        if !seen.insert((key.clone(), occ.date)) {
            warnings.push(Warning::DuplicateScrape {
                key,
                date: occ.date,
            });
            continue;
        }
        buckets.entry(key).or_default().push(occ);
    }

    let groups: BTreeMap<GroupKey, SeriesGroup> = buckets
        .into_iter()
        .map(|(key, mut occurrences)| {
            // Stable sort keeps input order for identical (date, start) pairs.
            occurrences.sort_by(|a, b| (a.date, a.start).cmp(&(b.date, b.start)));
            let group = SeriesGroup {
                key: key.clone(),
                occurrences,
            };
            (key, group)
        })
        .collect();

    tracing::debug!(
        total,
        groups = groups.len(),
        duplicates = warnings.len(),
        "grouped occurrences"
    );
    (groups, warnings)
}
