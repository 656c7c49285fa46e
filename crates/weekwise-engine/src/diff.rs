//! Snapshot comparison for the external update checker.
//!
//! A thin consumer of the same occurrence equality used by the pipeline; it
//! decides whether a fresh scrape warrants a re-export and is not part of
//! the recurrence algorithm.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use weekwise_core::{GroupKey, Occurrence};

/// Differences between two occurrence snapshots, keyed by occurrence
/// identity (class code, period range, date).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SnapshotDiff {
    /// Present in the current snapshot only.
    pub added: Vec<Occurrence>,
    /// Present in the previous snapshot only.
    pub removed: Vec<Occurrence>,
    /// Same identity in both, but times or fields changed (previous,
    /// current).
    pub changed: Vec<(Occurrence, Occurrence)>,
}

impl SnapshotDiff {
    /// True when a re-export would produce the same document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// ## Summary
/// Compares a previous snapshot against a freshly parsed one.
///
/// Results are sorted by occurrence identity, so the diff itself is
/// deterministic regardless of either snapshot's ordering.
#[must_use]
pub fn diff_snapshots(previous: &[Occurrence], current: &[Occurrence]) -> SnapshotDiff {
    let previous_by_id = index_by_identity(previous);
    let current_by_id = index_by_identity(current);

    let mut diff = SnapshotDiff::default();
    for (identity, occ) in &current_by_id {
        match previous_by_id.get(identity) {
            None => diff.added.push((*occ).clone()),
            Some(prev) if *prev != *occ => {
                diff.changed.push(((*prev).clone(), (*occ).clone()));
            }
            Some(_) => {}
        }
    }
    for (identity, occ) in &previous_by_id {
        if !current_by_id.contains_key(identity) {
            diff.removed.push((*occ).clone());
        }
    }
    diff
}

fn index_by_identity(
    occurrences: &[Occurrence],
) -> BTreeMap<(GroupKey, NaiveDate), &Occurrence> {
    occurrences
        .iter()
        .map(|occ| ((occ.group_key(), occ.date), occ))
        .collect()
}
