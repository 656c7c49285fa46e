//! Field reconciliation: majority vote across a group's repetitions.
//!
//! Tie resolution never depends on hash-map iteration order: the counts are
//! taken first, then the winner is picked by scanning occurrences in
//! chronological order until one carrying a top-count value is found.

use std::collections::HashMap;
use std::hash::Hash;

use weekwise_core::Occurrence;

use crate::group::SeriesGroup;

/// How decisive the vote for a field was. Diagnostic only; overrides are
/// still emitted per date regardless of the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consensus {
    /// Only one distinct value existed.
    Unanimous,
    /// One value had a strictly higher count than every other.
    Majority,
    /// Multiple values tied for the highest count; the chronologically
    /// earliest occurrence's value won.
    Tied,
}

/// One reconciled field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotedField {
    pub value: String,
    pub consensus: Consensus,
}

/// The canonical descriptive fields for a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterFields {
    pub location: VotedField,
    pub instructor: VotedField,
    pub department: VotedField,
}

/// ## Summary
/// Majority vote over any projection of the occurrences.
///
/// Returns the winning value and the consensus strength, or `None` for an
/// empty slice. Ties go to the value carried by the earliest occurrence,
/// which makes the result independent of input permutation.
pub fn vote<T, F>(occurrences: &[Occurrence], select: F) -> Option<(T, Consensus)>
where
    T: Clone + Eq + Hash,
    F: Fn(&Occurrence) -> T,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for occ in occurrences {
        *counts.entry(select(occ)).or_insert(0) += 1;
    }
    let max = counts.values().copied().max()?;

    let consensus = if counts.len() <= 1 {
        Consensus::Unanimous
    } else if counts.values().filter(|&&c| c == max).count() > 1 {
        Consensus::Tied
    } else {
        Consensus::Majority
    };

    occurrences
        .iter()
        .map(select)
        .find(|value| counts.get(value) == Some(&max))
        .map(|value| (value, consensus))
}

/// Reconciles the canonical descriptive fields for one group.
#[must_use]
pub fn reconcile(group: &SeriesGroup) -> MasterFields {
    let master = MasterFields {
        location: voted_field(group, |o| o.fields.location.clone()),
        instructor: voted_field(group, |o| o.fields.instructor.clone()),
        department: voted_field(group, |o| o.fields.department.clone()),
    };
    tracing::trace!(
        key = %group.key,
        location = %master.location.value,
        "reconciled master fields"
    );
    master
}

fn voted_field<F>(group: &SeriesGroup, select: F) -> VotedField
where
    F: Fn(&Occurrence) -> String,
{
    vote(&group.occurrences, select).map_or_else(
        || VotedField {
            value: String::new(),
            consensus: Consensus::Unanimous,
        },
        |(value, consensus)| VotedField { value, consensus },
    )
}
