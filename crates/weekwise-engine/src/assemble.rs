//! Series assembly: combining reconciled fields, inferred parameters, and
//! detected exceptions into the export model, with stable identifiers.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;
use weekwise_core::{ExportOptions, GroupKey, SessionFields, Warning, constants};

use crate::exceptions::{self, ExceptionSet};
use crate::group::SeriesGroup;
use crate::pattern::{self, RecurrenceParams};
use crate::reconcile::{self, MasterFields};

/// Fixed namespace for UUIDv5 derivation. Changing this would change every
/// exported UID, breaking update-in-place on subscribers.
const UID_NAMESPACE: Uuid = Uuid::from_u128(0x8f1d_6a02_43be_4c1a_9c70_5e21_0b3f_77d4_u128);

/// A finished weekly series ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringSeries {
    pub key: GroupKey,
    /// Stable identifier derived from the key alone.
    pub uid: String,
    pub master: MasterFields,
    /// Canonical clock times, majority-voted like the descriptive fields.
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub params: RecurrenceParams,
    pub exceptions: ExceptionSet,
}

/// A standalone non-recurring event, used when a group has no reliable
/// weekly pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEvent {
    pub key: GroupKey,
    pub uid: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub fields: SessionFields,
}

/// What one group resolved to: exactly one series, or fully exploded flats.
#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    Series(RecurringSeries),
    Flat(Vec<FlatEvent>),
}

/// Stable UID for a recurring series, a pure function of the group key.
#[must_use]
pub fn series_uid(key: &GroupKey) -> String {
    let uuid = Uuid::new_v5(&UID_NAMESPACE, key.canonical().as_bytes());
    format!("{uuid}@{}", constants::UID_DOMAIN)
}

/// Stable UID for a flat event, a pure function of (key, date).
#[must_use]
pub fn flat_uid(key: &GroupKey, date: NaiveDate) -> String {
    let name = format!("{}/{date}", key.canonical());
    let uuid = Uuid::new_v5(&UID_NAMESPACE, name.as_bytes());
    format!("{uuid}@{}", constants::UID_DOMAIN)
}

/// ## Summary
/// Resolves one group into a recurring series or flat events.
///
/// Runs reconciliation, pattern inference, and exception detection, then
/// applies the quality gate: a pattern whose skips and adds outweigh
/// `options.max_exception_ratio` of its ideal occurrences is discarded and
/// the group exported flat, with a warning recording why.
#[must_use]
pub fn assemble_group(
    group: &SeriesGroup,
    options: &ExportOptions,
) -> (Assembly, Vec<Warning>) {
    let mut warnings = Vec::new();

    let Some(params) = pattern::infer_pattern(group) else {
        if group.len() >= 2 {
            warnings.push(Warning::AmbiguousPattern {
                key: group.key.clone(),
            });
        }
        return (Assembly::Flat(explode(group)), warnings);
    };

    let master = reconcile::reconcile(group);
    let ideal = exceptions::ideal_dates(&params);
    let detected = exceptions::detect_exceptions(group, &master, &params);

    if ideal.is_empty()
        || exceptions::exceeds_quality_gate(&detected, ideal.len(), options.max_exception_ratio)
    {
        tracing::debug!(
            key = %group.key,
            exceptions = detected.disruption(),
            ideal = ideal.len(),
            "pattern failed quality gate, exporting flat"
        );
        warnings.push(Warning::LowConfidencePattern {
            key: group.key.clone(),
            exceptions: detected.disruption(),
            ideal: ideal.len(),
        });
        return (Assembly::Flat(explode(group)), warnings);
    }

    let Some(((start, end), _)) = reconcile::vote(&group.occurrences, |o| (o.start, o.end))
    else {
        // Groups are never empty; reachable only through a logic bug.
        return (Assembly::Flat(explode(group)), warnings);
    };

    let series = RecurringSeries {
        key: group.key.clone(),
        uid: series_uid(&group.key),
        master,
        start,
        end,
        params,
        exceptions: detected,
    };
    (Assembly::Series(series), warnings)
}

/// One flat event per raw occurrence, in group (date) order.
fn explode(group: &SeriesGroup) -> Vec<FlatEvent> {
    group
        .occurrences
        .iter()
        .map(|occ| FlatEvent {
            key: group.key.clone(),
            uid: flat_uid(&group.key, occ.date),
            date: occ.date,
            start: occ.start,
            end: occ.end,
            fields: occ.fields.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekwise_core::{Occurrence, PeriodRange, RawOccurrence};

    fn occurrence(date: &str) -> Occurrence {
        Occurrence::from_raw(&RawOccurrence {
            date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            periods: "1-2".to_string(),
            class_code: "MATH101".to_string(),
            location: "Room A".to_string(),
            instructor: "Prof. Osei".to_string(),
            department: "Mathematics".to_string(),
        })
        .unwrap()
    }

    fn group_of(dates: &[&str]) -> SeriesGroup {
        let mut occurrences: Vec<Occurrence> = dates.iter().map(|d| occurrence(d)).collect();
        occurrences.sort_by_key(|o| o.date);
        SeriesGroup {
            key: GroupKey::new("MATH101", PeriodRange { first: 1, last: 2 }),
            occurrences,
        }
    }

    #[test]
    fn stable_ids_depend_only_on_identity() {
        let key_a = GroupKey::new("MATH101", PeriodRange { first: 1, last: 2 });
        let key_b = GroupKey::new("MATH101", PeriodRange { first: 1, last: 2 });
        let key_c = GroupKey::new("MATH101", PeriodRange { first: 3, last: 4 });

        assert_eq!(series_uid(&key_a), series_uid(&key_b));
        assert_ne!(series_uid(&key_a), series_uid(&key_c));
        assert!(series_uid(&key_a).ends_with("@weekwise"));

        let date = "2024-09-02".parse().unwrap();
        assert_eq!(flat_uid(&key_a, date), flat_uid(&key_b, date));
        assert_ne!(flat_uid(&key_a, date), series_uid(&key_a));
    }

    #[test]
    fn regular_group_becomes_a_series() {
        let group = group_of(&["2024-09-02", "2024-09-09", "2024-09-16"]);
        let (assembly, warnings) = assemble_group(&group, &ExportOptions::default());
        assert!(warnings.is_empty());
        match assembly {
            Assembly::Series(series) => {
                assert_eq!(series.params.interval_weeks, 1);
                assert!(series.exceptions.is_empty());
                assert_eq!(series.start.to_string(), "09:00:00");
            }
            Assembly::Flat(_) => panic!("expected a series"),
        }
    }

    #[test]
    fn single_occurrence_becomes_one_flat_event() {
        let group = group_of(&["2024-09-02"]);
        let (assembly, warnings) = assemble_group(&group, &ExportOptions::default());
        assert!(warnings.is_empty());
        match assembly {
            Assembly::Flat(flats) => assert_eq!(flats.len(), 1),
            Assembly::Series(_) => panic!("expected flat events"),
        }
    }

    #[test]
    fn patternless_pair_warns_and_goes_flat() {
        let group = group_of(&["2024-09-02", "2024-09-04"]);
        let (assembly, warnings) = assemble_group(&group, &ExportOptions::default());
        assert!(matches!(warnings[0], Warning::AmbiguousPattern { .. }));
        match assembly {
            Assembly::Flat(flats) => assert_eq!(flats.len(), 2),
            Assembly::Series(_) => panic!("expected flat events"),
        }
    }

    #[test]
    fn noisy_group_fails_quality_gate() {
        // Weekly gaps dominate the mode, but six of the ten ideal Mondays
        // never happened.
        let group = group_of(&["2024-09-02", "2024-09-09", "2024-10-28", "2024-11-04"]);
        let (assembly, warnings) = assemble_group(&group, &ExportOptions::default());
        assert!(matches!(
            warnings[0],
            Warning::LowConfidencePattern {
                exceptions: 6,
                ideal: 10,
                ..
            }
        ));
        assert!(matches!(assembly, Assembly::Flat(ref flats) if flats.len() == 4));
    }

    #[test]
    fn gate_threshold_is_configurable() {
        let group = group_of(&["2024-09-02", "2024-09-09", "2024-10-28", "2024-11-04"]);
        let lenient = ExportOptions {
            max_exception_ratio: 1.0,
            ..ExportOptions::default()
        };
        let (assembly, warnings) = assemble_group(&group, &lenient);
        assert!(warnings.is_empty());
        assert!(matches!(assembly, Assembly::Series(_)));
    }
}
