//! Exception detection: diffing the ideal occurrence sequence generated by a
//! pattern against the dates that actually happened.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, TimeDelta};
use weekwise_core::SessionFields;

use crate::group::SeriesGroup;
use crate::pattern::RecurrenceParams;
use crate::reconcile::MasterFields;

/// One per-date deviation from the master fields. Carries the full field
/// snapshot of the deviating occurrence, which keeps replay simple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
    pub date: NaiveDate,
    pub fields: SessionFields,
}

/// The discrepancies between a pattern's ideal dates and a group's actual
/// occurrences.
///
/// `skipped`, `added`, and the override dates are mutually disjoint by
/// construction: a date is in exactly one of ideal-only, actual-only, or
/// both-with-deviating-fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExceptionSet {
    /// Ideal dates with no actual occurrence.
    pub skipped: BTreeSet<NaiveDate>,
    /// Actual dates outside the ideal pattern.
    pub added: BTreeSet<NaiveDate>,
    /// Actual dates inside the ideal pattern whose fields deviate from the
    /// master, in date order.
    pub overrides: Vec<FieldOverride>,
}

impl ExceptionSet {
    /// Number of structural exceptions (skips and adds; overrides do not
    /// destabilize the pattern itself).
    #[must_use]
    pub fn disruption(&self) -> usize {
        self.skipped.len() + self.added.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty() && self.added.is_empty() && self.overrides.is_empty()
    }
}

/// First date on the pattern's weekday, on or after its `first_date`.
///
/// When `first_date` itself sits off-weekday the pattern starts later and
/// the off-weekday occurrence surfaces in `added`.
#[must_use]
pub fn pattern_start(params: &RecurrenceParams) -> NaiveDate {
    let mut date = params.first_date;
    while date.weekday() != params.weekday {
        date += TimeDelta::days(1);
    }
    date
}

/// Generates the ideal date sequence for a pattern, inclusive of
/// `last_date`.
#[must_use]
pub fn ideal_dates(params: &RecurrenceParams) -> Vec<NaiveDate> {
    let step = TimeDelta::weeks(i64::from(params.interval_weeks.max(1)));
    let mut dates = Vec::new();
    let mut date = pattern_start(params);
    while date <= params.last_date {
        dates.push(date);
        date += step;
    }
    dates
}

/// ## Summary
/// Diffs a group's actual occurrences against its ideal date sequence.
///
/// Ideal-only dates become `skipped`, actual-only dates become `added`, and
/// actual dates on the pattern whose fields differ from the master in any of
/// location/instructor/department become overrides.
#[must_use]
pub fn detect_exceptions(
    group: &SeriesGroup,
    master: &MasterFields,
    params: &RecurrenceParams,
) -> ExceptionSet {
    let ideal: BTreeSet<NaiveDate> = ideal_dates(params).into_iter().collect();
    let actual: BTreeSet<NaiveDate> = group.dates().into_iter().collect();

    let skipped: BTreeSet<NaiveDate> = ideal.difference(&actual).copied().collect();
    let added: BTreeSet<NaiveDate> = actual.difference(&ideal).copied().collect();

    let overrides: Vec<FieldOverride> = group
        .occurrences
        .iter()
        .filter(|occ| ideal.contains(&occ.date))
        .filter(|occ| {
            occ.fields.location != master.location.value
                || occ.fields.instructor != master.instructor.value
                || occ.fields.department != master.department.value
        })
        .map(|occ| FieldOverride {
            date: occ.date,
            fields: occ.fields.clone(),
        })
        .collect();

    tracing::trace!(
        key = %group.key,
        skipped = skipped.len(),
        added = added.len(),
        overrides = overrides.len(),
        "detected exceptions"
    );
    ExceptionSet {
        skipped,
        added,
        overrides,
    }
}

/// Quality gate: true when the structural exceptions outweigh the pattern.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "occurrence counts are far below f64's integer range"
)]
pub fn exceeds_quality_gate(
    exceptions: &ExceptionSet,
    ideal_count: usize,
    max_ratio: f64,
) -> bool {
    exceptions.disruption() as f64 > max_ratio * ideal_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use weekwise_core::{GroupKey, Occurrence, PeriodRange, RawOccurrence};

    use crate::pattern::infer_pattern;
    use crate::reconcile::reconcile;

    fn occurrence(date: &str, location: &str) -> Occurrence {
        Occurrence::from_raw(&RawOccurrence {
            date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            periods: "1".to_string(),
            class_code: "MATH101".to_string(),
            location: location.to_string(),
            instructor: "Prof. Osei".to_string(),
            department: "Mathematics".to_string(),
        })
        .unwrap()
    }

    fn group_of(dates: &[(&str, &str)]) -> SeriesGroup {
        let mut occurrences: Vec<Occurrence> =
            dates.iter().map(|(d, loc)| occurrence(d, loc)).collect();
        occurrences.sort_by_key(|o| o.date);
        SeriesGroup {
            key: GroupKey::new("MATH101", PeriodRange { first: 1, last: 1 }),
            occurrences,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn params(first: &str, last: &str, interval: u32) -> RecurrenceParams {
        RecurrenceParams {
            weekday: Weekday::Mon,
            interval_weeks: interval,
            first_date: date(first),
            last_date: date(last),
        }
    }

    #[test]
    fn ideal_dates_weekly() {
        let p = params("2024-09-02", "2024-09-16", 1);
        assert_eq!(
            ideal_dates(&p),
            vec![
                date("2024-09-02"),
                date("2024-09-09"),
                date("2024-09-16")
            ]
        );
    }

    #[test]
    fn ideal_dates_biweekly() {
        let p = params("2024-09-02", "2024-09-30", 2);
        assert_eq!(
            ideal_dates(&p),
            vec![
                date("2024-09-02"),
                date("2024-09-16"),
                date("2024-09-30")
            ]
        );
    }

    #[test]
    fn ideal_dates_align_to_weekday_when_first_date_is_off() {
        // First date is a Saturday; the Monday pattern starts two days later.
        let p = params("2024-08-31", "2024-09-09", 1);
        assert_eq!(
            ideal_dates(&p),
            vec![date("2024-09-02"), date("2024-09-09")]
        );
    }

    #[test]
    fn missing_session_is_skipped() {
        let group = group_of(&[
            ("2024-09-02", "Room A"),
            ("2024-09-16", "Room A"),
            ("2024-09-23", "Room A"),
        ]);
        let master = reconcile(&group);
        let p = params("2024-09-02", "2024-09-23", 1);
        let exceptions = detect_exceptions(&group, &master, &p);
        assert_eq!(
            exceptions.skipped.iter().copied().collect::<Vec<_>>(),
            vec![date("2024-09-09")]
        );
        assert!(exceptions.added.is_empty());
        assert!(exceptions.overrides.is_empty());
    }

    #[test]
    fn off_pattern_session_is_added() {
        // A Wednesday make-up session inside a Monday pattern.
        let group = group_of(&[
            ("2024-09-02", "Room A"),
            ("2024-09-04", "Room A"),
            ("2024-09-09", "Room A"),
        ]);
        let master = reconcile(&group);
        let p = params("2024-09-02", "2024-09-09", 1);
        let exceptions = detect_exceptions(&group, &master, &p);
        assert_eq!(
            exceptions.added.iter().copied().collect::<Vec<_>>(),
            vec![date("2024-09-04")]
        );
        assert!(exceptions.skipped.is_empty());
    }

    #[test]
    fn deviating_fields_become_an_override() {
        let group = group_of(&[
            ("2024-09-02", "Room A"),
            ("2024-09-09", "Lab 9"),
            ("2024-09-16", "Room A"),
        ]);
        let master = reconcile(&group);
        let p = params("2024-09-02", "2024-09-16", 1);
        let exceptions = detect_exceptions(&group, &master, &p);
        assert_eq!(exceptions.overrides.len(), 1);
        assert_eq!(exceptions.overrides[0].date, date("2024-09-09"));
        assert_eq!(exceptions.overrides[0].fields.location, "Lab 9");
        // Overrides never count as structural disruption.
        assert_eq!(exceptions.disruption(), 0);
    }

    #[test]
    fn coverage_property_holds() {
        // (ideal - skipped) + added == actual, for a noisy group.
        let group = group_of(&[
            ("2024-09-02", "Room A"),
            ("2024-09-04", "Room A"),
            ("2024-09-16", "Room A"),
        ]);
        let master = reconcile(&group);
        let p = params("2024-09-02", "2024-09-16", 1);
        let exceptions = detect_exceptions(&group, &master, &p);

        let mut reconstructed: BTreeSet<NaiveDate> = ideal_dates(&p)
            .into_iter()
            .filter(|d| !exceptions.skipped.contains(d))
            .collect();
        reconstructed.extend(exceptions.added.iter().copied());
        let actual: BTreeSet<NaiveDate> = group.dates().into_iter().collect();
        assert_eq!(reconstructed, actual);
    }

    #[test]
    fn quality_gate_ratio() {
        let exceptions = ExceptionSet {
            skipped: [date("2024-09-09"), date("2024-09-16")].into_iter().collect(),
            added: BTreeSet::new(),
            overrides: Vec::new(),
        };
        assert!(!exceeds_quality_gate(&exceptions, 4, 0.5));
        assert!(exceeds_quality_gate(&exceptions, 3, 0.5));
    }

    #[test]
    fn infer_then_detect_round_trip() {
        let group = group_of(&[
            ("2024-09-02", "Room A"),
            ("2024-09-09", "Room A"),
            ("2024-09-23", "Room A"),
        ]);
        let p = infer_pattern(&group).unwrap();
        let master = reconcile(&group);
        let exceptions = detect_exceptions(&group, &master, &p);
        assert_eq!(
            exceptions.skipped.iter().copied().collect::<Vec<_>>(),
            vec![date("2024-09-16")]
        );
    }
}
