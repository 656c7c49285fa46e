//! Weekly pattern inference.
//!
//! Finds the (weekday, interval) pair that explains the largest share of a
//! group's dates. Groups with no usable pattern are routed to flat-event
//! handling by returning `None`; that is an ordinary outcome, not an error.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::group::SeriesGroup;

/// Parameters of an inferred weekly recurrence: every `interval_weeks` weeks
/// on `weekday`, from `first_date` through `last_date` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceParams {
    pub weekday: Weekday,
    pub interval_weeks: u32,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// ## Summary
/// Infers weekly recurrence parameters for one group.
///
/// Majority weekday first (ties to the earliest date's weekday), then the
/// mode of the whole-week gaps between consecutive same-weekday dates (ties
/// toward the smallest interval, default 1).
///
/// Returns `None` when the group has fewer than two occurrences or fewer
/// than two occurrences on the majority weekday; such groups cannot support
/// a reliable weekly rule.
#[must_use]
pub fn infer_pattern(group: &SeriesGroup) -> Option<RecurrenceParams> {
    let occurrences = &group.occurrences;
    if occurrences.len() < 2 {
        return None;
    }

    let mut weekday_counts: HashMap<Weekday, usize> = HashMap::new();
    for occ in occurrences {
        *weekday_counts.entry(occ.date.weekday()).or_insert(0) += 1;
    }
    let top = weekday_counts.values().copied().max()?;
    // Scan in date order so a tie lands on the earliest date's weekday.
    let weekday = occurrences
        .iter()
        .map(|o| o.date.weekday())
        .find(|w| weekday_counts.get(w) == Some(&top))?;

    let restricted: Vec<NaiveDate> = occurrences
        .iter()
        .map(|o| o.date)
        .filter(|d| d.weekday() == weekday)
        .collect();
    if restricted.len() < 2 {
        tracing::trace!(key = %group.key, "majority weekday has a single hit, no pattern");
        return None;
    }

    let interval_weeks = gap_mode(&restricted);
    let first_date = occurrences.first()?.date;
    let last_date = occurrences.last()?.date;

    let params = RecurrenceParams {
        weekday,
        interval_weeks,
        first_date,
        last_date,
    };
    tracing::trace!(
        key = %group.key,
        weekday = %params.weekday,
        interval_weeks = params.interval_weeks,
        "inferred weekly pattern"
    );
    Some(params)
}

/// Mode of the whole-week gaps between consecutive dates, ties toward the
/// smallest gap. Dates on a shared weekday always differ by whole weeks.
fn gap_mode(dates: &[NaiveDate]) -> u32 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for pair in dates.windows(2) {
        let days = (pair[1] - pair[0]).num_days();
        if days > 0 && days % 7 == 0 {
            if let Ok(weeks) = u32::try_from(days / 7) {
                *counts.entry(weeks).or_insert(0) += 1;
            }
        }
    }
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map_or(1, |(weeks, _)| *weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekwise_core::{GroupKey, Occurrence, PeriodRange, RawOccurrence};

    fn occurrence(date: &str) -> Occurrence {
        Occurrence::from_raw(&RawOccurrence {
            date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            periods: "1".to_string(),
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
            key: GroupKey::new("MATH101", PeriodRange { first: 1, last: 1 }),
            occurrences,
        }
    }

    #[test]
    fn weekly_mondays() {
        let group = group_of(&["2024-09-02", "2024-09-09", "2024-09-16"]);
        let params = infer_pattern(&group).unwrap();
        assert_eq!(params.weekday, Weekday::Mon);
        assert_eq!(params.interval_weeks, 1);
        assert_eq!(
            params.first_date,
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
        );
        assert_eq!(
            params.last_date,
            NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()
        );
    }

    #[test]
    fn biweekly_interval_from_gap_mode() {
        let group = group_of(&["2024-09-02", "2024-09-16", "2024-09-30"]);
        let params = infer_pattern(&group).unwrap();
        assert_eq!(params.interval_weeks, 2);
    }

    #[test]
    fn mixed_gaps_take_the_most_frequent() {
        // Three one-week gaps, one two-week gap (a skipped session).
        let group = group_of(&[
            "2024-09-02",
            "2024-09-09",
            "2024-09-16",
            "2024-09-30",
            "2024-10-07",
        ]);
        let params = infer_pattern(&group).unwrap();
        assert_eq!(params.interval_weeks, 1);
    }

    #[test]
    fn gap_tie_prefers_smallest_interval() {
        // One one-week gap, one two-week gap.
        let group = group_of(&["2024-09-02", "2024-09-09", "2024-09-23"]);
        let params = infer_pattern(&group).unwrap();
        assert_eq!(params.interval_weeks, 1);
    }

    #[test]
    fn off_weekday_outlier_keeps_majority() {
        // Mondays plus a single Wednesday make-up session.
        let group = group_of(&["2024-09-02", "2024-09-04", "2024-09-09", "2024-09-16"]);
        let params = infer_pattern(&group).unwrap();
        assert_eq!(params.weekday, Weekday::Mon);
        assert_eq!(
            params.first_date,
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
        );
    }

    #[test]
    fn weekday_tie_goes_to_earliest_date() {
        // One Monday, one Wednesday: tied, Monday is earlier.
        let group = group_of(&["2024-09-02", "2024-09-04"]);
        assert!(infer_pattern(&group).is_none());

        // Two Mondays, two Wednesdays: tied, still Monday.
        let group = group_of(&["2024-09-02", "2024-09-04", "2024-09-09", "2024-09-11"]);
        let params = infer_pattern(&group).unwrap();
        assert_eq!(params.weekday, Weekday::Mon);
    }

    #[test]
    fn single_occurrence_has_no_pattern() {
        let group = group_of(&["2024-09-02"]);
        assert!(infer_pattern(&group).is_none());
    }
}
