//! Session occurrence model and ingestion-boundary validation.
//!
//! The external page parser hands over [`RawOccurrence`] records with every
//! field still in scraped string form. Validation happens exactly once, at
//! [`Occurrence::from_raw`]; everything downstream works with the typed,
//! immutable [`Occurrence`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One session record as scraped from the timetable page.
///
/// All fields are raw strings; nothing is trusted until it passes
/// [`Occurrence::from_raw`]. Serde derives exist so the external storage
/// collaborator can persist snapshots of previous scrapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOccurrence {
    /// Calendar day, ISO 8601 (`2024-09-02`).
    pub date: String,
    /// Start clock time (`09:00` or `09:00:00`).
    pub start_time: String,
    /// End clock time.
    pub end_time: String,
    /// Period-index range (`3` or `3-4`).
    pub periods: String,
    /// Course identifier, e.g. `MATH101`.
    pub class_code: String,
    pub location: String,
    pub instructor: String,
    pub department: String,
}

/// Inclusive period-index range within a day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PeriodRange {
    pub first: u8,
    pub last: u8,
}

impl PeriodRange {
    /// Creates a range, validating that it is not reversed.
    ///
    /// ## Errors
    /// Returns an error if `first > last`.
    pub fn new(first: u8, last: u8) -> CoreResult<Self> {
        if first > last {
            return Err(CoreError::ValidationError(format!(
                "reversed period range {first}-{last}"
            )));
        }
        Ok(Self { first, last })
    }

    /// Parses a scraped period string: either a single index (`"3"`) or an
    /// inclusive range (`"3-4"`).
    ///
    /// ## Errors
    /// Returns an error if either bound is not a number or the range is
    /// reversed.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        let (first, last) = match s.split_once('-') {
            Some((a, b)) => (parse_period_index(a)?, parse_period_index(b)?),
            None => {
                let single = parse_period_index(s)?;
                (single, single)
            }
        };
        Self::new(first, last)
    }
}

impl std::fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

fn parse_period_index(s: &str) -> CoreResult<u8> {
    s.trim()
        .parse::<u8>()
        .map_err(|err| CoreError::ValidationError(format!("bad period index {s:?}: {err}")))
}

/// Descriptive fields of a session, reconciled per series by majority vote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionFields {
    pub location: String,
    pub instructor: String,
    pub department: String,
}

/// One validated, concrete class session.
///
/// Uniquely identified by (`class_code`, `periods`, `date`). Immutable once
/// produced by [`Occurrence::from_raw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub periods: PeriodRange,
    pub class_code: String,
    pub fields: SessionFields,
}

impl Occurrence {
    /// Validates one scraped record into a typed occurrence.
    ///
    /// ## Errors
    /// Returns a [`CoreError::ValidationError`] naming the offending field if
    /// the date, times, or period range fail to parse, the class code is
    /// empty, or the end time precedes the start time.
    pub fn from_raw(raw: &RawOccurrence) -> CoreResult<Self> {
        let class_code = raw.class_code.trim();
        if class_code.is_empty() {
            return Err(CoreError::ValidationError("missing class code".into()));
        }

        let date = parse_date(&raw.date)?;
        let start = parse_time(&raw.start_time)?;
        let end = parse_time(&raw.end_time)?;
        if end < start {
            return Err(CoreError::ValidationError(format!(
                "end time {end} precedes start time {start}"
            )));
        }
        let periods = PeriodRange::parse(&raw.periods)?;

        Ok(Self {
            date,
            start,
            end,
            periods,
            class_code: class_code.to_string(),
            fields: SessionFields {
                location: raw.location.trim().to_string(),
                instructor: raw.instructor.trim().to_string(),
                department: raw.department.trim().to_string(),
            },
        })
    }

    /// The identity under which this occurrence is clustered into a series.
    #[must_use]
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            class_code: self.class_code.clone(),
            periods: self.periods,
        }
    }
}

/// Derived identity clustering occurrences into one candidate series.
///
/// `Ord` is part of the contract: iterating a `BTreeMap<GroupKey, _>` yields
/// the canonical (class code, period range) output order.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GroupKey {
    pub class_code: String,
    pub periods: PeriodRange,
}

impl GroupKey {
    #[must_use]
    pub fn new(class_code: impl Into<String>, periods: PeriodRange) -> Self {
        Self {
            class_code: class_code.into(),
            periods,
        }
    }

    /// Canonical string form, stable across runs and machines. UID
    /// derivation hashes exactly this string.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}/{}", self.class_code, self.periods)
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.class_code, self.periods)
    }
}

fn parse_date(s: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|err| CoreError::ValidationError(format!("unparseable date {s:?}: {err}")))
}

fn parse_time(s: &str) -> CoreResult<NaiveTime> {
    let t = s.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .map_err(|err| CoreError::ValidationError(format!("unparseable time {s:?}: {err}")))
}
