//! Document encoding: the assembled model rendered as RFC 5545 text.
//!
//! Every date-time is converted with the caller's single fixed offset and
//! emitted in UTC `Z` form; nothing is ever written as floating local time.
//! DTSTAMP is pinned to each event's own DTSTART so that re-encoding the
//! same model yields byte-identical text.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use weekwise_core::{ExportOptions, Warning};
use weekwise_rfc::rfc::ical::build::{ensure_representable, serialize};
use weekwise_rfc::rfc::ical::core::{
    Component, DateTime, ICalendar, Property, RRule, Weekday, names,
};

use crate::assemble::{FlatEvent, RecurringSeries};
use crate::error::EngineResult;
use crate::exceptions::{self, FieldOverride};
use crate::export::CalendarModel;

/// ## Summary
/// Encodes the assembled model into a complete iCalendar document.
///
/// Event blocks that cannot be represented (control characters in a TEXT
/// field) are skipped individually and reported as
/// [`Warning::EncodingFailure`]; the rest of the document is still produced.
/// An empty model yields an empty-but-valid VCALENDAR.
#[must_use]
pub fn encode_model(model: &CalendarModel, options: &ExportOptions) -> (String, Vec<Warning>) {
    let mut ical = ICalendar::new(options.prodid);
    let mut warnings = Vec::new();

    for series in &model.series {
        match series_component(series, options) {
            Ok(event) => {
                ical.add_event(event);
                // Overrides are children of the parent block; if the parent
                // failed they are unreachable and skipped with it.
                for deviation in &series.exceptions.overrides {
                    match override_component(series, deviation, options) {
                        Ok(event) => ical.add_event(event),
                        Err(err) => warnings.push(Warning::EncodingFailure {
                            uid: format!("{}#{}", series.uid, deviation.date),
                            reason: err.to_string(),
                        }),
                    }
                }
            }
            Err(err) => warnings.push(Warning::EncodingFailure {
                uid: series.uid.clone(),
                reason: err.to_string(),
            }),
        }
    }

    for flat in &model.flats {
        match flat_component(flat, options) {
            Ok(event) => ical.add_event(event),
            Err(err) => warnings.push(Warning::EncodingFailure {
                uid: flat.uid.clone(),
                reason: err.to_string(),
            }),
        }
    }

    (serialize(&ical), warnings)
}

fn series_component(
    series: &RecurringSeries,
    options: &ExportOptions,
) -> EngineResult<Component> {
    ensure_texts(&[
        &series.key.class_code,
        &series.master.location.value,
        &series.master.instructor.value,
        &series.master.department.value,
    ])?;

    let start_date = exceptions::pattern_start(&series.params);
    let dtstart = to_utc(start_date, series.start, options);
    let dtend = to_utc(start_date, series.end, options);

    let mut event = Component::event();
    event.add_property(Property::text(names::UID, series.uid.clone()));
    event.add_property(Property::datetime(names::DTSTAMP, dtstart));
    event.add_property(Property::datetime(names::DTSTART, dtstart));
    event.add_property(Property::datetime(names::DTEND, dtend));

    let mut rule = RRule::weekly(series.params.interval_weeks);
    rule.by_day.push(Weekday::from(series.params.weekday));
    rule.until = Some(to_utc(series.params.last_date, series.start, options));
    event.add_property(Property::recur(names::RRULE, rule));

    for date in &series.exceptions.skipped {
        event.add_property(Property::datetime(
            names::EXDATE,
            to_utc(*date, series.start, options),
        ));
    }
    for date in &series.exceptions.added {
        event.add_property(Property::datetime(
            names::RDATE,
            to_utc(*date, series.start, options),
        ));
    }

    event.add_property(Property::text(names::SUMMARY, series.key.class_code.clone()));
    add_descriptive_fields(
        &mut event,
        &series.master.location.value,
        &series.master.instructor.value,
        &series.master.department.value,
    );
    event.add_property(Property::text(
        names::X_PERIOD_RANGE,
        series.key.periods.to_string(),
    ));
    Ok(event)
}

fn override_component(
    series: &RecurringSeries,
    deviation: &FieldOverride,
    options: &ExportOptions,
) -> EngineResult<Component> {
    ensure_texts(&[
        &deviation.fields.location,
        &deviation.fields.instructor,
        &deviation.fields.department,
    ])?;

    let instant = to_utc(deviation.date, series.start, options);
    let end = to_utc(deviation.date, series.end, options);

    let mut event = Component::event();
    event.add_property(Property::text(names::UID, series.uid.clone()));
    event.add_property(Property::datetime(names::RECURRENCE_ID, instant));
    event.add_property(Property::datetime(names::DTSTAMP, instant));
    event.add_property(Property::datetime(names::DTSTART, instant));
    event.add_property(Property::datetime(names::DTEND, end));
    event.add_property(Property::text(names::SUMMARY, series.key.class_code.clone()));
    add_descriptive_fields(
        &mut event,
        &deviation.fields.location,
        &deviation.fields.instructor,
        &deviation.fields.department,
    );
    Ok(event)
}

fn flat_component(flat: &FlatEvent, options: &ExportOptions) -> EngineResult<Component> {
    ensure_texts(&[
        &flat.key.class_code,
        &flat.fields.location,
        &flat.fields.instructor,
        &flat.fields.department,
    ])?;

    let dtstart = to_utc(flat.date, flat.start, options);
    let dtend = to_utc(flat.date, flat.end, options);

    let mut event = Component::event();
    event.add_property(Property::text(names::UID, flat.uid.clone()));
    event.add_property(Property::datetime(names::DTSTAMP, dtstart));
    event.add_property(Property::datetime(names::DTSTART, dtstart));
    event.add_property(Property::datetime(names::DTEND, dtend));
    event.add_property(Property::text(names::SUMMARY, flat.key.class_code.clone()));
    add_descriptive_fields(
        &mut event,
        &flat.fields.location,
        &flat.fields.instructor,
        &flat.fields.department,
    );
    event.add_property(Property::text(
        names::X_PERIOD_RANGE,
        flat.key.periods.to_string(),
    ));
    Ok(event)
}

fn add_descriptive_fields(
    event: &mut Component,
    location: &str,
    instructor: &str,
    department: &str,
) {
    if !location.is_empty() {
        event.add_property(Property::text(names::LOCATION, location));
    }
    if !instructor.is_empty() {
        event.add_property(Property::text(names::DESCRIPTION, instructor));
    }
    if !department.is_empty() {
        event.add_property(Property::text(names::CATEGORIES, department));
    }
}

fn ensure_texts(texts: &[&str]) -> EngineResult<()> {
    for text in texts {
        ensure_representable(text)?;
    }
    Ok(())
}

/// Converts a local (date, time) under the configured fixed offset to a UTC
/// wire date-time.
fn to_utc(date: NaiveDate, time: NaiveTime, options: &ExportOptions) -> DateTime {
    let local = date.and_time(time);
    let naive_utc = local - TimeDelta::seconds(i64::from(options.utc_offset.local_minus_utc()));
    DateTime::from(chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(
        naive_utc,
        chrono::Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn to_utc_applies_fixed_offset() {
        let options = ExportOptions {
            utc_offset: FixedOffset::east_opt(2 * 3600).unwrap(),
            ..ExportOptions::default()
        };
        let date = "2024-09-02".parse().unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(to_utc(date, time, &options).to_string(), "20240902T070000Z");
    }

    #[test]
    fn to_utc_handles_westward_offsets() {
        let options = ExportOptions {
            utc_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
            ..ExportOptions::default()
        };
        let date = "2024-09-02".parse().unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(to_utc(date, time, &options).to_string(), "20240902T140000Z");
    }
}
