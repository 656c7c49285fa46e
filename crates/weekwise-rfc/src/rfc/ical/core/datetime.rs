//! Date and date-time values (RFC 5545 §3.3.4, §3.3.5).

use chrono::{Datelike, Timelike};

/// A DATE value (`YYYYMMDD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl From<chrono::NaiveDate> for Date {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Gregorian calendar fields fit the wire-format widths"
    )]
    fn from(d: chrono::NaiveDate) -> Self {
        Self {
            year: d.year() as u16,
            month: d.month() as u8,
            day: d.day() as u8,
        }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Whether a date-time is anchored to UTC or floating local time.
///
/// The exporter only ever emits the UTC form; `Floating` exists so the model
/// can represent the distinction the format makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeForm {
    /// Absolute instant, rendered with a trailing `Z`.
    Utc,
    /// Local time with no zone anchor.
    Floating,
}

/// A DATE-TIME value (`YYYYMMDD"T"HHMMSS[Z]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub form: DateTimeForm,
}

impl DateTime {
    #[must_use]
    pub const fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Utc,
        }
    }

    #[must_use]
    pub const fn floating(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Floating,
        }
    }
}

impl From<chrono::DateTime<chrono::Utc>> for DateTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Gregorian calendar fields fit the wire-format widths"
    )]
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::utc(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
        )
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.form == DateTimeForm::Utc {
            f.write_str("Z")?;
        }
        Ok(())
    }
}
