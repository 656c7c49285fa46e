//! Recurrence rule values (RFC 5545 §3.3.10, §3.8.5.3).

use super::DateTime;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the wire name for this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BYDAY weekday code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns the two-letter wire code for this weekday.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(w: chrono::Weekday) -> Self {
        match w {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurrence rule.
///
/// Covers the subset of RFC 5545 RECUR the exporter emits: frequency,
/// interval, BYDAY, and an optional UNTIL bound. `Display` produces the wire
/// text in a fixed part order so identical rules always render identically.
#[derive(Debug, Clone, PartialEq)]
pub struct RRule {
    pub freq: Frequency,
    pub interval: u32,
    pub by_day: Vec<Weekday>,
    pub until: Option<DateTime>,
}

impl RRule {
    /// Creates a weekly rule with the given interval and no constraints.
    #[must_use]
    pub const fn weekly(interval: u32) -> Self {
        Self {
            freq: Frequency::Weekly,
            interval,
            by_day: Vec::new(),
            until: None,
        }
    }
}

impl std::fmt::Display for RRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FREQ={};INTERVAL={}", self.freq, self.interval)?;
        if !self.by_day.is_empty() {
            f.write_str(";BYDAY=")?;
            for (i, day) in self.by_day.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                f.write_str(day.as_str())?;
            }
        }
        if let Some(until) = &self.until {
            write!(f, ";UNTIL={until}")?;
        }
        Ok(())
    }
}
