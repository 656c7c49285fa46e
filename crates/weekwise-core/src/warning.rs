//! Non-fatal per-occurrence and per-group findings.
//!
//! These never abort an export. The pipeline collects them and hands the
//! full list to the caller alongside the document; the UI collaborator
//! decides how to surface them.

use chrono::NaiveDate;
use thiserror::Error;

use crate::occurrence::GroupKey;

/// One non-fatal finding from an export run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An input record failed validation and was excluded from grouping.
    #[error("occurrence #{index} skipped: {reason}")]
    InvalidOccurrence { index: usize, reason: String },

    /// Two scraped records shared the same (group, date); the first was kept.
    #[error("duplicate scrape for {key} on {date}, first kept")]
    DuplicateScrape { key: GroupKey, date: NaiveDate },

    /// No reliable weekly pattern could be inferred for a multi-session
    /// group; it was exported as flat events.
    #[error("no reliable weekly pattern for {key}, exported flat")]
    AmbiguousPattern { key: GroupKey },

    /// The inferred pattern failed the exception-ratio quality gate; the
    /// group was exported as flat events.
    #[error(
        "pattern for {key} rejected: {exceptions} exceptions against {ideal} ideal occurrences"
    )]
    LowConfidencePattern {
        key: GroupKey,
        exceptions: usize,
        ideal: usize,
    },

    /// One event block could not be represented in RFC 5545 text and was
    /// omitted; the rest of the document was still produced.
    #[error("event {uid} dropped from export: {reason}")]
    EncodingFailure { uid: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::PeriodRange;

    #[test]
    fn warnings_render_their_context() {
        let key = GroupKey::new("MATH101", PeriodRange { first: 1, last: 2 });
        let w = Warning::LowConfidencePattern {
            key,
            exceptions: 9,
            ideal: 10,
        };
        let text = w.to_string();
        assert!(text.contains("MATH101/1-2"));
        assert!(text.contains("9 exceptions"));
    }
}
