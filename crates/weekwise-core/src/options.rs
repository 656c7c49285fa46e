//! Export options.
//!
//! The original system kept these in ambient "current settings" state; here
//! they are explicit parameters handed to the pipeline by the caller. No
//! environment variables, no persisted configuration.

use chrono::{FixedOffset, Offset, Utc};

use crate::constants;

/// Caller-supplied knobs for one export run.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// The single local-to-UTC offset applied to every session time. No
    /// time-zone database lookups are performed.
    pub utc_offset: FixedOffset,
    /// Quality gate for inferred patterns: a group whose
    /// `skipped + added` exception count exceeds this fraction of its ideal
    /// occurrences is exploded into flat events instead.
    pub max_exception_ratio: f64,
    /// PRODID stamped on the exported VCALENDAR.
    pub prodid: &'static str,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            max_exception_ratio: 0.5,
            prodid: constants::PRODID,
        }
    }
}
