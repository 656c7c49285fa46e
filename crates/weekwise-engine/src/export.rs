//! The top-level export pipeline.
//!
//! One synchronous pass: ingest → group → reconcile/infer/detect → assemble
//! → encode. Every stage is a pure function; the only state is what flows
//! through the parameters.

use weekwise_core::{ExportOptions, RawOccurrence, Warning};

use crate::assemble::{self, Assembly, FlatEvent, RecurringSeries};
use crate::encode;
use crate::group;

/// The assembled recurrence model for one export run.
///
/// Series and flats are each sorted by (class code, period range, date), the
/// canonical output order.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarModel {
    pub series: Vec<RecurringSeries>,
    pub flats: Vec<FlatEvent>,
    pub warnings: Vec<Warning>,
}

/// What the caller gets back: the document plus everything worth surfacing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    /// Complete RFC 5545 document text.
    pub calendar: String,
    /// Skipped records, de-duplicated scrapes, demoted groups, and dropped
    /// event blocks, in pipeline order.
    pub warnings: Vec<Warning>,
}

/// ## Summary
/// Builds the recurrence model for a scraped occurrence sequence.
///
/// Input needs no pre-sorting or pre-grouping. Invalid records are excluded
/// with warnings; each surviving group resolves to exactly one recurring
/// series or is fully exploded into flat events.
#[must_use]
pub fn build_model(raw: &[RawOccurrence], options: &ExportOptions) -> CalendarModel {
    let (occurrences, mut warnings) = group::ingest(raw);
    let (groups, duplicate_warnings) = group::group_occurrences(occurrences);
    warnings.extend(duplicate_warnings);

    let mut series = Vec::new();
    let mut flats = Vec::new();
    for series_group in groups.values() {
        let (assembly, group_warnings) = assemble::assemble_group(series_group, options);
        warnings.extend(group_warnings);
        match assembly {
            Assembly::Series(s) => series.push(s),
            Assembly::Flat(events) => flats.extend(events),
        }
    }

    tracing::debug!(
        series = series.len(),
        flats = flats.len(),
        warnings = warnings.len(),
        "assembled calendar model"
    );
    CalendarModel {
        series,
        flats,
        warnings,
    }
}

/// ## Summary
/// Runs the full pipeline: occurrence sequence in, document text out.
///
/// Never fails: structurally impossible input (nothing left after
/// filtering) produces an empty-but-valid VCALENDAR, and all per-record and
/// per-group problems are reported through the warning list.
#[must_use]
pub fn export(raw: &[RawOccurrence], options: &ExportOptions) -> ExportOutcome {
    let model = build_model(raw, options);
    let (calendar, encode_warnings) = encode::encode_model(&model, options);

    let mut warnings = model.warnings;
    warnings.extend(encode_warnings);
    ExportOutcome { calendar, warnings }
}
