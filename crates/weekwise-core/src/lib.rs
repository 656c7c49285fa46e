//! Core domain model for the weekwise timetable exporter.
//!
//! This crate holds the validated session model, the export options, and the
//! warning taxonomy shared by the rest of the workspace. It has no knowledge
//! of iCalendar or of the recurrence pipeline; those live in `weekwise-rfc`
//! and `weekwise-engine`.

pub mod constants;
pub mod error;
pub mod occurrence;
pub mod options;
pub mod warning;

pub use error::{CoreError, CoreResult};
pub use occurrence::{GroupKey, Occurrence, PeriodRange, RawOccurrence, SessionFields};
pub use options::ExportOptions;
pub use warning::Warning;
