//! iCalendar (RFC 5545) generation layer for weekwise.
//!
//! Generation-only: the exporter never reads iCalendar text, so there is no
//! parse side. The `rfc::ical::core` module holds the document model and the
//! `rfc::ical::build` module turns it into canonical wire text.

pub mod error;
pub mod rfc;

pub use error::{RfcError, RfcResult};
