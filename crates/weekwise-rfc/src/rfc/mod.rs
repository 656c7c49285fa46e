//! RFC format implementations.

pub mod ical;
