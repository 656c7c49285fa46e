//! iCalendar core models (RFC 5545).
//!
//! This module defines the data structures for building iCalendar content.
//! These types are designed for:
//! - Deterministic serialization: property order is insertion order, so the
//!   same model always renders to the same bytes
//! - Type safety: date, date-time, and recurrence values carry their wire
//!   form in the type rather than in loose strings

mod component;
mod datetime;
mod parameter;
mod property;
mod rrule;
mod value;

pub use component::{Component, ComponentKind, ICalendar};
pub use datetime::{Date, DateTime, DateTimeForm};
pub use parameter::Parameter;
pub use property::{Property, names};
pub use rrule::{Frequency, RRule, Weekday};
pub use value::Value;
