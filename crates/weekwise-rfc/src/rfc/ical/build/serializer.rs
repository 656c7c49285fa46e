//! Full document serialization with deterministic output.
//!
//! Property order is insertion order and child order is insertion order, so
//! serializing the same model twice yields byte-identical text. Callers are
//! responsible for inserting in canonical order.

use super::escape::{escape_param_value, escape_text};
use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ICalendar, Property, Value};

/// Serializes a full iCalendar document to wire text (CRLF line endings).
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    tracing::trace!(
        components = ical.root.children.len(),
        "serializing iCalendar document"
    );
    serialize_component(&ical.root)
}

/// Serializes one component, including BEGIN/END delimiters and children.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut out = String::new();
    write_component(component, &mut out);
    out
}

/// Serializes one property to a single (folded) content line, without the
/// trailing CRLF.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();
    for param in &prop.params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        line.push_str(&escape_param_value(&param.value));
    }
    line.push(':');
    line.push_str(&render_value(&prop.value));
    fold_line(&line)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Text(s) => escape_text(s),
        Value::Integer(i) => i.to_string(),
        Value::Date(d) => d.to_string(),
        Value::DateTime(dt) => dt.to_string(),
        Value::Recur(rule) => rule.to_string(),
    }
}

fn write_component(component: &Component, out: &mut String) {
    out.push_str("BEGIN:");
    out.push_str(component.kind.as_str());
    out.push_str("\r\n");

    for prop in &component.properties {
        out.push_str(&serialize_property(prop));
        out.push_str("\r\n");
    }
    for child in &component.children {
        write_component(child, out);
    }

    out.push_str("END:");
    out.push_str(component.kind.as_str());
    out.push_str("\r\n");
}
