//! TEXT and parameter value escaping (RFC 5545 §3.3.11, §3.1).

use crate::error::{RfcError, RfcResult};

/// Escapes a TEXT value.
///
/// Backslash, semicolon, and comma gain a backslash prefix; newlines become
/// the literal `\n` sequence. Carriage returns are folded into the newline
/// escape.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a parameter value, quoting it when it contains characters that
/// would terminate the parameter (`:`, `;`, `,`).
///
/// Double quotes cannot appear in parameter values at all and are dropped.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    let cleaned: String = s.chars().filter(|&c| c != '"').collect();
    if cleaned.contains([':', ';', ',']) {
        format!("\"{cleaned}\"")
    } else {
        cleaned
    }
}

/// Checks that a TEXT value can be represented at all.
///
/// Control characters other than horizontal tab and line breaks have no
/// escape sequence in RFC 5545 and make the value unrepresentable.
///
/// ## Errors
/// Returns [`RfcError::EncodeError`] naming the first offending character.
pub fn ensure_representable(s: &str) -> RfcResult<()> {
    match s
        .chars()
        .find(|&c| c.is_control() && c != '\t' && c != '\n' && c != '\r')
    {
        Some(c) => Err(RfcError::EncodeError(format!(
            "control character U+{:04X} cannot be represented in TEXT",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}
