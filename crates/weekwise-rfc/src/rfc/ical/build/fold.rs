//! iCalendar line folding.

/// Maximum line length in octets (not characters) per RFC 5545.
const MAX_LINE_OCTETS: usize = 75;

/// Folds a content line to the maximum length.
///
/// Lines longer than 75 octets are folded by inserting CRLF + space.
/// Folds at UTF-8 character boundaries; continuation lines reserve one octet
/// for the leading space.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut budget = MAX_LINE_OCTETS;
    for c in line.chars() {
        let width = c.len_utf8();
        if width > budget {
            out.push_str("\r\n ");
            budget = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        budget -= width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_unchanged() {
        let line = "SUMMARY:Algebra";
        assert_eq!(fold_line(line), line);
    }

    #[test]
    fn fold_at_75_octets() {
        let line = "X".repeat(80);
        let folded = fold_line(&line);
        assert!(folded.contains("\r\n "));

        let first_line: String = folded.chars().take_while(|&c| c != '\r').collect();
        assert_eq!(first_line.len(), 75);
    }

    #[test]
    fn continuation_lines_fit_with_space_prefix() {
        let line = "X".repeat(200);
        let folded = fold_line(&line);
        for part in folded.split("\r\n").skip(1) {
            // Includes the leading space.
            assert!(part.len() <= MAX_LINE_OCTETS);
            assert!(part.starts_with(' '));
        }
        let unfolded: String = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn fold_respects_utf8() {
        // 日 is 3 bytes in UTF-8
        let line = format!("LOCATION:{}", "日".repeat(40));
        let folded = fold_line(&line);

        for part in folded.split("\r\n ") {
            assert!(part.is_char_boundary(part.len()));
            assert!(part.len() <= MAX_LINE_OCTETS);
        }
    }
}
