//! Shared text helpers for page rendering.

use polars::prelude::*;

/// Text shown for a missing cell value.
pub const MISSING_CELL: &str = "nan";

/// Suffix appended to truncated text.
const ELLIPSIS: &str = "...";

/// Format a cell value for display in the preview table.
///
/// Strings are shown without quotes and nulls as [`MISSING_CELL`].
pub fn format_cell(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => MISSING_CELL.to_string(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Truncate a string to at most `max_chars` characters, ending with "..."
/// when anything was cut.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return s.chars().take(max_chars).collect();
    }
    let kept: String = s.chars().take(max_chars - ELLIPSIS.len()).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Greedy word wrap. Words longer than a line (paths, mostly) are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max_chars) {
            let piece_len = piece.len();
            let needed = if current_len == 0 {
                piece_len
            } else {
                current_len + 1 + piece_len
            };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(piece);
            current_len += piece_len;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Restrict text to what the PDF built-in fonts can encode (printable
/// Latin-1). Anything else becomes '?'.
pub fn pdf_safe_text(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c,
            '\t' => ' ',
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&AnyValue::Null), "nan");
        assert_eq!(format_cell(&AnyValue::String("Phoenix")), "Phoenix");
        assert_eq!(format_cell(&AnyValue::Int64(42)), "42");
        assert_eq!(format_cell(&AnyValue::Boolean(true)), "true");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_str("a much longer value", 10), "a much ...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
        assert_eq!(truncate_str("ünïcödé text", 6), "ünï...");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("Columns: a, b, c, d, e", 10),
            vec!["Columns:", "a, b, c,", "d, e"]
        );
        assert_eq!(
            wrap_text("Path: /very/long/path", 8),
            vec!["Path:", "/very/lo", "ng/path"]
        );
        assert_eq!(wrap_text("", 8), vec![""]);
    }

    #[test]
    fn test_pdf_safe_text() {
        assert_eq!(pdf_safe_text("São Paulo"), "São Paulo");
        assert_eq!(pdf_safe_text("tab\there"), "tab here");
        assert_eq!(pdf_safe_text("µg/m³ → ppm"), "µg/m³ ? ppm");
        assert_eq!(pdf_safe_text("日本"), "??");
    }
}
