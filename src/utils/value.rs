//! Cell-text coercion helpers shared by every rule.
//!
//! Uploaded cells arrive as free text, so each rule funnels through these
//! helpers instead of parsing ad hoc. The conventions mirror what appraisal
//! teams actually type: whole numbers exported as "120.0", "n/a" used as a
//! real value rather than a blank, and "nan" left behind by earlier tooling.

/// True iff the value is missing once trimmed.
///
/// A literal "0" or a case-insensitive "n/a" is a legitimate value, not a
/// missing-data marker, and is therefore never considered empty.
pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse a cell as a non-decimal integer.
///
/// A trailing ".0" is treated as an integer written with a spurious decimal
/// (spreadsheets export whole numbers that way) and stripped. Any other
/// decimal point fails the parse: these fields must be non-decimal.
pub fn to_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if normalized.contains('.') {
        return None;
    }

    normalized.parse::<i64>().ok()
}

/// Parse a cell as a floating-point number. Empty cells fail.
pub fn to_float(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// Append a violation message to a cell's displayed text.
///
/// An existing value that trims to empty or to a literal "nan" is replaced
/// outright; otherwise the message joins the pipe-delimited trail. Invocation
/// order determines message order on the cell.
pub fn append_message(existing: &str, message: &str) -> String {
    let trimmed = existing.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        message.to_string()
    } else {
        format!("{existing} | {message}")
    }
}

/// Lenient numeric parse used by the `sum` aggregation.
///
/// Thousands separators are stripped before parsing; anything that still
/// fails to parse (including empty cells) contributes 0 to the total.
pub fn parse_total(value: &str) -> f64 {
    value
        .replace(',', "")
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty_trims_whitespace() {
        assert!(is_empty(""));
        assert!(is_empty("   "));
        assert!(is_empty("\t"));
    }

    #[test]
    fn test_is_empty_keeps_legitimate_markers() {
        // "0" and "n/a" are real values in valuation uploads
        assert!(!is_empty("0"));
        assert!(!is_empty("n/a"));
        assert!(!is_empty("N/A"));
    }

    #[test]
    fn test_to_int_strips_spurious_decimal() {
        assert_eq!(to_int("5.0"), Some(5));
        assert_eq!(to_int(" 42.0 "), Some(42));
    }

    #[test]
    fn test_to_int_rejects_real_decimals() {
        assert_eq!(to_int("5.5"), None);
        assert_eq!(to_int("5.00"), None);
        assert_eq!(to_int("1.2.3"), None);
    }

    #[test]
    fn test_to_int_rejects_empty_and_text() {
        assert_eq!(to_int(""), None);
        assert_eq!(to_int("   "), None);
        assert_eq!(to_int("abc"), None);
        assert_eq!(to_int("n/a"), None);
    }

    #[test]
    fn test_to_int_accepts_plain_integers() {
        assert_eq!(to_int("0"), Some(0));
        assert_eq!(to_int("-17"), Some(-17));
        assert_eq!(to_int("38"), Some(38));
    }

    #[test]
    fn test_to_float_parses_numbers() {
        assert_eq!(to_float("120.5"), Some(120.5));
        assert_eq!(to_float("-3"), Some(-3.0));
        assert_eq!(to_float(""), None);
        assert_eq!(to_float("many"), None);
    }

    #[test]
    fn test_append_message_starts_trail_on_empty() {
        assert_eq!(append_message("", "must not be empty"), "must not be empty");
        assert_eq!(
            append_message("  ", "must not be empty"),
            "must not be empty"
        );
    }

    #[test]
    fn test_append_message_replaces_nan() {
        assert_eq!(append_message("nan", "bad value"), "bad value");
        assert_eq!(append_message("NaN", "bad value"), "bad value");
    }

    #[test]
    fn test_append_message_joins_with_pipe() {
        let first = append_message("200", "must be a non-decimal integer");
        assert_eq!(first, "200 | must be a non-decimal integer");

        let second = append_message(&first, "out of range");
        assert_eq!(second, "200 | must be a non-decimal integer | out of range");
    }

    #[test]
    fn test_parse_total_strips_thousands_separators() {
        assert_eq!(parse_total("50,000"), 50000.0);
        assert_eq!(parse_total("1,234,567.5"), 1234567.5);
    }

    #[test]
    fn test_parse_total_defaults_to_zero() {
        assert_eq!(parse_total(""), 0.0);
        assert_eq!(parse_total("abc"), 0.0);
    }
}
