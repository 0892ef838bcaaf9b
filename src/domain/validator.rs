//! Per-field validation of raw form input.
//!
//! Validation is a pure function of the parameter and its raw text. It is run
//! on every value change and once more over every field before a request is
//! built. Numeric fields are read the way a browser's `parseFloat` reads them:
//! the longest numeric prefix counts and anything unparsable becomes NaN,
//! which fails every range check.

use crate::domain::parameter::{Constraint, ParameterId};
use regex::Regex;
use std::sync::LazyLock;

static COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color pattern is a valid regex"));

/// Value extracted from a field that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Number(f64),
    Color(String),
}

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    /// User-facing message, set only when `valid` is false.
    pub message: Option<&'static str>,
    /// Parsed value, set only when `valid` is true.
    pub normalized: Option<NormalizedValue>,
}

impl ValidationResult {
    fn accepted(value: NormalizedValue) -> Self {
        Self {
            valid: true,
            message: None,
            normalized: Some(value),
        }
    }

    fn rejected(id: ParameterId) -> Self {
        Self {
            valid: false,
            message: Some(id.error_message()),
            normalized: None,
        }
    }
}

/// Validates `raw` against the constraint of `id`.
///
/// # Examples
///
/// ```
/// use shelltex::domain::{validate, ParameterId};
///
/// assert!(validate(ParameterId::K, "2.5").valid);
/// assert!(!validate(ParameterId::K, "abc").valid);
/// assert!(validate(ParameterId::Color1, "#1a2B3c").valid);
/// ```
#[must_use]
pub fn validate(id: ParameterId, raw: &str) -> ValidationResult {
    match id.constraint() {
        Constraint::Range { min, max } => {
            let value = parse_float(raw);
            // NaN fails both comparisons
            if value >= min && value <= max {
                ValidationResult::accepted(NormalizedValue::Number(value))
            } else {
                ValidationResult::rejected(id)
            }
        }
        Constraint::HexColor => {
            if COLOR_PATTERN.is_match(raw) {
                ValidationResult::accepted(NormalizedValue::Color(raw.to_string()))
            } else {
                ValidationResult::rejected(id)
            }
        }
    }
}

/// Parses the longest leading decimal literal of `raw`, or NaN if there is none.
///
/// Leading whitespace, including a byte order mark, is skipped. Accepted forms are an optional sign followed
/// by either `Infinity` or digits with an optional fraction and an optional
/// exponent. Trailing text after the literal is ignored, so `"1.5abc"` is 1.5
/// and `"1e"` is 1.
#[must_use]
pub fn parse_float(raw: &str) -> f64 {
    let s = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    if s[pos..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            pos = end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return f64::NAN;
    }

    let mut exponent = "";
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut end = pos + 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end > digits_start {
            exponent = &s[pos..end];
        }
    }

    let literal = format!(
        "{sign}{int}.{frac}{exponent}",
        sign = if negative { "-" } else { "" },
        int = if int_digits.is_empty() { "0" } else { int_digits },
        frac = if frac_digits.is_empty() { "0" } else { frac_digits },
    );
    literal.parse().unwrap_or(f64::NAN)
}
