//! Parsing of cell text into typed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-time layouts tried, in order, when no format is configured.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d %B %Y %H:%M",
    "%B %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// day.js tokens and their chrono equivalents, longest first per letter.
const DAYJS_TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%m"),
    ("DD", "%d"),
    ("D", "%d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%H"),
    ("hh", "%I"),
    ("h", "%I"),
    ("mm", "%M"),
    ("m", "%M"),
    ("ss", "%S"),
    ("s", "%S"),
    ("SSS", "%3f"),
    ("A", "%p"),
    ("a", "%p"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
];

fn is_currency_symbol(ch: char) -> bool {
    matches!(
        ch,
        '$' | '€' | '£' | '¥' | '¢' | '₹' | '₩' | '₽' | '₺' | '₪' | '฿' | '₫' | '₴' | '₦' | '₱'
    )
}

/// Parses a decorated number: currency symbols, thousands separators, and
/// percent signs are ignored, `,` is always a thousands separator.
///
/// `"$1,234.50"` parses as `1234.5`, `"12%"` as `12.0`. Text without any
/// digit, or with other letters, is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut cleaned = String::with_capacity(trimmed.len());
    let mut digits = 0usize;
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' => {
                digits += 1;
                cleaned.push(ch);
            }
            '.' | '-' | '+' | 'e' | 'E' => cleaned.push(ch),
            '\u{2212}' => cleaned.push('-'),
            ',' | '_' | '\'' | ' ' | '%' | '\u{a0}' | '\u{202f}' => {}
            ch if is_currency_symbol(ch) => {}
            _ => return None,
        }
    }
    if digits == 0 {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// `true` / `false`, ignoring surrounding whitespace and ASCII case.
pub fn parse_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A configured date format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormat {
    /// RFC 3339 / ISO 8601 timestamps, falling back to the permissive parser.
    Iso8601,
    Rfc2822,
    /// `YYYY-MM-DD HH:mm:ss`
    Mysql,
    /// Seconds since the epoch.
    Unix,
    /// A chrono `strftime` pattern.
    Pattern(String),
}

impl DateFormat {
    /// Interprets a format name, a chrono pattern (anything containing `%`),
    /// or a day.js token pattern such as `DD/MM/YYYY`.
    pub fn new(name: &str) -> Self {
        match name.trim() {
            "ISO_8601" => Self::Iso8601,
            "RFC_2822" => Self::Rfc2822,
            "MYSQL" => Self::Mysql,
            "UNIX" => Self::Unix,
            pattern if pattern.contains('%') => Self::Pattern(pattern.to_string()),
            pattern => Self::Pattern(translate_dayjs(pattern)),
        }
    }

    /// Milliseconds since the epoch (UTC), or `None` when `text` does not
    /// match this format.
    pub fn timestamp(&self, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match self {
            Self::Iso8601 => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.timestamp_millis())
                .or_else(|| parse_date_permissive(text)),
            Self::Rfc2822 => DateTime::parse_from_rfc2822(text)
                .ok()
                .map(|dt| dt.timestamp_millis()),
            Self::Mysql => parse_with_pattern(text, "%Y-%m-%d %H:%M:%S"),
            Self::Unix => text
                .parse::<f64>()
                .ok()
                .filter(|seconds| seconds.is_finite())
                .map(|seconds| (seconds * 1000.0) as i64),
            Self::Pattern(pattern) => parse_with_pattern(text, pattern),
        }
    }
}

/// Parses `text` with `format` when given, else with the permissive parser.
pub fn parse_date(text: &str, format: Option<&DateFormat>) -> Option<i64> {
    match format {
        Some(format) => format.timestamp(text),
        None => parse_date_permissive(text),
    }
}

/// Accepts RFC 3339, RFC 2822, and a set of common date and date-time
/// layouts. Date-only values resolve to midnight UTC.
pub fn parse_date_permissive(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    for pattern in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for pattern in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
            return Some(midnight_millis(date));
        }
    }
    // Year-month, e.g. `2024-03`.
    if text.len() == 7
        && text.as_bytes()[4] == b'-'
        && let Ok(date) = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
    {
        return Some(midnight_millis(date));
    }
    None
}

fn parse_with_pattern(text: &str, pattern: &str) -> Option<i64> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(text, pattern) {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(text, pattern)
        .ok()
        .map(midnight_millis)
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Rewrites a day.js token pattern as a chrono pattern. Text inside `[...]`
/// is kept literally.
pub fn translate_dayjs(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    'outer: while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']').unwrap_or(after.len());
            push_literal(&mut out, &after[..end]);
            rest = after.get(end + 1..).unwrap_or("");
            continue;
        }
        for (token, replacement) in DAYJS_TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = after;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            push_literal(&mut out, ch.encode_utf8(&mut [0; 4]));
        }
        rest = chars.as_str();
    }
    out
}

fn push_literal(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
}
