//! Quantity text normalization: vulgar fractions, mixed numbers and ranges.

use regex::Regex;
use std::sync::LazyLock;

const FRACTION_CHARS: [(char, &str); 9] = [
    ('½', "1/2"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

static MIXED_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:(\d+)\s+)?(\d+)/(\d+)\s*$").expect("valid fraction regex"));

static RANGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-–]").expect("valid range separator regex"));

/// Replaces vulgar fraction characters with `n/d`. A fraction glued to a
/// whole number ("1½") becomes a mixed number ("1 1/2").
pub fn replace_fraction_chars(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match FRACTION_CHARS.iter().find(|(ch, _)| *ch == c) {
            Some((_, ascii)) => {
                if out.ends_with(|prev: char| prev.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push_str(ascii);
            }
            None => out.push(c),
        }
    }
    out
}

/// Parses "1", "1.5", "1,5", "1/2" or "1 1/2" into a float.
pub fn fraction_to_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some(caps) = MIXED_FRACTION.captures(s) {
        let whole: f64 = match caps.get(1) {
            Some(w) => w.as_str().parse().ok()?,
            None => 0.0,
        };
        let num: f64 = caps[2].parse().ok()?;
        let den: f64 = caps[3].parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(whole + num / den);
    }
    s.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalizes a quantity or range. A side that does not parse keeps the
/// raw text verbatim; ranges render as "min-max".
pub fn parse_quantity(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let replaced = replace_fraction_chars(raw);

    let mut values = Vec::new();
    for part in RANGE_SEPARATOR.split(&replaced) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match fraction_to_float(part) {
            Some(v) => values.push(v),
            None => return Some(raw.trim().to_string()),
        }
    }

    match values.as_slice() {
        [] => None,
        [single] => Some(format_number(*single)),
        _ => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some(format!("{}-{}", format_number(min), format_number(max)))
        }
    }
}

/// Shortest rendering with six significant digits: `2`, `0.5`, `1.33333`,
/// switching to exponent form for very large or small magnitudes.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sci = format!("{value:.5e}");
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if !(-4..6).contains(&exponent) {
        let mantissa = trim_fraction_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }

    let decimals = (5 - exponent).max(0) as usize;
    trim_fraction_zeros(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
