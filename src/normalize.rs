//! Duration and servings normalization for Recipe nodes.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^P
        (?:(?P<years>\d+)Y)?
        (?:(?P<months>\d+)M)?
        (?:(?P<days>\d+)D)?
        (?:T
            (?:(?P<hours>\d+)H)?
            (?:(?P<mins>\d+)M)?
            (?:(?P<secs>\d+)S)?
        )?$",
    )
    .expect("valid ISO-8601 duration regex")
});

static UNDEFINED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bundefined\b").expect("valid undefined regex"));

static SERVINGS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\s*-\s*\d+)?)\b").expect("valid servings regex"));

static PORTION_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bport(?:ion(?:er|s)?)?\b").expect("valid portion regex"));

/// Keys checked for a duration, highest priority first.
const TIME_KEYS: [&str; 4] = ["totalTime", "total_time", "cookTime", "prepTime"];

/// Converts an ISO-8601 duration to "1 h 30 min". Seconds are only shown
/// when there are no hours or minutes. Date components are accepted but
/// ignored, so "P1D" yields `None`.
pub fn parse_duration(s: &str) -> Option<String> {
    let caps = ISO_DURATION.captures(s.trim())?;
    let component = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u64>().ok());

    let mut parts = Vec::new();
    if let Some(hours) = component("hours") {
        parts.push(format!("{hours} h"));
    }
    if let Some(mins) = component("mins") {
        parts.push(format!("{mins} min"));
    }
    if parts.is_empty() {
        if let Some(secs) = component("secs") {
            parts.push(format!("{secs} s"));
        }
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Cleans a servings string down to its number, keeping a "portioner"
/// suffix when the text talks about portions.
pub fn clean_servings(s: &str) -> String {
    let without_undefined = UNDEFINED_TOKEN.replace_all(s, "");
    let cleaned = without_undefined
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let Some(number) = SERVINGS_NUMBER.captures(&cleaned).map(|caps| caps[1].to_string()) else {
        return cleaned;
    };
    let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();

    if PORTION_WORD.is_match(&cleaned) {
        format!("{number} portioner")
    } else {
        number
    }
}

/// Servings from `recipeYield`: a number, a string, or the first non-empty
/// string of a list.
pub fn extract_servings(recipe: &Map<String, Value>) -> Option<String> {
    match recipe.get("recipeYield")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(|n| n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(clean_servings(s.trim())),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(clean_servings(s.trim())),
            _ => None,
        }),
        _ => None,
    }
}

/// First non-empty time field, humanized when it is an ISO-8601 duration.
pub fn extract_total_time(recipe: &Map<String, Value>) -> Option<String> {
    TIME_KEYS.iter().find_map(|key| match recipe.get(*key) {
        Some(Value::String(value)) if !value.is_empty() => {
            if value.starts_with('P') {
                Some(parse_duration(value).unwrap_or_else(|| value.clone()))
            } else {
                Some(value.clone())
            }
        }
        _ => None,
    })
}
