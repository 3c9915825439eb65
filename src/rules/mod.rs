//! Per-language unit aliases and ingredient-name cleanup rules.

use log::warn;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

mod provider;

pub use self::provider::{RuleSource, RuleTableProvider};

/// Unit alias table: normalized token -> canonical unit.
pub type UnitAliases = HashMap<String, String>;

/// Cleanup switches from the `cleanup` object of a notes rules file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CleanupFlags {
    /// Pull "à 400 g" style pack sizes out of ingredient names
    #[serde(default)]
    pub normalize_a_pack: bool,
}

/// Immutable rule bundle for one language.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    unit_aliases: Arc<UnitAliases>,
    trailing_phrases: Vec<Regex>,
    leading_adverbs: Vec<Regex>,
    cleanup: CleanupFlags,
}

#[derive(Debug, Default, Deserialize)]
struct RawNotesRules {
    #[serde(default)]
    trailing_phrases: Vec<String>,
    #[serde(default)]
    leading_adverbs: Vec<String>,
    #[serde(default)]
    cleanup: CleanupFlags,
}

/// Lookup key for a unit token: trimmed, lowercased, trailing dots removed.
pub fn unit_key(token: &str) -> String {
    token.trim().to_lowercase().trim_end_matches('.').to_string()
}

impl RuleSet {
    /// A rule set that recognizes no units and applies no cleanup.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        unit_aliases: UnitAliases,
        trailing_phrases: Vec<Regex>,
        leading_adverbs: Vec<Regex>,
        cleanup: CleanupFlags,
    ) -> Self {
        let unit_aliases = unit_aliases
            .into_iter()
            .map(|(k, v)| (unit_key(&k), v))
            .collect();
        Self {
            unit_aliases: Arc::new(unit_aliases),
            trailing_phrases,
            leading_adverbs,
            cleanup,
        }
    }

    /// Builds a rule set from the JSON text of a units file and a notes rules
    /// file. Either side that fails to decode contributes nothing.
    pub fn from_json(units: Option<&str>, notes: Option<&str>, lang: &str) -> Self {
        let unit_aliases: UnitAliases = match units.map(serde_json::from_str::<UnitAliases>) {
            Some(Ok(aliases)) => aliases,
            Some(Err(e)) => {
                warn!("Unit alias table for '{lang}' is corrupt, using none: {e}");
                UnitAliases::new()
            }
            None => UnitAliases::new(),
        };

        let raw = match notes.map(serde_json::from_str::<RawNotesRules>) {
            Some(Ok(raw)) => raw,
            Some(Err(e)) => {
                warn!("Notes rules for '{lang}' are corrupt, using none: {e}");
                RawNotesRules::default()
            }
            None => RawNotesRules::default(),
        };

        let trailing_phrases = compile_patterns(&raw.trailing_phrases, lang, |p| format!("(?i){p}"));
        let leading_adverbs =
            compile_patterns(&raw.leading_adverbs, lang, |p| format!(r"(?i)^(?:{p})\b"));

        Self::new(unit_aliases, trailing_phrases, leading_adverbs, raw.cleanup)
    }

    pub fn unit_aliases(&self) -> Arc<UnitAliases> {
        Arc::clone(&self.unit_aliases)
    }

    pub fn trailing_phrases(&self) -> &[Regex] {
        &self.trailing_phrases
    }

    pub fn leading_adverbs(&self) -> &[Regex] {
        &self.leading_adverbs
    }

    pub fn cleanup(&self) -> CleanupFlags {
        self.cleanup
    }

    pub fn is_known_unit(&self, token: &str) -> bool {
        !token.trim().is_empty() && self.unit_aliases.contains_key(&unit_key(token))
    }

    /// Canonical form of a unit token. Unknown tokens come back as their
    /// lookup key.
    pub fn normalize_unit(&self, token: &str) -> Option<String> {
        if token.trim().is_empty() {
            return None;
        }
        let key = unit_key(token);
        Some(self.unit_aliases.get(&key).cloned().unwrap_or(key))
    }

    pub fn is_empty(&self) -> bool {
        self.unit_aliases.is_empty()
            && self.trailing_phrases.is_empty()
            && self.leading_adverbs.is_empty()
    }
}

fn compile_patterns<F>(patterns: &[String], lang: &str, wrap: F) -> Vec<Regex>
where
    F: Fn(&str) -> String,
{
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(&wrap(pattern)) {
            Ok(rx) => Some(rx),
            Err(e) => {
                warn!("Skipping invalid notes pattern for '{lang}' ({pattern}): {e}");
                None
            }
        })
        .collect()
}
