use super::{RuleSet, UnitAliases};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Where rule assets are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Tables compiled into the crate (`sv`, `en`)
    Embedded,
    /// `units.<lang>.json` and `notes_rules.<lang>.json` inside a directory
    Directory(PathBuf),
}

/// Loads rule sets on first use and keeps them for the life of the provider.
///
/// A cached entry is never replaced: concurrent first loads of the same
/// language race harmlessly and the first inserted set wins.
#[derive(Debug)]
pub struct RuleTableProvider {
    source: RuleSource,
    cache: RwLock<HashMap<String, Arc<RuleSet>>>,
}

impl Default for RuleTableProvider {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleTableProvider {
    pub fn new(source: RuleSource) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn builtin() -> Self {
        Self::new(RuleSource::Embedded)
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(RuleSource::Directory(dir.into()))
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    /// Rule set for a language code. Never fails; unknown languages and
    /// unreadable assets yield an empty set.
    pub fn get_rules(&self, lang: &str) -> Arc<RuleSet> {
        let lang = lang.trim().to_lowercase();

        if let Some(rules) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&lang)
        {
            return Arc::clone(rules);
        }

        let loaded = Arc::new(self.load(&lang));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(lang).or_insert(loaded))
    }

    pub fn get_unit_aliases(&self, lang: &str) -> Arc<UnitAliases> {
        self.get_rules(lang).unit_aliases()
    }

    /// Languages loaded so far.
    pub fn cached_languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        langs.sort();
        langs
    }

    fn load(&self, lang: &str) -> RuleSet {
        let units = self.read_asset(&format!("units.{lang}.json"));
        let notes = self.read_asset(&format!("notes_rules.{lang}.json"));
        if units.is_none() && notes.is_none() {
            warn!("No rule tables available for language '{lang}'; ingredient cleanup disabled");
        }
        let rules = RuleSet::from_json(units.as_deref(), notes.as_deref(), lang);
        debug!(
            "Loaded rules for '{}': {} unit aliases, {} trailing, {} leading",
            lang,
            rules.unit_aliases().len(),
            rules.trailing_phrases().len(),
            rules.leading_adverbs().len()
        );
        rules
    }

    fn read_asset(&self, file_name: &str) -> Option<String> {
        match &self.source {
            RuleSource::Embedded => embedded_asset(file_name).map(str::to_string),
            RuleSource::Directory(dir) => {
                let path = dir.join(file_name);
                match fs::read_to_string(&path) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!("Cannot read rule file {}: {}", path.display(), e);
                        None
                    }
                }
            }
        }
    }
}

fn embedded_asset(file_name: &str) -> Option<&'static str> {
    match file_name {
        "units.sv.json" => Some(include_str!("../../data/units.sv.json")),
        "units.en.json" => Some(include_str!("../../data/units.en.json")),
        "notes_rules.sv.json" => Some(include_str!("../../data/notes_rules.sv.json")),
        "notes_rules.en.json" => Some(include_str!("../../data/notes_rules.en.json")),
        _ => None,
    }
}
