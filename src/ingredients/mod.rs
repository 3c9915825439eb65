//! # Ingredient line parsing
//!
//! Turns a free-text line such as `"1 1/2 dl vispgrädde (36%)"` into an
//! [`Ingredient`] with quantity, canonical unit, name and notes.
//!
//! Parsing happens in two phases:
//!
//! 1. A grammar match splits the line into quantity, unit token, name and an
//!    optional trailing parenthetical. Unit tokens the active [`RuleSet`] does
//!    not know, or that appear without a quantity, are folded back into the
//!    name.
//! 2. The name runs through the cleanup stages in [`CLEANUP_STAGES`], each of
//!    which moves annotations out of the name and into the notes.
//!
//! Lines the grammar cannot match, or whose name ends up empty, come back as
//! a name-only ingredient carrying the original text.
//!
//! ```rust
//! use recipeer_import::ingredients::parse_line;
//! use recipeer_import::rules::RuleTableProvider;
//!
//! let rules = RuleTableProvider::builtin().get_rules("sv");
//! let ingredient = parse_line("2 dl mjölk", &rules);
//! assert_eq!(ingredient.quantity.as_deref(), Some("2"));
//! assert_eq!(ingredient.unit.as_deref(), Some("dl"));
//! assert_eq!(ingredient.name, "mjölk");
//! ```

pub mod quantity;

use crate::model::Ingredient;
use crate::rules::RuleSet;
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub use self::quantity::{format_number, fraction_to_float, parse_quantity, replace_fraction_chars};

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?P<qty>
            (?:
                (?:\d+[.,]\d+|\d+)(?:\s+\d+/\d+)?   # 1.5 | 1 | 1 1/2
                |
                \d+/\d+                             # 1/2
            )
            (?:\s*[-–]\s*
                (?:
                    (?:\d+[.,]\d+|\d+)(?:\s+\d+/\d+)? | \d+/\d+
                )
            )?
        )?
        \s*
        (?P<unit>[\p{L}.%]+)?
        \s+
        (?P<name>.+?)
        (?:\s*\((?P<notes>[^)]+)\))?
        \s*$",
    )
    .expect("valid ingredient line regex")
});

static PACK_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bà\b\s*([0-9]+)\s*([a-zA-Z]+)").expect("valid pack size regex")
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid parenthetical regex"));

/// Working state threaded through the name cleanup stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanupState {
    pub name: String,
    pub notes: Vec<String>,
}

impl CleanupState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: Vec::new(),
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        let note = clean_note(note);
        if !note.is_empty() {
            self.notes.push(note.to_string());
        }
        self
    }
}

pub type CleanupStage = fn(CleanupState, &RuleSet) -> CleanupState;

/// Name cleanup stages in application order. Notes accumulate in the same
/// order, which is the order they appear in the final notes string.
pub const CLEANUP_STAGES: [CleanupStage; 4] = [
    extract_pack_size,
    extract_parentheticals,
    strip_leading_adverbs,
    strip_trailing_phrases,
];

/// Parses one ingredient line with the given rule set.
pub fn parse_line(raw_line: &str, rules: &RuleSet) -> Ingredient {
    let original = squash(raw_line);
    let line = replace_fraction_chars(&original);

    let Some(caps) = LINE.captures(&line) else {
        debug!("Ingredient line did not match grammar: {original:?}");
        return Ingredient::name_only(original);
    };

    let qty_raw = caps.name("qty").map(|m| m.as_str());
    let unit_raw = caps.name("unit").map(|m| m.as_str());
    let mut name = caps.name("name").map_or("", |m| m.as_str()).trim().to_string();
    let trailing_note = caps.name("notes").map(|m| m.as_str());

    let quantity = parse_quantity(qty_raw);

    // A unit token only counts when it is known and follows a quantity;
    // otherwise it was the first word of the name.
    let mut unit = None;
    if let Some(token) = unit_raw {
        if quantity.is_some() && rules.is_known_unit(token) {
            unit = rules.normalize_unit(token);
        } else {
            name = squash(&format!("{token} {name}"));
        }
    }

    let mut seed = CleanupState::new(name);
    if let Some(note) = trailing_note {
        seed = seed.with_note(note);
    }
    let cleaned = clean_name(seed, rules);

    if cleaned.name.is_empty() {
        debug!("Ingredient name empty after cleanup: {original:?}");
        return Ingredient::name_only(original);
    }

    let notes = cleaned.notes.join(" ").trim().to_string();

    Ingredient {
        name: cleaned.name,
        quantity,
        unit,
        notes: (!notes.is_empty()).then_some(notes),
    }
}

/// Runs every stage of [`CLEANUP_STAGES`] over `state`.
pub fn clean_name(state: CleanupState, rules: &RuleSet) -> CleanupState {
    CLEANUP_STAGES
        .iter()
        .fold(state, |state, stage| stage(state, rules))
}

/// Moves an "à 400 g" pack size into the notes when the rule set enables it.
pub fn extract_pack_size(state: CleanupState, rules: &RuleSet) -> CleanupState {
    if !rules.cleanup().normalize_a_pack {
        return state;
    }
    let found = PACK_SIZE.captures(&state.name).and_then(|caps| {
        let whole = caps.get(0)?;
        Some((whole.range(), format!("à {} {}", &caps[1], &caps[2])))
    });
    let Some((range, note)) = found else {
        return state;
    };

    let name = format!("{}{}", &state.name[..range.start], &state.name[range.end..]);
    let name = squash(&name)
        .trim_end_matches([',', ';', '.'])
        .trim()
        .to_string();

    CleanupState {
        name,
        notes: state.notes,
    }
    .with_note(&note)
}

/// Removes every "(...)" group from the name, keeping each inner text as a note.
pub fn extract_parentheticals(state: CleanupState, _rules: &RuleSet) -> CleanupState {
    let mut found = Vec::new();
    let name = PARENTHETICAL.replace_all(&state.name, |caps: &Captures| {
        found.push(caps[1].to_string());
        ""
    });
    let name = squash(&name);

    found.iter().fold(
        CleanupState {
            name,
            notes: state.notes,
        },
        |state, note| state.with_note(note),
    )
}

/// Strips configured leading qualifiers such as "finely chopped".
pub fn strip_leading_adverbs(state: CleanupState, rules: &RuleSet) -> CleanupState {
    rules.leading_adverbs().iter().fold(state, |state, rx| {
        let Some(m) = rx.find(&state.name) else {
            return state;
        };
        let note = m.as_str().to_string();
        let name = state.name[m.end()..]
            .trim_start_matches([',', ';', ' ', '.'])
            .trim()
            .to_string();
        CleanupState {
            name,
            notes: state.notes,
        }
        .with_note(&note)
    })
}

/// Cuts configured trailing phrases ("to taste", ", hackad") off the name.
pub fn strip_trailing_phrases(state: CleanupState, rules: &RuleSet) -> CleanupState {
    rules.trailing_phrases().iter().fold(state, |state, rx| {
        let Some(m) = rx.find(&state.name) else {
            return state;
        };
        let note = m.as_str().to_string();
        let name = state.name[..m.start()]
            .trim_end_matches([',', ';', ' ', '.'])
            .trim()
            .to_string();
        CleanupState {
            name,
            notes: state.notes,
        }
        .with_note(&note)
    })
}

fn clean_note(note: &str) -> &str {
    note.trim_matches(|c: char| c == ',' || c == ';' || c.is_whitespace())
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
