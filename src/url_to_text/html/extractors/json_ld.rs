use super::{Extractor, ParsingContext};
use crate::ingredients::parse_line;
use crate::model::{Ingredient, InstructionStep, RecipeExtractionResult, UNTITLED_RECIPE};
use crate::normalize::{extract_servings, extract_total_time};
use crate::rules::{RuleSet, RuleTableProvider};
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Fields tried, in order, when `recipeInstructions` yields no steps.
const FALLBACK_INSTRUCTION_KEYS: [&str; 3] = ["instruction", "instructions", "steps"];

pub struct JsonLdExtractor {
    rules: Arc<RuleTableProvider>,
}

impl JsonLdExtractor {
    pub fn new(rules: Arc<RuleTableProvider>) -> Self {
        Self { rules }
    }

    fn convert_to_recipe(
        &self,
        recipe: &Map<String, Value>,
        url: &str,
        rules: &RuleSet,
    ) -> RecipeExtractionResult {
        RecipeExtractionResult {
            title: extract_title(recipe),
            description: extract_description(recipe),
            ingredients: extract_ingredients(recipe, rules),
            steps: extract_steps(recipe),
            servings: extract_servings(recipe),
            total_time: extract_total_time(recipe),
            source_url: url.to_string(),
            images: extract_images(recipe),
        }
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Option<RecipeExtractionResult> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);

        let blocks = find_jsonld_blocks(&context.document);
        debug!("JsonLdExtractor: Found {} JSON-LD script tags", blocks.len());

        let candidates: Vec<Value> = blocks
            .iter()
            .flat_map(|block| decode_json_candidates(block))
            .collect();
        debug!("JsonLdExtractor: Decoded {} JSON candidates", candidates.len());

        let Some(recipe) = find_first_recipe(&candidates) else {
            debug!("JsonLdExtractor: No Recipe node found in any JSON-LD script");
            return None;
        };

        let rules = self.rules.get_rules(context.lang);
        debug!("JsonLdExtractor: Found Recipe node, parsing with '{}' rules", context.lang);
        Some(self.convert_to_recipe(recipe, &context.url, &rules))
    }
}

/// Trimmed text of every `application/ld+json` script, in document order.
pub fn find_jsonld_blocks(document: &Html) -> Vec<String> {
    let selector = Selector::parse("script[type]").expect("valid script selector");
    document
        .select(&selector)
        .filter(|script| {
            script
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
        })
        .map(|script| script.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Decodes a script body into JSON values. The whole text is tried first;
/// if that fails, every top-level `{...}` / `[...]` region is decoded on its
/// own and regions that still fail are dropped.
pub fn decode_json_candidates(text: &str) -> Vec<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return vec![value];
    }

    top_level_regions(text)
        .into_iter()
        .filter_map(|fragment| match serde_json::from_str::<Value>(fragment) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("JsonLdExtractor: Fragment failed to decode ({e}), trying repair");
                serde_json::from_str::<Value>(&repair_json(fragment))
                    .map_err(|e| debug!("JsonLdExtractor: Dropping fragment: {e}"))
                    .ok()
            }
        })
        .collect()
}

/// Balanced bracket regions at nesting depth zero, ignoring brackets inside
/// string literals. An unterminated trailing region is not returned.
fn top_level_regions(text: &str) -> Vec<&str> {
    let mut regions = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' | '[' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' | ']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        regions.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    regions
}

/// Patches common hand-written JSON mistakes: missing commas between
/// members, duplicate commas and trailing commas.
fn repair_json(json_str: &str) -> String {
    let mut minified = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut prev_char = None;
    let mut depth = 0i32;
    let chars: Vec<char> = json_str.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' if prev_char != Some('\\') => {
                in_string = !in_string;
                if !in_string {
                    // Closing quote followed directly by another member
                    let next_char = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                    if !matches!(prev_char, Some(',') | Some('[') | Some('{'))
                        && matches!(next_char, Some('"' | '[' | '{'))
                    {
                        minified.push('"');
                        minified.push(',');
                        prev_char = Some(',');
                        continue;
                    }
                }
                minified.push(c);
            }
            '[' | '{' if !in_string => {
                depth += 1;
                minified.push(c);
            }
            ']' | '}' if !in_string => {
                depth -= 1;
                minified.push(c);
                let next_char = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if depth > 0 && matches!(next_char, Some('"' | '{' | '[')) {
                    minified.push(',');
                    prev_char = Some(',');
                    continue;
                }
            }
            ',' if !in_string => {
                if prev_char != Some(',') {
                    minified.push(c);
                }
            }
            _ => {
                if in_string || !c.is_whitespace() {
                    minified.push(c);
                }
            }
        }
        prev_char = Some(c);
    }

    minified
        .replace(",]", "]")
        .replace(",}", "}")
        .replace(",,", ",")
        .replace(",:", ":")
}

/// True when `@type` is "Recipe" (any case), directly or inside a list.
pub fn is_recipe_typed(node: &Value) -> bool {
    match node {
        Value::Object(map) => has_recipe_type(map),
        _ => false,
    }
}

fn has_recipe_type(map: &Map<String, Value>) -> bool {
    let is_recipe = |t: &Value| matches!(t, Value::String(s) if s.eq_ignore_ascii_case("recipe"));
    match map.get("@type") {
        Some(Value::Array(types)) => types.iter().any(is_recipe),
        Some(t) => is_recipe(t),
        None => false,
    }
}

/// Every object in the tree, depth-first, parents before children.
pub fn flatten_graph(node: &Value) -> Vec<&Map<String, Value>> {
    fn walk<'a>(node: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
        match node {
            Value::Object(map) => {
                out.push(map);
                for value in map.values() {
                    walk(value, out);
                }
            }
            Value::Array(items) => {
                for item in items {
                    walk(item, out);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    let mut out = Vec::new();
    walk(node, &mut out);
    out
}

/// First Recipe-typed object across all candidates, in order.
pub fn find_first_recipe(candidates: &[Value]) -> Option<&Map<String, Value>> {
    candidates.iter().find_map(|candidate| {
        if let Value::Array(items) = candidate {
            if let Some(Value::Object(map)) = items.iter().find(|item| is_recipe_typed(item)) {
                return Some(map);
            }
        }
        flatten_graph(candidate)
            .into_iter()
            .find(|map| has_recipe_type(map))
    })
}

pub fn extract_title(recipe: &Map<String, Value>) -> String {
    ["name", "headline"]
        .iter()
        .find_map(|key| match recipe.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(decode_html_symbols(s.trim())),
            _ => None,
        })
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string())
}

pub fn extract_description(recipe: &Map<String, Value>) -> Option<String> {
    let text = match recipe.get("description")? {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("text")?.as_str()?,
        _ => return None,
    };
    let decoded = decode_html_symbols(text.trim());
    (!decoded.is_empty()).then_some(decoded)
}

/// Image URLs from a string, an `ImageObject`, or a list of either.
pub fn extract_images(recipe: &Map<String, Value>) -> Vec<String> {
    fn image_url(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(decode_html_symbols(s.trim())),
            Value::Object(obj) => obj
                .get("url")
                .or_else(|| obj.get("contentUrl"))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        }
    }

    let urls: Vec<String> = match recipe.get("image") {
        Some(Value::Array(items)) => items.iter().filter_map(image_url).collect(),
        Some(other) => image_url(other).into_iter().collect(),
        None => Vec::new(),
    };
    urls.into_iter().filter(|u| !u.is_empty()).collect()
}

/// Parses `recipeIngredient` (or legacy `ingredients`) entries into
/// ingredients. Blank entries are skipped.
pub fn extract_ingredients(recipe: &Map<String, Value>, rules: &RuleSet) -> Vec<Ingredient> {
    fn lines(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Object(obj) => {
                let text = ["name", "text"].iter().find_map(|key| match obj.get(*key) {
                    Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                    _ => None,
                });
                out.extend(text);
            }
            Value::Array(items) => {
                for item in items {
                    lines(item, out);
                }
            }
            Value::Number(n) => out.push(n.to_string()),
            Value::Bool(b) => out.push(b.to_string()),
            Value::Null => {}
        }
    }

    let source = match recipe.get("recipeIngredient") {
        Some(Value::Null) | None => recipe.get("ingredients"),
        found => found,
    };

    let mut raw_lines = Vec::new();
    if let Some(value) = source {
        lines(value, &mut raw_lines);
    }

    raw_lines
        .iter()
        .map(|line| decode_html_symbols(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(&line, rules))
        .collect()
}

/// Step texts from an instructions value: strings as-is, lists in order,
/// objects through `itemListElement` or else their `text`/`name`.
pub fn flatten_instructions(node: &Value) -> Vec<String> {
    fn walk(node: &Value, out: &mut Vec<String>) {
        match node {
            Value::String(s) => {
                let text = decode_html_symbols(s.trim());
                if !text.is_empty() {
                    out.push(text);
                }
            }
            Value::Array(items) => {
                for item in items {
                    walk(item, out);
                }
            }
            Value::Object(map) => {
                if let Some(items) = map.get("itemListElement") {
                    walk(items, out);
                } else if let Some(text @ Value::String(_)) = map.get("text") {
                    walk(text, out);
                } else if let Some(name @ Value::String(_)) = map.get("name") {
                    walk(name, out);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    let mut out = Vec::new();
    walk(node, &mut out);
    out
}

pub fn extract_steps(recipe: &Map<String, Value>) -> Vec<InstructionStep> {
    let mut lines = recipe
        .get("recipeInstructions")
        .map(flatten_instructions)
        .unwrap_or_default();

    if lines.is_empty() {
        lines = FALLBACK_INSTRUCTION_KEYS
            .iter()
            .filter_map(|key| recipe.get(*key))
            .map(flatten_instructions)
            .find(|found| !found.is_empty())
            .unwrap_or_default();
    }

    InstructionStep::numbered(lines)
}

fn decode_html_symbols(text: &str) -> String {
    let once = decode_html_entities(text);
    // some sites double-encode entities (&amp;amp;)
    if once.contains("&amp;") {
        decode_html_entities(&once).into_owned()
    } else {
        once.into_owned()
    }
}
