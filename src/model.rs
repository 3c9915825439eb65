use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a page carries no usable name.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Text of the placeholder ingredient and step in a fallback record.
pub const NEEDS_MANUAL_ENTRY: &str = "(parse me)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

impl Ingredient {
    /// An ingredient carrying only a name.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    /// 1-based position
    pub order: u32,
    pub text: String,
}

impl InstructionStep {
    /// Numbers step texts densely from 1, in the given order.
    pub fn numbered<I>(texts: I) -> Vec<InstructionStep>
    where
        I: IntoIterator<Item = String>,
    {
        texts
            .into_iter()
            .zip(1..)
            .map(|(text, order)| InstructionStep { order, text })
            .collect()
    }
}

/// A recipe pulled from a web page, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeExtractionResult {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<InstructionStep>,
    pub servings: Option<String>,
    pub total_time: Option<String>,
    pub source_url: String,
    pub images: Vec<String>,
}

impl RecipeExtractionResult {
    /// Title-only record whose single ingredient and step ask for manual entry.
    pub fn placeholder(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            ingredients: vec![Ingredient::name_only(NEEDS_MANUAL_ENTRY)],
            steps: InstructionStep::numbered([NEEDS_MANUAL_ENTRY.to_string()]),
            servings: None,
            total_time: None,
            source_url: source_url.into(),
            images: Vec::new(),
        }
    }

    /// True for records built by [`RecipeExtractionResult::placeholder`].
    pub fn needs_manual_entry(&self) -> bool {
        self.ingredients.len() == 1
            && self.ingredients[0].name == NEEDS_MANUAL_ENTRY
            && self.steps.len() == 1
            && self.steps[0].text == NEEDS_MANUAL_ENTRY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookbookCreate {
    pub name: String,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookbook {
    pub id: String,
    pub name: String,
    pub is_premium: bool,
    pub member_ids: Vec<String>,
}

/// A stored recipe: the extraction result plus bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub cookbook_id: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: RecipeExtractionResult,
}
