pub mod builder;
pub mod config;
pub mod error;
pub mod ingredients;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod rules;
pub mod store;
pub mod url_to_text;

pub use crate::builder::{RecipeImporter, RecipeImporterBuilder};
pub use crate::config::ImportConfig;
pub use crate::error::ImportError;
pub use crate::model::{
    Cookbook, CookbookCreate, Ingredient, InstructionStep, Recipe, RecipeExtractionResult,
};
pub use crate::rules::{RuleSet, RuleTableProvider};
pub use crate::store::Store;
pub use crate::url_to_text::fetchers::{HtmlFetcher, RequestFetcher};

/// Fetch a page and extract its recipe with default settings.
///
/// Pages without a JSON-LD Recipe yield a title-only placeholder record.
/// Build a [`RecipeImporter`] instead when extracting many pages, so the
/// rule cache and HTTP client are reused.
pub fn extract_recipe(url: &str) -> Result<RecipeExtractionResult, ImportError> {
    RecipeImporter::builder().build()?.extract_recipe(url)
}

/// Fetch a page and map its JSON-LD Recipe node with default settings.
pub fn extract_from_jsonld(url: &str) -> Result<Option<RecipeExtractionResult>, ImportError> {
    RecipeImporter::builder().build()?.extract_from_jsonld(url)
}
