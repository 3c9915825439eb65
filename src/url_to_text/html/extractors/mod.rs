use crate::model::RecipeExtractionResult;
use scraper::Html;

mod json_ld;
mod title;

pub use json_ld::{
    decode_json_candidates, extract_description, extract_images, extract_ingredients,
    extract_steps, extract_title, find_first_recipe, find_jsonld_blocks, flatten_graph,
    flatten_instructions, is_recipe_typed, JsonLdExtractor,
};
pub use title::{extract_page_title, TitleFallbackExtractor};

/// A fetched page, parsed once and shared by every extractor.
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
    /// Language code used to pick ingredient rules
    pub lang: &'static str,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, markup: &str) -> Self {
        let url = url.into();
        let document = Html::parse_document(markup);
        let lang = super::lang_of_document(&document, &url);
        Self {
            url,
            document,
            lang,
        }
    }
}

/// Produces a recipe from a parsed page, or `None` when the page carries
/// nothing this extractor understands.
pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Option<RecipeExtractionResult>;
}
