use crate::model::RecipeExtractionResult;
use crate::rules::RuleTableProvider;
use crate::url_to_text::fetchers::HtmlFetcher;
use crate::url_to_text::html::extractors::{
    Extractor, JsonLdExtractor, ParsingContext, TitleFallbackExtractor,
};
use crate::ImportError;
use log::debug;
use std::sync::Arc;
use url::Url;

/// Process a URL into a recipe record
///
/// This pipeline:
/// 1. Validates the URL and fetches the page once
/// 2. Tries the JSON-LD extractor
/// 3. Falls back to a title-only placeholder record
///
/// # Errors
/// Only the fetch can fail. A page without usable structured data still
/// produces a record.
pub fn process(
    fetcher: &dyn HtmlFetcher,
    rules: &Arc<RuleTableProvider>,
    url: &str,
) -> Result<RecipeExtractionResult, ImportError> {
    let markup = fetch(fetcher, url)?;
    Ok(process_markup(rules, url, &markup))
}

/// Runs only the JSON-LD stage. `Ok(None)` means the page has no Recipe node.
pub fn process_jsonld(
    fetcher: &dyn HtmlFetcher,
    rules: &Arc<RuleTableProvider>,
    url: &str,
) -> Result<Option<RecipeExtractionResult>, ImportError> {
    let markup = fetch(fetcher, url)?;
    let context = ParsingContext::new(url, &markup);
    Ok(JsonLdExtractor::new(Arc::clone(rules)).parse(&context))
}

/// Extraction over markup the caller already holds.
pub fn process_markup(
    rules: &Arc<RuleTableProvider>,
    url: &str,
    markup: &str,
) -> RecipeExtractionResult {
    let context = ParsingContext::new(url, markup);

    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor::new(Arc::clone(rules)))];

    for extractor in extractors {
        if let Some(recipe) = extractor.parse(&context) {
            return recipe;
        }
    }

    TitleFallbackExtractor.placeholder(&context)
}

/// Accepts absolute `http` and `https` URLs only.
pub fn validate_url(url: &str) -> Result<Url, ImportError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ImportError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        scheme => Err(ImportError::InvalidUrl(format!(
            "{url}: unsupported scheme '{scheme}'"
        ))),
    }
}

fn fetch(fetcher: &dyn HtmlFetcher, url: &str) -> Result<String, ImportError> {
    validate_url(url)?;
    debug!("Fetching {url}");
    fetcher.fetch(url)
}
