use super::{Extractor, ParsingContext};
use crate::model::{RecipeExtractionResult, UNTITLED_RECIPE};
use log::info;
use scraper::{Html, Selector};

/// Last-resort extractor for pages without structured data. Always yields
/// a placeholder record titled from `og:title` or `<title>`.
pub struct TitleFallbackExtractor;

impl TitleFallbackExtractor {
    /// Placeholder record for a page, titled from its metadata.
    pub fn placeholder(&self, context: &ParsingContext) -> RecipeExtractionResult {
        let title = extract_page_title(&context.document);
        info!(
            "No structured recipe on {}; returning placeholder titled {:?}",
            context.url, title
        );
        RecipeExtractionResult::placeholder(title, context.url.clone())
    }
}

impl Extractor for TitleFallbackExtractor {
    fn parse(&self, context: &ParsingContext) -> Option<RecipeExtractionResult> {
        Some(self.placeholder(context))
    }
}

/// Page title from the `og:title` meta tag, else `<title>`, else
/// "Untitled Recipe".
pub fn extract_page_title(document: &Html) -> String {
    let og_title = Selector::parse("meta[property='og:title']")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
                .map(str::to_string)
        });

    let title = || {
        Selector::parse("title").ok().and_then(|sel| {
            document
                .select(&sel)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .find(|text| !text.is_empty())
        })
    };

    og_title
        .or_else(title)
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_title_preferred() {
        let html = r#"<html><head>
            <title>Site | Pannkakor</title>
            <meta property="og:title" content=" Pannkakor ">
        </head></html>"#;
        assert_eq!(extract_page_title(&Html::parse_document(html)), "Pannkakor");
    }

    #[test]
    fn test_title_element() {
        let html = "<html><head><title> Kanelbullar </title></head></html>";
        assert_eq!(extract_page_title(&Html::parse_document(html)), "Kanelbullar");
    }

    #[test]
    fn test_empty_og_title_uses_title_element() {
        let html = r#"<html><head><meta property="og:title" content=""><title>Bullar</title></head></html>"#;
        assert_eq!(extract_page_title(&Html::parse_document(html)), "Bullar");
    }

    #[test]
    fn test_untitled() {
        let html = "<html><body><p>Nothing here</p></body></html>";
        assert_eq!(extract_page_title(&Html::parse_document(html)), "Untitled Recipe");
    }

    #[test]
    fn test_placeholder_record() {
        let context = ParsingContext::new("https://example.com/x", "<html><head><title>X</title></head></html>");
        let record = TitleFallbackExtractor.parse(&context).unwrap();
        assert_eq!(record.title, "X");
        assert_eq!(record.source_url, "https://example.com/x");
        assert!(record.needs_manual_entry());
    }
}
