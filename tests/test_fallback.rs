use recipeer_import::{HtmlFetcher, ImportError, RecipeImporter};

/// Serves one fixed page for every URL.
struct StaticFetcher {
    html: String,
}

impl HtmlFetcher for StaticFetcher {
    fn fetch(&self, _url: &str) -> Result<String, ImportError> {
        Ok(self.html.clone())
    }
}

fn importer_for(html: &str) -> RecipeImporter {
    RecipeImporter::builder()
        .fetcher(StaticFetcher {
            html: html.to_string(),
        })
        .build()
        .unwrap()
}

#[test]
fn test_no_jsonld_and_no_title() {
    let importer = importer_for("<html><body><p>Just a blog post</p></body></html>");
    let recipe = importer.extract_recipe("https://example.com/post").unwrap();

    assert_eq!(recipe.title, "Untitled Recipe");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.steps.len(), 1);
    assert_eq!(recipe.steps[0].order, 1);
    assert!(recipe.needs_manual_entry());
    assert_eq!(recipe.source_url, "https://example.com/post");
}

#[test]
fn test_og_title_beats_title_element() {
    let importer = importer_for(
        r#"<html><head>
            <title>Blog | Grandma's Cookies</title>
            <meta property="og:title" content="Grandma's Cookies">
        </head><body></body></html>"#,
    );
    let recipe = importer.extract_recipe("https://example.com/cookies").unwrap();

    assert_eq!(recipe.title, "Grandma's Cookies");
    assert!(recipe.needs_manual_entry());
}

#[test]
fn test_malformed_jsonld_falls_back() {
    let importer = importer_for(
        r#"<html><head>
            <title>Broken Page</title>
            <script type="application/ld+json">{"@type": "Recipe", "name": </script>
        </head></html>"#,
    );
    let recipe = importer.extract_recipe("https://example.com/broken").unwrap();

    assert_eq!(recipe.title, "Broken Page");
    assert!(recipe.needs_manual_entry());
}

#[test]
fn test_recipe_found_in_later_block() {
    let importer = importer_for(
        r#"<html><head>
            <script type="application/ld+json">{"@type": "WebSite", "name": "Site"}</script>
            <script type="application/ld+json">not json at all</script>
            <script type="Application/LD+JSON">
                [{"@type": "BreadcrumbList"}, {"@type": ["Thing", "Recipe"], "headline": "Kladdkaka"}]
            </script>
        </head></html>"#,
    );
    let recipe = importer.extract_recipe("https://example.se/kladdkaka").unwrap();

    assert_eq!(recipe.title, "Kladdkaka");
    assert!(recipe.ingredients.is_empty());
    assert!(recipe.steps.is_empty());
    assert!(!recipe.needs_manual_entry());
}

#[test]
fn test_recipe_without_instructions_uses_legacy_fields() {
    let importer = importer_for(
        r#"<html><head><script type="application/ld+json">
            {"@type": "Recipe", "name": "Daal",
             "ingredients": ["300 g black urad daal", "90 ml double cream"],
             "recipeInstructions": [],
             "instructions": ["Soak overnight.", "Simmer for hours."]}
        </script></head></html>"#,
    );
    let recipe = importer.extract_recipe("https://example.com/daal").unwrap();

    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0].unit.as_deref(), Some("g"));
    assert_eq!(recipe.ingredients[1].unit.as_deref(), Some("ml"));
    assert_eq!(recipe.steps.len(), 2);
    assert_eq!(recipe.steps[1].text, "Simmer for hours.");
}

#[test]
fn test_extract_from_markup_without_fetch() {
    let importer = importer_for("");
    let recipe = importer.extract_from_markup(
        "https://example.com/x",
        r#"<html><script type="application/ld+json">{"@type":"Recipe","name":"  "}</script></html>"#,
    );

    assert_eq!(recipe.title, "Untitled Recipe");
    assert!(!recipe.needs_manual_entry());
}
