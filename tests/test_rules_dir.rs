use recipeer_import::{HtmlFetcher, ImportError, RecipeImporter, RuleTableProvider};
use std::fs;
use std::sync::Arc;

struct StaticFetcher(&'static str);

impl HtmlFetcher for StaticFetcher {
    fn fetch(&self, _url: &str) -> Result<String, ImportError> {
        Ok(self.0.to_string())
    }
}

const GERMAN_PAGE: &str = r#"<html lang="de"><head><script type="application/ld+json">
    {"@type": "Recipe", "name": "Pfannkuchen",
     "recipeIngredient": ["2 EL Zucker, gesiebt", "250 ml Milch", "1 Prise Salz (fein)"],
     "recipeInstructions": "Alles verrühren."}
</script></head></html>"#;

#[test]
fn test_custom_rules_directory() {
    let dir = tempfile::tempdir().unwrap();
    // The page declares "de", which is not a known rule language, so the
    // English fallback file is the one that gets loaded
    fs::write(
        dir.path().join("units.en.json"),
        r#"{"EL": "el", "ml": "ml", "Prise": "prise"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("notes_rules.en.json"),
        r#"{"trailing_phrases": [",\\s*gesiebt\\b.*$", "[unclosed"], "leading_adverbs": []}"#,
    )
    .unwrap();

    let importer = RecipeImporter::builder()
        .rules_dir(dir.path())
        .fetcher(StaticFetcher(GERMAN_PAGE))
        .build()
        .unwrap();
    let recipe = importer.extract_recipe("https://example.de/pfannkuchen").unwrap();

    let sugar = &recipe.ingredients[0];
    assert_eq!(sugar.unit.as_deref(), Some("el"));
    assert_eq!(sugar.name, "Zucker");
    assert_eq!(sugar.notes.as_deref(), Some("gesiebt"));

    let salt = &recipe.ingredients[2];
    assert_eq!(salt.unit.as_deref(), Some("prise"));
    assert_eq!(salt.name, "Salz");
    assert_eq!(salt.notes.as_deref(), Some("fein"));
}

#[test]
fn test_missing_rules_directory_still_parses() {
    let importer = RecipeImporter::builder()
        .rules_dir("/nonexistent/recipeer/rules")
        .fetcher(StaticFetcher(GERMAN_PAGE))
        .build()
        .unwrap();
    let recipe = importer.extract_recipe("https://example.de/pfannkuchen").unwrap();

    // Without unit tables the unit token stays part of the name
    let milk = &recipe.ingredients[1];
    assert_eq!(milk.quantity.as_deref(), Some("250"));
    assert_eq!(milk.unit, None);
    assert_eq!(milk.name, "ml Milch");
}

#[test]
fn test_provider_shared_between_importers() {
    let rules = Arc::new(RuleTableProvider::builtin());
    let first = RecipeImporter::builder()
        .rules(Arc::clone(&rules))
        .fetcher(StaticFetcher(GERMAN_PAGE))
        .build()
        .unwrap();
    let second = RecipeImporter::builder()
        .rules(Arc::clone(&rules))
        .fetcher(StaticFetcher(GERMAN_PAGE))
        .build()
        .unwrap();

    first.parse_ingredient("2 msk smör", "sv");
    second.parse_ingredient("1 cup sugar", "en");

    assert_eq!(
        rules.cached_languages(),
        vec!["en".to_string(), "sv".to_string()]
    );
    assert!(Arc::ptr_eq(&first.rules().get_rules("sv"), &second.rules().get_rules("sv")));
}
