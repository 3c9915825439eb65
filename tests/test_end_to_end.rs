use recipeer_import::{ImportConfig, RecipeImporter};
use std::time::Duration;

fn create_recipe_html(lang: &str, json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html lang="{}">
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#,
        lang, json_ld
    )
}

fn importer() -> RecipeImporter {
    RecipeImporter::builder()
        .config(ImportConfig::default())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[test]
fn test_graph_recipe_end_to_end() {
    let mut server = mockito::Server::new();
    let json_ld = r#"{"@graph":[{"@type":"Recipe","name":"Soup","recipeIngredient":["2 dl mjölk"],
        "recipeInstructions":[{"text":"Koka upp"}],"recipeYield":"4 portioner","totalTime":"PT20M"}]}"#;
    let mock = server
        .mock("GET", "/soppa")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(create_recipe_html("en", json_ld))
        .create();

    let url = format!("{}/soppa", server.url());
    let recipe = importer().extract_recipe(&url).unwrap();

    assert_eq!(recipe.title, "Soup");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].quantity.as_deref(), Some("2"));
    assert_eq!(recipe.ingredients[0].unit.as_deref(), Some("dl"));
    assert_eq!(recipe.ingredients[0].name, "mjölk");
    assert_eq!(recipe.steps.len(), 1);
    assert_eq!(recipe.steps[0].order, 1);
    assert_eq!(recipe.steps[0].text, "Koka upp");
    assert_eq!(recipe.servings.as_deref(), Some("4 portioner"));
    assert_eq!(recipe.total_time.as_deref(), Some("20 min"));
    assert_eq!(recipe.source_url, url);
    mock.assert();
}

#[test]
fn test_swedish_recipe_cleanup() {
    let mut server = mockito::Server::new();
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Pasta med tomats&aring;s",
        "description": {"text": "Snabb vardagsmiddag"},
        "image": [{"url": "https://example.se/a.jpg"}, "https://example.se/b.jpg"],
        "recipeIngredient": [
            "1 burk krossade tomater à 400 g",
            "2 msk olivolja",
            "1 gul lök, hackad",
            "½ tsk salt",
            "",
            "parmesan till servering"
        ],
        "recipeInstructions": [
            {"@type": "HowToSection", "name": "Sås", "itemListElement": [
                {"@type": "HowToStep", "text": "Fräs löken i oljan."},
                {"@type": "HowToStep", "text": "Tillsätt tomaterna."}
            ]},
            {"@type": "HowToStep", "name": "Koka pastan."}
        ],
        "recipeYield": ["4", "4 portioner"],
        "cookTime": "PT25M"
    }
    "#;
    let _mock = server
        .mock("GET", "/recept/pasta")
        .with_status(200)
        .with_body(create_recipe_html("sv-SE", json_ld))
        .create();

    let recipe = importer()
        .extract_recipe(&format!("{}/recept/pasta", server.url()))
        .unwrap();

    assert_eq!(recipe.title, "Pasta med tomatsås");
    assert_eq!(recipe.description.as_deref(), Some("Snabb vardagsmiddag"));
    assert_eq!(
        recipe.images,
        vec!["https://example.se/a.jpg", "https://example.se/b.jpg"]
    );

    let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["krossade tomater", "olivolja", "gul lök", "salt", "parmesan"]
    );

    let tomatoes = &recipe.ingredients[0];
    assert_eq!(tomatoes.quantity.as_deref(), Some("1"));
    assert_eq!(tomatoes.unit.as_deref(), Some("burk"));
    assert_eq!(tomatoes.notes.as_deref(), Some("à 400 g"));

    assert_eq!(recipe.ingredients[2].notes.as_deref(), Some("hackad"));
    assert_eq!(recipe.ingredients[3].quantity.as_deref(), Some("0.5"));
    assert_eq!(recipe.ingredients[3].unit.as_deref(), Some("tsk"));
    assert_eq!(recipe.ingredients[4].notes.as_deref(), Some("till servering"));

    let steps: Vec<(u32, &str)> = recipe
        .steps
        .iter()
        .map(|s| (s.order, s.text.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![
            (1, "Fräs löken i oljan."),
            (2, "Tillsätt tomaterna."),
            (3, "Koka pastan.")
        ]
    );
    assert_eq!(recipe.servings.as_deref(), Some("4"));
    assert_eq!(recipe.total_time.as_deref(), Some("25 min"));
}

#[test]
fn test_english_recipe_with_lowercase_type() {
    let mut server = mockito::Server::new();
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "recipe",
        "name": "Easy Black Bean Soup",
        "recipeIngredient": [
            "2 cans black beans",
            "1 onion, diced",
            "2 cloves garlic, minced",
            "1 1/2 cups vegetable broth",
            "salt to taste"
        ],
        "recipeInstructions": "Sauté onion and garlic, add beans and broth, simmer for 20 minutes.",
        "recipeYield": 6,
        "prepTime": "PT10M",
        "cookTime": "PT30M",
        "totalTime": "PT40M"
    }
    "#;
    let _mock = server
        .mock("GET", "/soup")
        .with_status(200)
        .with_body(create_recipe_html("en-US", json_ld))
        .create();

    let recipe = importer()
        .extract_recipe(&format!("{}/soup", server.url()))
        .unwrap();

    assert_eq!(recipe.title, "Easy Black Bean Soup");

    let beans = &recipe.ingredients[0];
    assert_eq!(beans.quantity.as_deref(), Some("2"));
    assert_eq!(beans.unit.as_deref(), Some("can"));
    assert_eq!(beans.name, "black beans");

    let onion = &recipe.ingredients[1];
    assert_eq!(onion.quantity.as_deref(), Some("1"));
    assert_eq!(onion.unit, None);
    assert_eq!(onion.name, "onion");
    assert_eq!(onion.notes.as_deref(), Some("diced"));

    let garlic = &recipe.ingredients[2];
    assert_eq!(garlic.unit.as_deref(), Some("clove"));
    assert_eq!(garlic.name, "garlic");
    assert_eq!(garlic.notes.as_deref(), Some("minced"));

    let broth = &recipe.ingredients[3];
    assert_eq!(broth.quantity.as_deref(), Some("1.5"));
    assert_eq!(broth.unit.as_deref(), Some("cup"));

    let salt = &recipe.ingredients[4];
    assert_eq!(salt.name, "salt");
    assert_eq!(salt.quantity, None);
    assert_eq!(salt.notes.as_deref(), Some("to taste"));

    assert_eq!(recipe.steps.len(), 1);
    assert_eq!(recipe.servings.as_deref(), Some("6"));
    assert_eq!(recipe.total_time.as_deref(), Some("40 min"));
}

#[test]
fn test_extract_from_jsonld_only() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/article")
        .with_status(200)
        .with_body(create_recipe_html("en", r#"{"@type": "Article", "headline": "News"}"#))
        .create();

    let result = importer()
        .extract_from_jsonld(&format!("{}/article", server.url()))
        .unwrap();
    assert!(result.is_none());
}
