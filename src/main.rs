use log::{debug, info};
use recipeer_import::{CookbookCreate, ImportConfig, RecipeImporter, Store};
use std::env;

const USAGE: &str = "Usage: recipeer-import <url> [--store]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let store_result = args.iter().any(|arg| arg == "--store");
    let url = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .ok_or(USAGE)?;

    let config = ImportConfig::load()?;
    debug!("{:#?}", config);

    let importer = RecipeImporter::builder().config(config).build()?;
    let recipe = importer.extract_recipe(url)?;
    if recipe.needs_manual_entry() {
        info!("No structured recipe found; ingredients and steps need manual entry");
    }

    if store_result {
        let mut store = Store::new();
        let cookbook = store.create_cookbook(CookbookCreate {
            name: "Imported".to_string(),
            is_premium: false,
        });
        let stored = store.add_recipe(&cookbook.id, recipe)?;
        println!("{}", serde_json::to_string_pretty(&stored)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    }

    Ok(())
}
