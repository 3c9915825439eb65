//! Ephemeral cookbook and recipe storage.
//!
//! Everything lives in memory for the life of the [`Store`]. Records are
//! returned by value; callers never hold references into the store.

use std::collections::HashMap;

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::model::{Cookbook, CookbookCreate, Recipe, RecipeExtractionResult};
use crate::ImportError;

#[derive(Debug, Default)]
pub struct Store {
    cookbooks: HashMap<String, Cookbook>,
    cookbook_order: Vec<String>,
    recipes: HashMap<String, Recipe>,
    recipe_order: Vec<String>,
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_cookbook(&mut self, payload: CookbookCreate) -> Cookbook {
        let cookbook = Cookbook {
            id: new_id(),
            name: payload.name,
            is_premium: payload.is_premium,
            member_ids: Vec::new(),
        };
        debug!("Created cookbook {} ({})", cookbook.id, cookbook.name);

        self.cookbook_order.push(cookbook.id.clone());
        self.cookbooks.insert(cookbook.id.clone(), cookbook.clone());
        cookbook
    }

    /// All cookbooks in creation order.
    pub fn list_cookbooks(&self) -> Vec<Cookbook> {
        self.cookbook_order
            .iter()
            .filter_map(|id| self.cookbooks.get(id))
            .cloned()
            .collect()
    }

    pub fn get_cookbook(&self, id: &str) -> Result<Cookbook, ImportError> {
        self.cookbooks
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Cookbook", id))
    }

    /// Persists an extraction result as version 1 of a new recipe.
    ///
    /// # Errors
    /// `NotFound` when `cookbook_id` names no cookbook.
    pub fn add_recipe(
        &mut self,
        cookbook_id: &str,
        content: RecipeExtractionResult,
    ) -> Result<Recipe, ImportError> {
        if !self.cookbooks.contains_key(cookbook_id) {
            return Err(not_found("Cookbook", cookbook_id));
        }

        let now = Utc::now();
        let recipe = Recipe {
            id: new_id(),
            cookbook_id: cookbook_id.to_string(),
            version: 1,
            created_at: now,
            updated_at: now,
            content,
        };
        debug!("Added recipe {} to cookbook {cookbook_id}", recipe.id);

        self.recipe_order.push(recipe.id.clone());
        self.recipes.insert(recipe.id.clone(), recipe.clone());
        Ok(recipe)
    }

    /// Recipes of one cookbook in insertion order.
    pub fn list_recipes(&self, cookbook_id: &str) -> Result<Vec<Recipe>, ImportError> {
        if !self.cookbooks.contains_key(cookbook_id) {
            return Err(not_found("Cookbook", cookbook_id));
        }

        Ok(self
            .recipe_order
            .iter()
            .filter_map(|id| self.recipes.get(id))
            .filter(|recipe| recipe.cookbook_id == cookbook_id)
            .cloned()
            .collect())
    }

    pub fn get_recipe(&self, id: &str) -> Result<Recipe, ImportError> {
        self.recipes
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Recipe", id))
    }
}

fn not_found(kind: &'static str, id: &str) -> ImportError {
    ImportError::NotFound {
        kind,
        id: id.to_string(),
    }
}
