//! In-memory catalog backing every read-only oracle.
//!
//! The catalog is built once at startup, wrapped in an `Arc`, and shared by
//! reference with everything that needs lookups. Nothing mutates it afterwards.

use std::collections::HashMap;

use super::{
    ItemDefinition, ItemOracle, ObjectOracle, OracleError, RecipeDefinition, RecipeOracle,
    WorldObjectDefinition,
};
use crate::state::{ItemId, ObjectDefId, RecipeId};

/// Immutable registry of items, recipes, and world-object definitions.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: HashMap<ItemId, ItemDefinition>,
    item_order: Vec<ItemId>,
    recipes: Vec<RecipeDefinition>,
    recipe_index: HashMap<RecipeId, usize>,
    objects: HashMap<ObjectDefId, WorldObjectDefinition>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids and zero stack caps.
    pub fn new(
        items: Vec<ItemDefinition>,
        recipes: Vec<RecipeDefinition>,
        objects: Vec<WorldObjectDefinition>,
    ) -> Result<Self, OracleError> {
        let mut catalog = Self::default();

        for item in items {
            if item.max_stack == 0 {
                return Err(OracleError::ZeroStackCap(item.id));
            }
            if catalog.items.contains_key(&item.id) {
                return Err(OracleError::DuplicateItem(item.id));
            }
            catalog.item_order.push(item.id.clone());
            catalog.items.insert(item.id.clone(), item);
        }

        for recipe in recipes {
            if catalog.recipe_index.contains_key(&recipe.id) {
                return Err(OracleError::DuplicateRecipe(recipe.id));
            }
            catalog
                .recipe_index
                .insert(recipe.id.clone(), catalog.recipes.len());
            catalog.recipes.push(recipe);
        }

        for object in objects {
            if catalog.objects.contains_key(&object.id) {
                return Err(OracleError::DuplicateObject(object.id));
            }
            catalog.objects.insert(object.id.clone(), object);
        }

        Ok(catalog)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObjectDefinition> {
        self.objects.values()
    }
}

impl ItemOracle for Catalog {
    fn definition(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn all_definitions(&self) -> Vec<&ItemDefinition> {
        self.item_order
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }
}

impl RecipeOracle for Catalog {
    fn recipe(&self, id: &str) -> Option<&RecipeDefinition> {
        self.recipe_index.get(id).and_then(|&i| self.recipes.get(i))
    }

    fn all_recipes(&self) -> Vec<&RecipeDefinition> {
        self.recipes.iter().collect()
    }
}

impl ObjectOracle for Catalog {
    fn object_definition(&self, id: &str) -> Option<&WorldObjectDefinition> {
        self.objects.get(id)
    }
}
