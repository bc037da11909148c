//! Recipe book loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use survival_core::RecipeDefinition;

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeBook {
    pub recipes: Vec<RecipeDefinition>,
}

/// Loader for crafting recipes from RON files.
pub struct RecipeLoader;

impl RecipeLoader {
    /// Load recipes from a RON file. Declaration order is the display order.
    pub fn load(path: &Path) -> LoadResult<Vec<RecipeDefinition>> {
        let book: RecipeBook = parse_ron(path, "recipe book")?;
        tracing::debug!(count = book.recipes.len(), path = %path.display(), "loaded recipes");
        Ok(book.recipes)
    }
}
