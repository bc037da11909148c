//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use survival_core::{Catalog, GameConfig, ItemDefinition, RecipeDefinition, WorldObjectDefinition};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, ObjectLoader, RecipeLoader};
use crate::validate::validate_catalog;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── recipes.ron
/// └── objects.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load recipes from `recipes.ron`.
    pub fn load_recipes(&self) -> LoadResult<Vec<RecipeDefinition>> {
        RecipeLoader::load(&self.data_dir.join("recipes.ron"))
    }

    /// Load world-object definitions from `objects.ron`.
    pub fn load_objects(&self) -> LoadResult<Vec<WorldObjectDefinition>> {
        ObjectLoader::load(&self.data_dir.join("objects.ron"))
    }

    /// Loads and indexes every catalog file.
    ///
    /// Structural errors (duplicate ids, zero stack caps) fail the load.
    /// Dangling cross-references are logged and left in place: the engine
    /// treats them as absent data.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let catalog = Catalog::new(self.load_items()?, self.load_recipes()?, self.load_objects()?)
            .map_err(|e| anyhow::anyhow!("Invalid catalog in {}: {}", self.data_dir.display(), e))?;

        let issues = validate_catalog(&catalog);
        tracing::info!(
            items = catalog.item_count(),
            recipes = catalog.recipe_count(),
            issues = issues.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
