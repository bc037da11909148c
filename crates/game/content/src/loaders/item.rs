//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use survival_core::ItemDefinition;

use crate::loaders::{LoadResult, parse_ron};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item definitions from a RON file, in declaration order.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = parse_ron(path, "item catalog")?;
        tracing::debug!(count = catalog.items.len(), path = %path.display(), "loaded items");
        Ok(catalog.items)
    }
}
