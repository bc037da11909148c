//! World-object definition loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use survival_core::WorldObjectDefinition;

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectCatalog {
    pub objects: Vec<WorldObjectDefinition>,
}

pub struct ObjectLoader;

impl ObjectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<WorldObjectDefinition>> {
        let catalog: ObjectCatalog = parse_ron(path, "object catalog")?;
        tracing::debug!(count = catalog.objects.len(), path = %path.display(), "loaded world objects");
        Ok(catalog.objects)
    }
}
