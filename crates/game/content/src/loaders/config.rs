//! Game configuration loader.

use std::path::Path;

use survival_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`GameConfig::default`]. Out-of-range slot
    /// counts are clamped to the compile-time limits.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let mut config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.inventory_slots > GameConfig::MAX_INVENTORY_SLOTS {
            tracing::warn!(
                requested = config.inventory_slots,
                max = GameConfig::MAX_INVENTORY_SLOTS,
                "inventory_slots clamped"
            );
            config.inventory_slots = GameConfig::MAX_INVENTORY_SLOTS;
        }
        if config.storage_slots > GameConfig::MAX_STORAGE_SLOTS {
            tracing::warn!(
                requested = config.storage_slots,
                max = GameConfig::MAX_STORAGE_SLOTS,
                "storage_slots clamped"
            );
            config.storage_slots = GameConfig::MAX_STORAGE_SLOTS;
        }
        if config.time_multiplier < 0.0 {
            anyhow::bail!("time_multiplier must not be negative");
        }

        Ok(config)
    }
}
