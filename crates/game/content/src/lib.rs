//! Data-driven content definitions, loaders and save files.
//!
//! This crate reads the static game content from RON/TOML data files:
//! - Item catalog (`items.ron`)
//! - Crafting recipes (`recipes.ron`)
//! - World-object definitions (`objects.ron`)
//! - Game configuration (`config.toml`)
//!
//! Content is consumed through the core oracles and never appears in saved
//! state. Saves hold only [`survival_core::PlayerData`], written by
//! [`SaveStore`].

#[cfg(feature = "loaders")]
pub mod loaders;
#[cfg(feature = "saves")]
pub mod save;
pub mod validate;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ItemLoader, LoadResult, ObjectLoader, RecipeLoader};
#[cfg(feature = "saves")]
pub use save::{SaveError, SaveStore};
pub use validate::{CatalogIssue, validate_catalog};
