//! Crafting: cost resolution, affordability, and atomic consumption.
//!
//! [`CraftCost`] aggregates a recipe into a requirement table. [`can_afford`]
//! is the pure query the UI polls; [`craft_consume`] is the only mutating
//! entry point and runs as one validated batch.
mod consume;
mod cost;
mod error;

pub use consume::{CraftProduct, check_craft, craft_consume, craftable_recipes, is_visible};
pub use cost::{CraftCost, can_afford};
pub use error::CraftError;
