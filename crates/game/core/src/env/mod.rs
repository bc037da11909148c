//! Traits describing read-only world data.
//!
//! Oracles expose item definitions, recipes, world-object definitions, and
//! proximity queries. The [`GameEnv`] aggregate bundles them with the game
//! configuration so the rules can reach everything they need without hard
//! coupling to concrete implementations.
mod catalog;
mod error;
mod items;
mod objects;
mod recipes;

pub use catalog::Catalog;
pub use error::OracleError;
pub use items::{
    DurabilityPolicy, DurabilitySpec, EquipSlot, ExhaustBehavior, ItemDefinition, ItemLinks,
    ItemOracle,
};
pub use objects::{
    EmptyWorld, ObjectOracle, StaticWorld, WorldObjectDefinition, WorldObjectRef, WorldOracle,
};
pub use recipes::{RecipeDefinition, RecipeItem, RecipeOracle, RecipeOutput};

use crate::action::{ActionHandler, HandlerOwner, HandlerRef};
use crate::config::GameConfig;
use crate::state::{ActorId, GroupTag};

/// Aggregates the read-only collaborators required by the rules.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    items: &'a dyn ItemOracle,
    recipes: &'a dyn RecipeOracle,
    objects: &'a dyn ObjectOracle,
    world: &'a dyn WorldOracle,
    config: &'a GameConfig,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        items: &'a dyn ItemOracle,
        recipes: &'a dyn RecipeOracle,
        objects: &'a dyn ObjectOracle,
        world: &'a dyn WorldOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            items,
            recipes,
            objects,
            world,
            config,
        }
    }

    /// Uses one catalog for every definition oracle.
    pub fn from_catalog(
        catalog: &'a Catalog,
        world: &'a dyn WorldOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self::new(catalog, catalog, catalog, world, config)
    }

    pub fn items(&self) -> &'a dyn ItemOracle {
        self.items
    }

    pub fn recipes(&self) -> &'a dyn RecipeOracle {
        self.recipes
    }

    pub fn objects(&self) -> &'a dyn ObjectOracle {
        self.objects
    }

    pub fn world(&self) -> &'a dyn WorldOracle {
        self.world
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Looks up an item definition. Unknown ids are logged and treated as absent.
    pub fn item(&self, id: &str) -> Option<&'a ItemDefinition> {
        let definition = self.items.definition(id);
        if definition.is_none() {
            tracing::warn!(item = id, "unknown item id");
        }
        definition
    }

    /// Looks up a world-object definition. Unknown ids are logged and treated as absent.
    pub fn object(&self, id: &str) -> Option<&'a WorldObjectDefinition> {
        let definition = self.objects.object_definition(id);
        if definition.is_none() {
            tracing::warn!(object = id, "unknown world object definition");
        }
        definition
    }

    pub fn recipe(&self, id: &str) -> Option<&'a RecipeDefinition> {
        self.recipes.recipe(id)
    }

    /// Resolves a handler reference back to its definition.
    pub fn handler(&self, handler: &HandlerRef) -> Option<&'a ActionHandler> {
        let actions = match &handler.owner {
            HandlerOwner::Item(id) => &self.items.definition(id.as_str())?.actions,
            HandlerOwner::Object(id) => &self.objects.object_definition(id.as_str())?.actions,
        };
        actions.get(handler.index)
    }

    /// Proximity predicate: is an object carrying `group` within interaction range?
    pub fn is_near(&self, actor: ActorId, group: &GroupTag) -> bool {
        self.world
            .nearest_with_group(actor, group, self.config.interaction_range)
            .is_some()
    }
}

impl std::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
