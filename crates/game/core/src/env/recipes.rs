use crate::state::{GroupTag, ItemId, ObjectDefId, RecipeId};

/// Read access to crafting recipes.
pub trait RecipeOracle: Send + Sync {
    fn recipe(&self, id: &str) -> Option<&RecipeDefinition>;

    /// Returns every recipe in catalog order.
    fn all_recipes(&self) -> Vec<&RecipeDefinition>;
}

/// Crafting recipe.
///
/// `items` may name the same item more than once; the cost resolver collapses
/// repeats into one summed requirement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipeDefinition {
    pub id: RecipeId,
    pub title: String,
    pub items: Vec<RecipeItem>,
    /// Crafting requires a world object carrying this tag within interaction range.
    #[cfg_attr(feature = "serde", serde(default))]
    pub near_group: Option<GroupTag>,
    pub output: RecipeOutput,
    /// Craft time in seconds. Zero crafts instantly.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: f32,
    /// Recipe stays hidden until this unlock flag is set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_unlock: Option<String>,
}

impl RecipeDefinition {
    pub fn new(id: impl Into<RecipeId>, output: RecipeOutput) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            items: Vec::new(),
            near_group: None,
            output,
            duration: 0.0,
            requires_unlock: None,
        }
    }

    pub fn with_item(mut self, item: impl Into<ItemId>, quantity: u32) -> Self {
        self.items.push(RecipeItem {
            item: item.into(),
            quantity,
        });
        self
    }

    pub fn near(mut self, group: impl Into<GroupTag>) -> Self {
        self.near_group = Some(group.into());
        self
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn requiring_unlock(mut self, flag: impl Into<String>) -> Self {
        self.requires_unlock = Some(flag.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipeItem {
    pub item: ItemId,
    pub quantity: u32,
}

/// What a completed craft produces.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecipeOutput {
    /// New stack in the crafter's inventory (dropped at their feet when full).
    Item { item: ItemId, quantity: u32 },
    /// Placement request for the world collaborator.
    WorldObject { object: ObjectDefId },
    /// Sets a persistent unlock flag.
    Unlock { flag: String },
}
