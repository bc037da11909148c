//! Handler preconditions.

use super::{ActionBinding, Operand};
use crate::env::GameEnv;
use crate::state::{AttributeKind, GroupTag, ItemId, PlayerData};

/// Precondition checked before a handler may run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Actor's inventory holds at least `quantity` units of `item`.
    HasItem { item: ItemId, quantity: u32 },

    Unlocked(String),

    NotUnlocked(String),

    /// Actor's attribute is strictly below `value`.
    AttributeBelow { attribute: AttributeKind, value: f32 },

    /// Handler owner is a stack with durability strictly above `value`.
    SourceDurabilityAbove(f32),

    /// Actor's inventory has at least one empty slot.
    InventoryHasRoom,

    /// An object carrying the group is within interaction range.
    Near(GroupTag),

    Not(Box<Condition>),
}

impl Condition {
    /// Evaluates the condition. Pure: never mutates state.
    pub fn holds(&self, state: &PlayerData, env: &GameEnv<'_>, binding: &ActionBinding) -> bool {
        let actor = state.actor(binding.actor);
        match self {
            Self::HasItem { item, quantity } => {
                actor.is_some_and(|a| a.inventory.count(item.as_str()) >= u64::from(*quantity))
            }
            Self::Unlocked(flag) => state.is_unlocked(flag),
            Self::NotUnlocked(flag) => !state.is_unlocked(flag),
            Self::AttributeBelow { attribute, value } => {
                actor.is_some_and(|a| a.attributes.get(*attribute) < *value)
            }
            Self::SourceDurabilityAbove(value) => match &binding.source {
                Operand::Stack(location) => state
                    .stack(location)
                    .is_some_and(|stack| stack.durability > *value),
                Operand::Object(_) => false,
            },
            Self::InventoryHasRoom => actor.is_some_and(|a| !a.inventory.is_full()),
            Self::Near(group) => env.is_near(binding.actor, group),
            Self::Not(inner) => !inner.holds(state, env, binding),
        }
    }
}
