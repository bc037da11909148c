use super::{CraftCost, CraftError};
use crate::env::{GameEnv, RecipeDefinition, RecipeOutput};
use crate::state::{ActorId, ItemId, ObjectDefId, Placement, PlayerData};

/// What a successful craft produced.
#[derive(Clone, Debug, PartialEq)]
pub enum CraftProduct {
    Item {
        item: ItemId,
        quantity: u32,
        placement: Placement,
    },
    /// The world collaborator is asked to place this object next to the actor.
    WorldObject { object: ObjectDefId },
    Unlock { flag: String, newly_set: bool },
}

/// True when the recipe's unlock requirement (if any) is satisfied.
pub fn is_visible(state: &PlayerData, recipe: &RecipeDefinition) -> bool {
    recipe
        .requires_unlock
        .as_deref()
        .is_none_or(|flag| state.is_unlocked(flag))
}

/// Visible recipes the actor can afford right now, in catalog order.
pub fn craftable_recipes<'a>(
    state: &PlayerData,
    env: &GameEnv<'a>,
    actor: ActorId,
) -> Vec<&'a RecipeDefinition> {
    env.recipes()
        .all_recipes()
        .into_iter()
        .filter(|recipe| is_visible(state, recipe))
        .filter(|recipe| CraftCost::resolve(recipe).check(state, env, actor).is_ok())
        .collect()
}

/// Unlock and affordability checks for one recipe. Read-only.
pub fn check_craft(
    state: &PlayerData,
    env: &GameEnv<'_>,
    actor: ActorId,
    recipe: &RecipeDefinition,
) -> Result<CraftCost, CraftError> {
    if let Some(flag) = &recipe.requires_unlock
        && !state.is_unlocked(flag)
    {
        return Err(CraftError::Locked {
            recipe: recipe.id.clone(),
            flag: flag.clone(),
        });
    }
    let cost = CraftCost::resolve(recipe);
    cost.check(state, env, actor)?;
    Ok(cost)
}

/// Consumes a recipe's cost and produces its output as one step.
///
/// The whole batch runs inside a state transaction: when any removal or the
/// production fails, the state is left exactly as it was and nothing is
/// produced.
pub fn craft_consume(
    state: &mut PlayerData,
    env: &GameEnv<'_>,
    actor: ActorId,
    recipe_id: &str,
) -> Result<CraftProduct, CraftError> {
    let recipe = env
        .recipe(recipe_id)
        .ok_or_else(|| CraftError::UnknownRecipe(recipe_id.into()))?;
    let cost = check_craft(state, env, actor, recipe)?;

    let product = state.transaction(|tx| {
        let inventory = &mut tx.require_actor_mut(actor)?.inventory;
        for (item, &quantity) in &cost.items {
            if !inventory.remove_item(item.as_str(), quantity) {
                return Err(CraftError::ConsumeFailed { item: item.clone() });
            }
        }

        match &recipe.output {
            RecipeOutput::Item { item, quantity } => {
                let def = env
                    .item(item.as_str())
                    .ok_or_else(|| CraftError::UnknownOutput(item.clone()))?;
                let placement =
                    tx.give_or_drop(actor, def, *quantity, def.initial_durability())?;
                Ok(CraftProduct::Item {
                    item: item.clone(),
                    quantity: *quantity,
                    placement,
                })
            }
            RecipeOutput::WorldObject { object } => Ok(CraftProduct::WorldObject {
                object: object.clone(),
            }),
            RecipeOutput::Unlock { flag } => Ok(CraftProduct::Unlock {
                flag: flag.clone(),
                newly_set: tx.unlock(flag.clone()),
            }),
        }
    })?;

    tracing::info!(%actor, recipe = %recipe.id, ?product, "crafted");
    Ok(product)
}
