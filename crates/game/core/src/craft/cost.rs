use std::collections::BTreeMap;

use super::CraftError;
use crate::env::{GameEnv, RecipeDefinition};
use crate::state::{ActorId, GroupTag, ItemId, PlayerData};

/// Aggregated item requirements of a recipe plus its proximity predicate.
///
/// Derived on demand, never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CraftCost {
    pub items: BTreeMap<ItemId, u32>,
    pub near_group: Option<GroupTag>,
}

impl CraftCost {
    /// Collapses repeated recipe entries into one summed requirement per item.
    pub fn resolve(recipe: &RecipeDefinition) -> Self {
        let mut items = BTreeMap::new();
        for entry in &recipe.items {
            let required: &mut u32 = items.entry(entry.item.clone()).or_default();
            *required = required.saturating_add(entry.quantity);
        }
        Self {
            items,
            near_group: recipe.near_group.clone(),
        }
    }

    pub fn required(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Explains the first unmet requirement, or `Ok(())` when affordable.
    ///
    /// Read-only; safe to call every frame.
    pub fn check(
        &self,
        state: &PlayerData,
        env: &GameEnv<'_>,
        actor: ActorId,
    ) -> Result<(), CraftError> {
        let inventory = state
            .inventory(actor)
            .ok_or(CraftError::ActorNotFound(actor))?;

        for (item, &required) in &self.items {
            let available = inventory.count(item.as_str());
            if available < u64::from(required) {
                return Err(CraftError::MissingItems {
                    item: item.clone(),
                    required,
                    available,
                });
            }
        }

        if let Some(group) = &self.near_group
            && !env.is_near(actor, group)
        {
            return Err(CraftError::NotNear(group.clone()));
        }

        Ok(())
    }
}

/// True iff the actor's inventory covers the cost and the proximity predicate holds.
pub fn can_afford(state: &PlayerData, env: &GameEnv<'_>, actor: ActorId, cost: &CraftCost) -> bool {
    cost.check(state, env, actor).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{Catalog, EmptyWorld, ItemDefinition, ItemOracle, RecipeOutput};

    fn recipe() -> RecipeDefinition {
        RecipeDefinition::new(
            "rope",
            RecipeOutput::Item {
                item: "rope".into(),
                quantity: 1,
            },
        )
        .with_item("fiber", 2)
        .with_item("stick", 1)
        .with_item("fiber", 3)
    }

    #[test]
    fn repeated_items_collapse_into_one_entry() {
        let cost = CraftCost::resolve(&recipe());
        assert_eq!(cost.items.len(), 2);
        assert_eq!(cost.required("fiber"), 5);
        assert_eq!(cost.required("stick"), 1);
        assert_eq!(cost.near_group, None);
    }

    #[test]
    fn affordability_is_read_only_and_repeatable() {
        let catalog = Catalog::new(
            vec![
                ItemDefinition::new("fiber", "Fiber", 20),
                ItemDefinition::new("stick", "Stick", 20),
            ],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let config = GameConfig::default();
        let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);
        let mut state = PlayerData::new(&config);
        let fiber = catalog.definition("fiber").unwrap();
        let stick = catalog.definition("stick").unwrap();
        state.give(ActorId::PLAYER, fiber, 4, 0.0).unwrap();
        state.give(ActorId::PLAYER, stick, 1, 0.0).unwrap();
        let cost = CraftCost::resolve(&recipe());
        let snapshot = state.clone();

        for _ in 0..5 {
            assert!(!can_afford(&state, &env, ActorId::PLAYER, &cost));
        }
        assert_eq!(state, snapshot);
        assert_eq!(
            cost.check(&state, &env, ActorId::PLAYER),
            Err(CraftError::MissingItems {
                item: "fiber".into(),
                required: 5,
                available: 4,
            })
        );

        state.give(ActorId::PLAYER, fiber, 1, 0.0).unwrap();
        assert!(can_afford(&state, &env, ActorId::PLAYER, &cost));
    }

    #[test]
    fn proximity_requirement_uses_the_world_oracle() {
        let catalog = Catalog::default();
        let config = GameConfig::default();
        let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);
        let state = PlayerData::new(&config);
        let cost = CraftCost {
            items: BTreeMap::new(),
            near_group: Some("campfire".into()),
        };

        assert_eq!(
            cost.check(&state, &env, ActorId::PLAYER),
            Err(CraftError::NotNear("campfire".into()))
        );
    }
}
