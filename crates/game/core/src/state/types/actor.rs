//! Actor-related state: inventory, equipment, survival attributes, wield timer.

use super::{ActorId, Container, Equipment};
use crate::config::{AttributeDrain, GameConfig};
use crate::env::EquipSlot;

/// Survival attribute kinds.
///
/// Used by conditions and restore effects to reference a specific attribute.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttributeKind {
    Health,
    Hunger,
    Thirst,
    Energy,
}

/// Current attribute values, each in `[0, max]`.
///
/// Hunger, thirst and energy are "fullness" meters: they drain over time and
/// food, water and rest refill them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
}

impl Attributes {
    pub fn full(max: f32) -> Self {
        Self {
            health: max,
            hunger: max,
            thirst: max,
            energy: max,
        }
    }

    pub fn get(&self, kind: AttributeKind) -> f32 {
        match kind {
            AttributeKind::Health => self.health,
            AttributeKind::Hunger => self.hunger,
            AttributeKind::Thirst => self.thirst,
            AttributeKind::Energy => self.energy,
        }
    }

    fn get_mut(&mut self, kind: AttributeKind) -> &mut f32 {
        match kind {
            AttributeKind::Health => &mut self.health,
            AttributeKind::Hunger => &mut self.hunger,
            AttributeKind::Thirst => &mut self.thirst,
            AttributeKind::Energy => &mut self.energy,
        }
    }

    /// Adds `delta` (negative drains), clamping into `[0, max]`. Returns the new value.
    pub fn adjust(&mut self, kind: AttributeKind, delta: f32, max: f32) -> f32 {
        let value = self.get_mut(kind);
        *value = (*value + delta).clamp(0.0, max);
        *value
    }

    /// Drains hunger, thirst and energy for `hours` of game time.
    pub fn drain(&mut self, drain: &AttributeDrain, hours: f64, max: f32) {
        let hours = hours as f32;
        self.adjust(AttributeKind::Hunger, -drain.hunger * hours, max);
        self.adjust(AttributeKind::Thirst, -drain.thirst * hours, max);
        self.adjust(AttributeKind::Energy, -drain.energy * hours, max);
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::full(GameConfig::DEFAULT_ATTRIBUTE_MAX)
    }
}

/// Temporary equip started by a wield effect.
///
/// `idle` accumulates simulated seconds since the tool was last used; the
/// engine returns the tool to the inventory once it exceeds the configured
/// timeout.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WieldTimer {
    pub slot: EquipSlot,
    pub idle: f32,
}

impl WieldTimer {
    pub fn new(slot: EquipSlot) -> Self {
        Self { slot, idle: 0.0 }
    }
}

/// Everything the core tracks about one actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub inventory: Container,
    pub equipment: Equipment,
    pub attributes: Attributes,
    pub wield: Option<WieldTimer>,
}

impl ActorState {
    pub fn new(id: ActorId, config: &GameConfig) -> Self {
        Self {
            id,
            inventory: Container::new(config.inventory_slots),
            equipment: Equipment::empty(),
            attributes: Attributes::full(config.attribute_max),
            wield: None,
        }
    }

    /// Units of `item` across inventory and equipment.
    pub fn count(&self, item: &str) -> u64 {
        self.inventory.count(item) + self.equipment.count(item)
    }

    /// Marks the wielded tool as used, resetting its idle counter.
    pub fn touch_wield(&mut self, slot: EquipSlot) {
        if let Some(timer) = self.wield.as_mut().filter(|timer| timer.slot == slot) {
            timer.idle = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_clamp_to_range() {
        let mut attributes = Attributes::full(100.0);
        assert_eq!(attributes.adjust(AttributeKind::Thirst, -150.0, 100.0), 0.0);
        assert_eq!(attributes.adjust(AttributeKind::Thirst, 30.0, 100.0), 30.0);
        assert_eq!(attributes.adjust(AttributeKind::Health, 5.0, 100.0), 100.0);
    }

    #[test]
    fn drain_is_proportional_to_hours() {
        let drain = AttributeDrain {
            hunger: 4.0,
            thirst: 6.0,
            energy: 0.0,
        };
        let mut attributes = Attributes::full(100.0);
        attributes.drain(&drain, 2.5, 100.0);

        assert_eq!(attributes.hunger, 90.0);
        assert_eq!(attributes.thirst, 85.0);
        assert_eq!(attributes.energy, 100.0);
    }
}
