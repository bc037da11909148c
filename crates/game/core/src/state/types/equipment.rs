//! Equipment held by an actor.
//!
//! Keyed by the closed [`EquipSlot`] set. Each slot holds at most one stack,
//! and that stack always has quantity 1.

use std::collections::BTreeMap;

use super::ItemStack;
use crate::env::EquipSlot;

/// Currently equipped stacks, one per equip category.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, ItemStack>,
}

impl Equipment {
    /// Creates empty equipment.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&ItemStack> {
        self.slots.get(&slot)
    }

    pub fn get_mut(&mut self, slot: EquipSlot) -> Option<&mut ItemStack> {
        self.slots.get_mut(&slot)
    }

    pub fn is_occupied(&self, slot: EquipSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Equips one unit, returning the previously equipped stack if any.
    ///
    /// The incoming stack is normalized to quantity 1; callers split it first.
    pub fn equip(&mut self, slot: EquipSlot, mut stack: ItemStack) -> Option<ItemStack> {
        debug_assert_eq!(stack.quantity, 1, "equip slots hold exactly one unit");
        stack.quantity = 1;
        self.slots.insert(slot, stack)
    }

    /// Unequips the stack in `slot`, returning it if any was equipped.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<ItemStack> {
        self.slots.remove(&slot)
    }

    /// Equipped stacks in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &ItemStack)> {
        self.slots.iter().map(|(slot, stack)| (*slot, stack))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EquipSlot, &mut ItemStack)> {
        self.slots.iter_mut().map(|(slot, stack)| (*slot, stack))
    }

    pub fn count(&self, item: &str) -> u64 {
        self.slots
            .values()
            .filter(|stack| stack.item.as_str() == item)
            .count() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_returns_previous_stack() {
        let mut equipment = Equipment::empty();
        assert_eq!(
            equipment.equip(EquipSlot::Hand, ItemStack::new("stone_axe", 1, 20.0)),
            None
        );

        let previous = equipment.equip(EquipSlot::Hand, ItemStack::new("torch", 1, 5.0));
        assert_eq!(previous, Some(ItemStack::new("stone_axe", 1, 20.0)));
        assert_eq!(equipment.get(EquipSlot::Hand).unwrap().item.as_str(), "torch");
        assert!(!equipment.is_occupied(EquipSlot::Head));
    }
}
