//! Fixed-capacity, slot-indexed holder of item stacks.
//!
//! Used for personal inventories and for storage boxes. Every operation is a
//! total function: when its precondition fails it reports failure through the
//! return value and leaves the container untouched.

use std::collections::BTreeMap;

use super::{ItemStack, SlotIndex};
use crate::env::ItemDefinition;

/// Ordered mapping `slot -> stack` with a fixed slot count.
///
/// Empty slots are absent from the mapping; a zero-quantity stack is never stored.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    capacity: u16,
    slots: BTreeMap<SlotIndex, ItemStack>,
}

impl Container {
    pub fn new(capacity: u16) -> Self {
        Self {
            capacity,
            slots: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    pub fn contains_slot(&self, slot: SlotIndex) -> bool {
        slot.0 < self.capacity
    }

    /// Returns the stack in `slot`, or `None` when the slot is empty.
    pub fn get(&self, slot: SlotIndex) -> Option<&ItemStack> {
        let stack = self.slots.get(&slot)?;
        debug_assert!(stack.quantity > 0, "zero stack left in slot {slot}");
        // Release builds treat a leftover zero stack as an empty slot.
        (stack.quantity > 0).then_some(stack)
    }

    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut ItemStack> {
        self.slots.get_mut(&slot).filter(|stack| stack.quantity > 0)
    }

    pub fn is_slot_empty(&self, slot: SlotIndex) -> bool {
        self.get(slot).is_none()
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &ItemStack)> {
        self.slots
            .iter()
            .filter(|(_, stack)| stack.quantity > 0)
            .map(|(slot, stack)| (*slot, stack))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.first_empty_slot().is_none()
    }

    pub fn first_empty_slot(&self) -> Option<SlotIndex> {
        (0..self.capacity)
            .map(SlotIndex)
            .find(|slot| self.is_slot_empty(*slot))
    }

    /// Total units of `item` across all slots.
    pub fn count(&self, item: &str) -> u64 {
        self.iter()
            .filter(|(_, stack)| stack.item.as_str() == item)
            .map(|(_, stack)| u64::from(stack.quantity))
            .sum()
    }

    /// Units of `definition` this container can still accept.
    pub fn room_for(&self, definition: &ItemDefinition) -> u64 {
        let max = u64::from(definition.max_stack);
        let partial: u64 = self
            .iter()
            .filter(|(_, stack)| stack.item == definition.id)
            .map(|(_, stack)| max.saturating_sub(u64::from(stack.quantity)))
            .sum();
        let empty = (0..self.capacity)
            .filter(|slot| self.is_slot_empty(SlotIndex(*slot)))
            .count() as u64;
        partial + empty * max
    }

    /// Adds `quantity` units, filling partial stacks of the same item first.
    ///
    /// Partial stacks are topped up in slot order, then empty slots are opened
    /// for the remainder. Every merge uses the quantity-weighted durability
    /// average. Fails without mutation when the full quantity does not fit.
    ///
    /// Returns the slot that received the first units.
    pub fn add_stack(
        &mut self,
        definition: &ItemDefinition,
        quantity: u32,
        durability: f32,
    ) -> Option<SlotIndex> {
        if quantity == 0 || self.room_for(definition) < u64::from(quantity) {
            return None;
        }

        let max = definition.max_stack;
        let mut remaining = quantity;
        let mut first = None;

        let partials: Vec<SlotIndex> = self
            .iter()
            .filter(|(_, stack)| stack.item == definition.id && stack.quantity < max)
            .map(|(slot, _)| slot)
            .collect();

        for slot in partials {
            if remaining == 0 {
                break;
            }
            let Some(stack) = self.get_mut(slot) else {
                continue;
            };
            let moved = (max - stack.quantity).min(remaining);
            stack.absorb(moved, durability);
            remaining -= moved;
            first.get_or_insert(slot);
        }

        while remaining > 0 {
            let Some(slot) = self.first_empty_slot() else {
                debug_assert!(false, "room check passed but no empty slot left");
                break;
            };
            let moved = max.min(remaining);
            self.slots.insert(
                slot,
                ItemStack::new(definition.id.clone(), moved, durability),
            );
            remaining -= moved;
            first.get_or_insert(slot);
        }

        first
    }

    /// Places a whole stack into an empty slot.
    pub fn put(&mut self, slot: SlotIndex, stack: ItemStack) -> bool {
        if !self.contains_slot(slot) || stack.is_empty() || !self.is_slot_empty(slot) {
            return false;
        }
        self.slots.insert(slot, stack);
        true
    }

    /// Removes and returns the whole stack in `slot`.
    pub fn take(&mut self, slot: SlotIndex) -> Option<ItemStack> {
        self.slots.remove(&slot).filter(|stack| stack.quantity > 0)
    }

    /// Removes up to `quantity` units from `slot`, clamping to what is present.
    ///
    /// A slot brought to zero is removed from the mapping. Returns the removed
    /// units as a stack, or `None` when nothing was removed.
    pub fn remove_at(&mut self, slot: SlotIndex, quantity: u32) -> Option<ItemStack> {
        if quantity == 0 {
            return None;
        }
        let stack = self.get_mut(slot)?;
        if quantity < stack.quantity {
            stack.quantity -= quantity;
            return Some(ItemStack::new(stack.item.clone(), quantity, stack.durability));
        }
        self.take(slot)
    }

    /// Removes `quantity` units of `item`, walking slots in ascending order.
    ///
    /// All-or-nothing: fails without mutation when fewer units are present.
    pub fn remove_item(&mut self, item: &str, quantity: u32) -> bool {
        if self.count(item) < u64::from(quantity) {
            return false;
        }

        let holding: Vec<SlotIndex> = self
            .iter()
            .filter(|(_, stack)| stack.item.as_str() == item)
            .map(|(slot, _)| slot)
            .collect();

        let mut remaining = quantity;
        for slot in holding {
            if remaining == 0 {
                break;
            }
            if let Some(removed) = self.remove_at(slot, remaining) {
                remaining -= removed.quantity;
            }
        }
        remaining == 0
    }

    /// Exchanges the contents of two slots. Either side may be empty.
    pub fn swap(&mut self, a: SlotIndex, b: SlotIndex) -> bool {
        if !self.contains_slot(a) || !self.contains_slot(b) {
            return false;
        }
        if a == b {
            return true;
        }
        let first = self.take(a);
        let second = self.take(b);
        if let Some(stack) = first {
            self.slots.insert(b, stack);
        }
        if let Some(stack) = second {
            self.slots.insert(a, stack);
        }
        true
    }

    /// Moves `quantity` units out of `slot` into the first empty slot.
    ///
    /// The split must leave at least one unit behind.
    pub fn split(&mut self, slot: SlotIndex, quantity: u32) -> Option<SlotIndex> {
        let target = self.first_empty_slot()?;
        let part = self.get_mut(slot)?.split_off(quantity)?;
        self.slots.insert(target, part);
        Some(target)
    }

    /// Drops every zero-quantity entry. Returns how many were found.
    pub fn heal(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, stack| stack.quantity > 0);
        before - self.slots.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.iter().map(|(_, stack)| u64::from(stack.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_x() -> ItemDefinition {
        ItemDefinition::new("x", "X", 10)
    }

    fn slot(i: u16) -> SlotIndex {
        SlotIndex(i)
    }

    #[test]
    fn add_merges_with_weighted_durability() {
        let def = item_x();
        let mut inv = Container::new(4);

        assert_eq!(inv.add_stack(&def, 5, 10.0), Some(slot(0)));
        assert_eq!(inv.add_stack(&def, 5, 20.0), Some(slot(0)));

        let stack = inv.get(slot(0)).unwrap();
        assert_eq!(stack.quantity, 10);
        assert_eq!(stack.durability, 15.0);
        assert!(inv.get(slot(1)).is_none());
    }

    #[test]
    fn add_tops_up_before_opening_new_slot() {
        let def = item_x();
        let mut inv = Container::new(2);

        assert_eq!(inv.add_stack(&def, 6, 0.0), Some(slot(0)));
        assert_eq!(inv.add_stack(&def, 6, 0.0), Some(slot(0)));

        assert_eq!(inv.get(slot(0)).unwrap().quantity, 10);
        assert_eq!(inv.get(slot(1)).unwrap().quantity, 2);
    }

    #[test]
    fn add_prefers_partial_stack_over_earlier_empty_slot() {
        let def = item_x();
        let mut inv = Container::new(3);
        inv.put(slot(1), ItemStack::new("x", 3, 0.0));

        assert_eq!(inv.add_stack(&def, 2, 0.0), Some(slot(1)));
        assert_eq!(inv.get(slot(1)).unwrap().quantity, 5);
        assert!(inv.get(slot(0)).is_none());
    }

    #[test]
    fn add_fails_without_mutation_when_it_does_not_fit() {
        let def = item_x();
        let mut inv = Container::new(1);
        inv.add_stack(&def, 8, 1.0);
        let before = inv.clone();

        assert_eq!(inv.add_stack(&def, 3, 1.0), None);
        assert_eq!(inv, before);
        assert_eq!(inv.add_stack(&def, 0, 1.0), None);
    }

    #[test]
    fn remove_to_zero_leaves_no_phantom_stack() {
        let def = item_x();
        let mut inv = Container::new(2);
        inv.add_stack(&def, 4, 0.0);

        let removed = inv.remove_at(slot(0), 4).unwrap();
        assert_eq!(removed.quantity, 4);
        assert!(inv.get(slot(0)).is_none());
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_more_than_present_clamps() {
        let def = item_x();
        let mut inv = Container::new(2);
        inv.add_stack(&def, 3, 0.0);

        let removed = inv.remove_at(slot(0), 50).unwrap();
        assert_eq!(removed.quantity, 3);
        assert!(inv.get(slot(0)).is_none());
        assert!(inv.remove_at(slot(0), 1).is_none());
    }

    #[test]
    fn remove_item_walks_slots_in_order_and_is_all_or_nothing() {
        let mut inv = Container::new(3);
        inv.put(slot(0), ItemStack::new("x", 2, 0.0));
        inv.put(slot(2), ItemStack::new("x", 5, 0.0));

        assert!(!inv.remove_item("x", 8));
        assert_eq!(inv.count("x"), 7);

        assert!(inv.remove_item("x", 4));
        assert!(inv.get(slot(0)).is_none());
        assert_eq!(inv.get(slot(2)).unwrap().quantity, 3);
    }

    #[test]
    fn swap_exchanges_both_slots() {
        let mut inv = Container::new(3);
        inv.put(slot(0), ItemStack::new("a", 1, 1.0));
        inv.put(slot(1), ItemStack::new("b", 2, 2.0));

        assert!(inv.swap(slot(0), slot(1)));
        assert_eq!(inv.get(slot(0)).unwrap().item.as_str(), "b");
        assert_eq!(inv.get(slot(1)).unwrap().item.as_str(), "a");

        assert!(inv.swap(slot(1), slot(2)));
        assert!(inv.get(slot(1)).is_none());
        assert_eq!(inv.get(slot(2)).unwrap().item.as_str(), "a");

        assert!(!inv.swap(slot(0), slot(9)));
    }

    #[test]
    fn split_moves_units_into_first_empty_slot() {
        let mut inv = Container::new(3);
        inv.put(slot(1), ItemStack::new("x", 6, 3.0));

        assert_eq!(inv.split(slot(1), 2), Some(slot(0)));
        assert_eq!(inv.get(slot(0)).unwrap(), &ItemStack::new("x", 2, 3.0));
        assert_eq!(inv.get(slot(1)).unwrap().quantity, 4);

        assert_eq!(inv.split(slot(1), 4), None);
        assert_eq!(inv.total_quantity(), 6);
    }

    #[test]
    fn put_rejects_occupied_and_out_of_range_slots() {
        let mut inv = Container::new(1);
        assert!(inv.put(slot(0), ItemStack::new("x", 1, 0.0)));
        assert!(!inv.put(slot(0), ItemStack::new("x", 1, 0.0)));
        assert!(!inv.put(slot(1), ItemStack::new("x", 1, 0.0)));
        assert!(!inv.put(slot(0), ItemStack::new("y", 0, 0.0)));
    }

    #[test]
    fn conservation_over_mixed_operations() {
        let def = item_x();
        let mut inv = Container::new(5);
        let mut added = 0u64;
        let mut removed = 0u64;

        for (i, qty) in [7u32, 3, 9, 4, 12].into_iter().enumerate() {
            if inv.add_stack(&def, qty, i as f32).is_some() {
                added += u64::from(qty);
            }
            if let Some(out) = inv.remove_at(SlotIndex((i % 3) as u16), 2) {
                removed += u64::from(out.quantity);
            }
            inv.swap(slot(0), SlotIndex((i % 5) as u16));
            inv.split(slot(1), 1);
        }

        assert_eq!(inv.count("x"), added - removed);
    }
}
