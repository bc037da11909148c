//! Moves between containers: equip transitions, slot transfers, splits, drops.
//!
//! Every operation validates first and mutates second, so a returned error
//! always means the state is untouched.

use super::{
    ActorId, ContainerError, ContainerRef, DropId, ItemStack, PlayerData, SlotIndex, StackLocation,
};
use crate::env::{EquipSlot, ItemDefinition, ItemOracle};

/// Result of a successful equip.
#[derive(Clone, Debug, PartialEq)]
pub enum EquipOutcome {
    /// The equip slot was empty.
    Equipped { slot: EquipSlot },
    /// The previous item went back into the source slot.
    Swapped { slot: EquipSlot, previous: ItemStack },
}

/// Result of a successful slot-to-slot transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Units moved into an empty slot.
    Moved(u32),
    /// Units merged into a stack of the same item.
    Merged(u32),
    /// Whole stacks exchanged places.
    Swapped,
}

/// Where newly given units ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Inventory(SlotIndex),
    Dropped(DropId),
}

fn definition<'a>(
    items: &'a dyn ItemOracle,
    stack: &ItemStack,
) -> Result<&'a ItemDefinition, ContainerError> {
    items.definition(stack.item.as_str()).ok_or_else(|| {
        tracing::warn!(item = %stack.item, "stack references an unknown item");
        ContainerError::UnknownItem(stack.item.clone())
    })
}

impl PlayerData {
    /// Equips one unit from an inventory or storage slot.
    ///
    /// - Empty equip slot: one unit moves over, the rest stays behind.
    /// - Same item already equipped: rejected.
    /// - Different item equipped and the source holds exactly one unit: the
    ///   two swap places atomically.
    /// - Different item equipped and the source holds more: rejected, because
    ///   the old item would have nowhere to go.
    pub fn equip(
        &mut self,
        items: &dyn ItemOracle,
        actor: ActorId,
        source: &StackLocation,
    ) -> Result<EquipOutcome, ContainerError> {
        if source.container().is_none() {
            return Err(ContainerError::InvalidLocation(source.clone()));
        }
        let stack = self
            .stack(source)
            .cloned()
            .ok_or_else(|| ContainerError::SlotEmpty(source.clone()))?;
        let def = definition(items, &stack)?;
        let slot = def
            .equip_slot
            .ok_or_else(|| ContainerError::NotEquippable(stack.item.clone()))?;

        let current = self
            .actor(actor)
            .ok_or(ContainerError::ActorNotFound(actor))?
            .equipment
            .get(slot)
            .cloned();

        match current {
            None => {
                let unit = self
                    .remove_at(source, 1)
                    .ok_or_else(|| ContainerError::SlotEmpty(source.clone()))?;
                self.require_actor_mut(actor)?.equipment.equip(slot, unit);
                tracing::debug!(%actor, item = %stack.item, %slot, "equipped");
                Ok(EquipOutcome::Equipped { slot })
            }
            Some(equipped) if equipped.item == stack.item => {
                Err(ContainerError::AlreadyEquipped(stack.item))
            }
            Some(_) if stack.quantity > 1 => Err(ContainerError::AmbiguousSwap {
                quantity: stack.quantity,
            }),
            Some(_) => self.transaction(|tx| {
                let unit = tx
                    .take_stack(source)
                    .ok_or_else(|| ContainerError::SlotEmpty(source.clone()))?;
                let previous = tx
                    .take_stack(&StackLocation::Equipment { actor, slot })
                    .ok_or(ContainerError::ActorNotFound(actor))?;
                let (container, source_slot) = source
                    .container()
                    .ok_or_else(|| ContainerError::InvalidLocation(source.clone()))?;
                if !tx
                    .require_container_mut(&container)?
                    .put(source_slot, previous.clone())
                {
                    return Err(ContainerError::SlotOccupied(source.clone()));
                }
                tx.require_actor_mut(actor)?.equipment.equip(slot, unit);
                tracing::debug!(%actor, item = %stack.item, previous = %previous.item, %slot, "swapped equipment");
                Ok(EquipOutcome::Swapped { slot, previous })
            }),
        }
    }

    /// Returns the equipped stack in `slot` to a container.
    ///
    /// The unit merges into a partial stack of the same item when one has
    /// room, otherwise it takes the first empty slot.
    pub fn unequip(
        &mut self,
        items: &dyn ItemOracle,
        actor: ActorId,
        slot: EquipSlot,
        destination: &ContainerRef,
    ) -> Result<SlotIndex, ContainerError> {
        let location = StackLocation::Equipment { actor, slot };
        let stack = self
            .stack(&location)
            .cloned()
            .ok_or_else(|| ContainerError::SlotEmpty(location.clone()))?;
        let def = definition(items, &stack)?;

        let target = self
            .require_container_mut(destination)?
            .add_stack(def, stack.quantity, stack.durability)
            .ok_or_else(|| ContainerError::NoRoom(destination.clone()))?;
        self.take_stack(&location);
        tracing::debug!(%actor, item = %stack.item, %slot, to = %destination, "unequipped");
        Ok(target)
    }

    /// Moves units between two slot-indexed locations.
    ///
    /// `quantity` defaults to the whole source stack. The destination may be
    /// empty, hold the same item with room, or hold a different item; the last
    /// case swaps whole stacks and requires moving the whole source stack.
    pub fn transfer(
        &mut self,
        items: &dyn ItemOracle,
        from: &StackLocation,
        to: &StackLocation,
        quantity: Option<u32>,
    ) -> Result<TransferOutcome, ContainerError> {
        let (Some((from_container, from_slot)), Some((to_container, to_slot))) =
            (from.container(), to.container())
        else {
            let bad = if from.container().is_none() { from } else { to };
            return Err(ContainerError::InvalidLocation(bad.clone()));
        };
        if from == to {
            return Err(ContainerError::InvalidLocation(to.clone()));
        }

        let source = self
            .stack(from)
            .cloned()
            .ok_or_else(|| ContainerError::SlotEmpty(from.clone()))?;
        let requested = quantity.unwrap_or(source.quantity);
        if requested == 0 || requested > source.quantity {
            return Err(ContainerError::InvalidQuantity {
                requested,
                available: source.quantity,
            });
        }

        let destination = self
            .container(&to_container)
            .ok_or_else(|| ContainerError::ContainerNotFound(to_container.clone()))?;
        if !destination.contains_slot(to_slot) {
            return Err(ContainerError::SlotOutOfRange(to.clone()));
        }
        let occupant = destination.get(to_slot).cloned();

        match occupant {
            None => {
                let moved = self
                    .remove_at(from, requested)
                    .ok_or_else(|| ContainerError::SlotEmpty(from.clone()))?;
                let quantity = moved.quantity;
                self.require_container_mut(&to_container)?.put(to_slot, moved);
                Ok(TransferOutcome::Moved(quantity))
            }
            Some(existing) if existing.item == source.item => {
                let def = definition(items, &source)?;
                let room = def.max_stack.saturating_sub(existing.quantity);
                let moved = room.min(requested);
                if moved == 0 {
                    return Err(ContainerError::NoRoom(to_container));
                }
                let part = self
                    .remove_at(from, moved)
                    .ok_or_else(|| ContainerError::SlotEmpty(from.clone()))?;
                if let Some(target) = self.stack_mut(to) {
                    target.absorb(part.quantity, part.durability);
                }
                Ok(TransferOutcome::Merged(moved))
            }
            Some(_) if requested < source.quantity => {
                Err(ContainerError::SlotOccupied(to.clone()))
            }
            Some(_) => self.transaction(|tx| {
                let a = tx
                    .take_stack(from)
                    .ok_or_else(|| ContainerError::SlotEmpty(from.clone()))?;
                let b = tx
                    .take_stack(to)
                    .ok_or_else(|| ContainerError::SlotEmpty(to.clone()))?;
                let placed_b = tx.require_container_mut(&from_container)?.put(from_slot, b);
                let placed_a = tx.require_container_mut(&to_container)?.put(to_slot, a);
                if placed_a && placed_b {
                    Ok(TransferOutcome::Swapped)
                } else {
                    Err(ContainerError::SlotOccupied(to.clone()))
                }
            }),
        }
    }

    /// Moves a whole stack into another container, merging with partial
    /// stacks first. All-or-nothing.
    pub fn quick_move(
        &mut self,
        items: &dyn ItemOracle,
        from: &StackLocation,
        to: &ContainerRef,
    ) -> Result<SlotIndex, ContainerError> {
        let stack = self
            .stack(from)
            .cloned()
            .ok_or_else(|| ContainerError::SlotEmpty(from.clone()))?;
        let def = definition(items, &stack)?;
        if matches!(from.container(), Some((ref source, _)) if source == to) {
            return Err(ContainerError::InvalidLocation(from.clone()));
        }
        let slot = self
            .require_container_mut(to)?
            .add_stack(def, stack.quantity, stack.durability)
            .ok_or_else(|| ContainerError::NoRoom(to.clone()))?;
        self.take_stack(from);
        Ok(slot)
    }

    /// Splits `quantity` units off a stack into the first empty slot of the same container.
    pub fn split(
        &mut self,
        location: &StackLocation,
        quantity: u32,
    ) -> Result<SlotIndex, ContainerError> {
        let (container, slot) = location
            .container()
            .ok_or_else(|| ContainerError::InvalidLocation(location.clone()))?;
        let available = self
            .stack(location)
            .map(|stack| stack.quantity)
            .ok_or_else(|| ContainerError::SlotEmpty(location.clone()))?;
        if quantity == 0 || quantity >= available {
            return Err(ContainerError::InvalidQuantity {
                requested: quantity,
                available,
            });
        }
        self.require_container_mut(&container)?
            .split(slot, quantity)
            .ok_or(ContainerError::NoRoom(container))
    }

    /// Puts units from any location on the ground.
    pub fn drop_item(
        &mut self,
        location: &StackLocation,
        quantity: Option<u32>,
    ) -> Result<DropId, ContainerError> {
        if matches!(location, StackLocation::WorldDrop(_)) {
            return Err(ContainerError::InvalidLocation(location.clone()));
        }
        let available = self
            .stack(location)
            .map(|stack| stack.quantity)
            .ok_or_else(|| ContainerError::SlotEmpty(location.clone()))?;
        let requested = quantity.unwrap_or(available);
        if requested == 0 || requested > available {
            return Err(ContainerError::InvalidQuantity {
                requested,
                available,
            });
        }
        let stack = self
            .remove_at(location, requested)
            .ok_or_else(|| ContainerError::SlotEmpty(location.clone()))?;
        Ok(self.drop_to_world(stack))
    }

    /// Moves a world drop into an actor's inventory. All-or-nothing.
    pub fn pick_up(
        &mut self,
        items: &dyn ItemOracle,
        actor: ActorId,
        drop: DropId,
    ) -> Result<SlotIndex, ContainerError> {
        let stack = self
            .world_drop(drop)
            .cloned()
            .ok_or(ContainerError::DropNotFound(drop))?;
        let def = definition(items, &stack)?;
        let slot = self.give(actor, def, stack.quantity, stack.durability)?;
        self.take_stack(&StackLocation::WorldDrop(drop));
        Ok(slot)
    }
}
