//! Authoritative persistent state.
//!
//! [`PlayerData`] is the single mutable root holding every container, unlock
//! flag, and counter. It is the only thing saved and loaded; runtime layers
//! query it freely but mutate it through the engine.
mod error;
mod location;
mod transfer;
pub mod types;

use std::collections::{BTreeMap, BTreeSet};

pub use error::ContainerError;
#[cfg(feature = "serde")]
pub use error::StateError;
pub use location::{ContainerRef, StackLocation};
pub use transfer::{EquipOutcome, Placement, TransferOutcome};
pub use types::{
    ActorId, ActorState, AttributeKind, Attributes, Container, DropId, Equipment,
    GameTime, GroupTag, ItemId, ItemStack, ObjectDefId, ObjectUid, RecipeId,
    SlotIndex, StorageRegistry, WieldTimer, weighted_durability,
};

use crate::config::GameConfig;
use crate::env::ItemDefinition;

/// Everything that persists across sessions.
///
/// Keys are stable strings (item ids, object uids, flags) so saves stay valid
/// when the catalog is reordered.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerData {
    actors: BTreeMap<ActorId, ActorState>,
    storages: StorageRegistry,
    world_drops: BTreeMap<DropId, ItemStack>,
    unlocks: BTreeSet<String>,
    counters: BTreeMap<String, i64>,
    /// Simulated seconds played, advanced by the engine tick.
    pub play_time: GameTime,
    next_drop_id: u64,
}

impl PlayerData {
    /// Creates a fresh root holding only the player actor.
    pub fn new(config: &GameConfig) -> Self {
        let mut data = Self::empty();
        data.add_actor(ActorId::PLAYER, config);
        data
    }

    /// Creates a root with no actors at all.
    pub fn empty() -> Self {
        Self {
            actors: BTreeMap::new(),
            storages: StorageRegistry::default(),
            world_drops: BTreeMap::new(),
            unlocks: BTreeSet::new(),
            counters: BTreeMap::new(),
            play_time: GameTime::ZERO,
            next_drop_id: 1,
        }
    }

    // ===== actors =====

    /// Registers an actor, returning the existing one if the id is taken.
    pub fn add_actor(&mut self, id: ActorId, config: &GameConfig) -> &mut ActorState {
        self.actors
            .entry(id)
            .or_insert_with(|| ActorState::new(id, config))
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub fn require_actor_mut(&mut self, id: ActorId) -> Result<&mut ActorState, ContainerError> {
        self.actors
            .get_mut(&id)
            .ok_or(ContainerError::ActorNotFound(id))
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut ActorState> {
        self.actors.values_mut()
    }

    pub fn inventory(&self, actor: ActorId) -> Option<&Container> {
        self.actor(actor).map(|a| &a.inventory)
    }

    // ===== storage =====

    pub fn storages(&self) -> &StorageRegistry {
        &self.storages
    }

    pub fn storage(&self, uid: &str) -> Option<&Container> {
        self.storages.get(uid)
    }

    /// Opens the storage owned by `uid`, creating it on first access.
    pub fn open_storage(&mut self, uid: &ObjectUid, capacity: u16) -> &mut Container {
        self.storages.get_or_create(uid, capacity)
    }

    /// Removes a storage container and puts everything it held on the ground.
    pub fn spill_storage(&mut self, uid: &str) -> Vec<DropId> {
        let Some(contents) = self.storages.remove(uid) else {
            return Vec::new();
        };
        contents
            .iter()
            .map(|(_, stack)| self.drop_to_world(stack.clone()))
            .collect()
    }

    pub fn container(&self, container: &ContainerRef) -> Option<&Container> {
        match container {
            ContainerRef::Inventory(actor) => self.inventory(*actor),
            ContainerRef::Storage(uid) => self.storages.get(uid.as_str()),
        }
    }

    pub fn container_mut(&mut self, container: &ContainerRef) -> Option<&mut Container> {
        match container {
            ContainerRef::Inventory(actor) => self.actor_mut(*actor).map(|a| &mut a.inventory),
            ContainerRef::Storage(uid) => self.storages.get_mut(uid.as_str()),
        }
    }

    pub fn require_container_mut(
        &mut self,
        container: &ContainerRef,
    ) -> Result<&mut Container, ContainerError> {
        match container {
            ContainerRef::Inventory(actor) => {
                Ok(&mut self.require_actor_mut(*actor)?.inventory)
            }
            ContainerRef::Storage(uid) => self
                .storages
                .get_mut(uid.as_str())
                .ok_or_else(|| ContainerError::ContainerNotFound(container.clone())),
        }
    }

    // ===== stacks by location =====

    pub fn stack(&self, location: &StackLocation) -> Option<&ItemStack> {
        match location {
            StackLocation::Inventory { actor, slot } => self.inventory(*actor)?.get(*slot),
            StackLocation::Equipment { actor, slot } => self.actor(*actor)?.equipment.get(*slot),
            StackLocation::Storage { uid, slot } => self.storages.get(uid.as_str())?.get(*slot),
            StackLocation::WorldDrop(id) => self.world_drops.get(id),
        }
    }

    pub fn stack_mut(&mut self, location: &StackLocation) -> Option<&mut ItemStack> {
        match location {
            StackLocation::Inventory { actor, slot } => {
                self.actor_mut(*actor)?.inventory.get_mut(*slot)
            }
            StackLocation::Equipment { actor, slot } => {
                self.actor_mut(*actor)?.equipment.get_mut(*slot)
            }
            StackLocation::Storage { uid, slot } => {
                self.storages.get_mut(uid.as_str())?.get_mut(*slot)
            }
            StackLocation::WorldDrop(id) => self.world_drops.get_mut(id),
        }
    }

    /// Removes up to `quantity` units from `location`, clamping to what is there.
    pub fn remove_at(&mut self, location: &StackLocation, quantity: u32) -> Option<ItemStack> {
        match location {
            StackLocation::Inventory { actor, slot } => {
                self.actor_mut(*actor)?.inventory.remove_at(*slot, quantity)
            }
            StackLocation::Storage { uid, slot } => self
                .storages
                .get_mut(uid.as_str())?
                .remove_at(*slot, quantity),
            StackLocation::Equipment { actor, slot } => {
                if quantity == 0 {
                    return None;
                }
                let actor = self.actor_mut(*actor)?;
                if actor.wield.is_some_and(|timer| timer.slot == *slot) {
                    actor.wield = None;
                }
                actor.equipment.unequip(*slot)
            }
            StackLocation::WorldDrop(id) => {
                if quantity == 0 {
                    return None;
                }
                let stack = self.world_drops.get_mut(id)?;
                if quantity < stack.quantity {
                    stack.quantity -= quantity;
                    return Some(ItemStack::new(stack.item.clone(), quantity, stack.durability));
                }
                self.world_drops.remove(id)
            }
        }
    }

    /// Removes the whole stack at `location`.
    pub fn take_stack(&mut self, location: &StackLocation) -> Option<ItemStack> {
        self.remove_at(location, u32::MAX)
    }

    /// Replaces the stack at an occupied `location` in place (item conversion).
    ///
    /// Equipment slots only accept single units. Returns the previous stack.
    pub fn replace_stack(
        &mut self,
        location: &StackLocation,
        stack: ItemStack,
    ) -> Option<ItemStack> {
        if stack.is_empty() {
            return self.take_stack(location);
        }
        let current = self.stack_mut(location)?;
        if matches!(location, StackLocation::Equipment { .. }) && stack.quantity != 1 {
            return None;
        }
        Some(std::mem::replace(current, stack))
    }

    // ===== world drops =====

    /// Puts a stack on the ground, returning its drop id.
    pub fn drop_to_world(&mut self, stack: ItemStack) -> DropId {
        let id = DropId(self.next_drop_id);
        self.next_drop_id += 1;
        tracing::debug!(drop = %id, item = %stack.item, quantity = stack.quantity, "stack dropped");
        self.world_drops.insert(id, stack);
        id
    }

    pub fn world_drop(&self, id: DropId) -> Option<&ItemStack> {
        self.world_drops.get(&id)
    }

    pub fn world_drops(&self) -> impl Iterator<Item = (DropId, &ItemStack)> {
        self.world_drops.iter().map(|(id, stack)| (*id, stack))
    }

    // ===== inventory helpers =====

    /// Adds units to an actor's inventory (partial stacks first).
    pub fn give(
        &mut self,
        actor: ActorId,
        definition: &ItemDefinition,
        quantity: u32,
        durability: f32,
    ) -> Result<SlotIndex, ContainerError> {
        self.require_actor_mut(actor)?
            .inventory
            .add_stack(definition, quantity, durability)
            .ok_or(ContainerError::NoRoom(ContainerRef::Inventory(actor)))
    }

    /// Adds units to an actor's inventory, dropping them at the actor's feet when full.
    pub fn give_or_drop(
        &mut self,
        actor: ActorId,
        definition: &ItemDefinition,
        quantity: u32,
        durability: f32,
    ) -> Result<Placement, ContainerError> {
        match self.give(actor, definition, quantity, durability) {
            Ok(slot) => Ok(Placement::Inventory(slot)),
            Err(ContainerError::NoRoom(_)) => {
                let stack = ItemStack::new(definition.id.clone(), quantity, durability);
                Ok(Placement::Dropped(self.drop_to_world(stack)))
            }
            Err(err) => Err(err),
        }
    }

    // ===== flags & counters =====

    /// Sets an unlock flag. Returns `true` when it was newly set.
    pub fn unlock(&mut self, flag: impl Into<String>) -> bool {
        self.unlocks.insert(flag.into())
    }

    pub fn is_unlocked(&self, flag: &str) -> bool {
        self.unlocks.contains(flag)
    }

    pub fn unlocks(&self) -> impl Iterator<Item = &str> {
        self.unlocks.iter().map(String::as_str)
    }

    pub fn counter(&self, key: &str) -> i64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Adds to a named counter, returning the new value.
    pub fn add_counter(&mut self, key: &str, amount: i64) -> i64 {
        let value = self.counters.entry(key.to_owned()).or_insert(0);
        *value = value.saturating_add(amount);
        *value
    }

    // ===== bulk queries =====

    /// Units of `item` anywhere in the state: inventories, equipment, storage and the ground.
    pub fn total_quantity(&self, item: &str) -> u64 {
        let carried: u64 = self.actors.values().map(|a| a.count(item)).sum();
        let stored: u64 = self.storages.iter().map(|(_, c)| c.count(item)).sum();
        let dropped: u64 = self
            .world_drops
            .values()
            .filter(|stack| stack.item.as_str() == item)
            .map(|stack| u64::from(stack.quantity))
            .sum();
        carried + stored + dropped
    }

    /// Every stack location currently holding something.
    pub fn locations(&self) -> Vec<StackLocation> {
        let mut out = Vec::new();
        for actor in self.actors.values() {
            out.extend(actor.inventory.iter().map(|(slot, _)| StackLocation::Inventory {
                actor: actor.id,
                slot,
            }));
            out.extend(actor.equipment.iter().map(|(slot, _)| StackLocation::Equipment {
                actor: actor.id,
                slot,
            }));
        }
        for (uid, container) in self.storages.iter() {
            out.extend(container.iter().map(|(slot, _)| StackLocation::Storage {
                uid: uid.clone(),
                slot,
            }));
        }
        out.extend(self.world_drops.keys().map(|id| StackLocation::WorldDrop(*id)));
        out
    }

    /// Drops every zero-quantity entry left behind. Returns how many were found.
    pub fn heal(&mut self) -> usize {
        let mut healed = 0;
        for actor in self.actors.values_mut() {
            healed += actor.inventory.heal();
        }
        for (_, container) in self.storages.iter_mut() {
            healed += container.heal();
        }
        let before = self.world_drops.len();
        self.world_drops.retain(|_, stack| stack.quantity > 0);
        healed += before - self.world_drops.len();
        if healed > 0 {
            tracing::warn!(healed, "removed zero-quantity stacks");
        }
        healed
    }

    /// Runs `f` against a scratch copy and commits it only on success.
    ///
    /// Gives multi-step mutations all-or-nothing semantics: a failure anywhere
    /// inside `f` leaves `self` exactly as it was.
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut PlayerData) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut scratch = self.clone();
        let value = f(&mut scratch)?;
        *self = scratch;
        Ok(value)
    }
}

#[cfg(feature = "serde")]
impl PlayerData {
    /// Canonical binary encoding of the whole root.
    pub fn encode(&self) -> Result<Vec<u8>, StateError> {
        bincode::serialize(self).map_err(StateError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        bincode::deserialize(bytes).map_err(StateError::Decode)
    }

    /// SHA-256 digest of the canonical encoding.
    ///
    /// Every map in the root is ordered, so equal states always hash equally.
    pub fn state_root(&self) -> Result<[u8; 32], StateError> {
        use sha2::{Digest, Sha256};

        let bytes = self.encode()?;
        Ok(Sha256::digest(&bytes).into())
    }
}
