use std::fmt;

use crate::env::EquipSlot;
use crate::state::{ActorId, DropId, ObjectUid, SlotIndex};

/// Address of a single stack anywhere in the persistent state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackLocation {
    Inventory { actor: ActorId, slot: SlotIndex },
    Equipment { actor: ActorId, slot: EquipSlot },
    Storage { uid: ObjectUid, slot: SlotIndex },
    WorldDrop(DropId),
}

impl StackLocation {
    pub fn inventory(actor: ActorId, slot: u16) -> Self {
        Self::Inventory {
            actor,
            slot: SlotIndex(slot),
        }
    }

    pub fn equipment(actor: ActorId, slot: EquipSlot) -> Self {
        Self::Equipment { actor, slot }
    }

    pub fn storage(uid: impl Into<ObjectUid>, slot: u16) -> Self {
        Self::Storage {
            uid: uid.into(),
            slot: SlotIndex(slot),
        }
    }

    /// The slot-indexed container this location lives in, if any.
    pub fn container(&self) -> Option<(ContainerRef, SlotIndex)> {
        match self {
            Self::Inventory { actor, slot } => Some((ContainerRef::Inventory(*actor), *slot)),
            Self::Storage { uid, slot } => Some((ContainerRef::Storage(uid.clone()), *slot)),
            Self::Equipment { .. } | Self::WorldDrop(_) => None,
        }
    }

    /// Actor whose personal containers hold this location.
    pub fn owner(&self) -> Option<ActorId> {
        match self {
            Self::Inventory { actor, .. } | Self::Equipment { actor, .. } => Some(*actor),
            Self::Storage { .. } | Self::WorldDrop(_) => None,
        }
    }
}

impl fmt::Display for StackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inventory { actor, slot } => write!(f, "inventory{actor}{slot}"),
            Self::Equipment { actor, slot } => write!(f, "equipment{actor}[{slot}]"),
            Self::Storage { uid, slot } => write!(f, "storage:{uid}{slot}"),
            Self::WorldDrop(id) => write!(f, "{id}"),
        }
    }
}

/// Address of a slot-indexed container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerRef {
    Inventory(ActorId),
    Storage(ObjectUid),
}

impl ContainerRef {
    pub fn at(&self, slot: SlotIndex) -> StackLocation {
        match self {
            Self::Inventory(actor) => StackLocation::Inventory {
                actor: *actor,
                slot,
            },
            Self::Storage(uid) => StackLocation::Storage {
                uid: uid.clone(),
                slot,
            },
        }
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inventory(actor) => write!(f, "inventory{actor}"),
            Self::Storage(uid) => write!(f, "storage:{uid}"),
        }
    }
}
