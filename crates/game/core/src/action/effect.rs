//! Effect vocabulary.
//!
//! Effects are written from the handler owner's point of view: *source* is
//! the item or object that carries the handler, *target* is the other side of
//! the interaction.

use crate::state::{AttributeKind, ItemId, ObjectDefId};

#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionEffect {
    ConsumeSource { quantity: u32 },
    ConsumeTarget { quantity: u32 },

    /// Turns the source stack into another item, keeping its quantity.
    ConvertSource { into: ItemId },
    ConvertTarget { into: ItemId },

    /// New units for the actor (dropped at their feet when the inventory is full).
    Produce { item: ItemId, quantity: u32 },

    /// One usage-count durability decrement on the source stack.
    UseSource,
    UseTarget,

    RestoreAttribute { attribute: AttributeKind, amount: f32 },

    Unlock(String),

    EquipSource,

    /// Equips the source into its slot until it sits unused for the wield timeout.
    WieldSource,

    /// Moves a world-dropped source stack into the actor's inventory.
    PickUpSource,
    PickUpTarget,

    /// Opens the storage owned by the object side of the interaction.
    OpenStorage,

    /// Asks the world to remove the object side. Its storage spills onto the ground.
    RemoveObject,

    PlaceObject { object: ObjectDefId },

    /// Places the source item's linked world object.
    PlaceLinked(ObjectLink),

    AddCounter { key: String, amount: i64 },
}

impl ActionEffect {
    /// Units this effect removes from the source stack up front.
    pub fn source_consumption(&self) -> u32 {
        match self {
            Self::ConsumeSource { quantity } => *quantity,
            _ => 0,
        }
    }

    pub fn target_consumption(&self) -> u32 {
        match self {
            Self::ConsumeTarget { quantity } => *quantity,
            _ => 0,
        }
    }
}

/// Which cross-catalog link of an item to follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectLink {
    Sowable,
    Buildable,
}
