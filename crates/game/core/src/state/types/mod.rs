mod actor;
mod common;
mod container;
mod equipment;
mod stack;
mod storage;

pub use actor::{ActorState, AttributeKind, Attributes, WieldTimer};
pub use common::{
    ActorId, DropId, GameTime, GroupTag, ItemId, ObjectDefId, ObjectUid, RecipeId, SlotIndex,
};
pub use container::Container;
pub use equipment::Equipment;
pub use stack::{ItemStack, weighted_durability};
pub use storage::StorageRegistry;
