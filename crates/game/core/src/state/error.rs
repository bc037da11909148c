//! State management errors.
//!
//! Errors raised by container moves, equip transitions and the persistent
//! state facade. Every variant is reported before any mutation happens.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, ContainerRef, DropId, ItemId, StackLocation};

/// Errors that occur while moving stacks between containers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("actor {0} does not exist")]
    ActorNotFound(ActorId),

    #[error("{0} has not been opened")]
    ContainerNotFound(ContainerRef),

    #[error("world drop {0} does not exist")]
    DropNotFound(DropId),

    #[error("{0} is empty")]
    SlotEmpty(StackLocation),

    #[error("{0} is outside the container")]
    SlotOutOfRange(StackLocation),

    #[error("{0} is occupied by a different item")]
    SlotOccupied(StackLocation),

    #[error("{0} cannot be used for this operation")]
    InvalidLocation(StackLocation),

    #[error("item {0} is not in the catalog")]
    UnknownItem(ItemId),

    #[error("item {0} has no equip slot")]
    NotEquippable(ItemId),

    #[error("item {0} is already equipped in that slot")]
    AlreadyEquipped(ItemId),

    /// Swapping would need the source slot to hold both the old item and the rest of its stack.
    #[error("cannot swap equipment with a stack of {quantity} units")]
    AmbiguousSwap { quantity: u32 },

    #[error("not enough room in {0}")]
    NoRoom(ContainerRef),

    #[error("quantity {requested} is invalid here (available: {available})")]
    InvalidQuantity { requested: u32, available: u32 },
}

impl GameError for ContainerError {
    fn severity(&self) -> ErrorSeverity {
        use ContainerError::*;
        match self {
            // Room may free up later
            NoRoom(_) => ErrorSeverity::Recoverable,

            ActorNotFound(_)
            | ContainerNotFound(_)
            | DropNotFound(_)
            | SlotEmpty(_)
            | SlotOutOfRange(_)
            | SlotOccupied(_)
            | InvalidLocation(_)
            | NotEquippable(_)
            | AlreadyEquipped(_)
            | AmbiguousSwap { .. }
            | InvalidQuantity { .. } => ErrorSeverity::Validation,

            // Saved data names an item the catalog no longer has
            UnknownItem(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ContainerError::*;
        match self {
            ActorNotFound(_) => "CONTAINER_ACTOR_NOT_FOUND",
            ContainerNotFound(_) => "CONTAINER_NOT_FOUND",
            DropNotFound(_) => "CONTAINER_DROP_NOT_FOUND",
            SlotEmpty(_) => "CONTAINER_SLOT_EMPTY",
            SlotOutOfRange(_) => "CONTAINER_SLOT_OUT_OF_RANGE",
            SlotOccupied(_) => "CONTAINER_SLOT_OCCUPIED",
            InvalidLocation(_) => "CONTAINER_INVALID_LOCATION",
            UnknownItem(_) => "CONTAINER_UNKNOWN_ITEM",
            NotEquippable(_) => "CONTAINER_NOT_EQUIPPABLE",
            AlreadyEquipped(_) => "CONTAINER_ALREADY_EQUIPPED",
            AmbiguousSwap { .. } => "CONTAINER_AMBIGUOUS_SWAP",
            NoRoom(_) => "CONTAINER_NO_ROOM",
            InvalidQuantity { .. } => "CONTAINER_INVALID_QUANTITY",
        }
    }
}

/// Errors raised while encoding or decoding the persistent root.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to encode state: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode state: {0}")]
    Decode(#[source] bincode::Error),
}

#[cfg(feature = "serde")]
impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "STATE_ENCODE",
            Self::Decode(_) => "STATE_DECODE",
        }
    }
}
