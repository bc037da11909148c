//! Crafting errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, ContainerError, GroupTag, ItemId, RecipeId};

/// Reasons a craft cannot run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("recipe {0} is not in the catalog")]
    UnknownRecipe(RecipeId),

    #[error("actor {0} does not exist")]
    ActorNotFound(ActorId),

    #[error("recipe {recipe} is locked behind {flag}")]
    Locked { recipe: RecipeId, flag: String },

    #[error("need {required} x {item}, have {available}")]
    MissingItems {
        item: ItemId,
        required: u32,
        available: u64,
    },

    #[error("must be near a {0}")]
    NotNear(GroupTag),

    #[error("recipe output {0} is not in the catalog")]
    UnknownOutput(ItemId),

    /// Removal failed after the affordability check passed.
    #[error("failed to consume {item} after affordability check")]
    ConsumeFailed { item: ItemId },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl GameError for CraftError {
    fn severity(&self) -> ErrorSeverity {
        use CraftError::*;
        match self {
            // Player can gather more or walk closer
            MissingItems { .. } | NotNear(_) => ErrorSeverity::Recoverable,

            UnknownRecipe(_) | ActorNotFound(_) | Locked { .. } => ErrorSeverity::Validation,

            UnknownOutput(_) | ConsumeFailed { .. } => ErrorSeverity::Internal,

            Container(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use CraftError::*;
        match self {
            UnknownRecipe(_) => "CRAFT_UNKNOWN_RECIPE",
            ActorNotFound(_) => "CRAFT_ACTOR_NOT_FOUND",
            Locked { .. } => "CRAFT_LOCKED",
            MissingItems { .. } => "CRAFT_MISSING_ITEMS",
            NotNear(_) => "CRAFT_NOT_NEAR",
            UnknownOutput(_) => "CRAFT_UNKNOWN_OUTPUT",
            ConsumeFailed { .. } => "CRAFT_CONSUME_FAILED",
            Container(err) => err.error_code(),
        }
    }
}
