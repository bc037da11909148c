//! Error types for the engine's input surface.

use crate::action::{ActionError, HandlerRef};
use crate::craft::CraftError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, ContainerError};

/// Errors surfaced by [`super::GameEngine`] requests.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    /// The actor already has an action in flight.
    #[error("actor {actor} is busy with {label}")]
    ActorBusy { actor: ActorId, label: String },

    #[error("actor {0} does not exist")]
    ActorNotFound(ActorId),

    #[error("actor {0} has no menu to choose from")]
    NoChoicePending(ActorId),

    #[error("menu option {index} does not exist for actor {actor}")]
    InvalidChoice { actor: ActorId, index: usize },

    #[error("handler {0} does not exist")]
    UnknownHandler(HandlerRef),

    #[error("action failed: {0}")]
    Action(#[from] ActionError),

    #[error("craft failed: {0}")]
    Craft(#[from] CraftError),

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        use ExecuteError::*;
        match self {
            ActorBusy { .. } => ErrorSeverity::Recoverable,
            ActorNotFound(_) | NoChoicePending(_) | InvalidChoice { .. } | UnknownHandler(_) => {
                ErrorSeverity::Validation
            }
            Action(err) => err.severity(),
            Craft(err) => err.severity(),
            Container(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use ExecuteError::*;
        match self {
            ActorBusy { .. } => "ENGINE_ACTOR_BUSY",
            ActorNotFound(_) => "ENGINE_ACTOR_NOT_FOUND",
            NoChoicePending(_) => "ENGINE_NO_CHOICE_PENDING",
            InvalidChoice { .. } => "ENGINE_INVALID_CHOICE",
            UnknownHandler(_) => "ENGINE_UNKNOWN_HANDLER",
            Action(err) => err.error_code(),
            Craft(err) => err.error_code(),
            Container(err) => err.error_code(),
        }
    }
}
