//! Action execution errors.

use super::HandlerRef;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ContainerError, ItemId};

/// Errors that can occur while running a resolved handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Handler reference no longer points at a definition.
    #[error("handler {0} does not exist")]
    UnknownHandler(HandlerRef),

    /// Operands, target groups or conditions no longer allow the handler.
    #[error("handler {0} is not applicable")]
    NotApplicable(HandlerRef),

    /// An effect needs an operand the binding does not have.
    #[error("effect {effect} needs {needs}")]
    MissingOperand {
        effect: &'static str,
        needs: &'static str,
    },

    #[error("not enough units at the {side} (need {required}, have {available})")]
    InsufficientQuantity {
        side: &'static str,
        required: u32,
        available: u32,
    },

    #[error("item {0} is not in the catalog")]
    UnknownItem(ItemId),

    #[error("object has no storage")]
    NoStorage,

    #[error("item {0} has no linked object of that kind")]
    NoLinkedObject(ItemId),

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            NotApplicable(_) | InsufficientQuantity { .. } => ErrorSeverity::Recoverable,
            UnknownHandler(_) | MissingOperand { .. } | NoStorage => ErrorSeverity::Validation,
            UnknownItem(_) | NoLinkedObject(_) => ErrorSeverity::Internal,
            Container(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            UnknownHandler(_) => "ACTION_UNKNOWN_HANDLER",
            NotApplicable(_) => "ACTION_NOT_APPLICABLE",
            MissingOperand { .. } => "ACTION_MISSING_OPERAND",
            InsufficientQuantity { .. } => "ACTION_INSUFFICIENT_QUANTITY",
            UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            NoStorage => "ACTION_NO_STORAGE",
            NoLinkedObject(_) => "ACTION_NO_LINKED_OBJECT",
            Container(err) => err.error_code(),
        }
    }
}
