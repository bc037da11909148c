//! Catalog access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ItemId, ObjectDefId, RecipeId};

/// Errors raised while building the catalog. Lookups of unknown ids are not
/// errors: they return `None`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// Two item definitions share an id.
    #[error("duplicate item definition '{0}'")]
    DuplicateItem(ItemId),

    /// Two recipes share an id.
    #[error("duplicate recipe '{0}'")]
    DuplicateRecipe(RecipeId),

    /// Two world-object definitions share an id.
    #[error("duplicate world object definition '{0}'")]
    DuplicateObject(ObjectDefId),

    /// Item definition declares a stack cap of zero.
    #[error("item definition '{0}' has a zero stack cap")]
    ZeroStackCap(ItemId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        // A malformed catalog cannot be loaded
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            DuplicateItem(_) => "ORACLE_DUPLICATE_ITEM",
            DuplicateRecipe(_) => "ORACLE_DUPLICATE_RECIPE",
            DuplicateObject(_) => "ORACLE_DUPLICATE_OBJECT",
            ZeroStackCap(_) => "ORACLE_ZERO_STACK_CAP",
        }
    }
}
