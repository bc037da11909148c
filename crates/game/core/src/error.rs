//! Error classification shared by every rules module.
//!
//! Each operation family has its own enum (`ContainerError`, `CraftError`,
//! `ActionError`, `ExecuteError`) defined next to the code that raises it. A
//! failed precondition is always returned as a value, never a panic.

/// How a caller should treat a rejected request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later: actor busy, inventory full.
    Recoverable,
    /// The request itself is wrong: slot out of range, item not equippable.
    Validation,
    /// A check passed but the mutation still failed. Points at a rules bug.
    Internal,
    /// Catalog or save data is unusable; the session cannot go on.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// `Internal` and `Fatal` both indicate broken rules or data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Shared surface of every error enum in this crate.
///
/// Implementors derive `thiserror::Error` for the message and map each variant
/// to a severity and a stable upper-snake code (`CONTAINER_NO_ROOM`).
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
