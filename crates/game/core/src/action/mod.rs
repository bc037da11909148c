//! Action handlers, resolution and execution.
//!
//! An [`Interaction`] (actor, primary stack, optional target) is resolved by
//! [`resolve`] into at most one handler, a menu, or nothing. The chosen
//! handler is checked with [`can_do_action`] and applied with [`do_action`].
//! Handlers are data owned by the catalog; the resolver never mutates state.
mod condition;
mod effect;
mod error;
mod execute;
mod handler;
mod interaction;
mod resolve;

pub use condition::Condition;
pub use effect::{ActionEffect, ObjectLink};
pub use error::ActionError;
pub use execute::{can_do_action, do_action, validate};
pub use handler::{ActionHandler, HandlerKind, MergeAction, SelfAction};
pub use interaction::{ActionBinding, HandlerOwner, HandlerRef, Interaction, Operand};
pub use resolve::{Resolution, ResolvedAction, resolve};
