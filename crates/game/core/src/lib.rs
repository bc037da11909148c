//! Deterministic item and state rules for a survival/crafting game.
//!
//! `survival-core` defines the canonical model (catalog definitions, slot
//! containers, durability, crafting, action handlers) and exposes pure APIs
//! that the content loaders and the headless runner build on. All session
//! mutation flows through [`engine::GameEngine`], which owns the single
//! persistent root [`state::PlayerData`].
pub mod action;
pub mod config;
pub mod craft;
pub mod durability;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;

pub use action::{
    ActionBinding, ActionEffect, ActionError, ActionHandler, Condition, HandlerKind, HandlerOwner,
    HandlerRef, Interaction, MergeAction, ObjectLink, Operand, Resolution, ResolvedAction,
    SelfAction, can_do_action, do_action, resolve,
};
pub use config::{AttributeDrain, GameConfig};
pub use craft::{CraftCost, CraftError, CraftProduct, can_afford, craft_consume};
pub use durability::{DecayOutcome, DecayTrigger, Exhaustion};
pub use engine::{
    CancelReason, ChoiceOption, CraftOutcome, ExecuteError, GameEngine, InteractOutcome,
    PendingAction,
};
pub use env::{
    Catalog, DurabilityPolicy, DurabilitySpec, EmptyWorld, EquipSlot, ExhaustBehavior, GameEnv,
    ItemDefinition, ItemOracle, ObjectOracle, OracleError, RecipeDefinition, RecipeOracle,
    RecipeOutput, StaticWorld, WorldObjectDefinition, WorldObjectRef, WorldOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventBus, EventKinds, EventSubscriber, GameEvent, SubscriberId};
pub use state::{
    ActorId, ActorState, AttributeKind, Container, ContainerError, ContainerRef, DropId,
    EquipOutcome, Equipment, GameTime, GroupTag, ItemId, ItemStack, ObjectDefId, ObjectUid,
    Placement, PlayerData, RecipeId, SlotIndex, StackLocation, TransferOutcome,
};

#[cfg(feature = "serde")]
pub use state::StateError;
