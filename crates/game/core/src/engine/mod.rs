//! Session driver and per-tick pipeline.
//!
//! The [`GameEngine`] owns the persistent state, the scheduler and the
//! subscriber list. Every input request runs the same steps: reject busy
//! actors, resolve, validate, mutate through [`PlayerData`], then publish the
//! produced events in order. [`GameEngine::tick`] advances simulated time in a
//! fixed order: due continuations, durability, attributes, wield timeouts,
//! event dispatch.

mod errors;
mod scheduler;

pub use errors::ExecuteError;
pub use scheduler::{CancelReason, CancelToken, PendingAction, ScheduledTask, Scheduler};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::{self, ActionBinding, HandlerRef, Interaction, Resolution};
use crate::config::GameConfig;
use crate::craft::{self, CraftError, CraftProduct};
use crate::durability;
use crate::env::{Catalog, EquipSlot, GameEnv, WorldOracle};
use crate::events::{EventBus, EventSubscriber, GameEvent, SubscriberId};
use crate::state::{
    ActorId, ContainerRef, DropId, EquipOutcome, GameTime, ObjectUid, Placement, PlayerData,
    RecipeId, SlotIndex, StackLocation, TransferOutcome,
};

/// Borrows the read-only half of the engine without touching `state`.
macro_rules! env_of {
    ($engine:expr) => {
        GameEnv::from_catalog(&$engine.catalog, $engine.world.as_ref(), &$engine.config)
    };
}

/// Result of an interaction request.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractOutcome {
    /// The handler ran to completion.
    Completed { handler: HandlerRef },
    /// The handler takes time and fires at `due` unless cancelled first.
    Started { handler: HandlerRef, due: GameTime },
    /// Several handlers apply. Pick one with [`GameEngine::choose`].
    Choices(Vec<ChoiceOption>),
    NoOp,
}

/// One entry of an action menu.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceOption {
    pub index: usize,
    pub handler: HandlerRef,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CraftOutcome {
    Completed(CraftProduct),
    Started { due: GameTime },
}

#[derive(Clone, Debug)]
struct MenuEntry {
    title: String,
    handler_ref: HandlerRef,
    binding: ActionBinding,
}

/// Owned result of resolution, detached from the catalog borrow.
enum Picked {
    Run(HandlerRef, ActionBinding),
    Menu(Vec<MenuEntry>),
    Nothing,
}

/// Authoritative owner of one play session.
pub struct GameEngine {
    catalog: Arc<Catalog>,
    world: Arc<dyn WorldOracle>,
    config: GameConfig,
    state: PlayerData,
    scheduler: Scheduler,
    bus: EventBus,
    menus: BTreeMap<ActorId, Vec<MenuEntry>>,
    outbox: Vec<GameEvent>,
}

impl GameEngine {
    /// Creates an engine with a fresh state holding only the player.
    pub fn new(catalog: Arc<Catalog>, world: Arc<dyn WorldOracle>, config: GameConfig) -> Self {
        let state = PlayerData::new(&config);
        Self {
            catalog,
            world,
            config,
            state,
            scheduler: Scheduler::new(),
            bus: EventBus::new(),
            menus: BTreeMap::new(),
            outbox: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: PlayerData) -> Self {
        self.load_state(state);
        self
    }

    pub fn state(&self) -> &PlayerData {
        &self.state
    }

    /// Replaces the session state (loading a save). In-flight actions and open
    /// menus belong to the old state and are dropped.
    pub fn load_state(&mut self, mut state: PlayerData) {
        let healed = state.heal();
        if healed > 0 {
            tracing::warn!(healed, "removed empty stacks from loaded state");
        }
        self.scheduler.clear();
        self.menus.clear();
        self.state = state;
    }

    pub fn into_state(self) -> PlayerData {
        self.state
    }

    pub fn env(&self) -> GameEnv<'_> {
        env_of!(self)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn play_time(&self) -> GameTime {
        self.state.play_time
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn pending(&self, actor: ActorId) -> Option<&PendingAction> {
        self.scheduler.get(actor)
    }

    pub fn is_busy(&self, actor: ActorId) -> bool {
        self.scheduler.is_busy(actor)
    }

    pub fn subscribe(&mut self, subscriber: impl EventSubscriber + 'static) -> SubscriberId {
        self.bus.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Recipes the actor can craft right now.
    pub fn craftable_recipes(&self, actor: ActorId) -> Vec<RecipeId> {
        let env = env_of!(self);
        craft::craftable_recipes(&self.state, &env, actor)
            .into_iter()
            .map(|recipe| recipe.id.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Resolves and runs an interaction.
    pub fn interact(&mut self, interaction: Interaction) -> Result<InteractOutcome, ExecuteError> {
        let actor = interaction.actor;
        self.ensure_idle(actor)?;
        self.menus.remove(&actor);

        let env = env_of!(self);
        let picked = match action::resolve(&self.state, &env, &interaction) {
            Resolution::Merge(chosen) | Resolution::Auto(chosen) => {
                Picked::Run(chosen.handler_ref, chosen.binding)
            }
            Resolution::Menu(options) => Picked::Menu(
                options
                    .into_iter()
                    .map(|option| MenuEntry {
                        title: option.title().to_owned(),
                        handler_ref: option.handler_ref,
                        binding: option.binding,
                    })
                    .collect(),
            ),
            Resolution::None => Picked::Nothing,
        };

        let outcome = match picked {
            Picked::Run(handler_ref, binding) => self.run(handler_ref, binding),
            Picked::Menu(entries) => {
                let choices: Vec<ChoiceOption> = entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| ChoiceOption {
                        index,
                        handler: entry.handler_ref.clone(),
                        title: entry.title.clone(),
                    })
                    .collect();
                self.outbox.push(GameEvent::ChoicesOffered {
                    actor,
                    options: choices.iter().map(|c| c.handler.clone()).collect(),
                });
                self.menus.insert(actor, entries);
                Ok(InteractOutcome::Choices(choices))
            }
            Picked::Nothing => Ok(InteractOutcome::NoOp),
        };
        self.flush();
        outcome
    }

    /// Runs option `index` of the menu last offered to `actor`.
    pub fn choose(&mut self, actor: ActorId, index: usize) -> Result<InteractOutcome, ExecuteError> {
        self.ensure_idle(actor)?;
        let mut entries = self
            .menus
            .remove(&actor)
            .ok_or(ExecuteError::NoChoicePending(actor))?;
        if index >= entries.len() {
            self.menus.insert(actor, entries);
            return Err(ExecuteError::InvalidChoice { actor, index });
        }
        let entry = entries.swap_remove(index);
        let outcome = self.run(entry.handler_ref, entry.binding);
        self.flush();
        outcome
    }

    /// Crafts a recipe now, or schedules it when it takes time.
    pub fn craft(&mut self, actor: ActorId, recipe_id: &str) -> Result<CraftOutcome, ExecuteError> {
        self.ensure_idle(actor)?;

        let env = env_of!(self);
        let recipe = env
            .recipe(recipe_id)
            .ok_or_else(|| CraftError::UnknownRecipe(recipe_id.into()))?;

        if recipe.duration > 0.0 {
            craft::check_craft(&self.state, &env, actor, recipe)?;
            let pending = PendingAction::new(
                actor,
                recipe.title.clone(),
                ScheduledTask::Craft {
                    recipe: recipe.id.clone(),
                },
                self.state.play_time,
                recipe.duration,
            );
            let due = self.start(pending)?;
            self.flush();
            return Ok(CraftOutcome::Started { due });
        }

        let recipe = recipe.id.clone();
        let product = craft::craft_consume(&mut self.state, &env, actor, recipe.as_str())?;
        self.push_crafted(actor, recipe, product.clone());
        self.flush();
        Ok(CraftOutcome::Completed(product))
    }

    // Inventory management stays available while a timed action is pending.
    // Moving a stack the action is bound to cancels it; everything else the
    // action needs is checked again when it comes due.

    /// Equips the stack at `from`, swapping out whatever held the slot.
    pub fn equip(
        &mut self,
        actor: ActorId,
        from: &StackLocation,
    ) -> Result<EquipOutcome, ExecuteError> {
        let env = env_of!(self);
        let outcome = self.state.equip(env.items(), actor, from)?;
        let slot = match &outcome {
            EquipOutcome::Equipped { slot } | EquipOutcome::Swapped { slot, .. } => *slot,
        };
        self.clear_wield(actor, slot);
        self.stacks_moved([from.clone(), StackLocation::Equipment { actor, slot }]);
        Ok(outcome)
    }

    /// Puts the item in `slot` away into `to`.
    pub fn unequip(
        &mut self,
        actor: ActorId,
        slot: EquipSlot,
        to: &ContainerRef,
    ) -> Result<SlotIndex, ExecuteError> {
        let env = env_of!(self);
        let placed = self.state.unequip(env.items(), actor, slot, to)?;
        self.clear_wield(actor, slot);
        self.stacks_moved([StackLocation::Equipment { actor, slot }, to.at(placed)]);
        Ok(placed)
    }

    /// Moves `quantity` units (the whole stack when `None`) between slots.
    pub fn transfer(
        &mut self,
        from: &StackLocation,
        to: &StackLocation,
        quantity: Option<u32>,
    ) -> Result<TransferOutcome, ExecuteError> {
        let env = env_of!(self);
        let outcome = self.state.transfer(env.items(), from, to, quantity)?;
        self.stacks_moved([from.clone(), to.clone()]);
        Ok(outcome)
    }

    /// Moves a whole stack into the first place that takes it in `to`.
    pub fn quick_move(
        &mut self,
        from: &StackLocation,
        to: &ContainerRef,
    ) -> Result<SlotIndex, ExecuteError> {
        let env = env_of!(self);
        let placed = self.state.quick_move(env.items(), from, to)?;
        self.stacks_moved([from.clone(), to.at(placed)]);
        Ok(placed)
    }

    /// Splits `quantity` units off into an empty slot of the same container.
    pub fn split(
        &mut self,
        location: &StackLocation,
        quantity: u32,
    ) -> Result<SlotIndex, ExecuteError> {
        let placed = self.state.split(location, quantity)?;
        if let Some((container, _)) = location.container() {
            self.stacks_moved([location.clone(), container.at(placed)]);
        }
        Ok(placed)
    }

    /// Drops the stack, or `quantity` units of it, on the ground.
    pub fn drop_item(
        &mut self,
        location: &StackLocation,
        quantity: Option<u32>,
    ) -> Result<DropId, ExecuteError> {
        let drop = self.state.drop_item(location, quantity)?;
        self.stacks_moved([location.clone(), StackLocation::WorldDrop(drop)]);
        Ok(drop)
    }

    /// Picks a ground drop up into the actor's inventory.
    pub fn pick_up(&mut self, actor: ActorId, drop: DropId) -> Result<SlotIndex, ExecuteError> {
        let env = env_of!(self);
        let placed = self.state.pick_up(env.items(), actor, drop)?;
        self.stacks_moved([
            StackLocation::WorldDrop(drop),
            StackLocation::Inventory {
                actor,
                slot: placed,
            },
        ]);
        Ok(placed)
    }

    /// Cancels whatever the actor was doing. Movement interrupts actions.
    pub fn actor_moved(&mut self, actor: ActorId) -> bool {
        self.menus.remove(&actor);
        let cancelled = self.scheduler.cancel(actor, CancelReason::ActorMoved);
        self.reap_cancelled();
        self.flush();
        cancelled
    }

    /// The world removed an object: cancel actions on it and spill its storage.
    pub fn object_destroyed(&mut self, uid: &ObjectUid) -> usize {
        let cancelled = self
            .scheduler
            .cancel_where(CancelReason::TargetDestroyed, |pending| {
                pending.task.uses_object(uid)
            });
        let spilled = self.state.spill_storage(uid.as_str());
        if !spilled.is_empty() {
            tracing::debug!(%uid, stacks = spilled.len(), "storage spilled onto the ground");
        }
        self.push_changed(spilled.into_iter().map(StackLocation::WorldDrop));
        self.reap_cancelled();
        self.flush();
        cancelled
    }

    /// Cancels the actor's in-flight action on request.
    pub fn cancel(&mut self, actor: ActorId) -> bool {
        let cancelled = self.scheduler.cancel(actor, CancelReason::Requested);
        self.reap_cancelled();
        self.flush();
        cancelled
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Advances the session by `dt` real seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.state.play_time = self.state.play_time.after(dt);
        let now = self.state.play_time;

        for pending in self.scheduler.take_ready(now) {
            self.fire(pending);
        }

        let hours = self.config.game_hours(dt);
        let env = env_of!(self);
        for (location, outcome) in durability::apply_elapsed(&mut self.state, env.items(), hours) {
            self.scheduler
                .cancel_where(CancelReason::ToolBroke, |pending| {
                    pending.task.uses_stack(&location)
                });
            self.outbox
                .push(GameEvent::StackExhausted { location, outcome });
        }

        let drain = self.config.drain;
        let max = self.config.attribute_max;
        for actor in self.state.actors_mut() {
            actor.attributes.drain(&drain, hours, max);
        }

        self.expire_wielded(dt);
        self.reap_cancelled();
        self.flush();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_idle(&self, actor: ActorId) -> Result<(), ExecuteError> {
        if self.state.actor(actor).is_none() {
            return Err(ExecuteError::ActorNotFound(actor));
        }
        match self.scheduler.get(actor) {
            Some(pending) => Err(ExecuteError::ActorBusy {
                actor,
                label: pending.label.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Runs a validated handler now, or schedules it when it has a duration.
    fn run(
        &mut self,
        handler_ref: HandlerRef,
        binding: ActionBinding,
    ) -> Result<InteractOutcome, ExecuteError> {
        let env = env_of!(self);
        let handler = action::validate(&self.state, &env, &handler_ref, &binding)?;
        let duration = handler.duration();

        if duration > 0.0 {
            let pending = PendingAction::new(
                binding.actor,
                handler.title(),
                ScheduledTask::Action {
                    handler_ref: handler_ref.clone(),
                    binding,
                },
                self.state.play_time,
                duration,
            );
            let due = self.start(pending)?;
            return Ok(InteractOutcome::Started {
                handler: handler_ref,
                due,
            });
        }

        let events = action::do_action(&mut self.state, &env, &handler_ref, &binding)?;
        self.absorb(events);
        Ok(InteractOutcome::Completed {
            handler: handler_ref,
        })
    }

    fn start(&mut self, pending: PendingAction) -> Result<GameTime, ExecuteError> {
        let (actor, label, due) = (pending.actor, pending.label.clone(), pending.due);
        if let Err(rejected) = self.scheduler.schedule(pending) {
            return Err(ExecuteError::ActorBusy {
                actor,
                label: rejected.label,
            });
        }
        self.outbox
            .push(GameEvent::ActionStarted { actor, label, due });
        Ok(due)
    }

    /// Re-validates a due continuation and applies it.
    fn fire(&mut self, pending: PendingAction) {
        if let Some(reason) = pending.token.reason() {
            self.push_cancelled(&pending, reason);
            return;
        }

        match &pending.task {
            ScheduledTask::Action {
                handler_ref,
                binding,
            } => {
                let gone = [Some(&binding.source), binding.target.as_ref()]
                    .into_iter()
                    .flatten()
                    .filter_map(action::Operand::as_object)
                    .any(|object| self.world.object(&object.uid).is_none());
                if gone {
                    self.push_cancelled(&pending, CancelReason::TargetDestroyed);
                    return;
                }

                let env = env_of!(self);
                match action::do_action(&mut self.state, &env, handler_ref, binding) {
                    Ok(events) => self.absorb(events),
                    Err(err) => {
                        tracing::debug!(actor = %pending.actor, handler = %handler_ref, %err, "scheduled action no longer applies");
                        self.push_cancelled(&pending, CancelReason::Invalidated);
                    }
                }
            }
            ScheduledTask::Craft { recipe } => {
                let env = env_of!(self);
                match craft::craft_consume(&mut self.state, &env, pending.actor, recipe.as_str()) {
                    Ok(product) => self.push_crafted(pending.actor, recipe.clone(), product),
                    Err(err) => {
                        tracing::debug!(actor = %pending.actor, %recipe, %err, "scheduled craft no longer applies");
                        self.push_cancelled(&pending, CancelReason::Invalidated);
                    }
                }
            }
        }
    }

    /// Queues action events and cancels pending work they invalidate.
    fn absorb(&mut self, events: Vec<GameEvent>) {
        for event in &events {
            match event {
                GameEvent::StackExhausted { location, .. } => {
                    self.scheduler
                        .cancel_where(CancelReason::ToolBroke, |pending| {
                            pending.task.uses_stack(location)
                        });
                }
                GameEvent::RemoveObjectRequested { uid } => {
                    self.scheduler
                        .cancel_where(CancelReason::TargetDestroyed, |pending| {
                            pending.task.uses_object(uid)
                        });
                }
                _ => {}
            }
        }
        self.outbox.extend(events);
    }

    fn expire_wielded(&mut self, dt: f32) {
        let timeout = self.config.wield_timeout;
        let mut expired = Vec::new();
        for actor in self.state.actors_mut() {
            let Some(timer) = actor.wield.as_mut() else {
                continue;
            };
            let slot = timer.slot;
            if !actor.equipment.is_occupied(slot) {
                actor.wield = None;
                continue;
            }
            timer.idle += dt;
            if timer.idle >= timeout {
                expired.push((actor.id, slot));
            }
        }

        for (actor, slot) in expired {
            let env = env_of!(self);
            let equipped = StackLocation::Equipment { actor, slot };
            let destination = match self.state.unequip(
                env.items(),
                actor,
                slot,
                &ContainerRef::Inventory(actor),
            ) {
                Ok(placed) => Some(StackLocation::Inventory {
                    actor,
                    slot: placed,
                }),
                Err(_) => self
                    .state
                    .take_stack(&equipped)
                    .map(|stack| StackLocation::WorldDrop(self.state.drop_to_world(stack))),
            };
            self.clear_wield(actor, slot);
            tracing::debug!(%actor, %slot, ?destination, "wielded item put away");

            self.outbox.push(GameEvent::WieldExpired { actor, slot });
            self.push_changed(std::iter::once(equipped).chain(destination));
        }
    }

    fn clear_wield(&mut self, actor: ActorId, slot: EquipSlot) {
        if let Some(state) = self.state.actor_mut(actor)
            && state.wield.is_some_and(|timer| timer.slot == slot)
        {
            state.wield = None;
        }
    }

    fn reap_cancelled(&mut self) {
        for pending in self.scheduler.take_cancelled() {
            let reason = pending.token.reason().unwrap_or(CancelReason::Invalidated);
            self.push_cancelled(&pending, reason);
        }
    }

    fn push_cancelled(&mut self, pending: &PendingAction, reason: CancelReason) {
        tracing::debug!(actor = %pending.actor, label = %pending.label, %reason, "action cancelled");
        self.outbox.push(GameEvent::ActionCancelled {
            actor: pending.actor,
            label: pending.label.clone(),
            reason,
        });
    }

    fn push_crafted(&mut self, actor: ActorId, recipe: RecipeId, product: CraftProduct) {
        match &product {
            CraftProduct::Item { placement, .. } => {
                let location = match placement {
                    Placement::Inventory(slot) => StackLocation::Inventory {
                        actor,
                        slot: *slot,
                    },
                    Placement::Dropped(drop) => StackLocation::WorldDrop(*drop),
                };
                self.outbox.push(GameEvent::StackChanged { location });
            }
            CraftProduct::WorldObject { object } => {
                self.outbox.push(GameEvent::PlaceObjectRequested {
                    actor,
                    object: object.clone(),
                });
            }
            CraftProduct::Unlock { flag, newly_set } => {
                if *newly_set {
                    self.outbox
                        .push(GameEvent::Unlocked { flag: flag.clone() });
                }
            }
        }
        self.outbox.push(GameEvent::Crafted {
            actor,
            recipe,
            product,
        });
    }

    /// Publishes a manual stack move and cancels pending actions bound to
    /// any of the touched slots.
    fn stacks_moved(&mut self, locations: impl IntoIterator<Item = StackLocation>) {
        let locations: Vec<StackLocation> = locations.into_iter().collect();
        let cancelled = self
            .scheduler
            .cancel_where(CancelReason::Invalidated, |pending| {
                locations.iter().any(|location| pending.task.uses_stack(location))
            });
        if cancelled > 0 {
            tracing::debug!(cancelled, "stack moved out from under pending actions");
        }
        self.push_changed(locations);
        self.reap_cancelled();
        self.flush();
    }

    fn push_changed(&mut self, locations: impl IntoIterator<Item = StackLocation>) {
        self.outbox.extend(
            locations
                .into_iter()
                .map(|location| GameEvent::StackChanged { location }),
        );
    }

    /// Publishes queued events in the order they were produced.
    fn flush(&mut self) {
        let events = std::mem::take(&mut self.outbox);
        for event in &events {
            self.bus.publish(event);
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("play_time", &self.state.play_time)
            .field("pending", &self.scheduler.len())
            .field("subscribers", &self.bus.len())
            .finish_non_exhaustive()
    }
}
