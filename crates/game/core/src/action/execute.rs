//! Validation and execution of resolved handlers.
//!
//! [`can_do_action`] is pure and total. [`do_action`] re-validates, then
//! applies every effect inside one state transaction: consumption and
//! production commit together or not at all.

use super::resolve::describe;
use super::{
    ActionBinding, ActionEffect, ActionError, ActionHandler, HandlerRef, ObjectLink, Operand,
};
use crate::durability;
use crate::env::GameEnv;
use crate::events::GameEvent;
use crate::state::{
    ActorId, ContainerError, EquipOutcome, ItemId, ItemStack, PlayerData, StackLocation,
    WieldTimer,
};

/// True when the handler may run against `binding` right now.
pub fn can_do_action(
    state: &PlayerData,
    env: &GameEnv<'_>,
    handler: &HandlerRef,
    binding: &ActionBinding,
) -> bool {
    validate(state, env, handler, binding).is_ok()
}

/// Checks operands, target groups, conditions and consumption amounts.
pub fn validate<'a>(
    state: &PlayerData,
    env: &GameEnv<'a>,
    handler_ref: &HandlerRef,
    binding: &ActionBinding,
) -> Result<&'a ActionHandler, ActionError> {
    let handler = env
        .handler(handler_ref)
        .ok_or_else(|| ActionError::UnknownHandler(handler_ref.clone()))?;
    let not_applicable = || ActionError::NotApplicable(handler_ref.clone());

    let source = describe(state, env, &binding.source).ok_or_else(not_applicable)?;
    if source.owner != handler_ref.owner {
        return Err(not_applicable());
    }
    let other = match &binding.target {
        Some(operand) => Some(describe(state, env, operand).ok_or_else(not_applicable)?),
        None => None,
    };
    if !handler.matches_other(other.as_ref().map(|o| o.groups)) {
        return Err(not_applicable());
    }
    if !handler
        .conditions()
        .iter()
        .all(|condition| condition.holds(state, env, binding))
    {
        return Err(not_applicable());
    }

    let source_need = handler
        .effects()
        .iter()
        .fold(0u32, |total, e| total.saturating_add(e.source_consumption()));
    check_quantity(state, Some(&binding.source), source_need, "source")?;
    let target_need = handler
        .effects()
        .iter()
        .fold(0u32, |total, e| total.saturating_add(e.target_consumption()));
    check_quantity(state, binding.target.as_ref(), target_need, "target")?;

    Ok(handler)
}

fn check_quantity(
    state: &PlayerData,
    operand: Option<&Operand>,
    required: u32,
    side: &'static str,
) -> Result<(), ActionError> {
    if required == 0 {
        return Ok(());
    }
    let available = operand
        .and_then(Operand::as_stack)
        .and_then(|location| state.stack(location))
        .map_or(0, |stack| stack.quantity);
    if available < required {
        return Err(ActionError::InsufficientQuantity {
            side,
            required,
            available,
        });
    }
    Ok(())
}

/// Runs a handler. Returns the events it produced, led by `ActionResolved`.
pub fn do_action(
    state: &mut PlayerData,
    env: &GameEnv<'_>,
    handler_ref: &HandlerRef,
    binding: &ActionBinding,
) -> Result<Vec<GameEvent>, ActionError> {
    let handler = validate(state, env, handler_ref, binding)?;
    // Earlier effects may empty the source slot; later ones still need its item.
    let source_item = binding
        .source
        .as_stack()
        .and_then(|location| state.stack(location))
        .map(|stack| stack.item.clone());

    let effects = state.transaction(|tx| {
        let mut events = Vec::new();
        for effect in handler.effects() {
            apply_effect(tx, env, binding, source_item.as_ref(), effect, &mut events)?;
        }
        Ok::<_, ActionError>(events)
    })?;

    tracing::debug!(
        actor = %binding.actor,
        handler = %handler_ref,
        id = handler.id(),
        effects = effects.len(),
        "action applied"
    );

    let mut events = Vec::with_capacity(effects.len() + 1);
    events.push(GameEvent::ActionResolved {
        actor: binding.actor,
        handler: handler_ref.clone(),
        kind: handler.kind(),
    });
    events.extend(effects);
    Ok(events)
}

fn stack_of<'b>(
    operand: Option<&'b Operand>,
    effect: &ActionEffect,
    needs: &'static str,
) -> Result<&'b StackLocation, ActionError> {
    operand
        .and_then(Operand::as_stack)
        .ok_or_else(|| ActionError::MissingOperand {
            effect: effect.into(),
            needs,
        })
}

fn apply_effect(
    tx: &mut PlayerData,
    env: &GameEnv<'_>,
    binding: &ActionBinding,
    source_item: Option<&ItemId>,
    effect: &ActionEffect,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    let actor = binding.actor;
    let source = Some(&binding.source);
    let target = binding.target.as_ref();

    match effect {
        ActionEffect::ConsumeSource { quantity } => {
            let location = stack_of(source, effect, "a source stack")?;
            consume(tx, location, *quantity, "source", events)
        }
        ActionEffect::ConsumeTarget { quantity } => {
            let location = stack_of(target, effect, "a target stack")?;
            consume(tx, location, *quantity, "target", events)
        }
        ActionEffect::ConvertSource { into } => {
            let location = stack_of(source, effect, "a source stack")?;
            convert(tx, env, binding, location, into, events)
        }
        ActionEffect::ConvertTarget { into } => {
            let location = stack_of(target, effect, "a target stack")?;
            convert(tx, env, binding, location, into, events)
        }
        ActionEffect::Produce { item, quantity } => {
            let def = env
                .item(item.as_str())
                .ok_or_else(|| ActionError::UnknownItem(item.clone()))?;
            let placement = tx.give_or_drop(actor, def, *quantity, def.initial_durability())?;
            events.push(GameEvent::ItemProduced {
                actor,
                item: item.clone(),
                quantity: *quantity,
                placement,
            });
            Ok(())
        }
        ActionEffect::UseSource => {
            let location = stack_of(source, effect, "a source stack")?;
            use_once(tx, env, location, events)
        }
        ActionEffect::UseTarget => {
            let location = stack_of(target, effect, "a target stack")?;
            use_once(tx, env, location, events)
        }
        ActionEffect::RestoreAttribute { attribute, amount } => {
            let max = env.config().attribute_max;
            let value = tx
                .require_actor_mut(actor)?
                .attributes
                .adjust(*attribute, *amount, max);
            events.push(GameEvent::AttributeChanged {
                actor,
                attribute: *attribute,
                value,
            });
            Ok(())
        }
        ActionEffect::Unlock(flag) => {
            if tx.unlock(flag.clone()) {
                events.push(GameEvent::Unlocked { flag: flag.clone() });
            }
            Ok(())
        }
        ActionEffect::EquipSource => {
            let location = stack_of(source, effect, "a source stack")?;
            let outcome = tx.equip(env.items(), actor, location)?;
            push_equip_events(actor, location, &outcome, events);
            Ok(())
        }
        ActionEffect::WieldSource => {
            let location = stack_of(source, effect, "a source stack")?;
            let slot = match location {
                StackLocation::Equipment { slot, .. } => *slot,
                _ => {
                    let outcome = tx.equip(env.items(), actor, location)?;
                    push_equip_events(actor, location, &outcome, events);
                    match outcome {
                        EquipOutcome::Equipped { slot } | EquipOutcome::Swapped { slot, .. } => {
                            slot
                        }
                    }
                }
            };
            tx.require_actor_mut(actor)?.wield = Some(WieldTimer::new(slot));
            Ok(())
        }
        ActionEffect::PickUpSource => {
            let location = stack_of(source, effect, "a source stack")?;
            pick_up(tx, env, binding, location, events)
        }
        ActionEffect::PickUpTarget => {
            let location = stack_of(target, effect, "a target stack")?;
            pick_up(tx, env, binding, location, events)
        }
        ActionEffect::OpenStorage => {
            let object = binding.object().ok_or(ActionError::MissingOperand {
                effect: effect.into(),
                needs: "a world object",
            })?;
            let slots = env
                .object(object.definition.as_str())
                .and_then(|def| def.storage_slots)
                .ok_or(ActionError::NoStorage)?;
            let capacity = env.config().storage_capacity(Some(slots));
            tx.open_storage(&object.uid, capacity);
            events.push(GameEvent::StorageOpened {
                actor,
                uid: object.uid.clone(),
            });
            Ok(())
        }
        ActionEffect::RemoveObject => {
            let object = binding.object().ok_or(ActionError::MissingOperand {
                effect: effect.into(),
                needs: "a world object",
            })?;
            for drop in tx.spill_storage(object.uid.as_str()) {
                events.push(GameEvent::StackChanged {
                    location: StackLocation::WorldDrop(drop),
                });
            }
            events.push(GameEvent::RemoveObjectRequested {
                uid: object.uid.clone(),
            });
            Ok(())
        }
        ActionEffect::PlaceObject { object } => {
            events.push(GameEvent::PlaceObjectRequested {
                actor,
                object: object.clone(),
            });
            Ok(())
        }
        ActionEffect::PlaceLinked(link) => {
            let location = stack_of(source, effect, "a source stack")?;
            let item = source_item
                .cloned()
                .ok_or_else(|| ContainerError::SlotEmpty(location.clone()))?;
            let def = env
                .item(item.as_str())
                .ok_or_else(|| ActionError::UnknownItem(item.clone()))?;
            let linked = match link {
                ObjectLink::Sowable => def.links.sowable.clone(),
                ObjectLink::Buildable => def.links.buildable.clone(),
            };
            let object = linked.ok_or(ActionError::NoLinkedObject(item))?;
            events.push(GameEvent::PlaceObjectRequested { actor, object });
            Ok(())
        }
        ActionEffect::AddCounter { key, amount } => {
            let value = tx.add_counter(key, *amount);
            events.push(GameEvent::CounterChanged {
                key: key.clone(),
                value,
            });
            Ok(())
        }
    }
}

fn consume(
    tx: &mut PlayerData,
    location: &StackLocation,
    quantity: u32,
    side: &'static str,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    let available = tx.stack(location).map_or(0, |stack| stack.quantity);
    if available < quantity {
        return Err(ActionError::InsufficientQuantity {
            side,
            required: quantity,
            available,
        });
    }
    tx.remove_at(location, quantity);
    events.push(GameEvent::StackChanged {
        location: location.clone(),
    });
    Ok(())
}

/// Converts a stack in place when the new item fits there, otherwise moves it
/// to the actor's inventory (or the ground).
fn convert(
    tx: &mut PlayerData,
    env: &GameEnv<'_>,
    binding: &ActionBinding,
    location: &StackLocation,
    into: &ItemId,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    let def = env
        .item(into.as_str())
        .ok_or_else(|| ActionError::UnknownItem(into.clone()))?;
    let stack = tx
        .stack(location)
        .cloned()
        .ok_or_else(|| ContainerError::SlotEmpty(location.clone()))?;
    let durability = def.initial_durability();
    let fits_in_place = stack.quantity <= def.max_stack
        && match location {
            StackLocation::Equipment { slot, .. } => def.equip_slot == Some(*slot),
            _ => true,
        };

    events.push(GameEvent::StackChanged {
        location: location.clone(),
    });
    if fits_in_place {
        tx.replace_stack(location, ItemStack::new(def.id.clone(), stack.quantity, durability));
    } else {
        tx.take_stack(location);
        let placement = tx.give_or_drop(binding.actor, def, stack.quantity, durability)?;
        events.push(GameEvent::ItemProduced {
            actor: binding.actor,
            item: def.id.clone(),
            quantity: stack.quantity,
            placement,
        });
    }
    Ok(())
}

fn use_once(
    tx: &mut PlayerData,
    env: &GameEnv<'_>,
    location: &StackLocation,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    if let StackLocation::Equipment { actor, slot } = location
        && let Some(state) = tx.actor_mut(*actor)
    {
        state.touch_wield(*slot);
    }
    match durability::use_stack(tx, env.items(), location, 1.0)? {
        Some(outcome) => events.push(GameEvent::StackExhausted {
            location: location.clone(),
            outcome,
        }),
        None => events.push(GameEvent::StackChanged {
            location: location.clone(),
        }),
    }
    Ok(())
}

fn pick_up(
    tx: &mut PlayerData,
    env: &GameEnv<'_>,
    binding: &ActionBinding,
    location: &StackLocation,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    let StackLocation::WorldDrop(drop) = location else {
        return Err(ContainerError::InvalidLocation(location.clone()).into());
    };
    let slot = tx.pick_up(env.items(), binding.actor, *drop)?;
    events.push(GameEvent::StackChanged {
        location: location.clone(),
    });
    events.push(GameEvent::StackChanged {
        location: StackLocation::Inventory {
            actor: binding.actor,
            slot,
        },
    });
    Ok(())
}

fn push_equip_events(
    actor: ActorId,
    source: &StackLocation,
    outcome: &EquipOutcome,
    events: &mut Vec<GameEvent>,
) {
    let slot = match outcome {
        EquipOutcome::Equipped { slot } | EquipOutcome::Swapped { slot, .. } => *slot,
    };
    events.push(GameEvent::StackChanged {
        location: source.clone(),
    });
    events.push(GameEvent::StackChanged {
        location: StackLocation::Equipment { actor, slot },
    });
}
