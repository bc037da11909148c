//! Durability decay and exhaustion.
//!
//! A stack decays only when its item's policy is active and the trigger
//! matches that policy. Usage decrements happen synchronously with the action
//! that caused them; time-based decrements are `rate * elapsed_game_hours`, so
//! the result does not depend on how the elapsed time was sliced into ticks.

use crate::env::{DurabilityPolicy, DurabilitySpec, ExhaustBehavior, ItemOracle};
use crate::state::{ContainerError, ItemId, ItemStack, Placement, PlayerData, StackLocation};

/// What caused a durability decrement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum DecayTrigger {
    /// One discrete use (strike, dig, chop).
    Use,
    /// Time spent in an equipment slot.
    EquippedTime,
    /// Time passing, wherever the stack is.
    Elapsed,
}

impl DecayTrigger {
    pub fn applies_to(self, policy: DurabilityPolicy) -> bool {
        matches!(
            (self, policy),
            (Self::Use, DurabilityPolicy::UsageCount)
                | (Self::EquippedTime, DurabilityPolicy::UsageTime)
                | (Self::Elapsed, DurabilityPolicy::Spoilage)
        )
    }
}

/// Effect of a single decrement on one stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecayOutcome {
    /// Policy inactive or trigger mismatch.
    Unaffected,
    Decayed { remaining: f32 },
    /// Durability just reached zero.
    Exhausted,
}

/// Applies one decrement, flooring durability at zero.
///
/// `Exhausted` is reported only on the step that crosses zero, so callers
/// never see the same exhaustion twice.
pub fn decrement(
    stack: &mut ItemStack,
    spec: &DurabilitySpec,
    trigger: DecayTrigger,
    amount: f32,
) -> DecayOutcome {
    if !spec.is_active() || !trigger.applies_to(spec.policy) || amount <= 0.0 {
        return DecayOutcome::Unaffected;
    }
    let was_alive = stack.durability > 0.0;
    stack.durability = (stack.durability - amount).max(0.0);
    if was_alive && stack.durability <= 0.0 {
        DecayOutcome::Exhausted
    } else {
        DecayOutcome::Decayed {
            remaining: stack.durability,
        }
    }
}

/// True when an active-policy stack has no durability left.
pub fn is_exhausted(stack: &ItemStack, spec: &DurabilitySpec) -> bool {
    spec.is_active() && stack.durability <= 0.0
}

/// What happened to an exhausted stack.
#[derive(Clone, Debug, PartialEq)]
pub enum Exhaustion {
    Destroyed {
        item: ItemId,
        quantity: u32,
    },
    /// Converted in place, or moved when the new form cannot stay where it was.
    Reverted {
        from: ItemId,
        into: ItemId,
        quantity: u32,
        placement: Option<Placement>,
    },
}

/// Destroys or reverts the exhausted stack at `location`.
///
/// Returns `None` when the location holds nothing exhausted, which makes the
/// call idempotent.
pub fn resolve_exhaustion(
    state: &mut PlayerData,
    items: &dyn ItemOracle,
    location: &StackLocation,
) -> Result<Option<Exhaustion>, ContainerError> {
    let Some(stack) = state.stack(location).cloned() else {
        return Ok(None);
    };
    let Some(def) = items.definition(stack.item.as_str()) else {
        tracing::warn!(item = %stack.item, %location, "cannot resolve exhaustion of unknown item");
        return Ok(None);
    };
    if !is_exhausted(&stack, &def.durability) {
        return Ok(None);
    }

    let empty_form = match def.durability.on_exhausted {
        ExhaustBehavior::Destroy => None,
        ExhaustBehavior::RevertToEmptyForm => {
            let empty = def
                .links
                .empty_form
                .as_ref()
                .and_then(|id| items.definition(id.as_str()));
            if empty.is_none() {
                tracing::warn!(item = %stack.item, "revert requested but empty form is missing; destroying");
            }
            empty
        }
    };

    let Some(empty) = empty_form else {
        state.take_stack(location);
        tracing::debug!(item = %stack.item, quantity = stack.quantity, %location, "stack exhausted and destroyed");
        return Ok(Some(Exhaustion::Destroyed {
            item: stack.item,
            quantity: stack.quantity,
        }));
    };

    let durability = empty.initial_durability();
    let stays_in_place = match location {
        StackLocation::Equipment { slot, .. } => empty.equip_slot == Some(*slot),
        _ => true,
    };

    // Units beyond the empty form's stack cap never stay in the slot.
    let kept = if stays_in_place {
        stack.quantity.min(empty.max_stack)
    } else {
        0
    };
    if kept > 0 {
        state.replace_stack(location, ItemStack::new(empty.id.clone(), kept, durability));
    } else {
        state.take_stack(location);
    }

    let rest = stack.quantity - kept;
    let placement = if rest == 0 {
        None
    } else {
        Some(match location.owner() {
            Some(owner) => state.give_or_drop(owner, empty, rest, durability)?,
            None => Placement::Dropped(
                state.drop_to_world(ItemStack::new(empty.id.clone(), rest, durability)),
            ),
        })
    };

    tracing::debug!(from = %stack.item, into = %empty.id, %location, "stack exhausted and reverted");
    Ok(Some(Exhaustion::Reverted {
        from: stack.item,
        into: empty.id.clone(),
        quantity: stack.quantity,
        placement,
    }))
}

/// Applies one usage decrement to the stack at `location`.
///
/// Resolves exhaustion immediately when the use wore the stack out.
pub fn use_stack(
    state: &mut PlayerData,
    items: &dyn ItemOracle,
    location: &StackLocation,
    amount: f32,
) -> Result<Option<Exhaustion>, ContainerError> {
    let Some(stack) = state.stack_mut(location) else {
        return Err(ContainerError::SlotEmpty(location.clone()));
    };
    let Some(def) = items.definition(stack.item.as_str()) else {
        return Err(ContainerError::UnknownItem(stack.item.clone()));
    };
    match decrement(stack, &def.durability, DecayTrigger::Use, amount) {
        DecayOutcome::Exhausted => resolve_exhaustion(state, items, location),
        _ => Ok(None),
    }
}

/// Advances time-based decay by `hours` of game time across the whole state.
///
/// Spoilage applies everywhere, including world drops. Usage-time decay only
/// applies to stacks sitting in an equipment slot.
pub fn apply_elapsed(
    state: &mut PlayerData,
    items: &dyn ItemOracle,
    hours: f64,
) -> Vec<(StackLocation, Exhaustion)> {
    let mut exhausted = Vec::new();

    for location in state.locations() {
        let Some(stack) = state.stack_mut(&location) else {
            continue;
        };
        let Some(def) = items.definition(stack.item.as_str()) else {
            continue;
        };
        let trigger = match (&location, def.durability.policy) {
            (_, DurabilityPolicy::Spoilage) => DecayTrigger::Elapsed,
            (StackLocation::Equipment { .. }, DurabilityPolicy::UsageTime) => {
                DecayTrigger::EquippedTime
            }
            _ => continue,
        };
        let amount = (f64::from(def.durability.rate_per_hour) * hours) as f32;
        decrement(stack, &def.durability, trigger, amount);
        if is_exhausted(stack, &def.durability) {
            exhausted.push(location);
        }
    }

    let mut resolved = Vec::new();
    for location in exhausted {
        match resolve_exhaustion(state, items, &location) {
            Ok(Some(outcome)) => resolved.push((location, outcome)),
            Ok(None) => {}
            Err(err) => tracing::warn!(%location, %err, "failed to resolve exhausted stack"),
        }
    }
    resolved
}
