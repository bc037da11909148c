//! Scheduled continuations for actions that take game time.
//!
//! Each actor has at most one in-flight action. The continuation sits in the
//! table until its due time; the engine drains due entries once per tick and
//! re-validates them before they fire.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::action::{ActionBinding, HandlerRef};
use crate::state::{ActorId, GameTime, ObjectUid, RecipeId, StackLocation};

/// Why a scheduled action did not fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CancelReason {
    ActorMoved,
    TargetDestroyed,
    ToolBroke,
    /// Conditions, operands or costs no longer hold when the action came due.
    Invalidated,
    /// Cancelled by the actor (or its controller).
    Requested,
}

/// Shared cancellation flag. The first reason recorded wins.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<OnceLock<CancelReason>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `reason`. Returns false when the token was already cancelled.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        self.0.set(reason).is_ok()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        self.0.get().copied()
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Work to perform once the action comes due.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduledTask {
    Action {
        handler_ref: HandlerRef,
        binding: ActionBinding,
    },
    Craft { recipe: RecipeId },
}

impl ScheduledTask {
    pub fn uses_stack(&self, location: &StackLocation) -> bool {
        match self {
            Self::Action { binding, .. } => binding.stacks().any(|stack| stack == location),
            Self::Craft { .. } => false,
        }
    }

    pub fn uses_object(&self, uid: &ObjectUid) -> bool {
        match self {
            Self::Action { binding, .. } => binding.refers_to_object(uid),
            Self::Craft { .. } => false,
        }
    }
}

/// One in-flight action.
#[derive(Clone, Debug)]
pub struct PendingAction {
    pub actor: ActorId,
    /// Handler or recipe title, for progress display.
    pub label: String,
    pub task: ScheduledTask,
    pub started: GameTime,
    pub due: GameTime,
    pub token: CancelToken,
}

impl PendingAction {
    pub fn new(
        actor: ActorId,
        label: impl Into<String>,
        task: ScheduledTask,
        started: GameTime,
        duration: f32,
    ) -> Self {
        Self {
            actor,
            label: label.into(),
            task,
            started,
            due: started.after(duration),
            token: CancelToken::new(),
        }
    }

    /// Completed fraction in `[0, 1]` at `now`.
    pub fn progress(&self, now: GameTime) -> f32 {
        let total = self.due.seconds() - self.started.seconds();
        if total <= 0.0 {
            return 1.0;
        }
        ((now.seconds() - self.started.seconds()) / total).clamp(0.0, 1.0) as f32
    }

    pub fn is_due(&self, now: GameTime) -> bool {
        self.due.seconds() <= now.seconds()
    }
}

/// Continuation table keyed by actor.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: BTreeMap<ActorId, PendingAction>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, actor: ActorId) -> bool {
        self.pending.contains_key(&actor)
    }

    pub fn get(&self, actor: ActorId) -> Option<&PendingAction> {
        self.pending.get(&actor)
    }

    /// Adds a continuation. A busy actor keeps its current action and the new
    /// one is handed back.
    pub fn schedule(&mut self, action: PendingAction) -> Result<CancelToken, PendingAction> {
        if self.is_busy(action.actor) {
            return Err(action);
        }
        let token = action.token.clone();
        tracing::debug!(actor = %action.actor, label = %action.label, due = ?action.due, "scheduled");
        self.pending.insert(action.actor, action);
        Ok(token)
    }

    /// Marks the actor's pending action cancelled. It leaves the table on the
    /// next [`Scheduler::take_ready`].
    pub fn cancel(&mut self, actor: ActorId, reason: CancelReason) -> bool {
        self.pending
            .get(&actor)
            .is_some_and(|action| action.token.cancel(reason))
    }

    /// Cancels every pending action matching `predicate`. Returns how many
    /// were newly cancelled.
    pub fn cancel_where<F>(&mut self, reason: CancelReason, mut predicate: F) -> usize
    where
        F: FnMut(&PendingAction) -> bool,
    {
        self.pending
            .values()
            .filter(|action| predicate(*action))
            .filter(|action| action.token.cancel(reason))
            .count()
    }

    /// Removes and returns every cancelled or due action, ordered by due time
    /// and then by actor.
    pub fn take_ready(&mut self, now: GameTime) -> Vec<PendingAction> {
        let ready: Vec<ActorId> = self
            .pending
            .values()
            .filter(|action| action.token.is_cancelled() || action.is_due(now))
            .map(|action| action.actor)
            .collect();
        let mut taken: Vec<PendingAction> = ready
            .into_iter()
            .filter_map(|actor| self.pending.remove(&actor))
            .collect();
        taken.sort_by(|a, b| {
            a.due
                .seconds()
                .total_cmp(&b.due.seconds())
                .then(a.actor.cmp(&b.actor))
        });
        taken
    }

    /// Removes and returns every cancelled action, leaving due ones in place.
    pub fn take_cancelled(&mut self) -> Vec<PendingAction> {
        let cancelled: Vec<ActorId> = self
            .pending
            .values()
            .filter(|action| action.token.is_cancelled())
            .map(|action| action.actor)
            .collect();
        cancelled
            .into_iter()
            .filter_map(|actor| self.pending.remove(&actor))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingAction> {
        self.pending.values()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
