//! Resolution of an interaction into at most one handler (or a menu).
//!
//! The order is fixed:
//!
//! 1. A merge handler on the primary item whose target groups intersect the
//!    target's tags, then the reverse direction (a merge handler on the target
//!    matching the primary's tags).
//! 2. An auto handler on the target.
//! 3. The precondition-satisfying self handlers of the target, in declaration
//!    order, as a menu. Without a target, the primary's self handlers.
//! 4. Nothing.

use super::{ActionBinding, ActionHandler, HandlerOwner, HandlerRef, Interaction, Operand};
use crate::env::GameEnv;
use crate::state::{ActorId, GroupTag, PlayerData};

/// Handler bound to concrete operands.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAction<'a> {
    pub handler_ref: HandlerRef,
    pub handler: &'a ActionHandler,
    pub binding: ActionBinding,
}

impl ResolvedAction<'_> {
    pub fn title(&self) -> &str {
        self.handler.title()
    }
}

/// Outcome of resolving one interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<'a> {
    Merge(ResolvedAction<'a>),
    Auto(ResolvedAction<'a>),
    /// Choice set for the UI, in declaration order.
    Menu(Vec<ResolvedAction<'a>>),
    None,
}

impl<'a> Resolution<'a> {
    /// The single handler chosen without player input, if any.
    pub fn chosen(&self) -> Option<&ResolvedAction<'a>> {
        match self {
            Self::Merge(action) | Self::Auto(action) => Some(action),
            Self::Menu(_) | Self::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Catalog view of one operand: owner id, tags, handlers.
pub(crate) struct Described<'a> {
    pub owner: HandlerOwner,
    pub groups: &'a [GroupTag],
    pub actions: &'a [ActionHandler],
}

/// Looks an operand up in the state and the catalog.
///
/// `None` when the stack is gone or the definition is unknown.
pub(crate) fn describe<'a>(
    state: &PlayerData,
    env: &GameEnv<'a>,
    operand: &Operand,
) -> Option<Described<'a>> {
    match operand {
        Operand::Stack(location) => {
            let stack = state.stack(location)?;
            let def = env.item(stack.item.as_str())?;
            Some(Described {
                owner: HandlerOwner::Item(def.id.clone()),
                groups: &def.groups,
                actions: &def.actions,
            })
        }
        Operand::Object(object) => {
            let def = env.object(object.definition.as_str())?;
            Some(Described {
                owner: HandlerOwner::Object(def.id.clone()),
                groups: &def.groups,
                actions: &def.actions,
            })
        }
    }
}

fn bind<'a>(
    owner: &Described<'a>,
    index: usize,
    handler: &'a ActionHandler,
    binding: ActionBinding,
) -> ResolvedAction<'a> {
    ResolvedAction {
        handler_ref: HandlerRef::new(owner.owner.clone(), index),
        handler,
        binding,
    }
}

fn conditions_hold(
    state: &PlayerData,
    env: &GameEnv<'_>,
    handler: &ActionHandler,
    binding: &ActionBinding,
) -> bool {
    handler
        .conditions()
        .iter()
        .all(|condition| condition.holds(state, env, binding))
}

/// First merge handler on `owner` that accepts `other`.
fn find_merge<'a>(
    state: &PlayerData,
    env: &GameEnv<'a>,
    actor: ActorId,
    owner: &Described<'a>,
    owner_operand: &Operand,
    other: &Described<'a>,
    other_operand: &Operand,
) -> Option<ResolvedAction<'a>> {
    owner.actions.iter().enumerate().find_map(|(index, handler)| {
        if !matches!(handler, ActionHandler::Merge(_))
            || !handler.matches_other(Some(other.groups))
        {
            return None;
        }
        let binding =
            ActionBinding::new(actor, owner_operand.clone(), Some(other_operand.clone()));
        conditions_hold(state, env, handler, &binding).then(|| bind(owner, index, handler, binding))
    })
}

/// Resolves an interaction. Read-only.
pub fn resolve<'a>(
    state: &PlayerData,
    env: &GameEnv<'a>,
    interaction: &Interaction,
) -> Resolution<'a> {
    let actor = interaction.actor;
    let primary_operand = interaction.primary.clone().map(Operand::Stack);
    let primary = match &primary_operand {
        Some(operand) => match describe(state, env, operand) {
            Some(described) => Some(described),
            None => {
                tracing::debug!(%actor, primary = %operand, "primary operand is empty or unknown");
                return Resolution::None;
            }
        },
        None => None,
    };
    let target = match &interaction.target {
        Some(operand) => match describe(state, env, operand) {
            Some(described) => Some(described),
            None => {
                tracing::debug!(%actor, target = %operand, "target operand is empty or unknown");
                return Resolution::None;
            }
        },
        None => None,
    };

    // 1. merge, primary's own handler first, then the reverse direction
    if let (Some(p), Some(p_op), Some(t), Some(t_op)) = (
        primary.as_ref(),
        primary_operand.as_ref(),
        target.as_ref(),
        interaction.target.as_ref(),
    ) {
        if let Some(action) = find_merge(state, env, actor, p, p_op, t, t_op) {
            tracing::debug!(%actor, handler = %action.handler_ref, "resolved merge");
            return Resolution::Merge(action);
        }
        if let Some(action) = find_merge(state, env, actor, t, t_op, p, p_op) {
            tracing::debug!(%actor, handler = %action.handler_ref, "resolved reverse merge");
            return Resolution::Merge(action);
        }
    }

    // 2. auto handler on the target
    if let (Some(t), Some(t_op)) = (target.as_ref(), interaction.target.as_ref()) {
        let auto = t.actions.iter().enumerate().find_map(|(index, handler)| {
            if !matches!(handler, ActionHandler::Auto(_))
                || !handler.matches_other(primary.as_ref().map(|p| p.groups))
            {
                return None;
            }
            let binding = ActionBinding::new(actor, t_op.clone(), primary_operand.clone());
            conditions_hold(state, env, handler, &binding)
                .then(|| bind(t, index, handler, binding))
        });
        if let Some(action) = auto {
            tracing::debug!(%actor, handler = %action.handler_ref, "resolved auto");
            return Resolution::Auto(action);
        }
    }

    // 3. menu of self handlers
    let menu_owner = match (target.as_ref(), interaction.target.as_ref()) {
        (Some(t), Some(t_op)) => Some((t, t_op)),
        _ => primary.as_ref().zip(primary_operand.as_ref()),
    };
    if let Some((owner, operand)) = menu_owner {
        let options: Vec<_> = owner
            .actions
            .iter()
            .enumerate()
            .filter(|(_, handler)| matches!(handler, ActionHandler::SelfAction(_)))
            .filter_map(|(index, handler)| {
                let binding = ActionBinding::new(actor, operand.clone(), None);
                conditions_hold(state, env, handler, &binding)
                    .then(|| bind(owner, index, handler, binding))
            })
            .collect();
        if !options.is_empty() {
            tracing::debug!(%actor, options = options.len(), "resolved menu");
            return Resolution::Menu(options);
        }
    }

    // 4. no-op
    tracing::debug!(%actor, "interaction resolved to nothing");
    Resolution::None
}
