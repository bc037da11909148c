//! Handler data attached to item and world-object definitions.
//!
//! Handlers are plain data: conditions to check and effects to apply. They
//! never hold mutable state and never call back into the resolver.

use super::{ActionEffect, Condition};
use crate::state::GroupTag;

/// Shape of a handler, used for dispatch by pattern match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HandlerKind {
    SelfAction,
    Merge,
    Auto,
}

/// Action attached to an item or world-object definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionHandler {
    /// Operates on its owner alone (eat, open, read).
    SelfAction(SelfAction),
    /// Operates on its owner plus another item or object carrying one of `target_groups`.
    Merge(MergeAction),
    /// Merge-shaped handler that fires without an explicit menu choice.
    Auto(MergeAction),
}

impl ActionHandler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::SelfAction(_) => HandlerKind::SelfAction,
            Self::Merge(_) => HandlerKind::Merge,
            Self::Auto(_) => HandlerKind::Auto,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::SelfAction(a) => &a.id,
            Self::Merge(a) | Self::Auto(a) => &a.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::SelfAction(a) => &a.title,
            Self::Merge(a) | Self::Auto(a) => &a.title,
        }
    }

    /// Groups the other side must carry. Empty for self handlers.
    pub fn target_groups(&self) -> &[GroupTag] {
        match self {
            Self::SelfAction(_) => &[],
            Self::Merge(a) | Self::Auto(a) => &a.target_groups,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        match self {
            Self::SelfAction(a) => &a.conditions,
            Self::Merge(a) | Self::Auto(a) => &a.conditions,
        }
    }

    pub fn effects(&self) -> &[ActionEffect] {
        match self {
            Self::SelfAction(a) => &a.effects,
            Self::Merge(a) | Self::Auto(a) => &a.effects,
        }
    }

    /// Seconds before the effects apply. Zero runs immediately.
    pub fn duration(&self) -> f32 {
        match self {
            Self::SelfAction(a) => a.duration,
            Self::Merge(a) | Self::Auto(a) => a.duration,
        }
    }

    /// Structural precondition of merge-shaped handlers: the other side carries
    /// at least one target group.
    ///
    /// An auto handler with no target groups matches anything, including no other side.
    pub fn matches_other(&self, other: Option<&[GroupTag]>) -> bool {
        match self {
            Self::SelfAction(_) => other.is_none(),
            Self::Merge(a) => other.is_some_and(|tags| a.intersects(tags)),
            Self::Auto(a) if a.target_groups.is_empty() => true,
            Self::Auto(a) => other.is_some_and(|tags| a.intersects(tags)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelfAction {
    pub id: String,
    pub title: String,
    pub conditions: Vec<Condition>,
    pub effects: Vec<ActionEffect>,
    pub duration: f32,
}

impl SelfAction {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            ..Self::default()
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn then(mut self, effect: ActionEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn taking(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn into_handler(self) -> ActionHandler {
        ActionHandler::SelfAction(self)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeAction {
    pub id: String,
    pub title: String,
    pub target_groups: Vec<GroupTag>,
    pub conditions: Vec<Condition>,
    pub effects: Vec<ActionEffect>,
    pub duration: f32,
}

impl MergeAction {
    pub fn new<I, T>(id: impl Into<String>, target_groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<GroupTag>,
    {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            target_groups: target_groups.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn then(mut self, effect: ActionEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn taking(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn intersects(&self, tags: &[GroupTag]) -> bool {
        self.target_groups.iter().any(|group| tags.contains(group))
    }

    pub fn into_merge(self) -> ActionHandler {
        ActionHandler::Merge(self)
    }

    pub fn into_auto(self) -> ActionHandler {
        ActionHandler::Auto(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_requires_intersecting_tags() {
        let handler = MergeAction::new("cut", ["coconut", "fruit"]).into_merge();
        let tags = [GroupTag::from("fruit")];

        assert!(handler.matches_other(Some(&tags)));
        assert!(!handler.matches_other(Some(&[GroupTag::from("stone")])));
        assert!(!handler.matches_other(None));
    }

    #[test]
    fn auto_without_groups_matches_anything() {
        let handler = MergeAction::new("pick_up", Vec::<GroupTag>::new()).into_auto();
        assert!(handler.matches_other(None));
        assert!(handler.matches_other(Some(&[GroupTag::from("anything")])));
        assert_eq!(handler.kind(), HandlerKind::Auto);
    }
}
