use std::sync::{PoisonError, RwLock};

use crate::action::ActionHandler;
use crate::state::{ActorId, GroupTag, ObjectDefId, ObjectUid};

/// Read access to world-object definitions.
pub trait ObjectOracle: Send + Sync {
    fn object_definition(&self, id: &str) -> Option<&WorldObjectDefinition>;
}

/// Static description of something placed in the world (tree, campfire, chest).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldObjectDefinition {
    pub id: ObjectDefId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<GroupTag>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<ActionHandler>,
    /// Slot count of the storage container owned by each placed instance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub storage_slots: Option<u16>,
}

impl WorldObjectDefinition {
    pub fn new(id: impl Into<ObjectDefId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            groups: Vec::new(),
            actions: Vec::new(),
            storage_slots: None,
        }
    }

    pub fn with_groups<I, T>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<GroupTag>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action(mut self, handler: ActionHandler) -> Self {
        self.actions.push(handler);
        self
    }

    pub fn with_storage(mut self, slots: u16) -> Self {
        self.storage_slots = Some(slots);
        self
    }
}

/// A placed world object as reported by the world collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldObjectRef {
    pub uid: ObjectUid,
    pub definition: ObjectDefId,
}

impl WorldObjectRef {
    pub fn new(uid: impl Into<ObjectUid>, definition: impl Into<ObjectDefId>) -> Self {
        Self {
            uid: uid.into(),
            definition: definition.into(),
        }
    }
}

/// Spatial queries answered by the world/physics collaborator.
///
/// The core never searches space itself; it only asks this oracle.
pub trait WorldOracle: Send + Sync {
    /// Nearest placed object carrying `group` within `range` of the actor.
    fn nearest_with_group(
        &self,
        actor: ActorId,
        group: &GroupTag,
        range: f32,
    ) -> Option<WorldObjectRef>;

    /// The placed object with this uid, if it still exists.
    fn object(&self, uid: &ObjectUid) -> Option<WorldObjectRef>;
}

/// World with nothing in it. Every proximity query fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyWorld;

impl WorldOracle for EmptyWorld {
    fn nearest_with_group(&self, _: ActorId, _: &GroupTag, _: f32) -> Option<WorldObjectRef> {
        None
    }

    fn object(&self, _: &ObjectUid) -> Option<WorldObjectRef> {
        None
    }
}

#[derive(Clone, Debug)]
struct Placed {
    object: WorldObjectRef,
    groups: Vec<GroupTag>,
    distance: f32,
}

/// In-memory world: placed objects with a fixed distance from every actor.
///
/// Headless runs and tests place and remove objects through `&self`, so the
/// world can be shared with an engine behind an `Arc`.
#[derive(Debug, Default)]
pub struct StaticWorld {
    placed: RwLock<Vec<Placed>>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place<I, T>(&self, object: WorldObjectRef, groups: I, distance: f32)
    where
        I: IntoIterator<Item = T>,
        T: Into<GroupTag>,
    {
        let placed = Placed {
            object,
            groups: groups.into_iter().map(Into::into).collect(),
            distance,
        };
        let mut objects = self.placed.write().unwrap_or_else(PoisonError::into_inner);
        objects.retain(|p| p.object.uid != placed.object.uid);
        objects.push(placed);
    }

    pub fn remove(&self, uid: &ObjectUid) -> bool {
        let mut objects = self.placed.write().unwrap_or_else(PoisonError::into_inner);
        let before = objects.len();
        objects.retain(|p| &p.object.uid != uid);
        objects.len() != before
    }

    /// Changes how far `uid` is from every actor.
    pub fn set_distance(&self, uid: &ObjectUid, distance: f32) {
        let mut objects = self.placed.write().unwrap_or_else(PoisonError::into_inner);
        for placed in objects.iter_mut().filter(|p| &p.object.uid == uid) {
            placed.distance = distance;
        }
    }

    pub fn len(&self) -> usize {
        self.placed.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WorldOracle for StaticWorld {
    fn nearest_with_group(
        &self,
        _actor: ActorId,
        group: &GroupTag,
        range: f32,
    ) -> Option<WorldObjectRef> {
        let objects = self.placed.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .iter()
            .filter(|p| p.distance <= range && p.groups.contains(group))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|p| p.object.clone())
    }

    fn object(&self, uid: &ObjectUid) -> Option<WorldObjectRef> {
        let objects = self.placed.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .iter()
            .find(|p| &p.object.uid == uid)
            .map(|p| p.object.clone())
    }
}
