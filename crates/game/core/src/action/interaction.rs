use std::fmt;

use crate::env::WorldObjectRef;
use crate::state::{ActorId, ItemId, ObjectDefId, ObjectUid, StackLocation};

/// One side of an interaction: a stack somewhere in the state, or a placed object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    Stack(StackLocation),
    Object(WorldObjectRef),
}

impl Operand {
    pub fn as_stack(&self) -> Option<&StackLocation> {
        match self {
            Self::Stack(location) => Some(location),
            Self::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&WorldObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            Self::Stack(_) => None,
        }
    }

    pub fn refers_to_object(&self, uid: &ObjectUid) -> bool {
        self.as_object().is_some_and(|object| &object.uid == uid)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack(location) => write!(f, "{location}"),
            Self::Object(object) => write!(f, "{}({})", object.definition, object.uid),
        }
    }
}

/// Discrete interaction event delivered by the input collaborator.
///
/// `primary` is what the actor is using (a stack they hold or point at),
/// `target` is what they are using it on. Either may be absent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    pub actor: ActorId,
    pub primary: Option<StackLocation>,
    pub target: Option<Operand>,
}

impl Interaction {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            primary: None,
            target: None,
        }
    }

    pub fn using(mut self, primary: StackLocation) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn on(mut self, target: Operand) -> Self {
        self.target = Some(target);
        self
    }

    pub fn on_stack(self, target: StackLocation) -> Self {
        self.on(Operand::Stack(target))
    }

    pub fn on_object(self, target: WorldObjectRef) -> Self {
        self.on(Operand::Object(target))
    }
}

/// Operands bound to a resolved handler, seen from the handler's side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionBinding {
    pub actor: ActorId,
    /// The side carrying the handler.
    pub source: Operand,
    /// The other side, if any.
    pub target: Option<Operand>,
}

impl ActionBinding {
    pub fn new(actor: ActorId, source: Operand, target: Option<Operand>) -> Self {
        Self {
            actor,
            source,
            target,
        }
    }

    /// Every stack location the binding depends on.
    pub fn stacks(&self) -> impl Iterator<Item = &StackLocation> {
        std::iter::once(&self.source)
            .chain(self.target.as_ref())
            .filter_map(Operand::as_stack)
    }

    pub fn refers_to_object(&self, uid: &ObjectUid) -> bool {
        self.source.refers_to_object(uid)
            || self
                .target
                .as_ref()
                .is_some_and(|target| target.refers_to_object(uid))
    }

    /// The object side of the interaction, preferring the handler owner.
    pub fn object(&self) -> Option<&WorldObjectRef> {
        self.source
            .as_object()
            .or_else(|| self.target.as_ref().and_then(Operand::as_object))
    }
}

/// Definition that carries a handler.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandlerOwner {
    Item(ItemId),
    Object(ObjectDefId),
}

/// Stable reference to a handler: owning definition plus declaration index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerRef {
    pub owner: HandlerOwner,
    pub index: usize,
}

impl HandlerRef {
    pub fn new(owner: HandlerOwner, index: usize) -> Self {
        Self { owner, index }
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            HandlerOwner::Item(id) => write!(f, "item:{id}#{}", self.index),
            HandlerOwner::Object(id) => write!(f, "object:{id}#{}", self.index),
        }
    }
}
