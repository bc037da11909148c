//! Change notifications and their subscriber list.
//!
//! Several systems react to the same state transition (UI refresh, quest
//! hooks, the world collaborator). Subscribers register once and receive every
//! event they are interested in, in registration order.

use bitflags::bitflags;

use crate::action::{HandlerKind, HandlerRef};
use crate::craft::CraftProduct;
use crate::durability::Exhaustion;
use crate::engine::CancelReason;
use crate::env::EquipSlot;
use crate::state::{
    ActorId, AttributeKind, GameTime, ItemId, ObjectDefId, ObjectUid, Placement, RecipeId,
    StackLocation,
};

bitflags! {
    /// Event categories a subscriber can filter on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventKinds: u16 {
        const STACK      = 1 << 0;
        const DURABILITY = 1 << 1;
        const ACTION     = 1 << 2;
        const CRAFT      = 1 << 3;
        const ATTRIBUTE  = 1 << 4;
        const PROGRESS   = 1 << 5;
        const WORLD      = 1 << 6;
    }
}

/// Something observable happened to the state.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Contents of a slot changed; re-read it.
    StackChanged { location: StackLocation },
    ItemProduced {
        actor: ActorId,
        item: ItemId,
        quantity: u32,
        placement: Placement,
    },
    StackExhausted {
        location: StackLocation,
        outcome: Exhaustion,
    },
    WieldExpired { actor: ActorId, slot: EquipSlot },

    ActionResolved {
        actor: ActorId,
        handler: HandlerRef,
        kind: HandlerKind,
    },
    ActionStarted {
        actor: ActorId,
        label: String,
        due: GameTime,
    },
    ActionCancelled {
        actor: ActorId,
        label: String,
        reason: CancelReason,
    },
    ChoicesOffered {
        actor: ActorId,
        options: Vec<HandlerRef>,
    },

    Crafted {
        actor: ActorId,
        recipe: RecipeId,
        product: CraftProduct,
    },

    AttributeChanged {
        actor: ActorId,
        attribute: AttributeKind,
        value: f32,
    },

    Unlocked { flag: String },
    CounterChanged { key: String, value: i64 },

    StorageOpened { actor: ActorId, uid: ObjectUid },
    PlaceObjectRequested { actor: ActorId, object: ObjectDefId },
    RemoveObjectRequested { uid: ObjectUid },
}

impl GameEvent {
    pub fn kind(&self) -> EventKinds {
        use GameEvent::*;
        match self {
            StackChanged { .. } | ItemProduced { .. } | WieldExpired { .. } => EventKinds::STACK,
            StackExhausted { .. } => EventKinds::DURABILITY,
            ActionResolved { .. }
            | ActionStarted { .. }
            | ActionCancelled { .. }
            | ChoicesOffered { .. } => EventKinds::ACTION,
            Crafted { .. } => EventKinds::CRAFT,
            AttributeChanged { .. } => EventKinds::ATTRIBUTE,
            Unlocked { .. } | CounterChanged { .. } => EventKinds::PROGRESS,
            StorageOpened { .. } | PlaceObjectRequested { .. } | RemoveObjectRequested { .. } => {
                EventKinds::WORLD
            }
        }
    }
}

/// Receiver of game events.
pub trait EventSubscriber: Send {
    /// Categories this subscriber wants. Defaults to everything.
    fn interests(&self) -> EventKinds {
        EventKinds::all()
    }

    fn on_event(&mut self, event: &GameEvent);
}

impl<F> EventSubscriber for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Subscriber list with registration-order delivery.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Box<dyn EventSubscriber>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl EventSubscriber + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &GameEvent) {
        let kind = event.kind();
        for (_, subscriber) in &mut self.subscribers {
            if subscriber.interests().intersects(kind) {
                subscriber.on_event(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
