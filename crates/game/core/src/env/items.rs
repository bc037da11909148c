use crate::action::ActionHandler;
use crate::state::{GroupTag, ItemId, ObjectDefId};

/// Read access to item definitions.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, id: &str) -> Option<&ItemDefinition>;

    /// Returns every item definition known to this oracle.
    fn all_definitions(&self) -> Vec<&ItemDefinition>;
}

/// Item definition loaded once with the catalog and never mutated afterwards.
///
/// # Stacking
///
/// `max_stack` caps how many units share one slot. Tools and wearables use 1,
/// resources and food use larger caps.
///
/// # Handlers
///
/// `actions` lists the handlers attached to this item in declaration order.
/// The resolver walks them in that order, so the list order is significant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub max_stack: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub durability: DurabilitySpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equip_slot: Option<EquipSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<GroupTag>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<ActionHandler>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub links: ItemLinks,
}

impl ItemDefinition {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, max_stack: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            max_stack,
            durability: DurabilitySpec::default(),
            equip_slot: None,
            groups: Vec::new(),
            actions: Vec::new(),
            links: ItemLinks::default(),
        }
    }

    pub fn with_durability(mut self, durability: DurabilitySpec) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_equip_slot(mut self, slot: EquipSlot) -> Self {
        self.equip_slot = Some(slot);
        self
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

    pub fn with_empty_form(mut self, empty_form: impl Into<ItemId>) -> Self {
        self.links.empty_form = Some(empty_form.into());
        self
    }

    pub fn has_group(&self, tag: &GroupTag) -> bool {
        self.groups.contains(tag)
    }

    pub fn is_equippable(&self) -> bool {
        self.equip_slot.is_some()
    }

    /// Durability a freshly created stack of this item starts with.
    pub fn initial_durability(&self) -> f32 {
        match self.durability.policy {
            DurabilityPolicy::None => 0.0,
            _ => self.durability.capacity,
        }
    }
}

/// Closed set of equipment categories. Each holds at most one unit.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipSlot {
    /// Weapons and tools.
    Hand,
    Head,
    Body,
    Feet,
    Back,
    Accessory,
}

/// Decay trigger class governing when a stack wears out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurabilityPolicy {
    /// Never decays.
    #[default]
    None,
    /// One decrement per discrete use (strike, dig, chop).
    UsageCount,
    /// Decays with elapsed time while the stack sits in an equipment slot.
    UsageTime,
    /// Decays with elapsed time wherever the stack is, including the ground.
    Spoilage,
}

/// What happens to a stack once its durability reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExhaustBehavior {
    #[default]
    Destroy,
    /// Turns into the item's `links.empty_form` (a drained waterskin becomes an empty one).
    RevertToEmptyForm,
}

/// Durability policy plus its capacity.
///
/// For `UsageCount` the capacity counts uses. For the time-based policies it
/// counts game hours, consumed at `rate_per_hour`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DurabilitySpec {
    pub policy: DurabilityPolicy,
    pub capacity: f32,
    pub rate_per_hour: f32,
    pub on_exhausted: ExhaustBehavior,
}

impl DurabilitySpec {
    pub fn usage_count(capacity: f32) -> Self {
        Self {
            policy: DurabilityPolicy::UsageCount,
            capacity,
            ..Self::default()
        }
    }

    pub fn usage_time(hours: f32) -> Self {
        Self {
            policy: DurabilityPolicy::UsageTime,
            capacity: hours,
            ..Self::default()
        }
    }

    pub fn spoilage(hours: f32, rate_per_hour: f32) -> Self {
        Self {
            policy: DurabilityPolicy::Spoilage,
            capacity: hours,
            rate_per_hour,
            ..Self::default()
        }
    }

    pub fn reverting(mut self) -> Self {
        self.on_exhausted = ExhaustBehavior::RevertToEmptyForm;
        self
    }

    pub fn is_active(&self) -> bool {
        self.policy != DurabilityPolicy::None
    }
}

impl Default for DurabilitySpec {
    fn default() -> Self {
        Self {
            policy: DurabilityPolicy::None,
            capacity: 0.0,
            rate_per_hour: 1.0,
            on_exhausted: ExhaustBehavior::Destroy,
        }
    }
}

/// Cross-catalog links from an item to related definitions.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemLinks {
    /// Empty form of a container item (full waterskin -> empty waterskin).
    pub empty_form: Option<ItemId>,
    /// World object grown when this item is sown.
    pub sowable: Option<ObjectDefId>,
    /// World object placed when this item is built.
    pub buildable: Option<ObjectDefId>,
}
