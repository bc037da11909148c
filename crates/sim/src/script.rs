//! RON interaction scripts.
//!
//! A script stands in for the input and world collaborators: it places the
//! initial world objects, seeds the player's inventory and then issues one
//! request per step.
//!
//! ```ron
//! (
//!     world: [(uid: "tree-1", object: "palm_tree")],
//!     start: [("stone_axe", 1)],
//!     steps: [UseOnObject(using: Some(Inventory(0)), object: "tree-1"), Wait(3.0)],
//! )
//! ```

use std::path::Path;

use serde::Deserialize;
use survival_core::{ActorId, EquipSlot, ItemId, ObjectDefId, RecipeId, StackLocation};

/// Longest single wait, counted in engine ticks.
pub const MAX_WAIT_TICKS: f32 = 100_000.0;

fn default_tick() -> f32 {
    0.5
}

fn default_distance() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    /// Simulated seconds per engine tick while waiting.
    #[serde(default = "default_tick")]
    pub tick: f32,
    #[serde(default)]
    pub world: Vec<ScriptObject>,
    /// Items given to the player when the run starts from a fresh state.
    #[serde(default)]
    pub start: Vec<(ItemId, u32)>,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read script {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let script: Self = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse script RON: {}", e))?;
        if !script.tick.is_finite() || script.tick <= 0.0 {
            anyhow::bail!("script tick must be a positive number, got {}", script.tick);
        }
        for (index, step) in script.steps.iter().enumerate() {
            if let Step::Wait(seconds) = step {
                if !seconds.is_finite() || *seconds < 0.0 {
                    anyhow::bail!("step {index}: wait must be a non-negative number, got {seconds}");
                }
                if seconds / script.tick > MAX_WAIT_TICKS {
                    anyhow::bail!(
                        "step {index}: wait of {seconds}s exceeds {MAX_WAIT_TICKS} ticks of {}s",
                        script.tick
                    );
                }
            }
        }
        Ok(script)
    }
}

/// A world object placed at the start of the run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptObject {
    pub uid: String,
    pub object: ObjectDefId,
    #[serde(default = "default_distance")]
    pub distance: f32,
}

/// Slot reference from the player's point of view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum Slot {
    Inventory(u16),
    Storage(String, u16),
    Equipment(EquipSlot),
}

impl Slot {
    pub fn location(&self, actor: ActorId) -> StackLocation {
        match self {
            Self::Inventory(slot) => StackLocation::inventory(actor, *slot),
            Self::Storage(uid, slot) => StackLocation::storage(uid.as_str(), *slot),
            Self::Equipment(slot) => StackLocation::equipment(actor, *slot),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum Step {
    /// Primary operand alone: runs or offers its self handlers.
    Use(Slot),
    /// Drag one stack onto another.
    UseOn(Slot, Slot),
    /// Use a stack on (or, with no stack, interact with) a placed object.
    UseOnObject { using: Option<Slot>, object: String },
    /// Pick an entry from the last offered menu.
    Choose(usize),
    Craft(RecipeId),
    Equip(Slot),
    Unequip(EquipSlot),
    Transfer {
        from: Slot,
        to: Slot,
        #[serde(default)]
        quantity: Option<u32>,
    },
    Split(Slot, u32),
    Drop(Slot, Option<u32>),
    /// Picks up every stack lying on the ground.
    PickUpAll,
    /// The player moved, interrupting any timed action.
    Move,
    Cancel,
    /// The world removes an object on its own (burnt down, despawned).
    Destroy(String),
    Place(ScriptObject),
    /// Advances simulated time.
    Wait(f32),
}
