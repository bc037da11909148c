/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Slot count of every actor's personal inventory.
    pub inventory_slots: u16,
    /// Slot count for storage objects whose definition does not specify one.
    pub storage_slots: u16,
    /// Game seconds that pass per simulated second. Scales every time-based decay.
    pub time_multiplier: f32,
    /// Range used for proximity predicates (crafting stations, action targets).
    pub interaction_range: f32,
    /// Seconds a wielded tool stays in hand without use before it returns to the inventory.
    pub wield_timeout: f32,
    /// Upper bound of every actor attribute.
    pub attribute_max: f32,
    /// Attribute loss per game hour.
    pub drain: AttributeDrain,
}

impl GameConfig {
    // ===== compile-time limits =====
    pub const MAX_INVENTORY_SLOTS: u16 = 64;
    pub const MAX_STORAGE_SLOTS: u16 = 256;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INVENTORY_SLOTS: u16 = 15;
    pub const DEFAULT_STORAGE_SLOTS: u16 = 20;
    pub const DEFAULT_TIME_MULTIPLIER: f32 = 24.0;
    pub const DEFAULT_INTERACTION_RANGE: f32 = 2.0;
    pub const DEFAULT_WIELD_TIMEOUT: f32 = 10.0;
    pub const DEFAULT_ATTRIBUTE_MAX: f32 = 100.0;

    pub fn new() -> Self {
        Self {
            inventory_slots: Self::DEFAULT_INVENTORY_SLOTS,
            storage_slots: Self::DEFAULT_STORAGE_SLOTS,
            time_multiplier: Self::DEFAULT_TIME_MULTIPLIER,
            interaction_range: Self::DEFAULT_INTERACTION_RANGE,
            wield_timeout: Self::DEFAULT_WIELD_TIMEOUT,
            attribute_max: Self::DEFAULT_ATTRIBUTE_MAX,
            drain: AttributeDrain::default(),
        }
    }

    pub fn with_inventory_slots(mut self, slots: u16) -> Self {
        self.inventory_slots = slots.min(Self::MAX_INVENTORY_SLOTS);
        self
    }

    pub fn with_time_multiplier(mut self, multiplier: f32) -> Self {
        self.time_multiplier = multiplier;
        self
    }

    /// Converts simulated seconds into game hours using the time multiplier.
    pub fn game_hours(&self, elapsed_seconds: f32) -> f64 {
        f64::from(elapsed_seconds.max(0.0)) * f64::from(self.time_multiplier) / 3600.0
    }

    /// Storage slot count for an object, clamped to the hard limit.
    pub fn storage_capacity(&self, declared: Option<u16>) -> u16 {
        declared
            .unwrap_or(self.storage_slots)
            .min(Self::MAX_STORAGE_SLOTS)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-game-hour attribute drain rates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeDrain {
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
}

impl AttributeDrain {
    pub const NONE: Self = Self {
        hunger: 0.0,
        thirst: 0.0,
        energy: 0.0,
    };
}

impl Default for AttributeDrain {
    fn default() -> Self {
        Self {
            hunger: 4.0,
            thirst: 6.0,
            energy: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_hours_scale_with_multiplier() {
        let config = GameConfig::new().with_time_multiplier(24.0);
        assert_eq!(config.game_hours(150.0), 1.0);

        let realtime = GameConfig::new().with_time_multiplier(1.0);
        assert_eq!(realtime.game_hours(7200.0), 2.0);
        assert_eq!(realtime.game_hours(-5.0), 0.0);
    }

    #[test]
    fn inventory_slots_are_clamped() {
        let config = GameConfig::new().with_inventory_slots(1000);
        assert_eq!(config.inventory_slots, GameConfig::MAX_INVENTORY_SLOTS);
    }
}
