use std::time::Duration;

/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectConfig {
    /// Upper bound on simultaneously active effects per entity.
    pub max_active_effects: usize,
    /// Upper bound on the stack counter of a stacking effect.
    pub max_stacks: u32,
    /// Tick interval assigned by [`crate::Effect::damage`], in milliseconds.
    pub damage_tick_rate_ms: u64,
    /// Multiplier applied to heal-over-time ticks.
    pub healing_modifier: f64,
}

impl EffectConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ACTIVE_EFFECTS: usize = 64;
    pub const DEFAULT_MAX_STACKS: u32 = 10;
    pub const DEFAULT_DAMAGE_TICK_RATE_MS: u64 = 1_000;
    pub const DEFAULT_HEALING_MODIFIER: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            max_active_effects: Self::DEFAULT_MAX_ACTIVE_EFFECTS,
            max_stacks: Self::DEFAULT_MAX_STACKS,
            damage_tick_rate_ms: Self::DEFAULT_DAMAGE_TICK_RATE_MS,
            healing_modifier: Self::DEFAULT_HEALING_MODIFIER,
        }
    }

    pub fn with_max_active_effects(mut self, max_active_effects: usize) -> Self {
        self.max_active_effects = max_active_effects;
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks;
        self
    }

    /// Damage tick interval as a span.
    pub fn damage_tick_rate(&self) -> Duration {
        Duration::from_millis(self.damage_tick_rate_ms)
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::new()
    }
}
