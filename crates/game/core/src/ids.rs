use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an entity that can carry or apply effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Reserved identifier for effects applied by the world itself (traps, weather).
    pub const ENVIRONMENT: Self = Self(u32::MAX);

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Returns true if this entity represents the environment.
    #[inline]
    pub const fn is_environment(self) -> bool {
        self.0 == Self::ENVIRONMENT.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_EFFECT_ID: AtomicU64 = AtomicU64::new(1);

/// Globally unique identifier of a single effect instance.
///
/// Identifiers are handed out by [`EffectId::next`] from a process-wide
/// counter, so two effects built by the factory helpers never collide even
/// when they are created on different threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u64);

impl EffectId {
    /// Allocates a fresh identifier.
    pub fn next() -> Self {
        Self(NEXT_EFFECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect-{}", self.0)
    }
}
