//! Stat snapshots and the modifiers folded into them.
//!
//! An entity keeps two [`Stats`] snapshots:
//!
//! ```text
//! [ Base Stats ]  (unmodified, persistent)
//!      ↓  fold every Modifier of every active effect
//! [ Current Stats ]  (never patched incrementally)
//! ```
//!
//! The current snapshot is always rebuilt from the base with
//! [`fold_modifiers`]; repeated add/multiply/set sequences therefore never
//! accumulate drift.

pub mod modifiers;

pub use modifiers::{Modifier, ModifierOp, fold_modifiers};

/// Numeric attributes an effect may modify.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Health,
    MaxHealth,
    Mana,
    MaxMana,
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
    Armor,
    Speed,
}

/// Plain snapshot of an entity's numeric attributes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub strength: f64,
    pub dexterity: f64,
    pub constitution: f64,
    pub intelligence: f64,
    pub wisdom: f64,
    pub charisma: f64,
    pub armor: f64,
    pub speed: f64,
}

impl Stats {
    /// Reads a single attribute.
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Health => self.health,
            StatKind::MaxHealth => self.max_health,
            StatKind::Mana => self.mana,
            StatKind::MaxMana => self.max_mana,
            StatKind::Strength => self.strength,
            StatKind::Dexterity => self.dexterity,
            StatKind::Constitution => self.constitution,
            StatKind::Intelligence => self.intelligence,
            StatKind::Wisdom => self.wisdom,
            StatKind::Charisma => self.charisma,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
        }
    }

    /// Mutable access to a single attribute.
    pub fn get_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::Mana => &mut self.mana,
            StatKind::MaxMana => &mut self.max_mana,
            StatKind::Strength => &mut self.strength,
            StatKind::Dexterity => &mut self.dexterity,
            StatKind::Constitution => &mut self.constitution,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::Wisdom => &mut self.wisdom,
            StatKind::Charisma => &mut self.charisma,
            StatKind::Armor => &mut self.armor,
            StatKind::Speed => &mut self.speed,
        }
    }

    /// Sets a single attribute (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: StatKind, value: f64) -> Self {
        *self.get_mut(kind) = value;
        self
    }

    /// Adds `delta` to health, keeping it within `[0, max_health]`.
    ///
    /// An unset (non-positive) maximum leaves the upper end open.
    pub fn adjust_health(&mut self, delta: f64) {
        let raised = (self.health + delta).max(0.0);
        self.health = if self.max_health > 0.0 {
            raised.min(self.max_health)
        } else {
            raised
        };
    }

    /// Returns true once health has dropped to zero.
    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn get_and_get_mut_cover_every_stat() {
        let mut stats = Stats::default();
        for (i, kind) in StatKind::iter().enumerate() {
            *stats.get_mut(kind) = i as f64;
        }
        for (i, kind) in StatKind::iter().enumerate() {
            assert_eq!(stats.get(kind), i as f64);
        }
    }

    #[test]
    fn stat_names_parse_case_insensitively() {
        assert_eq!("max_health".parse::<StatKind>(), Ok(StatKind::MaxHealth));
        assert_eq!("STRENGTH".parse::<StatKind>(), Ok(StatKind::Strength));
        assert!("luck".parse::<StatKind>().is_err());
        assert_eq!(StatKind::MaxMana.to_string(), "max_mana");
    }

    #[test]
    fn health_adjustment_is_clamped() {
        let mut stats = Stats::default()
            .with(StatKind::Health, 50.0)
            .with(StatKind::MaxHealth, 60.0);

        stats.adjust_health(25.0);
        assert_eq!(stats.health, 60.0);

        stats.adjust_health(-100.0);
        assert_eq!(stats.health, 0.0);
        assert!(stats.is_depleted());
    }

    #[test]
    fn health_without_maximum_is_open_ended() {
        let mut stats = Stats::default().with(StatKind::Health, 10.0);
        stats.adjust_health(15.0);
        assert_eq!(stats.health, 25.0);
    }
}
