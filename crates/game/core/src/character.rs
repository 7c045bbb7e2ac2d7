//! Character adapter over [`EffectManager`].
//!
//! A [`Character`] carries plain attributes and creates its effect manager on
//! first use, seeding the manager's base stats from those attributes.

use std::sync::{Arc, OnceLock};

use crate::clock::{Clock, SystemClock};
use crate::config::EffectConfig;
use crate::effect::{Effect, EffectType};
use crate::error::EffectError;
use crate::ids::{EffectId, EntityId};
use crate::manager::{ApplyOutcome, EffectManager};
use crate::stats::Stats;

/// Primary attributes of a character before any effect applies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub level: u32,
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

impl Default for Attributes {
    fn default() -> Self {
        Self {
            level: 1,
            health: 100.0,
            max_health: 100.0,
            mana: 50.0,
            max_mana: 50.0,
            strength: 10.0,
            dexterity: 10.0,
            constitution: 10.0,
            intelligence: 10.0,
            wisdom: 10.0,
            charisma: 10.0,
            armor: 0.0,
            speed: 1.0,
        }
    }
}

impl Attributes {
    /// Snapshot used as the manager's base stats.
    pub fn to_stats(&self) -> Stats {
        Stats {
            health: self.health,
            max_health: self.max_health,
            mana: self.mana,
            max_mana: self.max_mana,
            strength: self.strength,
            dexterity: self.dexterity,
            constitution: self.constitution,
            intelligence: self.intelligence,
            wisdom: self.wisdom,
            charisma: self.charisma,
            armor: self.armor,
            speed: self.speed,
        }
    }
}

#[derive(Debug)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    attributes: Attributes,
    config: EffectConfig,
    clock: Arc<dyn Clock>,
    effects: OnceLock<EffectManager>,
}

impl Character {
    pub fn new(id: EntityId, name: impl Into<String>, attributes: Attributes) -> Self {
        Self::with_clock(id, name, attributes, EffectConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_clock(
        id: EntityId,
        name: impl Into<String>,
        attributes: Attributes,
        config: EffectConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            attributes,
            config,
            clock,
            effects: OnceLock::new(),
        }
    }

    /// Attributes the character was created with.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The effect manager, created from the attributes on first access.
    pub fn effect_manager(&self) -> &EffectManager {
        self.effects.get_or_init(|| {
            tracing::trace!("initialising effect manager for {}", self.id);
            EffectManager::with_clock(
                self.attributes.to_stats(),
                self.config.clone(),
                Arc::clone(&self.clock),
            )
        })
    }

    /// Applies an effect, stamping this character as its target.
    pub fn add_effect(&self, effect: Effect) -> Result<ApplyOutcome, EffectError> {
        self.effect_manager().apply_effect(effect.with_target(self.id))
    }

    pub fn remove_effect(&self, id: EffectId) -> Result<Effect, EffectError> {
        self.effect_manager().remove_effect(id)
    }

    pub fn has_effect(&self, effect_type: &EffectType) -> bool {
        self.effect_manager().has_effect(effect_type)
    }

    pub fn get_effects(&self) -> Vec<Effect> {
        self.effect_manager().get_effects()
    }

    pub fn get_stats(&self) -> Stats {
        self.effect_manager().get_stats()
    }

    pub fn get_base_stats(&self) -> Stats {
        self.effect_manager().get_base_stats()
    }

    pub fn set_stats(&self, stats: Stats) {
        self.effect_manager().set_stats(stats);
    }

    pub fn is_alive(&self) -> bool {
        !self.get_stats().is_depleted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectDuration;
    use crate::stats::{Modifier, StatKind};

    fn hero() -> Character {
        Character::new(EntityId(7), "Aldric", Attributes::default())
    }

    #[test]
    fn manager_is_seeded_from_attributes() {
        let hero = hero();
        let stats = hero.get_stats();
        assert_eq!(stats.health, 100.0);
        assert_eq!(stats.strength, 10.0);
        assert_eq!(stats, hero.get_base_stats());
    }

    #[test]
    fn add_effect_targets_the_character() {
        let hero = hero();
        let id = hero
            .add_effect(
                Effect::new(EffectType::StatBoost, EffectDuration::Permanent, 1.0)
                    .with_modifier(Modifier::add(StatKind::Strength, 4.0)),
            )
            .expect("boost applies")
            .active_id();

        assert!(hero.has_effect(&EffectType::StatBoost));
        assert_eq!(hero.get_effects()[0].target, Some(EntityId(7)));
        assert_eq!(hero.get_stats().strength, 14.0);

        hero.remove_effect(id).expect("boost is active");
        assert_eq!(hero.get_stats().strength, 10.0);
    }

    #[test]
    fn set_stats_goes_through_the_manager() {
        let hero = hero();
        hero.set_stats(hero.get_base_stats().with(StatKind::Health, 0.0));
        assert!(!hero.is_alive());
        // Attributes are only the seed.
        assert_eq!(hero.attributes().health, 100.0);
    }
}
