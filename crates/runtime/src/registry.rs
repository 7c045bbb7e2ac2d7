//! Registry of live characters.
//!
//! The registry lock only guards the id map. Effect work runs on cloned
//! `Arc<Character>` handles after the map lock is released, so per-entity
//! locks are never taken while holding it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use effect_core::{ApplyOutcome, Character, Effect, EffectId, EntityId, UpdateReport};
use tracing::{debug, warn};

use crate::error::{Result, RuntimeError};

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: RwLock<HashMap<EntityId, Arc<Character>>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<EntityId, Arc<Character>>> {
        self.entities.read().unwrap_or_else(|poisoned| {
            warn!("entity registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, Arc<Character>>> {
        self.entities.write().unwrap_or_else(|poisoned| {
            warn!("entity registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Registers a character under its own id.
    pub fn insert(&self, character: Character) -> Result<Arc<Character>> {
        let mut entities = self.write();
        if entities.contains_key(&character.id) {
            return Err(RuntimeError::DuplicateEntity(character.id));
        }
        let id = character.id;
        let character = Arc::new(character);
        entities.insert(id, Arc::clone(&character));
        debug!("registered {} ({})", character.name, id);
        Ok(character)
    }

    pub fn get(&self, id: EntityId) -> Result<Arc<Character>> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(RuntimeError::UnknownEntity(id))
    }

    pub fn remove(&self, id: EntityId) -> Option<Arc<Character>> {
        self.write().remove(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Characters in ascending id order.
    pub fn characters(&self) -> Vec<Arc<Character>> {
        let mut characters: Vec<Arc<Character>> = self.read().values().cloned().collect();
        characters.sort_unstable_by_key(|c| c.id);
        characters
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn apply_effect(&self, target: EntityId, effect: Effect) -> Result<ApplyOutcome> {
        Ok(self.get(target)?.add_effect(effect)?)
    }

    /// Moves an active effect from one character to another.
    pub fn transfer_effect(
        &self,
        from: EntityId,
        to: EntityId,
        effect: EffectId,
    ) -> Result<ApplyOutcome> {
        let source = self.get(from)?;
        let target = self.get(to)?;
        let outcome = source
            .effect_manager()
            .transfer_effect(target.effect_manager(), effect)?;
        debug!("moved {} from {} to {}", effect, from, to);
        Ok(outcome)
    }

    /// Runs one update pass on every character. Only non-empty reports are returned.
    pub fn update_all(&self, now: DateTime<Utc>) -> Vec<(EntityId, UpdateReport)> {
        self.characters()
            .into_iter()
            .filter_map(|character| {
                let report = character.effect_manager().update_effects(now);
                (!report.is_empty()).then_some((character.id, report))
            })
            .collect()
    }

    /// Advances every character's round counter.
    pub fn advance_round(&self) {
        for character in self.characters() {
            character.effect_manager().advance_round();
        }
    }

    /// Advances every character's turn counter.
    pub fn advance_turn(&self) {
        for character in self.characters() {
            character.effect_manager().advance_turn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effect_core::{
        Attributes, EffectDuration, EffectError, EffectType, ImmunityData, Modifier, StatKind,
    };

    fn registry() -> EntityRegistry {
        let registry = EntityRegistry::new();
        registry
            .insert(Character::new(EntityId(1), "Mira", Attributes::default()))
            .expect("first insert");
        registry
            .insert(Character::new(EntityId(2), "Tov", Attributes::default()))
            .expect("second insert");
        registry
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let registry = registry();
        let err = registry
            .insert(Character::new(EntityId(1), "Again", Attributes::default()))
            .expect_err("duplicate id");
        assert!(matches!(err, RuntimeError::DuplicateEntity(EntityId(1))));
        assert_eq!(registry.ids(), vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let registry = registry();
        assert!(matches!(
            registry.get(EntityId(9)),
            Err(RuntimeError::UnknownEntity(EntityId(9)))
        ));
    }

    #[test]
    fn transfer_moves_between_characters() {
        let registry = registry();
        let id = registry
            .apply_effect(
                EntityId(1),
                Effect::new(EffectType::StatBoost, EffectDuration::Permanent, 1.0)
                    .with_modifier(Modifier::add(StatKind::Dexterity, 3.0)),
            )
            .expect("boost applies")
            .active_id();

        registry
            .transfer_effect(EntityId(1), EntityId(2), id)
            .expect("transfer succeeds");

        let mira = registry.get(EntityId(1)).expect("registered");
        let tov = registry.get(EntityId(2)).expect("registered");
        assert_eq!(mira.get_stats().dexterity, 10.0);
        assert_eq!(tov.get_stats().dexterity, 13.0);
    }

    #[test]
    fn immune_rejection_is_flagged() {
        let registry = registry();
        registry
            .get(EntityId(2))
            .expect("registered")
            .effect_manager()
            .add_immunity(EffectType::Stun, ImmunityData::complete());

        let err = registry
            .apply_effect(
                EntityId(2),
                Effect::new(EffectType::Stun, EffectDuration::Turns(1), 1.0),
            )
            .expect_err("immune");
        assert!(err.is_rejection());
        assert!(matches!(
            err,
            RuntimeError::Effect(EffectError::Immune { .. })
        ));
    }

    #[test]
    fn rounds_advance_for_everyone() {
        let registry = registry();
        registry.advance_round();
        registry.advance_round();
        for character in registry.characters() {
            assert_eq!(character.effect_manager().current_round(), 2);
        }
    }
}
