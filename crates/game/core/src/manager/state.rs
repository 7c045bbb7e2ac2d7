//! Lock-free core of the effect manager.
//!
//! [`ManagerState`] holds everything one entity owns and implements the
//! algorithms on `&mut self`. [`super::EffectManager`] wraps it in a lock;
//! cross-entity operations lock two states and call into both.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{ApplyOutcome, UpdateReport};
use crate::config::EffectConfig;
use crate::effect::{DamageType, DispelType, Effect, EffectType};
use crate::error::EffectError;
use crate::ids::EffectId;
use crate::immunity::{ImmunityKind, ImmunityTable};
use crate::stats::{Stats, fold_modifiers};

#[derive(Clone, Debug)]
pub(crate) struct ManagerState {
    /// Active effects in insertion order. Identifiers are unique.
    pub(crate) effects: Vec<Effect>,
    pub(crate) base_stats: Stats,
    pub(crate) current_stats: Stats,
    pub(crate) immunities: ImmunityTable,
    pub(crate) resistances: HashMap<DamageType, f64>,
    pub(crate) healing_modifier: f64,
    pub(crate) round: u64,
    pub(crate) turn: u64,
}

impl ManagerState {
    pub(crate) fn new(base_stats: Stats, config: &EffectConfig) -> Self {
        Self {
            effects: Vec::new(),
            current_stats: base_stats.clone(),
            base_stats,
            immunities: ImmunityTable::new(),
            resistances: HashMap::new(),
            healing_modifier: config.healing_modifier,
            round: 0,
            turn: 0,
        }
    }

    pub(crate) fn find(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    fn position_of_type(&self, effect_type: &EffectType) -> Option<usize> {
        self.effects
            .iter()
            .position(|e| &e.effect_type == effect_type)
    }

    pub(crate) fn resistance_to(&self, damage_type: DamageType) -> f64 {
        self.resistances.get(&damage_type).copied().unwrap_or(0.0)
    }

    /// Immunity gate followed by stacking/replacement and recalculation.
    pub(crate) fn apply(
        &mut self,
        mut effect: Effect,
        now: DateTime<Utc>,
        config: &EffectConfig,
    ) -> Result<ApplyOutcome, EffectError> {
        let immunity = self.immunities.check(&effect.effect_type, now);
        match immunity.kind {
            ImmunityKind::Complete => {
                return Err(EffectError::Immune {
                    effect_type: effect.effect_type,
                });
            }
            ImmunityKind::Reflect => {
                return Err(EffectError::Reflected {
                    effect_type: effect.effect_type,
                });
            }
            ImmunityKind::Partial => effect.magnitude = immunity.scale(effect.magnitude),
            ImmunityKind::None => {}
        }

        let outcome = self.insert(effect, config)?;
        if outcome.changed() {
            self.recalculate();
        }
        Ok(outcome)
    }

    fn insert(&mut self, mut effect: Effect, config: &EffectConfig) -> Result<ApplyOutcome, EffectError> {
        let max_stacks = config.max_stacks.max(1);
        effect.is_active = true;
        effect.stacks = effect.stacks.clamp(1, max_stacks);

        if let Some(pos) = self.position_of_type(&effect.effect_type) {
            if effect.effect_type.allows_stacking() {
                let existing = &mut self.effects[pos];
                // An incoming entry brings all of its stacks along.
                existing.stacks = existing
                    .stacks
                    .saturating_add(effect.stacks)
                    .min(max_stacks);
                return Ok(ApplyOutcome::Stacked {
                    id: existing.id,
                    stacks: existing.stacks,
                });
            }

            let existing = &self.effects[pos];
            if effect.magnitude <= existing.magnitude {
                return Ok(ApplyOutcome::Discarded { kept: existing.id });
            }

            let old = self.effects.remove(pos);
            let new = effect.id;
            self.push(effect);
            return Ok(ApplyOutcome::Replaced { old: old.id, new });
        }

        if self.effects.len() >= config.max_active_effects {
            return Err(EffectError::CapacityExceeded {
                max: config.max_active_effects,
            });
        }

        let id = effect.id;
        self.push(effect);
        Ok(ApplyOutcome::Inserted(id))
    }

    fn push(&mut self, mut effect: Effect) {
        effect.start_round = self.round;
        effect.start_turn = self.turn;
        self.effects.push(effect);
    }

    pub(crate) fn remove(&mut self, id: EffectId) -> Result<Effect, EffectError> {
        let pos = self
            .effects
            .iter()
            .position(|e| e.id == id)
            .ok_or(EffectError::NotFound { id })?;
        let removed = self.effects.remove(pos);
        self.recalculate();
        Ok(removed)
    }

    /// Health change one tick of `effect` produces.
    fn tick_delta(&self, effect: &Effect) -> f64 {
        let scaled = effect.magnitude * f64::from(effect.stacks);
        if effect.effect_type.is_healing() {
            scaled * self.healing_modifier
        } else if effect.effect_type.is_damaging() || effect.damage_type.is_some() {
            let resistance = effect
                .damage_type
                .map_or(0.0, |damage_type| self.resistance_to(damage_type));
            -(scaled * (1.0 - resistance))
        } else {
            0.0
        }
    }

    /// Ticks due effects, evicts expired ones, then refolds once.
    ///
    /// Tick impact is written to the base health so it survives the refold.
    pub(crate) fn update(&mut self, now: DateTime<Utc>) -> UpdateReport {
        let mut report = UpdateReport::default();

        let deltas: Vec<(EffectId, f64)> = self
            .effects
            .iter()
            .filter(|e| e.should_tick(now))
            .map(|e| (e.id, self.tick_delta(e)))
            .collect();
        for (id, delta) in deltas {
            self.base_stats.adjust_health(delta);
            report.ticked.push(id);
            report.health_delta += delta;
        }

        let (round, turn) = (self.round, self.turn);
        self.effects.retain(|e| {
            let expired = e.is_expired_at(now, round, turn);
            if expired {
                report.expired.push(e.id);
            }
            !expired
        });

        self.recalculate();
        report
    }

    /// Priority-ordered removal of effects answering to `dispel_type`.
    ///
    /// Ties keep insertion order, so the earliest applied goes first.
    pub(crate) fn dispel(&mut self, dispel_type: DispelType, count: usize) -> Vec<EffectId> {
        let mut candidates: Vec<(usize, u32)> = self
            .effects
            .iter()
            .enumerate()
            .filter(|(_, e)| e.dispel.responds_to(dispel_type))
            .map(|(index, e)| (index, e.dispel.priority))
            .collect();
        // Stable sort keeps insertion order within equal priorities.
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates.truncate(count);

        let removed: Vec<EffectId> = candidates
            .iter()
            .map(|(index, _)| self.effects[*index].id)
            .collect();
        if !removed.is_empty() {
            self.effects.retain(|e| !removed.contains(&e.id));
            self.recalculate();
        }
        removed
    }

    pub(crate) fn clear(&mut self) -> usize {
        let count = self.effects.len();
        self.effects.clear();
        self.recalculate();
        count
    }

    /// Rebuilds current stats from base, effect by effect in insertion order.
    pub(crate) fn recalculate(&mut self) {
        self.current_stats = fold_modifiers(
            &self.base_stats,
            self.effects.iter().flat_map(|e| e.modifiers.iter()),
        );
    }
}
