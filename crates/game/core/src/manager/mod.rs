//! Per-entity effect manager.
//!
//! [`EffectManager`] owns one entity's active effects, base/current stats and
//! immunity tables behind a single [`RwLock`]:
//!
//! - read lock: [`get_stats`](EffectManager::get_stats),
//!   [`get_base_stats`](EffectManager::get_base_stats),
//!   [`has_effect`](EffectManager::has_effect),
//!   [`get_effects`](EffectManager::get_effects) and other pure queries
//! - write lock: everything else, including
//!   [`check_immunity`](EffectManager::check_immunity), which evicts expired
//!   temporary immunities
//!
//! Nothing inside the manager blocks on I/O or spawns work; every operation
//! is linear in the number of active effects.
//!
//! # Invariant
//!
//! After any mutating call returns, current stats equal the base stats with
//! every modifier of every active effect folded in, effect by effect in
//! insertion order and modifier by modifier in index order.

mod state;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EffectConfig;
use crate::effect::{DamageType, DispelType, Effect, EffectType};
use crate::error::EffectError;
use crate::ids::EffectId;
use crate::immunity::ImmunityData;
use crate::stats::Stats;

use state::ManagerState;

/// What [`EffectManager::apply_effect`] did with a submitted effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Stored as a new entry.
    Inserted(EffectId),
    /// Merged into an existing stacking entry.
    Stacked { id: EffectId, stacks: u32 },
    /// A weaker same-type entry was replaced.
    Replaced { old: EffectId, new: EffectId },
    /// A same-type entry at least as strong was kept; the new effect was dropped.
    Discarded { kept: EffectId },
}

impl ApplyOutcome {
    /// Whether the active set changed.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Discarded { .. })
    }

    /// The entry that now represents the effect type.
    pub fn active_id(&self) -> EffectId {
        match *self {
            Self::Inserted(id) | Self::Stacked { id, .. } => id,
            Self::Replaced { new, .. } => new,
            Self::Discarded { kept } => kept,
        }
    }
}

/// Result of one [`EffectManager::update_effects`] pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateReport {
    /// Effects that ticked, in insertion order.
    pub ticked: Vec<EffectId>,
    /// Effects evicted as expired.
    pub expired: Vec<EffectId>,
    /// Net health change requested by the ticks, before clamping.
    pub health_delta: f64,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.ticked.is_empty() && self.expired.is_empty()
    }
}

/// Owner of one entity's effect state.
#[derive(Debug)]
pub struct EffectManager {
    state: RwLock<ManagerState>,
    config: EffectConfig,
    clock: Arc<dyn Clock>,
}

impl EffectManager {
    /// Creates a manager with default configuration and the system clock.
    pub fn new(base_stats: Stats) -> Self {
        Self::with_config(base_stats, EffectConfig::default())
    }

    pub fn with_config(base_stats: Stats, config: EffectConfig) -> Self {
        Self::with_clock(base_stats, config, Arc::new(SystemClock))
    }

    pub fn with_clock(base_stats: Stats, config: EffectConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(ManagerState::new(base_stats, &config)),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Current time according to this manager's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn read(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("effect manager lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("effect manager lock poisoned, recovering");
            let mut state = poisoned.into_inner();
            state.recalculate();
            state
        })
    }

    // ========================================================================
    // Application and removal
    // ========================================================================

    /// Submits an effect.
    ///
    /// Immunity is resolved first: complete immunity rejects with
    /// [`EffectError::Immune`], reflect with [`EffectError::Reflected`], and
    /// partial immunity scales the magnitude by `1 - resistance`. The effect
    /// is then stacked, inserted, replaces a weaker same-type effect, or is
    /// discarded in favour of a stronger one.
    pub fn apply_effect(&self, effect: Effect) -> Result<ApplyOutcome, EffectError> {
        let now = self.clock.now();
        let effect_type = effect.effect_type.clone();
        let result = self.write().apply(effect, now, &self.config);

        match &result {
            Ok(outcome) => debug!("applied {}: {:?}", effect_type, outcome),
            Err(err) => warn!("rejected {}: {}", effect_type, err),
        }
        result
    }

    /// Removes an active effect by id.
    pub fn remove_effect(&self, id: EffectId) -> Result<Effect, EffectError> {
        let removed = self.write().remove(id)?;
        debug!("removed {} ({})", removed.id, removed.effect_type);
        Ok(removed)
    }

    /// Removes every active effect and returns how many there were.
    pub fn clear_effects(&self) -> usize {
        self.write().clear()
    }

    /// Moves an active effect from this manager to `target`.
    ///
    /// Both write locks are taken in address order, so two transfers running
    /// in opposite directions cannot deadlock. The effect goes through the
    /// target's immunity and stacking rules. If the target rejects it or
    /// keeps a stronger same-type entry ([`ApplyOutcome::Discarded`]), it
    /// stays here.
    pub fn transfer_effect(
        &self,
        target: &EffectManager,
        id: EffectId,
    ) -> Result<ApplyOutcome, EffectError> {
        if std::ptr::eq(self, target) {
            return Err(EffectError::SameManager);
        }

        let now = target.clock.now();
        let (mut source_state, mut target_state) =
            if std::ptr::from_ref(self) < std::ptr::from_ref(target) {
                let source = self.write();
                (source, target.write())
            } else {
                let target_guard = target.write();
                (self.write(), target_guard)
            };

        let effect = source_state
            .find(id)
            .cloned()
            .ok_or(EffectError::NotFound { id })?;
        let outcome = target_state.apply(effect, now, &target.config)?;
        if !outcome.changed() {
            debug!("{} kept on source: {:?}", id, outcome);
            return Ok(outcome);
        }
        source_state.remove(id)?;

        debug!("transferred {}: {:?}", id, outcome);
        Ok(outcome)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether an effect of `effect_type` is active.
    pub fn has_effect(&self, effect_type: &EffectType) -> bool {
        self.read()
            .effects
            .iter()
            .any(|e| &e.effect_type == effect_type)
    }

    pub fn get_effect(&self, id: EffectId) -> Option<Effect> {
        self.read().find(id).cloned()
    }

    /// Snapshot copy of the active effects in insertion order.
    pub fn get_effects(&self) -> Vec<Effect> {
        self.read().effects.clone()
    }

    pub fn active_count(&self) -> usize {
        self.read().effects.len()
    }

    /// Base stats with every active modifier folded in.
    pub fn get_stats(&self) -> Stats {
        self.read().current_stats.clone()
    }

    pub fn get_base_stats(&self) -> Stats {
        self.read().base_stats.clone()
    }

    /// Replaces the base stats and recomputes the current snapshot.
    pub fn set_stats(&self, stats: Stats) {
        let mut state = self.write();
        state.base_stats = stats;
        state.recalculate();
    }

    // ========================================================================
    // Immunity and resistance
    // ========================================================================

    /// Adds an immunity rule; see [`crate::ImmunityTable::add`].
    pub fn add_immunity(&self, effect_type: EffectType, data: ImmunityData) {
        let now = self.clock.now();
        debug!("adding {:?} immunity to {}", data.kind, effect_type);
        self.write().immunities.add(effect_type, data, now);
    }

    /// Rule in force for `effect_type`; never absent.
    ///
    /// Takes the write lock because expired temporary entries are evicted.
    pub fn check_immunity(&self, effect_type: &EffectType) -> ImmunityData {
        let now = self.clock.now();
        self.write().immunities.check(effect_type, now)
    }

    pub fn remove_immunity(&self, effect_type: &EffectType) -> bool {
        self.write().immunities.remove(effect_type)
    }

    /// Sets the fraction of tick damage of `damage_type` that is ignored.
    pub fn set_resistance(&self, damage_type: DamageType, resistance: f64) {
        self.write()
            .resistances
            .insert(damage_type, resistance.clamp(0.0, 1.0));
    }

    pub fn resistance_to(&self, damage_type: DamageType) -> f64 {
        self.read().resistance_to(damage_type)
    }

    pub fn set_healing_modifier(&self, modifier: f64) {
        self.write().healing_modifier = modifier.max(0.0);
    }

    pub fn healing_modifier(&self) -> f64 {
        self.read().healing_modifier
    }

    // ========================================================================
    // Dispel and time
    // ========================================================================

    /// Removes up to `count` removable effects answering to `dispel_type`,
    /// highest priority first. Returns the removed ids (possibly empty).
    pub fn dispel_effects(&self, dispel_type: DispelType, count: usize) -> Vec<EffectId> {
        let removed = self.write().dispel(dispel_type, count);
        if !removed.is_empty() {
            debug!("dispelled {} effect(s) with {}", removed.len(), dispel_type);
        }
        removed
    }

    /// Ticks and expires effects at `now`.
    pub fn update_effects(&self, now: DateTime<Utc>) -> UpdateReport {
        let report = self.write().update(now);
        if !report.expired.is_empty() {
            debug!("{} effect(s) expired", report.expired.len());
        }
        report
    }

    /// Advances the round counter used by round-based durations.
    pub fn advance_round(&self) -> u64 {
        let mut state = self.write();
        state.round += 1;
        state.round
    }

    /// Advances the turn counter used by turn-based durations.
    pub fn advance_turn(&self) -> u64 {
        let mut state = self.write();
        state.turn += 1;
        state.turn
    }

    pub fn current_round(&self) -> u64 {
        self.read().round
    }

    pub fn current_turn(&self) -> u64 {
        self.read().turn
    }
}
