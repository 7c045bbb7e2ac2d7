//! Status effects and their lifecycle.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──apply_effect──▶ Active ──expire / remove / dispel──▶ (discarded)
//! ```
//!
//! An [`Effect`] is built by one of the factory helpers with `is_active` set
//! and a single stack, submitted to an [`crate::EffectManager`], and from then
//! on only mutated by the manager. Evicted effects are dropped, not archived.
//!
//! # Expiry
//!
//! - [`EffectDuration::RealTime`]: expired strictly after `start_time + span`
//! - [`EffectDuration::Rounds`] / [`EffectDuration::Turns`]: needs the
//!   manager's counters, see [`Effect::is_expired_at`]
//! - [`EffectDuration::Permanent`]: never
//! - [`EffectDuration::Instant`]: as soon as it is checked
//!
//! # Ticking
//!
//! An effect ticks when the time since `start_time` is an exact multiple of
//! its real-time tick rate, including the start instant itself. A loop that
//! samples at irregular instants will miss boundaries; it should either step
//! its clock in exact tick-rate increments or count boundaries with
//! [`Effect::ticks_between`].

mod dispel;
mod duration;
mod kinds;

pub use dispel::{DispelInfo, DispelType};
pub use duration::EffectDuration;
pub use kinds::{DamageType, EffectSource, EffectType, SourceKind};

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::shift;
use crate::config::EffectConfig;
use crate::ids::{EffectId, EntityId};
use crate::stats::Modifier;

/// One instance of a status condition applied to an entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub id: EffectId,
    pub effect_type: EffectType,
    pub start_time: DateTime<Utc>,
    pub duration: EffectDuration,
    /// Only the real-time span gates ticking.
    pub tick_rate: EffectDuration,
    pub magnitude: f64,
    pub damage_type: Option<DamageType>,
    pub source: Option<EffectSource>,
    pub target: Option<EntityId>,
    pub is_active: bool,
    /// Never less than 1.
    pub stacks: u32,
    pub tags: Vec<String>,
    pub dispel: DispelInfo,
    pub modifiers: Vec<Modifier>,
    /// Round counter of the owning manager when the effect was inserted.
    pub start_round: u64,
    /// Turn counter of the owning manager when the effect was inserted.
    pub start_turn: u64,
}

impl Effect {
    /// Creates an active, single-stack effect starting now.
    pub fn new(effect_type: EffectType, duration: EffectDuration, magnitude: f64) -> Self {
        Self {
            id: EffectId::next(),
            effect_type,
            start_time: Utc::now(),
            duration,
            tick_rate: EffectDuration::Instant,
            magnitude,
            damage_type: None,
            source: None,
            target: None,
            is_active: true,
            stacks: 1,
            tags: Vec::new(),
            dispel: DispelInfo::default(),
            modifiers: Vec::new(),
            start_round: 0,
            start_turn: 0,
        }
    }

    /// Creates a damaging effect that ticks every second.
    pub fn damage(
        effect_type: EffectType,
        damage_type: DamageType,
        damage: f64,
        duration: EffectDuration,
    ) -> Self {
        Self::damage_with_rate(
            effect_type,
            damage_type,
            damage,
            duration,
            EffectConfig::new().damage_tick_rate(),
        )
    }

    /// Creates a damaging effect with an explicit tick interval.
    pub fn damage_with_rate(
        effect_type: EffectType,
        damage_type: DamageType,
        damage: f64,
        duration: EffectDuration,
        tick_rate: Duration,
    ) -> Self {
        let mut effect = Self::new(effect_type, duration, damage);
        effect.damage_type = Some(damage_type);
        effect.tick_rate = EffectDuration::RealTime(tick_rate);
        effect
    }

    /// Creates an effect that can be dispelled.
    pub fn with_dispel(
        effect_type: EffectType,
        duration: EffectDuration,
        magnitude: f64,
        dispel: DispelInfo,
    ) -> Self {
        let mut effect = Self::new(effect_type, duration, magnitude);
        effect.dispel = dispel;
        effect
    }

    /// Overrides the start time (builder pattern).
    #[must_use]
    pub fn started_at(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self
    }

    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = EffectDuration::RealTime(tick_rate);
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: EffectSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    #[must_use]
    pub fn with_dispel_info(mut self, dispel: DispelInfo) -> Self {
        self.dispel = dispel;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Absolute expiry instant of a real-time effect.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.duration
            .real_time()
            .map(|span| shift(self.start_time, span))
    }

    /// Context-free expiry check.
    ///
    /// Round- and turn-based effects cannot be evaluated without counters and
    /// always report `false` here; use [`Effect::is_expired_at`].
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.duration.normalized() {
            EffectDuration::Permanent => false,
            EffectDuration::Instant => true,
            EffectDuration::RealTime(span) => now > shift(self.start_time, span),
            EffectDuration::Rounds(_) | EffectDuration::Turns(_) => false,
        }
    }

    /// Expiry check with the owning manager's round and turn counters.
    pub fn is_expired_at(&self, now: DateTime<Utc>, current_round: u64, current_turn: u64) -> bool {
        match self.duration.normalized() {
            EffectDuration::Rounds(rounds) => {
                current_round >= self.start_round.saturating_add(u64::from(rounds))
            }
            EffectDuration::Turns(turns) => {
                current_turn >= self.start_turn.saturating_add(u64::from(turns))
            }
            _ => self.is_expired(now),
        }
    }

    /// Whether `now` sits exactly on a tick boundary.
    pub fn should_tick(&self, now: DateTime<Utc>) -> bool {
        let Some(rate) = self.tick_rate.real_time() else {
            return false;
        };
        let Ok(elapsed) = (now - self.start_time).to_std() else {
            return false;
        };
        elapsed.as_nanos() % rate.as_nanos() == 0
    }

    /// Number of tick boundaries in the half-open window `(from, to]`.
    pub fn ticks_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
        let Some(rate) = self.tick_rate.real_time() else {
            return 0;
        };
        if to <= from {
            return 0;
        }
        let rate = rate.as_nanos() as i128;
        let offset = |at: DateTime<Utc>| {
            (at - self.start_time)
                .num_nanoseconds()
                .map(i128::from)
        };
        let (Some(lo), Some(hi)) = (offset(from), offset(to)) else {
            return 0;
        };
        // Boundaries at k × rate for k ≥ 0 that fall in [0, x].
        let boundaries_upto = |x: i128| if x < 0 { 0 } else { x / rate + 1 };
        u64::try_from(boundaries_upto(hi) - boundaries_upto(lo)).unwrap_or(0)
    }
}
