//! Immunity tables.
//!
//! Each entity keeps two tables keyed by [`EffectType`]:
//!
//! - **permanent**: entries added with a zero duration
//! - **temporary**: entries with a positive duration, stamped with an
//!   absolute `expires_at` and evicted lazily by the first check that finds
//!   them expired
//!
//! A check consults the temporary table first, then the permanent one, and
//! falls back to [`ImmunityData::none`].

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::shift;
use crate::effect::EffectType;
use crate::error::EffectError;

/// How an entity reacts to an effect type.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImmunityKind {
    /// No protection.
    #[default]
    None,
    /// Magnitude is reduced by the resistance fraction.
    Partial,
    /// The effect is rejected.
    Complete,
    /// The effect is rejected and should bounce back to its source.
    Reflect,
}

impl ImmunityKind {
    /// Parses an immunity kind from content data.
    ///
    /// Unknown names are a content error and surface as
    /// [`EffectError::UnknownImmunity`].
    pub fn parse(name: &str) -> Result<Self, EffectError> {
        Self::from_str(name).map_err(|_| EffectError::UnknownImmunity(name.to_owned()))
    }
}

/// A standing immunity rule for one effect type.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImmunityData {
    pub kind: ImmunityKind,
    /// Zero means permanent.
    pub duration: Duration,
    /// Fraction (0.0 to 1.0) removed from the magnitude under partial immunity.
    pub resistance: f64,
    /// Only set on temporary entries.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ImmunityData {
    pub fn new(kind: ImmunityKind, resistance: f64) -> Self {
        Self {
            kind,
            duration: Duration::ZERO,
            resistance: resistance.clamp(0.0, 1.0),
            expires_at: None,
        }
    }

    /// No protection at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn partial(resistance: f64) -> Self {
        Self::new(ImmunityKind::Partial, resistance)
    }

    pub fn complete() -> Self {
        Self::new(ImmunityKind::Complete, 1.0)
    }

    pub fn reflect() -> Self {
        Self::new(ImmunityKind::Reflect, 1.0)
    }

    /// Makes the rule temporary (builder pattern).
    #[must_use]
    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_temporary(&self) -> bool {
        !self.duration.is_zero()
    }

    /// True once `now` is past the stamped expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }

    /// Magnitude after this rule's reduction.
    pub fn scale(&self, magnitude: f64) -> f64 {
        match self.kind {
            ImmunityKind::Partial => magnitude * (1.0 - self.resistance),
            _ => magnitude,
        }
    }
}

/// Permanent and temporary immunity entries of one entity.
#[derive(Clone, Debug, Default)]
pub struct ImmunityTable {
    permanent: HashMap<EffectType, ImmunityData>,
    temporary: HashMap<EffectType, ImmunityData>,
}

impl ImmunityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a rule.
    ///
    /// A positive duration goes to the temporary table with
    /// `expires_at = now + duration`, replacing any previous temporary entry.
    /// Anything else is permanent.
    pub fn add(&mut self, effect_type: EffectType, mut data: ImmunityData, now: DateTime<Utc>) {
        if data.is_temporary() {
            data.expires_at = Some(shift(now, data.duration));
            self.temporary.insert(effect_type, data);
        } else {
            data.expires_at = None;
            self.permanent.insert(effect_type, data);
        }
    }

    /// Resolves the rule in force for `effect_type`, evicting an expired
    /// temporary entry on the way.
    pub fn check(&mut self, effect_type: &EffectType, now: DateTime<Utc>) -> ImmunityData {
        if let Some(temporary) = self.temporary.get(effect_type) {
            if !temporary.is_expired(now) {
                return temporary.clone();
            }
            tracing::debug!("temporary {} immunity expired, evicting", effect_type);
            self.temporary.remove(effect_type);
        }

        self.permanent
            .get(effect_type)
            .cloned()
            .unwrap_or_else(ImmunityData::none)
    }

    /// Drops both entries for `effect_type`. Returns true if anything was removed.
    pub fn remove(&mut self, effect_type: &EffectType) -> bool {
        let temporary = self.temporary.remove(effect_type).is_some();
        let permanent = self.permanent.remove(effect_type).is_some();
        temporary || permanent
    }

    pub fn temporary_len(&self) -> usize {
        self.temporary.len()
    }

    pub fn permanent_len(&self) -> usize {
        self.permanent.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn missing_entry_is_none() {
        let mut table = ImmunityTable::new();
        let data = table.check(&EffectType::Poison, t0());
        assert_eq!(data.kind, ImmunityKind::None);
    }

    #[test]
    fn zero_duration_is_permanent() {
        let mut table = ImmunityTable::new();
        table.add(EffectType::Stun, ImmunityData::complete(), t0());

        assert_eq!(table.permanent_len(), 1);
        assert_eq!(table.temporary_len(), 0);

        let much_later = t0() + TimeDelta::days(365);
        assert_eq!(table.check(&EffectType::Stun, much_later).kind, ImmunityKind::Complete);
    }

    #[test]
    fn expired_temporary_is_evicted_and_falls_back() {
        let mut table = ImmunityTable::new();
        table.add(EffectType::Poison, ImmunityData::partial(0.5), t0());
        table.add(
            EffectType::Poison,
            ImmunityData::complete().lasting(Duration::from_secs(5)),
            t0(),
        );

        let during = t0() + TimeDelta::seconds(5);
        assert_eq!(table.check(&EffectType::Poison, during).kind, ImmunityKind::Complete);
        assert_eq!(table.temporary_len(), 1);

        let after = t0() + TimeDelta::milliseconds(5_001);
        let fallback = table.check(&EffectType::Poison, after);
        assert_eq!(fallback.kind, ImmunityKind::Partial);
        assert_eq!(fallback.resistance, 0.5);
        assert_eq!(table.temporary_len(), 0);
    }

    #[test]
    fn expired_temporary_without_permanent_is_none() {
        let mut table = ImmunityTable::new();
        table.add(
            EffectType::Root,
            ImmunityData::reflect().lasting(Duration::from_secs(1)),
            t0(),
        );
        let after = t0() + TimeDelta::seconds(2);
        assert_eq!(table.check(&EffectType::Root, after).kind, ImmunityKind::None);
        assert_eq!(table.check(&EffectType::Root, after).kind, ImmunityKind::None);
    }

    #[test]
    fn temporary_entries_overwrite() {
        let mut table = ImmunityTable::new();
        table.add(
            EffectType::Burning,
            ImmunityData::partial(0.2).lasting(Duration::from_secs(1)),
            t0(),
        );
        table.add(
            EffectType::Burning,
            ImmunityData::partial(0.8).lasting(Duration::from_secs(10)),
            t0(),
        );
        let data = table.check(&EffectType::Burning, t0() + TimeDelta::seconds(3));
        assert_eq!(data.resistance, 0.8);
        assert_eq!(data.expires_at, Some(t0() + TimeDelta::seconds(10)));
    }

    #[test]
    fn resistance_is_clamped_and_scales() {
        assert_eq!(ImmunityData::partial(1.7).resistance, 1.0);
        assert_eq!(ImmunityData::partial(-0.3).resistance, 0.0);
        assert_eq!(ImmunityData::partial(0.25).scale(10.0), 7.5);
        assert_eq!(ImmunityData::none().scale(10.0), 10.0);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert_eq!(ImmunityKind::parse("reflect"), Ok(ImmunityKind::Reflect));
        assert_eq!(
            ImmunityKind::parse("absorb"),
            Err(EffectError::UnknownImmunity("absorb".into()))
        );
    }

    #[test]
    fn remove_drops_both_tables() {
        let mut table = ImmunityTable::new();
        table.add(EffectType::Stun, ImmunityData::complete(), t0());
        table.add(
            EffectType::Stun,
            ImmunityData::reflect().lasting(Duration::from_secs(3)),
            t0(),
        );
        assert!(table.remove(&EffectType::Stun));
        assert!(!table.remove(&EffectType::Stun));
        assert_eq!(table.check(&EffectType::Stun, t0()).kind, ImmunityKind::None);
    }
}
