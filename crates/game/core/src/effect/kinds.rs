//! Effect, damage and source classifications.

use std::fmt;
use std::str::FromStr;

use crate::ids::EntityId;

/// Types of status effects.
///
/// The built-in kinds cover the conditions the engine knows how to tick and
/// stack. Content may define further kinds, carried as [`EffectType::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum EffectType {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Poison,
    Burning,
    Bleeding,
    DamageOverTime,

    // ========================================================================
    // Crowd control
    // ========================================================================
    Stun,
    Root,

    // ========================================================================
    // Stat changes and recovery
    // ========================================================================
    StatBoost,
    StatPenalty,
    HealOverTime,

    /// Content-defined effect.
    Custom(String),
}

impl EffectType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Poison => "poison",
            Self::Burning => "burning",
            Self::Bleeding => "bleeding",
            Self::DamageOverTime => "damage_over_time",
            Self::Stun => "stun",
            Self::Root => "root",
            Self::StatBoost => "stat_boost",
            Self::StatPenalty => "stat_penalty",
            Self::HealOverTime => "heal_over_time",
            Self::Custom(name) => name,
        }
    }

    /// Whether repeated applications merge into one entry with a stack counter.
    ///
    /// The list is closed: every other type follows the keep-the-stronger rule.
    pub const fn allows_stacking(&self) -> bool {
        matches!(
            self,
            Self::DamageOverTime | Self::HealOverTime | Self::StatBoost
        )
    }

    /// Whether ticks of this type deal damage.
    pub const fn is_damaging(&self) -> bool {
        matches!(
            self,
            Self::Poison | Self::Burning | Self::Bleeding | Self::DamageOverTime
        )
    }

    /// Whether ticks of this type restore health.
    pub const fn is_healing(&self) -> bool {
        matches!(self, Self::HealOverTime)
    }

    /// Crowd-control effects that prevent acting or moving.
    pub const fn is_crowd_control(&self) -> bool {
        matches!(self, Self::Stun | Self::Root)
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EffectType {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "poison" => Self::Poison,
            "burning" => Self::Burning,
            "bleeding" => Self::Bleeding,
            "damage_over_time" => Self::DamageOverTime,
            "stun" => Self::Stun,
            "root" => Self::Root,
            "stat_boost" => Self::StatBoost,
            "stat_penalty" => Self::StatPenalty,
            "heal_over_time" => Self::HealOverTime,
            _ => Self::Custom(name.to_owned()),
        }
    }
}

impl From<String> for EffectType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<EffectType> for String {
    fn from(effect_type: EffectType) -> Self {
        match effect_type {
            EffectType::Custom(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl FromStr for EffectType {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Damage sub-type carried by damaging effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    Physical,
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Shadow,
    Arcane,
}

/// What kind of thing applied an effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SourceKind {
    Character,
    Npc,
    Item,
    Ability,
    Environment,
}

/// Who applied an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSource {
    pub id: EntityId,
    pub kind: SourceKind,
}

impl EffectSource {
    pub const fn new(id: EntityId, kind: SourceKind) -> Self {
        Self { id, kind }
    }

    pub const fn environment() -> Self {
        Self::new(EntityId::ENVIRONMENT, SourceKind::Environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacking_policy_is_closed() {
        assert!(EffectType::DamageOverTime.allows_stacking());
        assert!(EffectType::HealOverTime.allows_stacking());
        assert!(EffectType::StatBoost.allows_stacking());

        assert!(!EffectType::Poison.allows_stacking());
        assert!(!EffectType::StatPenalty.allows_stacking());
        assert!(!EffectType::Custom("blessed".into()).allows_stacking());
    }

    #[test]
    fn names_round_trip_through_strings() {
        for ty in [
            EffectType::Poison,
            EffectType::Burning,
            EffectType::Bleeding,
            EffectType::DamageOverTime,
            EffectType::Stun,
            EffectType::Root,
            EffectType::StatBoost,
            EffectType::StatPenalty,
            EffectType::HealOverTime,
        ] {
            assert_eq!(EffectType::from(ty.to_string()), ty);
        }
        assert_eq!(EffectType::from("STUN"), EffectType::Stun);
    }

    #[test]
    fn unknown_names_become_custom() {
        let ty: EffectType = "frenzy".parse().unwrap_or(EffectType::Stun);
        assert_eq!(ty, EffectType::Custom("frenzy".into()));
        assert_eq!(ty.to_string(), "frenzy");
        assert_eq!(String::from(ty), "frenzy");
    }

    #[test]
    fn damage_types_parse() {
        assert_eq!("fire".parse::<DamageType>(), Ok(DamageType::Fire));
        assert_eq!(DamageType::Lightning.as_ref(), "lightning");
    }
}
