//! Stat modifiers carried by effects.
//!
//! A modifier is a `(stat, value, operation)` triple. Modifiers are applied
//! in the order they are handed to [`fold_modifiers`]; the manager feeds them
//! by effect insertion order, then modifier index, which makes mixed
//! add/multiply/set sequences on the same stat deterministic.

use super::{StatKind, Stats};

/// How a modifier changes its stat.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierOp {
    /// `stat += value`
    Add,
    /// `stat *= value`
    Multiply,
    /// `stat = value`
    Set,
}

/// A single change to one stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub stat: StatKind,
    pub value: f64,
    pub op: ModifierOp,
}

impl Modifier {
    pub fn new(stat: StatKind, value: f64, op: ModifierOp) -> Self {
        Self { stat, value, op }
    }

    /// Create an additive modifier
    pub fn add(stat: StatKind, value: f64) -> Self {
        Self::new(stat, value, ModifierOp::Add)
    }

    /// Create a multiplicative modifier (1.5 = ×1.5)
    pub fn multiply(stat: StatKind, factor: f64) -> Self {
        Self::new(stat, factor, ModifierOp::Multiply)
    }

    /// Create an absolute override
    pub fn set(stat: StatKind, value: f64) -> Self {
        Self::new(stat, value, ModifierOp::Set)
    }

    /// Applies this modifier to `stats` in place.
    pub fn apply(&self, stats: &mut Stats) {
        let slot = stats.get_mut(self.stat);
        match self.op {
            ModifierOp::Add => *slot += self.value,
            ModifierOp::Multiply => *slot *= self.value,
            ModifierOp::Set => *slot = self.value,
        }
    }
}

/// Rebuilds a snapshot from `base` by applying `modifiers` in iteration order.
pub fn fold_modifiers<'a>(base: &Stats, modifiers: impl IntoIterator<Item = &'a Modifier>) -> Stats {
    let mut stats = base.clone();
    for modifier in modifiers {
        modifier.apply(&mut stats);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Stats {
        Stats::default().with(StatKind::Strength, 10.0)
    }

    #[test]
    fn operations() {
        let mut stats = base();
        Modifier::add(StatKind::Strength, 5.0).apply(&mut stats);
        assert_eq!(stats.strength, 15.0);

        Modifier::multiply(StatKind::Strength, 2.0).apply(&mut stats);
        assert_eq!(stats.strength, 30.0);

        Modifier::set(StatKind::Strength, 4.0).apply(&mut stats);
        assert_eq!(stats.strength, 4.0);
    }

    #[test]
    fn fold_follows_given_order() {
        let add = Modifier::add(StatKind::Strength, 5.0);
        let double = Modifier::multiply(StatKind::Strength, 2.0);

        // (10 + 5) × 2
        assert_eq!(fold_modifiers(&base(), [&add, &double]).strength, 30.0);
        // 10 × 2 + 5
        assert_eq!(fold_modifiers(&base(), [&double, &add]).strength, 25.0);
    }

    #[test]
    fn fold_never_touches_base() {
        let base = base();
        let folded = fold_modifiers(&base, [&Modifier::set(StatKind::Armor, 99.0)]);
        assert_eq!(folded.armor, 99.0);
        assert_eq!(base.armor, 0.0);
    }
}
