use std::time::Duration;

/// Lifetime (or tick interval) of an effect.
///
/// Exactly one time model applies to an effect. The legacy three-field form
/// (rounds, turns, real time) with its sign conventions is accepted through
/// [`EffectDuration::from_components`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectDuration {
    /// Never expires.
    Permanent,
    /// Applies once; expired as soon as it is checked.
    #[default]
    Instant,
    /// Expires after a wall-clock span.
    RealTime(Duration),
    /// Expires after a number of combat rounds.
    Rounds(u32),
    /// Expires after a number of turns.
    Turns(u32),
}

impl EffectDuration {
    /// Builds a duration from the three-field representation.
    ///
    /// - any negative component: [`EffectDuration::Permanent`]
    /// - all components zero: [`EffectDuration::Instant`]
    /// - otherwise the first positive component in RealTime > Rounds > Turns order
    pub fn from_components(rounds: i64, turns: i64, real_time_ms: i64) -> Self {
        if rounds < 0 || turns < 0 || real_time_ms < 0 {
            return Self::Permanent;
        }
        if real_time_ms > 0 {
            return Self::RealTime(Duration::from_millis(real_time_ms.unsigned_abs()));
        }
        if rounds > 0 {
            return Self::Rounds(u32::try_from(rounds).unwrap_or(u32::MAX));
        }
        if turns > 0 {
            return Self::Turns(u32::try_from(turns).unwrap_or(u32::MAX));
        }
        Self::Instant
    }

    pub const fn seconds(secs: u64) -> Self {
        Self::RealTime(Duration::from_secs(secs))
    }

    pub const fn millis(millis: u64) -> Self {
        Self::RealTime(Duration::from_millis(millis))
    }

    /// Collapses zero-length spans into [`EffectDuration::Instant`].
    pub fn normalized(self) -> Self {
        match self {
            Self::RealTime(span) if span.is_zero() => Self::Instant,
            Self::Rounds(0) | Self::Turns(0) => Self::Instant,
            other => other,
        }
    }

    /// The positive real-time span, if this is a real-time duration.
    pub fn real_time(&self) -> Option<Duration> {
        match self.normalized() {
            Self::RealTime(span) => Some(span),
            _ => None,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }

    pub fn is_instant(&self) -> bool {
        matches!(self.normalized(), Self::Instant)
    }

    /// True for round- or turn-based lifetimes, which need external counters.
    pub fn is_counter_based(&self) -> bool {
        matches!(self.normalized(), Self::Rounds(_) | Self::Turns(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_component_is_permanent() {
        assert_eq!(EffectDuration::from_components(-1, 0, 0), EffectDuration::Permanent);
        assert_eq!(EffectDuration::from_components(3, 0, -1), EffectDuration::Permanent);
        assert_eq!(EffectDuration::from_components(0, -5, 2_000), EffectDuration::Permanent);
    }

    #[test]
    fn all_zero_is_instant() {
        assert_eq!(EffectDuration::from_components(0, 0, 0), EffectDuration::Instant);
    }

    #[test]
    fn precedence_is_real_time_then_rounds_then_turns() {
        assert_eq!(
            EffectDuration::from_components(3, 4, 1_500),
            EffectDuration::RealTime(Duration::from_millis(1_500))
        );
        assert_eq!(EffectDuration::from_components(3, 4, 0), EffectDuration::Rounds(3));
        assert_eq!(EffectDuration::from_components(0, 4, 0), EffectDuration::Turns(4));
    }

    #[test]
    fn zero_spans_normalize_to_instant() {
        assert!(EffectDuration::RealTime(Duration::ZERO).is_instant());
        assert!(EffectDuration::Rounds(0).is_instant());
        assert_eq!(EffectDuration::RealTime(Duration::ZERO).real_time(), None);
        assert_eq!(EffectDuration::seconds(2).real_time(), Some(Duration::from_secs(2)));
        assert!(EffectDuration::Turns(2).is_counter_based());
    }
}
