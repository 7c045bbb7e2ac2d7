//! Fixed-step simulation driver.
//!
//! Wall-clock time is fed in as elapsed spans of any size. The driver
//! accumulates them and advances the simulation clock in exact `step`
//! increments, running one update pass per completed step. Effects whose
//! tick rate is a multiple of the step therefore never miss a boundary, no
//! matter how irregular the samples are.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use effect_core::{Clock, EntityId, ManualClock, UpdateReport};

use crate::registry::EntityRegistry;

/// Outcome of one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Zero for the initial pass at the starting instant.
    pub step: u64,
    pub at: DateTime<Utc>,
    pub updates: Vec<(EntityId, UpdateReport)>,
}

#[derive(Debug)]
pub struct FixedStepDriver {
    step: Duration,
    accumulator: Duration,
    clock: Arc<ManualClock>,
    steps: u64,
}

impl FixedStepDriver {
    pub const MIN_STEP: Duration = Duration::from_millis(1);

    /// Steps shorter than [`Self::MIN_STEP`] are raised to it.
    pub fn new(step: Duration, clock: Arc<ManualClock>) -> Self {
        Self {
            step: step.max(Self::MIN_STEP),
            accumulator: Duration::ZERO,
            clock,
            steps: 0,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Current simulation time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Feeds elapsed wall time and returns the instant of every step it completes.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<DateTime<Utc>> {
        self.accumulator += elapsed;
        let mut due = Vec::new();
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.steps += 1;
            due.push(self.clock.advance(self.step));
        }
        due
    }

    /// Runs the initial update pass at the current instant without advancing.
    pub fn prime(&mut self, registry: &EntityRegistry) -> StepReport {
        let at = self.clock.now();
        StepReport {
            step: 0,
            at,
            updates: registry.update_all(at),
        }
    }

    /// Feeds elapsed wall time and updates every entity once per completed step.
    pub fn pump(&mut self, registry: &EntityRegistry, elapsed: Duration) -> Vec<StepReport> {
        let first = self.steps + 1;
        self.advance(elapsed)
            .into_iter()
            .zip(first..)
            .map(|(at, step)| StepReport {
                step,
                at,
                updates: registry.update_all(at),
            })
            .collect()
    }
}
