//! Background driver task.
//!
//! [`EffectRuntime`] owns a tokio task that feeds wall-clock time into a
//! [`FixedStepDriver`] and publishes what happened on a broadcast channel.
//! The task stops when [`EffectRuntime::shutdown`] is called or the runtime
//! is dropped.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use effect_core::{EntityId, ManualClock, UpdateReport};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::driver::{FixedStepDriver, StepReport};
use crate::error::{Result, RuntimeError};
use crate::registry::EntityRegistry;

/// Runtime configuration shared by the orchestrator and the driver task.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Simulation step. Tick rates should be multiples of it.
    pub step: Duration,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(250),
            event_buffer_size: 100,
        }
    }
}

/// Events published by the driver task.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeEvent {
    /// An entity's effects ticked or expired during a step.
    Updated {
        entity: EntityId,
        at: DateTime<Utc>,
        report: UpdateReport,
    },
    /// An entity's health reached zero. Published once per entity.
    Defeated { entity: EntityId, at: DateTime<Utc> },
    StepCompleted { step: u64, at: DateTime<Utc> },
}

pub struct EffectRuntime {
    registry: Arc<EntityRegistry>,
    clock: Arc<ManualClock>,
    events: broadcast::Sender<RuntimeEvent>,
    shutdown_tx: oneshot::Sender<()>,
    worker: JoinHandle<u64>,
}

impl EffectRuntime {
    /// Spawns the driver task on the current tokio runtime.
    ///
    /// Characters in `registry` should share `clock` so immunity expiry
    /// follows simulation time.
    pub fn start(
        config: RuntimeConfig,
        registry: Arc<EntityRegistry>,
        clock: Arc<ManualClock>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer_size.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = DriverWorker {
            driver: FixedStepDriver::new(config.step, Arc::clone(&clock)),
            registry: Arc::clone(&registry),
            events: events.clone(),
            shutdown_rx,
            defeated: HashSet::new(),
        };
        info!("starting effect driver with a {:?} step", worker.driver.step());
        let worker = tokio::spawn(worker.run());

        Self {
            registry,
            clock,
            events,
            shutdown_tx,
            worker,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// Simulation clock advanced by the driver.
    pub fn clock(&self) -> &Arc<ManualClock> {
        &self.clock
    }

    /// Stops the driver task and returns the number of steps it completed.
    pub async fn shutdown(self) -> Result<u64> {
        // The worker may already have exited; nothing to signal then.
        let _ = self.shutdown_tx.send(());
        let steps = self.worker.await.map_err(RuntimeError::WorkerJoin)?;
        info!("effect driver stopped after {} steps", steps);
        Ok(steps)
    }
}

struct DriverWorker {
    driver: FixedStepDriver,
    registry: Arc<EntityRegistry>,
    events: broadcast::Sender<RuntimeEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    defeated: HashSet<EntityId>,
}

impl DriverWorker {
    async fn run(mut self) -> u64 {
        let initial = self.driver.prime(&self.registry);
        self.publish(initial);

        let mut interval = tokio::time::interval(self.driver.step());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                _ = &mut self.shutdown_rx => {
                    debug!("shutdown signal received");
                    break;
                }
                _ = interval.tick() => {
                    let now = Instant::now();
                    let elapsed = now.duration_since(last);
                    last = now;
                    for report in self.driver.pump(&self.registry, elapsed) {
                        self.publish(report);
                    }
                }
            }
        }
        self.driver.steps_taken()
    }

    fn publish(&mut self, report: StepReport) {
        for (entity, update) in report.updates {
            self.send(RuntimeEvent::Updated {
                entity,
                at: report.at,
                report: update,
            });

            let depleted = self
                .registry
                .get(entity)
                .is_ok_and(|character| !character.is_alive());
            if depleted && self.defeated.insert(entity) {
                info!("{} was defeated", entity);
                self.send(RuntimeEvent::Defeated {
                    entity,
                    at: report.at,
                });
            }
        }
        self.send(RuntimeEvent::StepCompleted {
            step: report.step,
            at: report.at,
        });
    }

    fn send(&self, event: RuntimeEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
