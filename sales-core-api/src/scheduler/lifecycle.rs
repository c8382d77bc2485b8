//! Lead lifecycle scheduler
//!
//! Ages leads once per interval and moves exhausted ones into the public sea:
//! - Decay: decrement loan intent of every lead inside the decay window
//! - Migration: release every owned lead whose loan intent reached zero
//!
//! Each step is its own transaction. A failed step is abandoned for the tick
//! and naturally retried on the next one.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use sales_core_db::models::SYSTEM_ACTOR_ID;
use sales_core_db::repository::{UnitOfWork, UnitOfWorkSession};

use crate::error::ServiceResult;
use crate::service::audit;

/// Result of one batch step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Committed; number of leads changed
    Completed(u64),
    /// Rolled back; retried on the next tick
    Failed(String),
    /// Not attempted because the previous run was still in progress
    Skipped,
}

impl StepOutcome {
    pub fn count(&self) -> u64 {
        match self {
            StepOutcome::Completed(count) => *count,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub decayed: StepOutcome,
    pub migrated: StepOutcome,
}

#[derive(Clone, Copy)]
enum Step {
    Decay,
    Migration,
}

impl Step {
    fn name(self) -> &'static str {
        match self {
            Step::Decay => "decay",
            Step::Migration => "migration",
        }
    }
}

pub struct LifecycleScheduler<U> {
    store: Arc<U>,
    interval: Duration,
    run_lock: Arc<Mutex<()>>,
}

impl<U> Clone for LifecycleScheduler<U> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            interval: self.interval,
            run_lock: self.run_lock.clone(),
        }
    }
}

impl<U: UnitOfWork + 'static> LifecycleScheduler<U> {
    pub fn new(store: Arc<U>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run decay then migration once.
    ///
    /// Returns immediately with both steps `Skipped` when another run of
    /// this scheduler is still in progress.
    pub async fn run_once(&self) -> TickReport {
        let Ok(_running) = self.run_lock.try_lock() else {
            warn!("previous lifecycle run still in progress, skipping tick");
            return TickReport {
                decayed: StepOutcome::Skipped,
                migrated: StepOutcome::Skipped,
            };
        };

        let decayed = self.run_step(Step::Decay).await;
        let migrated = self.run_step(Step::Migration).await;
        TickReport { decayed, migrated }
    }

    async fn run_step(&self, step: Step) -> StepOutcome {
        match self.apply(step).await {
            Ok(count) => {
                info!(step = step.name(), count, "lifecycle step committed");
                StepOutcome::Completed(count)
            }
            Err(e) => {
                warn!(step = step.name(), error = %e, "lifecycle step abandoned until next tick");
                StepOutcome::Failed(e.to_string())
            }
        }
    }

    async fn apply(&self, step: Step) -> ServiceResult<u64> {
        let session = self.store.begin().await?;
        let count = match step {
            Step::Decay => session.customers().decay_loan_intent().await?,
            Step::Migration => session.customers().migrate_exhausted_to_public_sea().await?,
        };
        if count > 0 {
            let action = match step {
                Step::Decay => format!("decayed loan intent of {count} customers"),
                Step::Migration => format!("moved {count} customers to the public sea"),
            };
            audit(&session, SYSTEM_ACTOR_ID, action).await?;
        }
        session.commit().await?;
        Ok(count)
    }

    /// Run on a background task every `interval` until the handle is stopped.
    ///
    /// Each tick runs on its own task so a slow run never delays the timer;
    /// the overlap guard in [`LifecycleScheduler::run_once`] turns such a tick
    /// into a no-op.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run_loop(shutdown_rx));
        SchedulerHandle { shutdown_tx, task }
    }

    async fn run_loop(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<JoinHandle<TickReport>> = None;

        info!(interval_secs = self.interval.as_secs(), "lifecycle scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let scheduler = self.clone();
                    in_flight = Some(tokio::spawn(async move { scheduler.run_once().await }));
                    debug!("lifecycle tick dispatched");
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("lifecycle scheduler shutting down");
                        break;
                    }
                }
            }
        }

        if let Some(run) = in_flight {
            let _ = run.await;
        }
    }
}

/// Handle for controlling a started scheduler
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the timer and wait for an in-flight run to finish
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
        info!("lifecycle scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}
