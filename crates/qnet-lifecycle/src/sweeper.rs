//! # Deadline Sweeper
//!
//! Periodic driver for [`LifecycleManager::check_deadlines`]. The manager
//! itself never depends on a ticking timer — deadline evaluation is a
//! wall-clock comparison — so this task is just the external scheduler:
//! it reads `now` from a [`Clock`] on each tick and hands it to the
//! manager. Skipping or stacking ticks is harmless because the policy is
//! idempotent and transitions are monotonic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::Clock;
use crate::manager::LifecycleManager;

/// Default sweep period.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(30);

/// Periodic deadline sweeper.
pub struct DeadlineSweeper {
    manager: Arc<LifecycleManager>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl DeadlineSweeper {
    /// Create a sweeper over `manager`, reading time from `clock` every
    /// `period`.
    pub fn new(manager: Arc<LifecycleManager>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self {
            manager,
            clock,
            period,
        }
    }

    /// Run the sweep loop until `shutdown` flips to `true` (or its sender
    /// is dropped).
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(period_secs = self.period.as_secs(), "deadline sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    let transitioned = self.manager.check_deadlines(now);
                    if !transitioned.is_empty() {
                        tracing::info!(
                            count = transitioned.len(),
                            now = %now,
                            "sweep auto-published questions past review deadline"
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("deadline sweeper stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Spawn the sweep loop on the current tokio runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

impl std::fmt::Debug for DeadlineSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlineSweeper")
            .field("period", &self.period)
            .finish()
    }
}
