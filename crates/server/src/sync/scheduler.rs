use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::coordinator::{Coordinator, CycleReport};

#[derive(Default)]
struct CycleSlot {
    running: AtomicBool,
    released: Notify,
}

/// Holds the single "cycle in progress" slot; releases it on drop.
pub struct CycleGuard {
    slot: Arc<CycleSlot>,
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.slot.running.store(false, Ordering::Release);
        self.slot.released.notify_waiters();
    }
}

/// Fires sync cycles at startup and on a fixed interval, never two at once.
pub struct SyncScheduler {
    coordinator: Arc<Coordinator>,
    interval: Duration,
    slot: Arc<CycleSlot>,
}

impl SyncScheduler {
    pub fn new(coordinator: Arc<Coordinator>, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
            slot: Arc::new(CycleSlot::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot.running.load(Ordering::Acquire)
    }

    /// Claim the cycle slot, or `None` if a cycle is already running.
    pub fn try_begin(&self) -> Option<CycleGuard> {
        self.slot
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CycleGuard {
                slot: self.slot.clone(),
            })
    }

    /// Resolves once no cycle holds the slot, including one started by the
    /// admin trigger outside the scheduler loop.
    pub async fn wait_idle(&self) {
        loop {
            let released = self.slot.released.notified();
            tokio::pin!(released);
            // Register before re-checking so a release in between is not missed
            released.as_mut().enable();
            if !self.is_running() {
                return;
            }
            released.await;
        }
    }

    /// Run a cycle while holding `guard`.
    pub async fn run_with(&self, guard: CycleGuard) -> CycleReport {
        let report = self.coordinator.run_cycle().await;
        drop(guard);
        report
    }

    /// Run a cycle unless one is already in flight.
    pub async fn try_run_cycle(&self) -> Option<CycleReport> {
        match self.try_begin() {
            Some(guard) => Some(self.run_with(guard).await),
            None => {
                warn!("Sync cycle already in progress, skipping trigger");
                None
            }
        }
    }

    /// Scheduler loop. The first tick fires immediately; later ticks that
    /// fall behind a long cycle are delayed rather than bunched up.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Rating sync scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.try_run_cycle().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let stopping = *shutdown.borrow();
            if stopping {
                break;
            }
        }

        if self.is_running() {
            info!("Waiting for in-flight sync cycle before stopping");
            self.wait_idle().await;
        }

        info!("Rating sync scheduler stopped");
    }
}
