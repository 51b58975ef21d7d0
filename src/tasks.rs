use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

/// Allows at most one tick of a recurring task to be in flight.
#[derive(Clone, Default)]
pub struct SingleFlight(Arc<AtomicBool>);

/// Held while a tick runs; releases the guard on drop, including on panic.
pub struct FlightPermit(Arc<AtomicBool>);

impl SingleFlight {
    pub fn try_acquire(&self) -> Option<FlightPermit> {
        match self.0.swap(true, Ordering::AcqRel) {
            true => None,
            false => Some(FlightPermit(self.0.clone())),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs `job` every `period`, first one period from now, until `cancel` fires.
///
/// Ticks are anchored to the start time rather than to the end of the previous
/// run. A tick that comes due while the previous one is still running is
/// skipped.
pub fn spawn_recurring<F, Fut>(
    name: String,
    period: Duration,
    cancel: CancellationToken,
    job: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let flight = SingleFlight::default();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let Some(permit) = flight.try_acquire() else {
                tracing::debug!("{name}: previous tick still running, skipping");
                continue;
            };

            let tick_cancel = cancel.clone();
            let work = job();
            let tick = tokio::spawn(async move {
                tokio::select! {
                    _ = tick_cancel.cancelled() => {}
                    _ = work => {}
                }
            });

            let name = name.clone();
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = tick.await {
                    if e.is_panic() {
                        tracing::error!("{name}: tick panicked: {e}");
                    }
                }
            });
        }

        tracing::debug!("{name}: stopped");
    })
}

/// The two recurring tasks owned by one account.
pub struct AccountTasks {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl AccountTasks {
    pub fn new(cancel: CancellationToken, handles: Vec<JoinHandle<()>>) -> Self {
        Self { cancel, handles }
    }

    pub fn stop(self) {
        self.cancel.cancel();
        for handle in self.handles {
            handle.abort();
        }
    }
}

/// Recurring tasks keyed by account index.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<usize, AccountTasks>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `tasks` for `index`, stopping whatever was registered before.
    /// Returns `true` when an older set of tasks was replaced.
    pub fn register(&self, index: usize, tasks: AccountTasks) -> bool {
        let previous = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index, tasks);

        match previous {
            Some(old) => {
                old.stop();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops every registered task and returns how many accounts were running.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<_> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, tasks)| tasks)
            .collect();

        let count = drained.len();
        drained.into_iter().for_each(AccountTasks::stop);
        count
    }
}
