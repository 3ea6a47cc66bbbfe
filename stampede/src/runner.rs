//! Scenario runner: a fixed pool of virtual-user tasks driving a scenario
//! function for a configured duration.

use crate::aggregator::{Aggregator, WorkerRecorder};
use crate::executor::HttpExecutor;
use crate::Error;
use stampede_core::{RequestOutcome, RunConfig, RunSummary};
use std::future::Future;
use std::pin::pin;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Lifecycle of a run. Terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    /// Duration elapsed or abort requested; workers finishing in-flight
    /// requests.
    Draining,
    Completed,
    Aborted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Aborted)
    }
}

pub(crate) fn valid_transition(from: RunState, to: RunState) -> bool {
    use RunState::*;
    matches!(
        (from, to),
        (Idle, Running)
            | (Running, Draining)
            | (Running, Aborted)
            | (Draining, Completed)
            | (Draining, Aborted)
    )
}

/// Clonable handle that requests cancellation of a run.
///
/// Workers observe the stop flag at their next loop checkpoint; an in-flight
/// request is never interrupted, so the worst-case delay to cancellation is
/// one request timeout.
#[derive(Clone)]
pub struct AbortHandle {
    stop: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl AbortHandle {
    fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn abort(&self) {
        self.stop.store(true, Ordering::Relaxed);
        self.notify.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    async fn wait_aborted(&self) {
        let mut notified = pin!(self.notify.notified());
        notified.as_mut().enable();
        if self.is_aborted() {
            return;
        }
        notified.await;
    }
}

/// Drives `virtual_users` independent workers, each looping over the
/// scenario function until the configured duration elapses or the run is
/// aborted. Collects every outcome and finalizes a [`RunSummary`].
pub struct Runner<T> {
    func: T,
    config: RunConfig,
    state: RunState,
    abort: AbortHandle,
}

impl<T, F> Runner<T>
where
    T: Fn() -> F + Send + Sync + 'static + Clone,
    F: Future<Output = RequestOutcome> + Send,
{
    pub fn new(config: RunConfig, func: T) -> Self {
        Self {
            func,
            config,
            state: RunState::Idle,
            abort: AbortHandle::new(),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    #[instrument(name = "run", skip_all, fields(virtual_users = self.config.virtual_users))]
    pub async fn run(mut self) -> RunSummary {
        info!(
            "Starting run: {} virtual users for {:?}",
            self.config.virtual_users, self.config.duration
        );

        self.advance(RunState::Running);
        let start = Instant::now();
        let deadline = start + self.config.duration;
        let aggregator = Aggregator::new();

        let mut workers = Vec::with_capacity(self.config.virtual_users);
        for id in 0..self.config.virtual_users {
            workers.push(spawn_worker(
                id,
                self.func.clone(),
                aggregator.recorder(),
                self.abort.stop.clone(),
                start,
                self.config.duration,
                self.config.pause,
            ));
        }

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {}
            _ = self.abort.wait_aborted() => {
                debug!("Abort requested");
            }
        }

        self.advance(RunState::Draining);
        for worker in workers {
            if worker.await.is_err() {
                // Executors never return errors, so a panic here is a bug
                // in a custom scenario function.
                error!("Worker panicked; its in-flight outcome is lost");
            }
        }

        let elapsed = start.elapsed();
        let summary = aggregator.finalize(elapsed);
        if self.abort.is_aborted() {
            self.advance(RunState::Aborted);
        } else {
            self.advance(RunState::Completed);
        }

        info!("Run {:?} after {:?}: {}", self.state, elapsed, summary);
        summary
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(valid_transition(self.state, next));
        if self.state.is_terminal() {
            warn!("Ignoring transition out of terminal state {:?}", self.state);
            return;
        }
        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn spawn_worker<T, F>(
    id: usize,
    func: T,
    recorder: WorkerRecorder,
    stop: Arc<AtomicBool>,
    start: Instant,
    duration: Duration,
    pause: Duration,
) -> JoinHandle<()>
where
    T: Fn() -> F + Send + Sync + 'static,
    F: Future<Output = RequestOutcome> + Send,
{
    tokio::spawn(async move {
        loop {
            if stop.load(Ordering::Relaxed) || start.elapsed() >= duration {
                break;
            }

            let outcome = func().await;
            recorder.record(outcome);

            // Re-check before pausing so the last iteration does not add a
            // pointless sleep past the deadline.
            if stop.load(Ordering::Relaxed) || start.elapsed() >= duration {
                break;
            }
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        trace!("Worker {id} finished");
    })
}

/// Runs the configured HTTP workload to completion.
pub async fn run_http(config: RunConfig) -> Result<RunSummary, Error> {
    config.validate()?;
    let executor = HttpExecutor::new(&config)?;
    let runner = Runner::new(config, move || {
        let executor = executor.clone();
        async move { executor.execute().await }
    });
    Ok(runner.run().await)
}
