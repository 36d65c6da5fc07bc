// Job registry and the polling dispatch loop.

use crate::clock::{Clock, SystemClock};
use crate::errors::ScheduleError;
use crate::job::{Job, JobBuilder, Work};
use crate::schedule::Recurrence;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Configuration for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often the poll loop checks for due jobs.
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(333),
        }
    }
}

/// Shared state behind a [`Scheduler`] handle.
pub(crate) struct SchedulerCore {
    id: Uuid,
    pub(crate) clock: Arc<dyn Clock>,
    jobs: RwLock<HashMap<Uuid, Arc<Job>>>,
    poll_interval: RwLock<Duration>,
    shutdown_tx: broadcast::Sender<()>,
    running: AtomicBool,
}

impl SchedulerCore {
    /// Validate, schedule, and register a freshly configured job.
    pub(crate) async fn insert_job(
        self: Arc<Self>,
        recurrence: Recurrence,
        work: Work,
    ) -> Result<Uuid, ScheduleError> {
        let job = Arc::new(Job::new(recurrence, work, Arc::downgrade(&self)));
        job.schedule_next(self.clock.now()).await?;
        let id = job.id();
        self.jobs.write().await.insert(id, job);
        info!(scheduler_id = %self.id, job_id = %id, "job registered");
        Ok(id)
    }

    pub(crate) async fn remove_job(&self, id: Uuid) {
        if self.jobs.write().await.remove(&id).is_some() {
            debug!(scheduler_id = %self.id, job_id = %id, "job removed from registry");
        }
    }

    /// One sweep of the registry: reschedule and dispatch every due job.
    /// Jobs are visited in map order, which is unspecified; no part of the
    /// dispatch contract depends on sweep order.
    ///
    /// Holds only the read side of the registry lock, so finalization and
    /// stops from other tasks merely wait for the sweep, and callbacks run
    /// detached without delaying the next tick.
    async fn poll_once(&self) -> usize {
        let now = self.clock.now();
        let jobs = self.jobs.read().await;
        let mut dispatched = 0;
        for job in jobs.values() {
            if !job.due(now).await {
                continue;
            }
            if let Err(e) = job.schedule_next(now).await {
                error!(job_id = %job.id(), error = %e, "failed to reschedule job, skipping dispatch");
                continue;
            }
            job.dispatch();
            dispatched += 1;
        }
        dispatched
    }

    async fn run_loop(self: Arc<Self>, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(scheduler_id = %self.id, "scheduler loop started");
        loop {
            let interval = *self.poll_interval.read().await;
            tokio::select! {
                _ = sleep(interval) => {
                    let dispatched = self.poll_once().await;
                    if dispatched > 0 {
                        debug!(scheduler_id = %self.id, jobs_dispatched = dispatched, "dispatched due jobs");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!(scheduler_id = %self.id, "shutdown signal received, stopping scheduler loop");
                    break;
                }
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Handle to a job registry and its polling loop.
///
/// Clones share the same registry and loop. Jobs are configured through the
/// fluent surface:
///
/// ```no_run
/// # async fn demo() -> Result<(), metronome::ScheduleError> {
/// let sched = metronome::Scheduler::new();
/// sched.every(10).seconds().run(|| async { /* work */ }).await?;
/// sched.start();
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Scheduler {
    core: Arc<SchedulerCore>,
}

impl Scheduler {
    /// A scheduler on the wall clock with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default(), Arc::new(SystemClock))
    }

    /// A scheduler with an injected clock; tests pin a
    /// [`crate::FixedClock`] here.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(SchedulerConfig::default(), clock)
    }

    pub fn with_config(config: SchedulerConfig, clock: Arc<dyn Clock>) -> Self {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
        Self {
            core: Arc::new(SchedulerCore {
                id: Uuid::new_v4(),
                clock,
                jobs: RwLock::new(HashMap::new()),
                poll_interval: RwLock::new(config.poll_interval),
                shutdown_tx,
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Begin configuring a new job bound to this scheduler. The job is not
    /// visible in the registry until the builder's `run` finalizes it.
    pub fn schedule(&self) -> JobBuilder {
        JobBuilder::new(Arc::clone(&self.core))
    }

    /// Shorthand for `schedule().every(frequency)`.
    pub fn every(&self, frequency: u32) -> JobBuilder {
        self.schedule().every(frequency)
    }

    /// Shorthand for `every(1)`, the default frequency.
    pub fn every_single(&self) -> JobBuilder {
        self.schedule()
    }

    /// Start the poll loop on its own task and return immediately.
    ///
    /// Must be called from within a tokio runtime. Starting an already
    /// running scheduler is a no-op.
    pub fn start(&self) {
        if self.core.running.swap(true, Ordering::SeqCst) {
            warn!(scheduler_id = %self.core.id, "scheduler already running, ignoring start");
            return;
        }
        // Subscribe before spawning so a stop() issued right after start()
        // returns is buffered for the loop instead of sent to no receiver.
        let shutdown_rx = self.core.shutdown_tx.subscribe();
        tokio::spawn(Arc::clone(&self.core).run_loop(shutdown_rx));
    }

    /// Signal the loop to stop at its next polling boundary.
    ///
    /// Shutdown stops scheduling new work only: callbacks already dispatched
    /// keep running detached and are never awaited or cancelled.
    pub fn stop(&self) {
        let _ = self.core.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.core.running.load(Ordering::SeqCst)
    }

    /// Change how often the loop polls; takes effect from the next tick.
    pub async fn set_polling_interval(&self, interval: Duration) {
        *self.core.poll_interval.write().await = interval;
    }

    pub async fn polling_interval(&self) -> Duration {
        *self.core.poll_interval.read().await
    }

    /// Number of registered jobs.
    pub async fn size(&self) -> usize {
        self.core.jobs.read().await.len()
    }

    pub async fn get_job(&self, id: Uuid) -> Option<Arc<Job>> {
        self.core.jobs.read().await.get(&id).cloned()
    }

    pub async fn all_jobs(&self) -> Vec<Arc<Job>> {
        self.core.jobs.read().await.values().cloned().collect()
    }

    /// Stop and remove a job by id. Returns false when the id is unknown.
    pub async fn stop_job(&self, id: Uuid) -> bool {
        match self.get_job(id).await {
            Some(job) => {
                job.stop().await;
                true
            }
            None => false,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
