// Job records and the fluent configuration surface.

use crate::errors::ScheduleError;
use crate::schedule::{self, ClockTime, Recurrence};
use crate::scheduler::SchedulerCore;
use crate::unit::TimeUnit;
use chrono::{DateTime, Local, Weekday};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// The boxed unit of work a job dispatches. It runs detached on its own
/// task; the scheduler neither awaits nor cancels it.
pub(crate) type Work = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone, Copy, Default)]
struct JobState {
    next_run: Option<DateTime<Local>>,
    stopped: bool,
}

/// A registered recurring job.
///
/// Jobs are created through [`crate::Scheduler::schedule`] and finalized by
/// [`JobBuilder::run`]. Once registered, the poll loop is the only writer of
/// the job's scheduling state, apart from an explicit [`Job::stop`].
pub struct Job {
    id: Uuid,
    recurrence: Recurrence,
    work: Work,
    state: RwLock<JobState>,
    owner: Weak<SchedulerCore>,
}

impl Job {
    pub(crate) fn new(recurrence: Recurrence, work: Work, owner: Weak<SchedulerCore>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recurrence,
            work,
            state: RwLock::new(JobState::default()),
            owner,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    /// The job's next scheduled run, or `None` once stopped.
    pub async fn next_run(&self) -> Option<DateTime<Local>> {
        self.state.read().await.next_run
    }

    pub async fn is_stopped(&self) -> bool {
        self.state.read().await.stopped
    }

    /// True when `now` is strictly after the stored next run.
    pub async fn due(&self, now: DateTime<Local>) -> bool {
        let state = self.state.read().await;
        !state.stopped && state.next_run.is_some_and(|next| now > next)
    }

    /// Advance the next scheduled run, using the current one as the anchor.
    /// No-op once the job is stopped.
    pub async fn schedule_next(&self, now: DateTime<Local>) -> Result<(), ScheduleError> {
        let mut state = self.state.write().await;
        if state.stopped {
            return Ok(());
        }
        let next = schedule::next_run(&self.recurrence, state.next_run, now)?;
        debug!(job_id = %self.id, next_run = %next, "next run scheduled");
        state.next_run = Some(next);
        Ok(())
    }

    /// Launch the job's callback on its own task, fire-and-forget.
    pub(crate) fn dispatch(&self) {
        tokio::spawn((self.work)());
    }

    /// Stop the job permanently. Idempotent.
    ///
    /// The job can never be due again and is removed from the owning
    /// scheduler's registry. A callback already in flight keeps running.
    pub async fn stop(&self) {
        {
            let mut state = self.state.write().await;
            state.stopped = true;
            state.next_run = None;
        }
        if let Some(core) = self.owner.upgrade() {
            core.remove_job(self.id).await;
        }
        debug!(job_id = %self.id, "job stopped");
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("recurrence", &self.recurrence)
            .finish_non_exhaustive()
    }
}

/// Fluent configuration for a job not yet in the registry.
///
/// Setters perform no validation and can be chained in any order; all
/// cross-field consistency is checked when [`JobBuilder::run`] finalizes the
/// job. Frequency defaults to 1.
#[must_use = "a job builder does nothing until `run` attaches a callback"]
pub struct JobBuilder {
    owner: Arc<SchedulerCore>,
    recurrence: Recurrence,
}

impl JobBuilder {
    pub(crate) fn new(owner: Arc<SchedulerCore>) -> Self {
        Self {
            owner,
            recurrence: Recurrence::default(),
        }
    }

    /// Set the frequency multiplier, e.g. `every(10).seconds()`.
    pub fn every(mut self, frequency: u32) -> Self {
        self.recurrence.frequency = frequency;
        self
    }

    fn unit(mut self, unit: TimeUnit) -> Self {
        self.recurrence.unit = Some(unit);
        self
    }

    pub fn second(self) -> Self {
        self.unit(TimeUnit::Second)
    }

    pub fn seconds(self) -> Self {
        self.unit(TimeUnit::Second)
    }

    pub fn minute(self) -> Self {
        self.unit(TimeUnit::Minute)
    }

    pub fn minutes(self) -> Self {
        self.unit(TimeUnit::Minute)
    }

    pub fn hour(self) -> Self {
        self.unit(TimeUnit::Hour)
    }

    pub fn hours(self) -> Self {
        self.unit(TimeUnit::Hour)
    }

    pub fn day(self) -> Self {
        self.unit(TimeUnit::Day)
    }

    pub fn days(self) -> Self {
        self.unit(TimeUnit::Day)
    }

    pub fn week(self) -> Self {
        self.unit(TimeUnit::Week)
    }

    pub fn weeks(self) -> Self {
        self.unit(TimeUnit::Week)
    }

    pub fn monday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Mon))
    }

    pub fn tuesday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Tue))
    }

    pub fn wednesday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Wed))
    }

    pub fn thursday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Thu))
    }

    pub fn friday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Fri))
    }

    pub fn saturday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Sat))
    }

    pub fn sunday(self) -> Self {
        self.unit(TimeUnit::Weekday(Weekday::Sun))
    }

    /// Set the clock-of-day from an `"HH:MM"` literal.
    ///
    /// Parsing is best-effort (see [`ClockTime::parse`]); only valid for day
    /// and weekday units, which `run` enforces.
    pub fn at(mut self, literal: &str) -> Self {
        self.recurrence.at = Some(ClockTime::parse(literal));
        self
    }

    /// Attach the work callback and register the job.
    ///
    /// Computes the job's first next-run, surfacing any configuration error
    /// before the job becomes visible, then inserts it into the registry
    /// under the write lock. Returns the job's id.
    pub async fn run<F, Fut>(self, work: F) -> Result<Uuid, ScheduleError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let work: Work = Box::new(move || -> BoxFuture<'static, ()> { Box::pin(work()) });
        self.owner.insert_job(self.recurrence, work).await
    }
}
