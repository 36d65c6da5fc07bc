//! Simple and intuitive in-process job scheduling.
//!
//! Jobs are described with a fluent recurrence chain and dispatched by a
//! background poll loop:
//!
//! ```no_run
//! use metronome::Scheduler;
//!
//! # async fn demo() -> Result<(), metronome::ScheduleError> {
//! let sched = Scheduler::new();
//!
//! sched.every(10).seconds().run(|| async { println!("tick"); }).await?;
//! sched.every(2).days().at("12:32").run(|| async { /* report */ }).await?;
//! sched.every_single().saturday().at("8:00").run(|| async { /* backup */ }).await?;
//!
//! sched.start();
//! # Ok(()) }
//! ```

pub mod clock;
pub mod config;
pub mod errors;
pub mod job;
pub mod schedule;
pub mod scheduler;
pub mod telemetry;
pub mod unit;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::ScheduleError;
pub use job::{Job, JobBuilder};
pub use schedule::{next_run, ClockTime, Recurrence};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use unit::TimeUnit;
