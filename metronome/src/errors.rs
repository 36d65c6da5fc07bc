// Error handling framework

use crate::unit::TimeUnit;
use thiserror::Error;

/// Schedule configuration errors.
///
/// These are programmer errors detected when a job is finalized or
/// rescheduled. They are fatal to the offending call and surface
/// synchronously; nothing in the scheduler retries them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("no recurrence unit was chosen before the job was finalized")]
    MissingUnit,

    #[error("frequency must be greater than or equal to 1")]
    InvalidFrequency,

    #[error("a clock-of-day can only be combined with day or weekday units, not '{unit}'")]
    ClockOfDayWithIntervalUnit { unit: TimeUnit },

    #[error("'{unit}' recurs exactly once per week and cannot take frequency {frequency}")]
    FrequencyWithWeekdayUnit { unit: TimeUnit, frequency: u32 },
}
