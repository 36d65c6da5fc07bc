// Recurrence descriptors and next-run calculation.
//
// All calendar alignment and validation logic for the scheduler lives here.
// The functions are pure given the caller-supplied anchor and "now", so the
// whole module can be pinned under a fixed clock in tests.

use crate::errors::ScheduleError;
use crate::unit::TimeUnit;
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Weekday,
};
use serde::{Deserialize, Serialize};

/// An hour/minute offset applied on top of a calendar boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Parse an `"HH:MM"` literal best-effort.
    ///
    /// Pieces that are missing or fail to parse become 0; no range check is
    /// applied, so an oversized hour simply acts as a larger offset from
    /// midnight. Callers wanting strict validation do it upstream.
    pub fn parse(literal: &str) -> Self {
        match literal.split_once(':') {
            Some((hour, minute)) => Self {
                hour: hour.trim().parse().unwrap_or(0),
                minute: minute.trim().parse().unwrap_or(0),
            },
            None => Self::default(),
        }
    }

    fn offset(self) -> Duration {
        Duration::hours(i64::from(self.hour)) + Duration::minutes(i64::from(self.minute))
    }
}

/// A job's recurrence description: unit, frequency multiplier, and optional
/// clock-of-day.
///
/// Built once through the fluent surface. The setters perform no cross-field
/// validation; [`next_run`] checks consistency before any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub unit: Option<TimeUnit>,
    pub frequency: u32,
    pub at: Option<ClockTime>,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            unit: None,
            frequency: 1,
            at: None,
        }
    }
}

/// Compute the next scheduled run for `recurrence`.
///
/// `previous` is the job's current next-run when rescheduling after a
/// dispatch, or `None` when the job is being finalized for the first time.
/// `now` anchors first-time computations and must come from the scheduler's
/// injected clock.
///
/// Interval units (second, minute, hour, week) accumulate a fixed duration
/// on top of the anchor. `Day` and the weekday units align to a local
/// midnight (plus any clock-of-day offset) before the duration is added.
pub fn next_run(
    recurrence: &Recurrence,
    previous: Option<DateTime<Local>>,
    now: DateTime<Local>,
) -> Result<DateTime<Local>, ScheduleError> {
    let unit = recurrence.unit.ok_or(ScheduleError::MissingUnit)?;
    if recurrence.frequency == 0 {
        return Err(ScheduleError::InvalidFrequency);
    }
    if recurrence.at.is_some() && unit.is_interval() {
        return Err(ScheduleError::ClockOfDayWithIntervalUnit { unit });
    }
    if unit.weekday().is_some() && recurrence.frequency > 1 {
        return Err(ScheduleError::FrequencyWithWeekdayUnit {
            unit,
            frequency: recurrence.frequency,
        });
    }

    let frequency = i64::from(recurrence.frequency);
    let next = match unit {
        TimeUnit::Second => previous.unwrap_or(now) + Duration::seconds(frequency),
        TimeUnit::Minute => previous.unwrap_or(now) + Duration::minutes(frequency),
        TimeUnit::Hour => previous.unwrap_or(now) + Duration::hours(frequency),
        // 168 hours in a week
        TimeUnit::Week => previous.unwrap_or(now) + Duration::hours(168 * frequency),
        TimeUnit::Day => {
            let anchor = previous
                .unwrap_or_else(|| aligned(midnight_of(now.date_naive()), recurrence.at));
            anchor + Duration::hours(24 * frequency)
        }
        TimeUnit::Weekday(target) => next_weekday_run(target, recurrence.at, previous, now),
    };
    Ok(next)
}

/// Weekday scheduling: align to midnight of the most recent date whose
/// weekday matches `target`, apply the clock-of-day, then advance one full
/// week. The index arithmetic can land ahead of today (when the target's
/// Sunday-based index exceeds today's), and the week advance applies
/// unconditionally either way; that is the shipped behavior the test
/// fixtures pin down.
fn next_weekday_run(
    target: Weekday,
    at: Option<ClockTime>,
    previous: Option<DateTime<Local>>,
    now: DateTime<Local>,
) -> DateTime<Local> {
    let anchor = previous.unwrap_or_else(|| {
        let offset = i64::from(now.weekday().num_days_from_sunday())
            - i64::from(target.num_days_from_sunday());
        let date = now.date_naive() - Duration::days(offset);
        aligned(midnight_of(date), at)
    });
    anchor + Duration::days(7)
}

fn aligned(midnight: DateTime<Local>, at: Option<ClockTime>) -> DateTime<Local> {
    match at {
        Some(clock_time) => midnight + clock_time.offset(),
        None => midnight,
    }
}

/// Local midnight of `date`. When a DST transition makes midnight ambiguous
/// the earlier instant wins; when the transition skips midnight entirely the
/// first representable wall-clock time of the date stands in for it.
fn midnight_of(date: NaiveDate) -> DateTime<Local> {
    let mut candidate = date.and_time(NaiveTime::MIN);
    loop {
        match Local.from_local_datetime(&candidate) {
            LocalResult::Single(instant) => return instant,
            LocalResult::Ambiguous(earlier, _) => return earlier,
            LocalResult::None => candidate = candidate + Duration::minutes(30),
        }
    }
}
