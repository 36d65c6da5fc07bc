// Recurrence units and their behavioral classes.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recurrence unit selectable through the fluent builder.
///
/// Units fall into two classes the next-run calculator treats differently:
/// interval units (`Second`, `Minute`, `Hour`, `Week`) add a fixed duration
/// to an anchor, while calendar units (`Day` and the weekdays) align to a
/// local midnight before any duration is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Weekday(Weekday),
}

impl TimeUnit {
    /// True for units scheduled as a fixed duration from an anchor.
    pub fn is_interval(self) -> bool {
        matches!(
            self,
            TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour | TimeUnit::Week
        )
    }

    /// True for units aligned to a calendar boundary before scheduling.
    pub fn is_calendar(self) -> bool {
        !self.is_interval()
    }

    /// The weekday this unit pins the schedule to, if any.
    pub fn weekday(self) -> Option<Weekday> {
        match self {
            TimeUnit::Weekday(weekday) => Some(weekday),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Weekday(Weekday::Mon) => "monday",
            TimeUnit::Weekday(Weekday::Tue) => "tuesday",
            TimeUnit::Weekday(Weekday::Wed) => "wednesday",
            TimeUnit::Weekday(Weekday::Thu) => "thursday",
            TimeUnit::Weekday(Weekday::Fri) => "friday",
            TimeUnit::Weekday(Weekday::Sat) => "saturday",
            TimeUnit::Weekday(Weekday::Sun) => "sunday",
        };
        f.write_str(name)
    }
}
