// Property-based and fixed-clock tests for the next-run calculator.

use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Timelike, Weekday};
use metronome::{next_run, ClockTime, Recurrence, ScheduleError, TimeUnit};
use proptest::prelude::*;

fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .expect("unambiguous local time")
}

// The fixture instant used across these tests: 01:01:00 on Jan 1 of
// year 1, which falls on a Monday.
fn fixture_now() -> DateTime<Local> {
    local(1, 1, 1, 1, 1, 0)
}

fn recurrence(unit: TimeUnit, frequency: u32, at: Option<&str>) -> Recurrence {
    Recurrence {
        unit: Some(unit),
        frequency,
        at: at.map(ClockTime::parse),
    }
}

fn first_run(rec: &Recurrence) -> DateTime<Local> {
    next_run(rec, None, fixture_now()).expect("valid recurrence")
}

// ---------------------------------------------------------------------------
// Fixed-clock fixtures
// ---------------------------------------------------------------------------

#[test]
fn every_ten_seconds() {
    let rec = recurrence(TimeUnit::Second, 10, None);
    assert_eq!(first_run(&rec), local(1, 1, 1, 1, 1, 10));
}

#[test]
fn every_three_minutes() {
    let rec = recurrence(TimeUnit::Minute, 3, None);
    assert_eq!(first_run(&rec), local(1, 1, 1, 1, 4, 0));
}

#[test]
fn every_four_hours() {
    let rec = recurrence(TimeUnit::Hour, 4, None);
    assert_eq!(first_run(&rec), local(1, 1, 1, 5, 1, 0));
}

#[test]
fn every_two_days_at_twelve_thirty_two() {
    // Anchors at today's midnight plus the clock-of-day, even though that
    // instant is already past, then adds two days.
    let rec = recurrence(TimeUnit::Day, 2, Some("12:32"));
    assert_eq!(first_run(&rec), local(1, 1, 3, 12, 32, 0));
}

#[test]
fn every_twelve_weeks() {
    let rec = recurrence(TimeUnit::Week, 12, None);
    assert_eq!(first_run(&rec), local(1, 3, 26, 1, 1, 0));
}

#[test]
fn every_single_second() {
    let rec = recurrence(TimeUnit::Second, 1, None);
    assert_eq!(first_run(&rec), local(1, 1, 1, 1, 1, 1));
}

#[test]
fn monday_at_nine_ten() {
    // Today is the target weekday, so the aligned occurrence is today's
    // midnight and the first fire lands a full week out.
    let rec = recurrence(TimeUnit::Weekday(Weekday::Mon), 1, Some("9:10"));
    assert_eq!(first_run(&rec), local(1, 1, 8, 9, 10, 0));
}

#[test]
fn tuesday_at_nine_ten() {
    let rec = recurrence(TimeUnit::Weekday(Weekday::Tue), 1, Some("9:10"));
    assert_eq!(first_run(&rec), local(1, 1, 9, 9, 10, 0));
}

#[test]
fn wednesday_at_nineteen_ten() {
    let rec = recurrence(TimeUnit::Weekday(Weekday::Wed), 1, Some("19:10"));
    assert_eq!(first_run(&rec), local(1, 1, 10, 19, 10, 0));
}

#[test]
fn thursday_at_nineteen_ten() {
    let rec = recurrence(TimeUnit::Weekday(Weekday::Thu), 1, Some("19:10"));
    assert_eq!(first_run(&rec), local(1, 1, 11, 19, 10, 0));
}

#[test]
fn friday_at_nineteen_ten() {
    let rec = recurrence(TimeUnit::Weekday(Weekday::Fri), 1, Some("19:10"));
    assert_eq!(first_run(&rec), local(1, 1, 12, 19, 10, 0));
}

#[test]
fn saturday_at_eight() {
    let rec = recurrence(TimeUnit::Weekday(Weekday::Sat), 1, Some("8:00"));
    assert_eq!(first_run(&rec), local(1, 1, 13, 8, 0, 0));
}

#[test]
fn sunday_at_eight() {
    // Sunday's index precedes Monday's, so the aligned occurrence is the
    // previous calendar day and the week advance lands on Jan 7.
    let rec = recurrence(TimeUnit::Weekday(Weekday::Sun), 1, Some("8:00"));
    assert_eq!(first_run(&rec), local(1, 1, 7, 8, 0, 0));
}

#[test]
fn configuration_errors_surface_before_any_arithmetic() {
    let rec = recurrence(TimeUnit::Second, 2, Some("10:00"));
    assert_eq!(
        next_run(&rec, None, fixture_now()),
        Err(ScheduleError::ClockOfDayWithIntervalUnit {
            unit: TimeUnit::Second
        })
    );

    let rec = recurrence(TimeUnit::Weekday(Weekday::Mon), 2, None);
    assert_eq!(
        next_run(&rec, None, fixture_now()),
        Err(ScheduleError::FrequencyWithWeekdayUnit {
            unit: TimeUnit::Weekday(Weekday::Mon),
            frequency: 2,
        })
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn interval_units() -> impl Strategy<Value = TimeUnit> {
    prop::sample::select(vec![
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Week,
    ])
}

fn weekdays() -> impl Strategy<Value = Weekday> {
    prop::sample::select(vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ])
}

fn unit_duration(unit: TimeUnit, frequency: u32) -> Duration {
    let frequency = i64::from(frequency);
    match unit {
        TimeUnit::Second => Duration::seconds(frequency),
        TimeUnit::Minute => Duration::minutes(frequency),
        TimeUnit::Hour => Duration::hours(frequency),
        TimeUnit::Week => Duration::hours(168 * frequency),
        TimeUnit::Day => Duration::hours(24 * frequency),
        TimeUnit::Weekday(_) => Duration::days(7),
    }
}

proptest! {
    /// Interval units add exactly `frequency x unit duration` to the anchor,
    /// with no drift or rounding.
    #[test]
    fn interval_units_add_exact_duration(
        unit in interval_units(),
        frequency in 1u32..5_000,
        offset_secs in 0i64..1_000_000,
    ) {
        let now = fixture_now() + Duration::seconds(offset_secs);
        let rec = recurrence(unit, frequency, None);

        let first = next_run(&rec, None, now).unwrap();
        prop_assert_eq!(first, now + unit_duration(unit, frequency));

        let second = next_run(&rec, Some(first), now).unwrap();
        prop_assert_eq!(second, first + unit_duration(unit, frequency));
    }

    /// Repeated rescheduling strictly increases the next run for every unit.
    #[test]
    fn rescheduling_is_strictly_monotonic(
        unit in prop_oneof![
            interval_units(),
            Just(TimeUnit::Day),
            weekdays().prop_map(TimeUnit::Weekday),
        ],
        frequency in 1u32..100,
        steps in 1usize..20,
    ) {
        let frequency = if unit.weekday().is_some() { 1 } else { frequency };
        let rec = recurrence(unit, frequency, None);
        let now = fixture_now();

        let mut previous = next_run(&rec, None, now).unwrap();
        for _ in 0..steps {
            let next = next_run(&rec, Some(previous), now).unwrap();
            prop_assert!(next > previous);
            previous = next;
        }
    }

    /// Any weekday unit rejects a frequency above 1.
    #[test]
    fn weekday_units_reject_frequency_above_one(
        weekday in weekdays(),
        frequency in 2u32..1_000,
    ) {
        let rec = recurrence(TimeUnit::Weekday(weekday), frequency, None);
        prop_assert_eq!(
            next_run(&rec, None, fixture_now()),
            Err(ScheduleError::FrequencyWithWeekdayUnit {
                unit: TimeUnit::Weekday(weekday),
                frequency,
            })
        );
    }

    /// Any interval unit rejects a clock-of-day.
    #[test]
    fn interval_units_reject_clock_of_day(
        unit in interval_units(),
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let rec = Recurrence {
            unit: Some(unit),
            frequency: 1,
            at: Some(ClockTime { hour, minute }),
        };
        prop_assert_eq!(
            next_run(&rec, None, fixture_now()),
            Err(ScheduleError::ClockOfDayWithIntervalUnit { unit })
        );
    }

    /// Weekday first runs land on the target weekday at the requested
    /// clock-of-day, between one and two weeks out when today matches or
    /// precedes the target in Sunday-based index order.
    #[test]
    fn weekday_first_run_lands_on_target_weekday(
        weekday in weekdays(),
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let rec = Recurrence {
            unit: Some(TimeUnit::Weekday(weekday)),
            frequency: 1,
            at: Some(ClockTime { hour, minute }),
        };
        let first = next_run(&rec, None, fixture_now()).unwrap();
        prop_assert_eq!(first.weekday(), weekday);
        prop_assert_eq!(first.hour(), hour);
        prop_assert_eq!(first.minute(), minute);
    }

    /// The best-effort "HH:MM" parser never panics and never invents values
    /// for inputs without a separator.
    #[test]
    fn clock_time_parse_never_panics(literal in "\\PC*") {
        let parsed = ClockTime::parse(&literal);
        if !literal.contains(':') {
            prop_assert_eq!(parsed, ClockTime::default());
        }
    }
}
