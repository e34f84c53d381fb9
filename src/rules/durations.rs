//! Durations ("3 nights", "für zwei Wochen") and their combinations with
//! times and intervals.

use crate::artifact::{Duration, DurationUnit, Interval, Time};
use crate::RuleDef;

use super::helpers::{int_group, time_from_date};

const UNITS: &str = r"(?P<unit>min(ute)?s?|minuten?|hours?|stunden?|std\.?|days?|tag(en?)?|nights?|nächte?n?|nacht|weeks?|wochen?|months?|monat(e|en)?)";

fn unit_from_text(text: &str) -> Option<DurationUnit> {
    let text = text.to_lowercase();
    if text.starts_with("min") {
        Some(DurationUnit::Minutes)
    } else if text.starts_with("hour") || text.starts_with("stunde") || text.starts_with("std") {
        Some(DurationUnit::Hours)
    } else if text.starts_with("day") || text.starts_with("tag") {
        Some(DurationUnit::Days)
    } else if text.starts_with("night") || text.starts_with("nacht") || text.starts_with("näch") {
        Some(DurationUnit::Nights)
    } else if text.starts_with("week") || text.starts_with("woche") {
        Some(DurationUnit::Weeks)
    } else if text.starts_with("month") || text.starts_with("monat") {
        Some(DurationUnit::Months)
    } else {
        None
    }
}

/// "3 nights", "45 min", "2 Wochen".
pub(crate) fn rule_digit_duration() -> RuleDef {
    rule! {
        name: "<n> <duration-unit>",
        pattern: [re!(format!(r"\b(?P<num>\d{{1,3}})\s*{UNITS}\b"))],
        prod: |_ts, args| -> Option<Duration> {
            let m = args[0].as_regex_match()?;
            Some(Duration {
                value: int_group(m, "num")?,
                unit: unit_from_text(m.group("unit")?)?,
                span: Default::default(),
            })
        },
    }
}

const SMALL_NUMBERS: &[(&str, i64)] = &[
    ("a", 1),
    ("an", 1),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("ein", 1),
    ("eine", 1),
    ("einen", 1),
    ("zwei", 2),
    ("drei", 3),
    ("vier", 4),
    ("fünf", 5),
    ("sechs", 6),
    ("sieben", 7),
    ("acht", 8),
    ("neun", 9),
    ("zehn", 10),
];

/// "a week", "zwei Nächte", "three days".
pub(crate) fn rule_named_number_duration() -> RuleDef {
    rule! {
        name: "<number-word> <duration-unit>",
        pattern: [re!(format!(
            r"\b(?P<num>an?|one|two|three|four|five|six|seven|eight|nine|ten|eine?n?|zwei|drei|vier|fünf|sechs|sieben|acht|neun|zehn)\s+{UNITS}\b"
        ))],
        prod: |_ts, args| -> Option<Duration> {
            let m = args[0].as_regex_match()?;
            let word = m.group("num")?.to_lowercase();
            let (_, value) = SMALL_NUMBERS.iter().find(|(name, _)| *name == word)?;
            Some(Duration {
                value: *value,
                unit: unit_from_text(m.group("unit")?)?,
                span: Default::default(),
            })
        },
    }
}

/// Minutes between the two ends of a same-day or overnight clock pair.
fn clock_minutes(from: &Time, to: &Time) -> Option<i64> {
    let minutes =
        |t: &Time| Some(t.hour? as i64 * 60 + t.minute.unwrap_or(0) as i64);
    let delta = minutes(to)? - minutes(from)?;
    Some(if delta <= 0 { delta + 24 * 60 } else { delta })
}

/// Whether the interval is exactly `duration` long, measured in the
/// duration's own unit. Nights and days both count date steps; weeks count
/// seven of them; hours and minutes compare on the clock.
fn interval_matches_duration(interval: &Interval, duration: &Duration) -> bool {
    let (Some(from), Some(to)) = (&interval.t_from, &interval.t_to) else {
        return false;
    };
    match (from.dt(), to.dt()) {
        (Some(from_dt), Some(to_dt)) => {
            let delta = to_dt - from_dt;
            match duration.unit {
                DurationUnit::Nights | DurationUnit::Days => delta.num_days() == duration.value,
                DurationUnit::Weeks => delta.num_days() == duration.value * 7,
                DurationUnit::Hours => delta.num_minutes() == duration.value * 60,
                DurationUnit::Minutes => delta.num_minutes() == duration.value,
                DurationUnit::Months => {
                    super::helpers::shift_months(from_dt.date(), duration.value as i32)
                        == Some(to_dt.date())
                }
            }
        }
        // no dates: compare on the clock alone
        _ => match (duration.unit, clock_minutes(from, to)) {
            (DurationUnit::Hours, Some(minutes)) => minutes == duration.value * 60,
            (DurationUnit::Minutes, Some(minutes)) => minutes == duration.value,
            _ => false,
        },
    }
}

/// "15-18 Nov for 3 nights": the duration corroborates the interval; the
/// two must agree for the rule to fire.
pub(crate) fn rule_interval_duration() -> RuleDef {
    rule! {
        name: "<interval> for <duration>",
        pattern: [dim!(Interval), re!(r"\b(für|for)\b"), dim!(Duration)],
        prod: |_ts, args| -> Option<Interval> {
            let interval = args[0].as_interval()?;
            let duration = args[2].as_duration()?;
            if !interval_matches_duration(interval, duration) {
                return None;
            }
            Some(interval.clone())
        },
    }
}

/// "Nov 15 for 3 nights", "8:00 for 2 hours": a start plus a duration
/// spans an interval.
pub(crate) fn rule_time_duration() -> RuleDef {
    rule! {
        name: "<time> for <duration>",
        pattern: [dim!(Time), re!(r"\b(für|for)\b"), dim!(Duration)],
        prod: |_ts, args| -> Option<Interval> {
            let start = args[0].as_time()?;
            let duration = args[2].as_duration()?;
            let end = duration_end(start, duration)?;
            Some(Interval {
                t_from: Some(start.clone()),
                t_to: Some(end),
                ..Interval::default()
            })
        },
    }
}

fn duration_end(start: &Time, duration: &Duration) -> Option<Time> {
    match duration.unit {
        DurationUnit::Days | DurationUnit::Nights | DurationUnit::Weeks => {
            let days = match duration.unit {
                DurationUnit::Weeks => duration.value * 7,
                _ => duration.value,
            };
            let date = start.dt()?.date().checked_add_days(chrono::Days::new(days as u64))?;
            Some(time_from_date(date))
        }
        DurationUnit::Months => {
            let date =
                super::helpers::shift_months(start.dt()?.date(), duration.value as i32)?;
            Some(time_from_date(date))
        }
        DurationUnit::Hours | DurationUnit::Minutes => {
            let add = match duration.unit {
                DurationUnit::Hours => duration.value * 60,
                _ => duration.value,
            };
            if start.has_date() {
                let end = start.dt()? + chrono::Duration::minutes(add);
                use chrono::{Datelike, Timelike};
                Some(Time {
                    year: Some(end.year()),
                    month: Some(end.month()),
                    day: Some(end.day()),
                    hour: Some(end.hour()),
                    minute: Some(end.minute()),
                    ..Time::default()
                })
            } else {
                let minutes =
                    (start.hour? as i64 * 60 + start.minute.unwrap_or(0) as i64 + add)
                        .rem_euclid(24 * 60);
                Some(Time {
                    hour: Some((minutes / 60) as u32),
                    minute: Some((minutes % 60) as u32),
                    ..Time::default()
                })
            }
        }
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![
        rule_digit_duration(),
        rule_named_number_duration(),
        rule_interval_duration(),
        rule_time_duration(),
    ]
}
