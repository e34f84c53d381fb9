//! Interval-forming rules: open ranges, closed ranges over dates and
//! times, and the date + time-interval combination with its day wrap.

use chrono::Days;

use crate::artifact::{Interval, Time};
use crate::RuleDef;

use super::helpers::{JOIN, time_from_date};
use super::predicates::{has_date, is_date, is_date_time, is_dom, is_doy, is_tod};

/// "before 9:00", "spätestens um 8" — an open interval ending at the time.
pub(crate) fn rule_before_time() -> RuleDef {
    rule! {
        name: "before <time>",
        pattern: [re!(r"\b(vor|before|spätestens( um)?|latest( at)?)\b"), dim!(Time)],
        prod: |_ts, args| -> Option<Interval> {
            Some(Interval {
                t_from: None,
                t_to: args[1].as_time().cloned(),
                ..Interval::default()
            })
        },
    }
}

/// "after 5 pm", "ab 17:00" — an open interval starting at the time.
pub(crate) fn rule_after_time() -> RuleDef {
    rule! {
        name: "after <time>",
        pattern: [re!(r"\b(nach|ab|after|frühe?stens( um)?|earliest( at)?)\b"), dim!(Time)],
        prod: |_ts, args| -> Option<Interval> {
            Some(Interval {
                t_from: args[1].as_time().cloned(),
                t_to: None,
                ..Interval::default()
            })
        },
    }
}

fn date_key(t: &Time) -> (i32, u32, u32) {
    (t.year.unwrap_or(0), t.month.unwrap_or(0), t.day.unwrap_or(0))
}

/// "8.5. - 12.5.2018" (after both sides resolved to dates). The range must
/// run forward; equal ends are rejected too.
pub(crate) fn rule_date_date() -> RuleDef {
    rule! {
        name: "<date> - <date>",
        pattern: [pred!(is_date), re!(JOIN), pred!(is_date)],
        prod: |_ts, args| -> Option<Interval> {
            let from = args[0].as_time()?;
            let to = args[2].as_time()?;
            if date_key(from) >= date_key(to) {
                return None;
            }
            Some(Interval {
                t_from: Some(from.clone()),
                t_to: Some(to.clone()),
                ..Interval::default()
            })
        },
    }
}

/// "15 - 18.11.2020": a bare day of month borrows year and month from the
/// right-hand date.
pub(crate) fn rule_dom_date() -> RuleDef {
    rule! {
        name: "<dom> - <date>",
        pattern: [pred!(is_dom), re!(JOIN), pred!(is_date)],
        prod: |_ts, args| -> Option<Interval> {
            let from_day = args[0].as_time()?.day?;
            let to = args[2].as_time()?;
            if from_day >= to.day? {
                return None;
            }
            Some(Interval {
                t_from: Some(Time {
                    year: to.year,
                    month: to.month,
                    day: Some(from_day),
                    ..Time::default()
                }),
                t_to: Some(to.clone()),
                ..Interval::default()
            })
        },
    }
}

/// "15.11. - 18.11.2020": a day of year borrows the year from the
/// right-hand date.
pub(crate) fn rule_doy_date() -> RuleDef {
    rule! {
        name: "<doy> - <date>",
        pattern: [pred!(is_doy), re!(JOIN), pred!(is_date)],
        prod: |_ts, args| -> Option<Interval> {
            let doy = args[0].as_time()?;
            let to = args[2].as_time()?;
            if (doy.month?, doy.day?) >= (to.month?, to.day?) {
                return None;
            }
            Some(Interval {
                t_from: Some(Time {
                    year: to.year,
                    month: doy.month,
                    day: doy.day,
                    ..Time::default()
                }),
                t_to: Some(to.clone()),
                ..Interval::default()
            })
        },
    }
}

/// Two full datetimes joined into a forward-running range.
pub(crate) fn rule_datetime_datetime() -> RuleDef {
    rule! {
        name: "<datetime> - <datetime>",
        pattern: [pred!(is_date_time), re!(JOIN), pred!(is_date_time)],
        prod: |_ts, args| -> Option<Interval> {
            let from = args[0].as_time()?;
            let to = args[2].as_time()?;
            let key = |t: &Time| {
                (t.year, t.month, t.day, t.hour, t.minute.unwrap_or(0))
            };
            if key(from) >= key(to) {
                return None;
            }
            Some(Interval {
                t_from: Some(from.clone()),
                t_to: Some(to.clone()),
                ..Interval::default()
            })
        },
    }
}

/// "11:30 PM - 3:35 AM": two times of day. Within one day the range must
/// run forward, but a pm-to-am pair is allowed to cross midnight; the day
/// wrap happens once a date is attached.
pub(crate) fn rule_tod_tod() -> RuleDef {
    rule! {
        name: "<tod> - <tod>",
        pattern: [pred!(is_tod), re!(JOIN), pred!(is_tod)],
        prod: |_ts, args| -> Option<Interval> {
            let from = args[0].as_time()?;
            let to = args[2].as_time()?;
            let (from_hour, to_hour) = (from.hour?, to.hour?);
            let overnight = from_hour > 12 && to_hour <= 12;
            if from_hour > to_hour && !overnight {
                return None;
            }
            if from_hour == to_hour && from.minute.unwrap_or(0) >= to.minute.unwrap_or(0) {
                return None;
            }
            Some(Interval {
                t_from: Some(from.clone()),
                t_to: Some(to.clone()),
                ..Interval::default()
            })
        },
    }
}

/// A date attached to a time interval: "Nov 13 11:30 PM - 3:35 AM". When
/// the interval runs backwards on the clock the end lands on the next day.
pub(crate) fn rule_date_time_interval() -> RuleDef {
    rule! {
        name: "<date> <time-interval>",
        pattern: [pred!(has_date), dim!(Interval)],
        prod: |_ts, args| -> Option<Interval> {
            let date = args[0].as_time()?;
            let interval = args[1].as_interval()?;
            let tod_or_none = |end: &Option<Time>| match end {
                Some(t) if t.is_tod() => Some(Some(t.clone())),
                None => Some(None),
                _ => None,
            };
            let from = tod_or_none(&interval.t_from)?;
            let to = tod_or_none(&interval.t_to)?;
            if from.is_none() && to.is_none() {
                return None;
            }

            let on = |day: &Time, tod: &Time| Time {
                year: day.year,
                month: day.month,
                day: day.day,
                hour: tod.hour,
                minute: Some(tod.minute.unwrap_or(0)),
                ..Time::default()
            };
            let clock = |t: &Time| (t.hour.unwrap_or(0), t.minute.unwrap_or(0));

            Some(match (from, to) {
                (Some(from), Some(to)) => {
                    let to_day = if clock(&from) >= clock(&to) {
                        let next = date.dt()?.date().checked_add_days(Days::new(1))?;
                        time_from_date(next)
                    } else {
                        date.clone()
                    };
                    Interval {
                        t_from: Some(on(date, &from)),
                        t_to: Some(on(&to_day, &to)),
                        ..Interval::default()
                    }
                }
                (Some(from), None) => Interval {
                    t_from: Some(on(date, &from)),
                    t_to: None,
                    ..Interval::default()
                },
                (None, to) => Interval {
                    t_from: None,
                    t_to: to.map(|to| on(date, &to)),
                    ..Interval::default()
                },
            })
        },
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![
        rule_before_time(),
        rule_after_time(),
        rule_date_date(),
        rule_dom_date(),
        rule_doy_date(),
        rule_datetime_datetime(),
        rule_tod_tod(),
        rule_date_time_interval(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;

    fn ts() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2018, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Time {
        Time { year: Some(y), month: Some(m), day: Some(d), ..Time::default() }
    }

    fn join() -> Artifact {
        Artifact::from(crate::artifact::RegexMatch::new(
            0,
            crate::artifact::Span::default(),
            "-".into(),
            Default::default(),
        ))
    }

    fn apply(rule: RuleDef, args: &[Artifact]) -> Option<Artifact> {
        (rule.production)(&ts(), args)
    }

    #[test]
    fn date_ranges_must_run_forward() {
        let forward = [
            Artifact::from(date(2017, 12, 30)),
            join(),
            Artifact::from(date(2017, 12, 31)),
        ];
        assert!(apply(rule_date_date(), &forward).is_some());

        for (a, b) in [
            (date(2017, 1, 1), date(2015, 1, 1)),
            (date(2017, 12, 1), date(2017, 11, 30)),
            (date(2017, 12, 31), date(2017, 12, 30)),
            (date(2017, 12, 31), date(2017, 12, 31)),
        ] {
            let args = [Artifact::from(a), join(), Artifact::from(b)];
            assert!(apply(rule_date_date(), &args).is_none());
        }
    }

    #[test]
    fn dom_borrows_the_date() {
        let args = [
            Artifact::from(Time { day: Some(15), ..Time::default() }),
            join(),
            Artifact::from(date(2020, 11, 18)),
        ];
        let interval = apply(rule_dom_date(), &args).unwrap();
        assert_eq!(
            interval.nb_str(),
            "Interval[]{2020-11-15 X:X (X/X) - 2020-11-18 X:X (X/X)}"
        );

        let backwards = [
            Artifact::from(Time { day: Some(29), ..Time::default() }),
            join(),
            Artifact::from(date(2015, 1, 29)),
        ];
        assert!(apply(rule_dom_date(), &backwards).is_none());
    }

    #[test]
    fn doy_borrows_the_year() {
        let args = [
            Artifact::from(Time { month: Some(4), day: Some(12), ..Time::default() }),
            join(),
            Artifact::from(date(2017, 4, 13)),
        ];
        assert!(apply(rule_doy_date(), &args).is_some());

        let equal = [
            Artifact::from(Time { month: Some(4), day: Some(12), ..Time::default() }),
            join(),
            Artifact::from(date(2017, 4, 12)),
        ];
        assert!(apply(rule_doy_date(), &equal).is_none());
    }

    #[test]
    fn tod_pairs_allow_overnight_only() {
        let tod = |h: u32, m: u32| {
            Artifact::from(Time { hour: Some(h), minute: Some(m), ..Time::default() })
        };
        assert!(apply(rule_tod_tod(), &[tod(20, 0), join(), tod(21, 0)]).is_some());
        assert!(apply(rule_tod_tod(), &[tod(23, 30), join(), tod(3, 35)]).is_some());
        assert!(apply(rule_tod_tod(), &[tod(10, 30), join(), tod(9, 0)]).is_none());
        assert!(apply(rule_tod_tod(), &[tod(9, 30), join(), tod(9, 45)]).is_some());
        assert!(apply(rule_tod_tod(), &[tod(9, 30), join(), tod(9, 30)]).is_none());
    }

    #[test]
    fn day_wrap_when_the_clock_runs_backwards() {
        let interval = Interval {
            t_from: Some(Time { hour: Some(23), minute: Some(30), ..Time::default() }),
            t_to: Some(Time { hour: Some(3), minute: Some(35), ..Time::default() }),
            ..Interval::default()
        };
        let args = [Artifact::from(date(2018, 11, 13)), Artifact::from(interval)];
        let wrapped = apply(rule_date_time_interval(), &args).unwrap();
        assert_eq!(
            wrapped.nb_str(),
            "Interval[]{2018-11-13 23:30 (X/X) - 2018-11-14 03:35 (X/X)}"
        );

        let forward = Interval {
            t_from: Some(Time { hour: Some(14), minute: None, ..Time::default() }),
            t_to: Some(Time { hour: Some(16), minute: None, ..Time::default() }),
            ..Interval::default()
        };
        let args = [Artifact::from(date(2018, 5, 8)), Artifact::from(forward)];
        let plain = apply(rule_date_time_interval(), &args).unwrap();
        assert_eq!(
            plain.nb_str(),
            "Interval[]{2018-05-08 14:00 (X/X) - 2018-05-08 16:00 (X/X)}"
        );
    }

    #[test]
    fn open_interval_keeps_its_open_end() {
        let interval = Interval {
            t_from: Some(Time { hour: Some(17), minute: Some(0), ..Time::default() }),
            t_to: None,
            ..Interval::default()
        };
        let args = [Artifact::from(date(2018, 5, 8)), Artifact::from(interval)];
        let grounded = apply(rule_date_time_interval(), &args).unwrap();
        assert_eq!(grounded.nb_str(), "Interval[]{2018-05-08 17:00 (X/X) - None}");
    }
}
