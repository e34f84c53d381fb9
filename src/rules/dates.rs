//! Numeric dates and weekday/date combinations.

use chrono::{Datelike, Days, NaiveDate};

use crate::artifact::Time;
use crate::RuleDef;

use super::helpers::{expand_year, int_group, next_weekday_on_or_after, time_from_date};
use super::predicates::{has_dow, is_date, is_dom, is_doy, is_month, is_pod, is_year};

/// "5.", "31" — a bare day of month.
pub(crate) fn rule_dom() -> RuleDef {
    rule! {
        name: "<dom>",
        pattern: [re!(r"(?&_bfr)(?P<day>(?&_day))\b\.?")],
        prod: |_ts, args| -> Option<Time> {
            let day = int_group(args[0].as_regex_match()?, "day")?;
            Some(Time { day: Some(day), ..Time::default() })
        },
    }
}

/// "5th", "3rd", "5ten" — an ordinal day of month.
pub(crate) fn rule_dom_ordinal() -> RuleDef {
    rule! {
        name: "<dom>th",
        pattern: [re!(r"(?&_bfr)(?P<day>(?&_day))\s*(st|nd|rd|th|ten|ter)\b")],
        prod: |_ts, args| -> Option<Time> {
            let day = int_group(args[0].as_regex_match()?, "day")?;
            Some(Time { day: Some(day), ..Time::default() })
        },
    }
}

/// "12." — a bare month by number.
pub(crate) fn rule_month_ordinal() -> RuleDef {
    rule! {
        name: "<month>",
        pattern: [re!(r"(?&_bfr)(?P<month>(?&_month))\b\.?")],
        prod: |_ts, args| -> Option<Time> {
            let month = int_group(args[0].as_regex_match()?, "month")?;
            Some(Time { month: Some(month), ..Time::default() })
        },
    }
}

/// "2019", "18" — a year; two digits resolve inside the ten-year window.
pub(crate) fn rule_year() -> RuleDef {
    rule! {
        name: "<year>",
        pattern: [re!(r"(?&_bfr)(?P<year>(?&_year))\b")],
        prod: |ts, args| -> Option<Time> {
            let year = int_group(args[0].as_regex_match()?, "year")?;
            Some(Time { year: Some(expand_year(ts, year)), ..Time::default() })
        },
    }
}

/// "12.12", "8/5" — day and month.
pub(crate) fn rule_ddmm() -> RuleDef {
    rule! {
        name: "dd.mm",
        pattern: [re!(r"(?&_bfr)(?P<day>(?&_day))[\./\-](?P<month>(?&_month))\.?\b")],
        prod: |_ts, args| -> Option<Time> {
            let m = args[0].as_regex_match()?;
            Some(Time {
                month: Some(int_group(m, "month")?),
                day: Some(int_group(m, "day")?),
                ..Time::default()
            })
        },
    }
}

/// "12.12.2020", "8-5-18" — a full date, day first.
pub(crate) fn rule_ddmmyyyy() -> RuleDef {
    rule! {
        name: "dd.mm.yyyy",
        pattern: [re!(r"(?&_bfr)(?P<day>(?&_day))[-/\.](?P<month>(?&_month))[-/\.](?P<year>(?&_year))\b")],
        prod: |ts, args| -> Option<Time> {
            let m = args[0].as_regex_match()?;
            let year = int_group(m, "year")?;
            Some(Time {
                year: Some(expand_year(ts, year)),
                month: Some(int_group(m, "month")?),
                day: Some(int_group(m, "day")?),
                ..Time::default()
            })
        },
    }
}

/// "2020-05-08" — an ISO-ordered date.
pub(crate) fn rule_yyyymmdd() -> RuleDef {
    rule! {
        name: "yyyy-mm-dd",
        pattern: [re!(r"(?&_bfr)(?P<year>19\d\d|20\d\d)-(?P<month>(?&_month))-(?P<day>(?&_day))\b")],
        prod: |_ts, args| -> Option<Time> {
            let m = args[0].as_regex_match()?;
            Some(Time {
                year: Some(int_group(m, "year")?),
                month: Some(int_group(m, "month")?),
                day: Some(int_group(m, "day")?),
                ..Time::default()
            })
        },
    }
}

pub(crate) fn rule_dom_month() -> RuleDef {
    rule! {
        name: "<dom> <month>",
        pattern: [pred!(is_dom), pred!(is_month)],
        prod: |_ts, args| -> Option<Time> {
            Some(Time {
                day: args[0].as_time()?.day,
                month: args[1].as_time()?.month,
                ..Time::default()
            })
        },
    }
}

pub(crate) fn rule_dom_of_month() -> RuleDef {
    rule! {
        name: "<dom> of <month>",
        pattern: [pred!(is_dom), re!(r"\b(of|vom?)\b"), pred!(is_month)],
        prod: |_ts, args| -> Option<Time> {
            Some(Time {
                day: args[0].as_time()?.day,
                month: args[2].as_time()?.month,
                ..Time::default()
            })
        },
    }
}

pub(crate) fn rule_month_dom() -> RuleDef {
    rule! {
        name: "<month> <dom>",
        pattern: [pred!(is_month), pred!(is_dom)],
        prod: |_ts, args| -> Option<Time> {
            Some(Time {
                month: args[0].as_time()?.month,
                day: args[1].as_time()?.day,
                ..Time::default()
            })
        },
    }
}

pub(crate) fn rule_doy_year() -> RuleDef {
    rule! {
        name: "<doy> <year>",
        pattern: [pred!(is_doy), pred!(is_year)],
        prod: |_ts, args| -> Option<Time> {
            let doy = args[0].as_time()?;
            Some(Time {
                year: args[1].as_time()?.year,
                month: doy.month,
                day: doy.day,
                ..Time::default()
            })
        },
    }
}

pub(crate) fn rule_month_year() -> RuleDef {
    rule! {
        name: "<month> <year>",
        pattern: [pred!(is_month), pred!(is_year)],
        prod: |_ts, args| -> Option<Time> {
            Some(Time {
                month: args[0].as_time()?.month,
                year: args[1].as_time()?.year,
                ..Time::default()
            })
        },
    }
}

/// "am Dienstag", "this Wednesday" — the upcoming such weekday, counting a
/// same-day hit as next week.
pub(crate) fn rule_at_dow() -> RuleDef {
    rule! {
        name: "at|on <dow>",
        pattern: [re!(r"\b(am|diese(n|m)?|at|on|this)\b"), pred!(has_dow)],
        prod: |ts, args| -> Option<Time> {
            let dow_time = args[1].as_time()?;
            let mut date = next_weekday_on_or_after(ts.date(), dow_time.dow?);
            if date == ts.date() {
                date = date.checked_add_days(Days::new(7))?;
            }
            Time::intersect(&time_from_date(date), dow_time, true)
        },
    }
}

/// "next Friday", "am nächsten Freitag" — the such weekday of next week.
pub(crate) fn rule_next_dow() -> RuleDef {
    rule! {
        name: "next <dow>",
        pattern: [
            re!(r"\b((am )?(dem |den )?(kommenden|nächsten)|(on |at )?(the )?(next|following))\b"),
            pred!(has_dow),
        ],
        prod: |ts, args| -> Option<Time> {
            let dow_time = args[1].as_time()?;
            let from = ts.date().checked_add_days(Days::new(7))?;
            let date = next_weekday_on_or_after(from, dow_time.dow?);
            Time::intersect(&time_from_date(date), dow_time, true)
        },
    }
}

/// "Tuesday the 8th" — the next date falling on both the weekday and the
/// day of month.
pub(crate) fn rule_dow_dom() -> RuleDef {
    rule! {
        name: "<dow> <dom>",
        pattern: [pred!(has_dow), pred!(is_dom)],
        prod: |ts, args| -> Option<Time> {
            let dow_time = args[0].as_time()?;
            let dow = dow_time.dow?;
            let day = args[1].as_time()?.day?;
            let date = upcoming_dow_dom(ts.date(), dow, day)?;
            Time::intersect(&time_from_date(date), dow_time, true)
        },
    }
}

/// "Monday 5th December" — the date wins, the weekday is dropped.
pub(crate) fn rule_dow_date() -> RuleDef {
    rule! {
        name: "<dow> <date>",
        pattern: [pred!(has_dow), pred!(is_date)],
        prod: |_ts, args| -> Option<Time> {
            Time::intersect(args[1].as_time()?, args[0].as_time()?, true)
        },
    }
}

pub(crate) fn rule_dow_pod() -> RuleDef {
    rule! {
        name: "<dow> <pod>",
        pattern: [pred!(has_dow), pred!(is_pod)],
        prod: |_ts, args| -> Option<Time> {
            Some(Time {
                dow: args[0].as_time()?.dow,
                pod: args[1].as_time()?.pod.clone(),
                ..Time::default()
            })
        },
    }
}

/// First date on or after `from` with this weekday and day of month. The
/// weekday of a fixed day of month cycles with the calendar, so a bounded
/// month scan suffices.
fn upcoming_dow_dom(from: NaiveDate, dow: u32, day: u32) -> Option<NaiveDate> {
    let mut year = from.year();
    let mut month = from.month();
    for _ in 0..60 {
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
            if candidate >= from && candidate.weekday().num_days_from_monday() == dow {
                return Some(candidate);
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    None
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![
        rule_dom(),
        rule_dom_ordinal(),
        rule_month_ordinal(),
        rule_year(),
        rule_ddmm(),
        rule_ddmmyyyy(),
        rule_yyyymmdd(),
        rule_dom_month(),
        rule_dom_of_month(),
        rule_month_dom(),
        rule_doy_year(),
        rule_month_year(),
        rule_at_dow(),
        rule_next_dow(),
        rule_dow_dom(),
        rule_dow_date(),
        rule_dow_pod(),
    ]
}
