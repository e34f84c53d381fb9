//! Instant words: today, now, tomorrow, end of month, and friends.

use chrono::{Datelike, Days, Timelike};

use crate::artifact::Time;
use crate::RuleDef;

use super::helpers::{clamped_ymd, days_in_month, time_from_date};

pub(crate) fn rule_today() -> RuleDef {
    rule! {
        name: "today",
        pattern: [re!(
            r"\b(heute|todays?|at this time|um diese zeit|zu dieser zeit|um diesen zeitpunkt|zu diesem zeitpunkt)\b"
        )],
        prod: |ts, _args| -> Option<Time> { Some(time_from_date(ts.date())) },
    }
}

pub(crate) fn rule_now() -> RuleDef {
    rule! {
        name: "now",
        pattern: [re!(
            r"\b((genau )?jetzt|diesen moment|in diesem moment|gerade eben|(just |right )?now|immediately)\b"
        )],
        prod: |ts, _args| -> Option<Time> {
            Some(Time {
                hour: Some(ts.hour()),
                minute: Some(ts.minute()),
                ..time_from_date(ts.date())
            })
        },
    }
}

pub(crate) fn rule_tomorrow() -> RuleDef {
    rule! {
        name: "tomorrow",
        pattern: [re!(r"\b(morgen|tmrw?|tomm?or?rows?)\b")],
        prod: |ts, _args| -> Option<Time> {
            Some(time_from_date(ts.date().checked_add_days(Days::new(1))?))
        },
    }
}

pub(crate) fn rule_after_tomorrow() -> RuleDef {
    rule! {
        name: "day after tomorrow",
        pattern: [re!(r"\b(übermorgen|(the )?day after tomorrow)\b")],
        prod: |ts, _args| -> Option<Time> {
            Some(time_from_date(ts.date().checked_add_days(Days::new(2))?))
        },
    }
}

pub(crate) fn rule_yesterday() -> RuleDef {
    rule! {
        name: "yesterday",
        pattern: [re!(r"\b(gestern|yesterdays?)\b")],
        prod: |ts, _args| -> Option<Time> {
            Some(time_from_date(ts.date().checked_sub_days(Days::new(1))?))
        },
    }
}

pub(crate) fn rule_before_yesterday() -> RuleDef {
    rule! {
        name: "day before yesterday",
        pattern: [re!(r"\b(vorgestern|(the )?day before yesterday)\b")],
        prod: |ts, _args| -> Option<Time> {
            Some(time_from_date(ts.date().checked_sub_days(Days::new(2))?))
        },
    }
}

pub(crate) fn rule_end_of_month() -> RuleDef {
    rule! {
        name: "end of month",
        pattern: [re!(
            r"\b((das )?ende (des|dieses) monats?|(the )?(eom|end of (the )?month))\b"
        )],
        prod: |ts, _args| -> Option<Time> {
            let last = days_in_month(ts.year(), ts.month())?;
            Some(time_from_date(clamped_ymd(ts.year(), ts.month(), last)?))
        },
    }
}

pub(crate) fn rule_end_of_year() -> RuleDef {
    rule! {
        name: "end of year",
        pattern: [re!(
            r"\b((das )?(jahr(es)? ?ende|ende (des )?jahr(es)?)|(the )?(eoy|end of (the )?year))\b"
        )],
        prod: |ts, _args| -> Option<Time> {
            Some(time_from_date(clamped_ymd(ts.year(), 12, 31)?))
        },
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![
        rule_today(),
        rule_now(),
        rule_tomorrow(),
        rule_after_tomorrow(),
        rule_yesterday(),
        rule_before_yesterday(),
        rule_end_of_month(),
        rule_end_of_year(),
    ]
}
