//! Latent grounding: bare day/weekday/day-of-year/part-of-day values
//! resolve to the next matching calendar date after the reference time.
//!
//! Pure times of day are *not* grounded here; that happens in
//! `src/postprocess.rs` after scoring.

use chrono::{Datelike, Days, Timelike};

use crate::artifact::{Time, pod_hours};
use crate::RuleDef;

use super::helpers::{clamped_ymd, next_weekday_on_or_after, shift_months, time_from_date};
use super::predicates::{has_dow, is_dom, is_doy, is_pod};

/// "the 5th" → the next 5th of a month.
pub(crate) fn rule_latent_dom() -> RuleDef {
    rule! {
        name: "latent <dom>",
        pattern: [pred!(is_dom)],
        prod: |ts, args| -> Option<Time> {
            let day = args[0].as_time()?.day?;
            let mut candidate = clamped_ymd(ts.year(), ts.month(), day)?;
            if candidate <= ts.date() {
                candidate = shift_months(candidate, 1)?;
            }
            Some(time_from_date(candidate))
        },
    }
}

/// "Montag" → the next Monday; a fused part of day survives.
pub(crate) fn rule_latent_dow() -> RuleDef {
    rule! {
        name: "latent <dow>",
        pattern: [pred!(has_dow)],
        prod: |ts, args| -> Option<Time> {
            let dow_time = args[0].as_time()?;
            let mut date = next_weekday_on_or_after(ts.date(), dow_time.dow?);
            if date == ts.date() {
                date = date.checked_add_days(Days::new(7))?;
            }
            Time::intersect(&time_from_date(date), dow_time, true)
        },
    }
}

/// "12.12." → the next December 12th.
pub(crate) fn rule_latent_doy() -> RuleDef {
    rule! {
        name: "latent <doy>",
        pattern: [pred!(is_doy)],
        prod: |ts, args| -> Option<Time> {
            let doy = args[0].as_time()?;
            let (month, day) = (doy.month?, doy.day?);
            let mut candidate = clamped_ymd(ts.year(), month, day)?;
            if candidate <= ts.date() {
                candidate = clamped_ymd(ts.year() + 1, month, day)?;
            }
            Some(time_from_date(candidate))
        },
    }
}

/// "morning" → the next day whose morning still lies ahead; the tag is
/// kept, only the date is pinned.
pub(crate) fn rule_latent_pod() -> RuleDef {
    rule! {
        name: "latent <pod>",
        pattern: [pred!(is_pod)],
        prod: |ts, args| -> Option<Time> {
            let pod = args[0].as_time()?.pod.clone()?;
            let (start_hour, _) = pod_hours(&pod)?;
            let starts = ts.date().and_hms_opt(start_hour, ts.minute(), 0)?;
            let date = if starts <= *ts {
                ts.date().checked_add_days(Days::new(1))?
            } else {
                ts.date()
            };
            Some(Time { pod: Some(pod), ..time_from_date(date) })
        },
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![rule_latent_dom(), rule_latent_dow(), rule_latent_doy(), rule_latent_pod()]
}
