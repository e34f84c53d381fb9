//! Latent anchoring: grounding pure times of day to the reference time.
//!
//! A resolution without a date ("8:00 pm", "14:00 - 16:00") is rewritten to
//! the next matching calendar instant after the reference time. This runs
//! after scoring, not as a production rule: the scorer is trained on the
//! un-anchored resolutions.

use chrono::{Days, NaiveDateTime, NaiveTime};

use crate::artifact::{Artifact, Interval, Time};

pub(crate) fn anchor_latent(ts: &NaiveDateTime, artifact: Artifact) -> Artifact {
    match artifact {
        Artifact::Time(t) if t.is_tod() => Artifact::Time(anchor_tod(ts, &t)),
        Artifact::Interval(i) if i.is_time_interval() => {
            Artifact::Interval(anchor_time_interval(ts, &i))
        }
        other => other,
    }
}

fn at_wall_clock(ts: &NaiveDateTime, tod: &Time) -> Option<NaiveDateTime> {
    let time = NaiveTime::from_hms_opt(tod.hour?, tod.minute.unwrap_or(0), 0)?;
    Some(ts.date().and_time(time))
}

/// The next instant at this wall-clock time strictly after `ts`.
fn anchor_tod(ts: &NaiveDateTime, tod: &Time) -> Time {
    let Some(mut dm) = at_wall_clock(ts, tod) else {
        return tod.clone();
    };
    if dm <= *ts {
        dm = dm + Days::new(1);
    }
    grounded(dm, tod)
}

/// The next `[from, to]` pair after `ts`; both ends move to the next day
/// together so the pair stays intact.
fn anchor_time_interval(ts: &NaiveDateTime, interval: &Interval) -> Interval {
    let (Some(t_from), Some(t_to)) = (&interval.t_from, &interval.t_to) else {
        return interval.clone();
    };
    let (Some(mut dm_from), Some(mut dm_to)) =
        (at_wall_clock(ts, t_from), at_wall_clock(ts, t_to))
    else {
        return interval.clone();
    };
    if dm_from <= *ts {
        dm_from = dm_from + Days::new(1);
        dm_to = dm_to + Days::new(1);
    }
    Interval {
        t_from: Some(grounded(dm_from, t_from)),
        t_to: Some(grounded(dm_to, t_to)),
        span: interval.span,
    }
}

fn grounded(dm: NaiveDateTime, original: &Time) -> Time {
    use chrono::{Datelike, Timelike};
    Time {
        year: Some(dm.year()),
        month: Some(dm.month()),
        day: Some(dm.day()),
        hour: Some(dm.hour()),
        minute: Some(dm.minute()),
        span: original.span,
        ..Time::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Span;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn tod(h: u32, m: u32) -> Time {
        Time { hour: Some(h), minute: Some(m), ..Time::default() }
    }

    #[test]
    fn tod_after_reference_stays_on_the_same_day() {
        let anchored = anchor_latent(&ts(2020, 1, 1, 7, 0), Artifact::from(tod(20, 0)));
        let expected = Time {
            year: Some(2020),
            month: Some(1),
            day: Some(1),
            hour: Some(20),
            minute: Some(0),
            ..Time::default()
        };
        assert_eq!(anchored, Artifact::from(expected));
    }

    #[test]
    fn tod_at_or_before_reference_moves_to_the_next_day() {
        let anchored = anchor_latent(&ts(2020, 1, 1, 7, 0), Artifact::from(tod(6, 0)));
        assert_eq!(anchored.as_time().unwrap().day, Some(2));

        let same_minute = anchor_latent(&ts(2020, 1, 1, 7, 0), Artifact::from(tod(7, 0)));
        assert_eq!(same_minute.as_time().unwrap().day, Some(2));
    }

    #[test]
    fn time_interval_moves_as_a_pair() {
        let interval = Interval {
            t_from: Some(tod(6, 0)),
            t_to: Some(tod(9, 0)),
            span: Span::new(0, 5),
        };
        let anchored = anchor_latent(&ts(2020, 1, 1, 7, 0), Artifact::from(interval));
        let anchored = anchored.as_interval().unwrap();
        // from (6:00) is already past, so both ends advance together
        assert_eq!(anchored.t_from.as_ref().unwrap().day, Some(2));
        assert_eq!(anchored.t_to.as_ref().unwrap().day, Some(2));
        assert_eq!(anchored.span, Span::new(0, 5));
    }

    #[test]
    fn grounded_values_pass_through() {
        let date = Time {
            year: Some(2020),
            month: Some(5),
            day: Some(8),
            ..Time::default()
        };
        let artifact = Artifact::from(date.clone());
        assert_eq!(anchor_latent(&ts(2020, 1, 1, 7, 0), artifact), Artifact::from(date));
    }
}
