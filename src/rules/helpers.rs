//! Shared helpers for the rule corpus: calendar arithmetic on top of
//! chrono, two-digit year windowing, and the weekday part-of-day suffix.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::artifact::{RegexMatch, Time};

/// Joins the two ends of a range expression ("15-18", "Mon to Fri",
/// "8 bis 10"). Shared by every range-forming rule, so all of them match on
/// the same regex id.
pub(crate) const JOIN: &str = r"(\-|to( the)?|(un)?til|bis( zum)?|zum|auf( den)?|und|no later than|spätestens?|at latest( at)?)";

/// Optional part-of-day suffix fused onto a weekday name ("Montagmorgen",
/// "Friday night").
pub(crate) const WEEKDAY_POD: &str = r"((?P<morning>morning|morgend?s?|früh)|(?P<forenoon>vormittags?)|(?P<noon>noon|mittags?)|(?P<afternoon>afternoon|nachmittags?)|(?P<evening>evening|abends?)|(?P<night>nights?|nachts?))?";

/// The part-of-day tag of a [`WEEKDAY_POD`] suffix, if one matched.
pub(crate) fn weekday_pod(m: &RegexMatch) -> Option<String> {
    for tag in ["morning", "forenoon", "noon", "afternoon", "evening", "night"] {
        if m.group(tag).is_some() {
            return Some(tag.to_string());
        }
    }
    None
}

/// Parse a named capture group as an integer.
pub(crate) fn int_group<T: std::str::FromStr>(m: &RegexMatch, name: &str) -> Option<T> {
    m.group(name)?.parse().ok()
}

/// A date with the day clamped into the month; `None` only for invalid
/// months.
pub(crate) fn clamped_ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1)?,
    };
    Some((next - first).num_days() as u32)
}

/// Shift by whole months, clamping the day into the target month.
pub(crate) fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let zero_based = date.year() * 12 + date.month0() as i32 + months;
    clamped_ymd(zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1, date.day())
}

/// The next date on or after `from` that falls on `dow` (0 = Monday).
pub(crate) fn next_weekday_on_or_after(from: NaiveDate, dow: u32) -> NaiveDate {
    let current = from.weekday().num_days_from_monday();
    from + chrono::Days::new(u64::from((dow + 7 - current) % 7))
}

/// Resolve a two-digit year inside a ten-year window above the reference
/// year: `yy` maps into the 2000s when that lands at most ten years ahead,
/// into the 1900s otherwise. Four-digit years pass through.
pub(crate) fn expand_year(ts: &NaiveDateTime, year: i32) -> i32 {
    if year >= 100 {
        return year;
    }
    if 2000 + year <= ts.year() + 10 { 2000 + year } else { 1900 + year }
}

/// A pure-date [`Time`] for a calendar date.
pub(crate) fn time_from_date(date: NaiveDate) -> Time {
    Time {
        year: Some(date.year()),
        month: Some(date.month()),
        day: Some(date.day()),
        ..Time::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn clamping() {
        assert_eq!(days_in_month(2020, 2), Some(29));
        assert_eq!(days_in_month(2019, 2), Some(28));
        assert_eq!(
            clamped_ymd(2019, 2, 31),
            NaiveDate::from_ymd_opt(2019, 2, 28)
        );
        assert!(clamped_ymd(2019, 13, 1).is_none());
    }

    #[test]
    fn month_shifts() {
        let d = NaiveDate::from_ymd_opt(2018, 12, 31).unwrap();
        assert_eq!(shift_months(d, 1), NaiveDate::from_ymd_opt(2019, 1, 31));
        assert_eq!(shift_months(d, 2), NaiveDate::from_ymd_opt(2019, 2, 28));
        assert_eq!(shift_months(d, -12), NaiveDate::from_ymd_opt(2017, 12, 31));
    }

    #[test]
    fn weekday_stepping() {
        // 2018-03-07 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2018, 3, 7).unwrap();
        assert_eq!(next_weekday_on_or_after(wed, 2), wed);
        assert_eq!(next_weekday_on_or_after(wed, 4), NaiveDate::from_ymd_opt(2018, 3, 9).unwrap());
        assert_eq!(next_weekday_on_or_after(wed, 1), NaiveDate::from_ymd_opt(2018, 3, 13).unwrap());
    }

    #[test]
    fn two_digit_years_use_a_ten_year_window() {
        let reference = ts(2018, 3, 7);
        assert_eq!(expand_year(&reference, 2018), 2018);
        assert_eq!(expand_year(&reference, 18), 2018);
        assert_eq!(expand_year(&reference, 28), 2028);
        assert_eq!(expand_year(&reference, 29), 1929);
        assert_eq!(expand_year(&reference, 99), 1999);
    }
}
