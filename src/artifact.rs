//! The artifact model: typed values produced by the parser.
//!
//! Every value carries a byte span `[mstart, mend)` into the preprocessed
//! input. Equality and hashing are structural over the value's own fields and
//! deliberately ignore the span for [`Time`], [`Interval`] and [`Duration`]:
//! identical resolutions found at different positions must collapse when used
//! as dedup keys in the search. A [`RegexMatch`] is identified by
//! `(id, mstart, mend)` instead, since the same expression can hit several
//! positions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Byte span `[mstart, mend)` into the preprocessed input text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub mstart: usize,
    pub mend: usize,
}

impl Span {
    pub fn new(mstart: usize, mend: usize) -> Span {
        Span { mstart, mend }
    }

    pub fn len(&self) -> usize {
        self.mend - self.mstart
    }

    pub fn is_empty(&self) -> bool {
        self.mend == self.mstart
    }
}

/// Error returned when parsing the canonical text form of an artifact fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    what: &'static str,
}

impl FormatError {
    fn new(what: &'static str) -> FormatError {
        FormatError { what }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} format", self.what)
    }
}

impl std::error::Error for FormatError {}

// --- RegexMatch -------------------------------------------------------------

/// A hit of one named regular expression from the registry.
#[derive(Debug, Clone)]
pub struct RegexMatch {
    pub id: u32,
    pub span: Span,
    text: String,
    groups: HashMap<String, String>,
}

impl RegexMatch {
    pub(crate) fn new(
        id: u32,
        span: Span,
        text: String,
        groups: HashMap<String, String>,
    ) -> RegexMatch {
        RegexMatch { id, span, text, groups }
    }

    /// The text matched by the expression's outer group.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// A named capture group of the match, if it participated.
    pub fn group(&self, name: &str) -> Option<&str> {
        self.groups.get(name).map(|s| s.as_str())
    }
}

impl PartialEq for RegexMatch {
    fn eq(&self, other: &RegexMatch) -> bool {
        self.id == other.id && self.span == other.span
    }
}

impl Eq for RegexMatch {}

impl std::hash::Hash for RegexMatch {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.span.hash(state);
    }
}

impl fmt::Display for RegexMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.text)
    }
}

// --- Part-of-day table ------------------------------------------------------

/// Hour range `(start, end)` for a part-of-day tag.
///
/// Tags compose as `[very][early|late]<base>`; `early`/`late` shift the base
/// range by ∓1 hour, `very` doubles the shift. `first` and `last` are fixed
/// points and ignore modifiers. Composed tags that happen to name a base tag
/// (`earlymorning`, `lateevening`) resolve to the base range.
pub(crate) fn pod_hours(pod: &str) -> Option<(u32, u32)> {
    if let Some(range) = pod_base(pod) {
        return Some(range);
    }
    let (scale, rest) = match pod.strip_prefix("very") {
        Some(rest) => (2i32, rest),
        None => (1, pod),
    };
    let (offset, base) = if let Some(rest) = rest.strip_prefix("early") {
        (-scale, rest)
    } else if let Some(rest) = rest.strip_prefix("late") {
        (scale, rest)
    } else {
        return None;
    };
    let (lo, hi) = pod_base(base)?;
    if base == "first" || base == "last" {
        return Some((lo, hi));
    }
    let clamp = |h: i32| h.clamp(0, 23) as u32;
    Some((clamp(lo as i32 + offset), clamp(hi as i32 + offset)))
}

fn pod_base(pod: &str) -> Option<(u32, u32)> {
    match pod {
        "earlymorning" => Some((4, 7)),
        "morning" => Some((6, 9)),
        "forenoon" => Some((9, 12)),
        "noon" => Some((11, 13)),
        "afternoon" => Some((12, 17)),
        "evening" => Some((17, 20)),
        "lateevening" => Some((18, 21)),
        "night" => Some((19, 22)),
        "first" => Some((0, 0)),
        "last" => Some((23, 23)),
        _ => None,
    }
}

// --- Time -------------------------------------------------------------------

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Fields: u8 {
        const YEAR = 1;
        const MONTH = 2;
        const DAY = 4;
        const HOUR = 8;
        const MINUTE = 16;
        const DOW = 32;
        const POD = 64;
    }
}

/// A possibly under-specified point in time.
///
/// Each field is optional; the predicates below classify which combination of
/// fields is present. `dow` is the day of week with `0 = Monday` through
/// `6 = Sunday`; `pod` is a part-of-day tag (see [`pod_hours`]).
#[derive(Debug, Clone, Default)]
pub struct Time {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub dow: Option<u32>,
    pub pod: Option<String>,
    pub span: Span,
}

impl Time {
    fn fields(&self) -> Fields {
        let mut f = Fields::empty();
        f.set(Fields::YEAR, self.year.is_some());
        f.set(Fields::MONTH, self.month.is_some());
        f.set(Fields::DAY, self.day.is_some());
        f.set(Fields::HOUR, self.hour.is_some());
        f.set(Fields::MINUTE, self.minute.is_some());
        f.set(Fields::DOW, self.dow.is_some());
        f.set(Fields::POD, self.pod.is_some());
        f
    }

    /// Day of year: month and day, nothing else.
    pub fn is_doy(&self) -> bool {
        self.fields() == Fields::MONTH | Fields::DAY
    }

    /// Day of month: only a day.
    pub fn is_dom(&self) -> bool {
        self.fields() == Fields::DAY
    }

    /// Only a day of week.
    pub fn is_dow(&self) -> bool {
        self.fields() == Fields::DOW
    }

    /// Only a month.
    pub fn is_month(&self) -> bool {
        self.fields() == Fields::MONTH
    }

    /// Only a year.
    pub fn is_year(&self) -> bool {
        self.fields() == Fields::YEAR
    }

    /// Only a part of day.
    pub fn is_pod(&self) -> bool {
        self.fields() == Fields::POD
    }

    /// Only an hour.
    pub fn is_hour(&self) -> bool {
        self.fields() == Fields::HOUR
    }

    /// Time of day: an hour, optionally with a minute, nothing else.
    pub fn is_tod(&self) -> bool {
        let f = self.fields();
        f == Fields::HOUR || f == Fields::HOUR | Fields::MINUTE
    }

    /// A full date without any time component.
    pub fn is_date(&self) -> bool {
        self.fields() == Fields::YEAR | Fields::MONTH | Fields::DAY
    }

    /// A full date with an hour, optionally a minute.
    pub fn is_date_time(&self) -> bool {
        let date_hour = Fields::YEAR | Fields::MONTH | Fields::DAY | Fields::HOUR;
        let f = self.fields();
        f == date_hour || f == date_hour | Fields::MINUTE
    }

    /// At least a full date.
    pub fn has_date(&self) -> bool {
        self.fields().contains(Fields::YEAR | Fields::MONTH | Fields::DAY)
    }

    /// At least a month and a day.
    pub fn has_doy(&self) -> bool {
        self.fields().contains(Fields::MONTH | Fields::DAY)
    }

    /// At least a day of week.
    pub fn has_dow(&self) -> bool {
        self.dow.is_some()
    }

    /// At least an hour.
    pub fn has_time(&self) -> bool {
        self.hour.is_some()
    }

    /// At least a part of day.
    pub fn has_pod(&self) -> bool {
        self.pod.is_some()
    }

    /// The earliest minute consistent with this value. A part-of-day tag
    /// supplies the hour when no explicit hour is set. Drops `dow`/`pod`.
    pub fn start(&self) -> Time {
        let hour = match (self.hour, &self.pod) {
            (None, Some(pod)) => pod_hours(pod).map(|r| r.0).unwrap_or(0),
            _ => self.hour.unwrap_or(0),
        };
        Time {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: Some(hour),
            minute: Some(self.minute.unwrap_or(0)),
            ..Time::default()
        }
    }

    /// The latest minute consistent with this value; counterpart of
    /// [`Time::start`].
    pub fn end(&self) -> Time {
        let hour = match (self.hour, &self.pod) {
            (None, Some(pod)) => pod_hours(pod).map(|r| r.1).unwrap_or(23),
            _ => self.hour.unwrap_or(23),
        };
        Time {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: Some(hour),
            minute: Some(self.minute.unwrap_or(59)),
            ..Time::default()
        }
    }

    /// Concrete datetime at [`Time::start`]; `None` when year, month or day
    /// is missing or the date does not exist on the calendar.
    pub fn dt(&self) -> Option<NaiveDateTime> {
        let t = self.start();
        chrono::NaiveDate::from_ymd_opt(t.year?, t.month?, t.day?)?
            .and_hms_opt(t.hour.unwrap_or(0), t.minute.unwrap_or(0), 0)
    }

    /// Merge two values field by field. Fields set on both sides must agree,
    /// otherwise the merge fails. With `exclude_dow` the day of week is
    /// dropped from the result altogether.
    pub fn intersect(a: &Time, b: &Time, exclude_dow: bool) -> Option<Time> {
        fn merge<T: Copy + PartialEq>(x: Option<T>, y: Option<T>) -> Result<Option<T>, ()> {
            match (x, y) {
                (Some(a), Some(b)) if a != b => Err(()),
                (Some(a), _) => Ok(Some(a)),
                (_, y) => Ok(y),
            }
        }
        let pod = match (&a.pod, &b.pod) {
            (Some(x), Some(y)) if x != y => return None,
            (Some(x), _) => Some(x.clone()),
            (_, y) => y.clone(),
        };
        Some(Time {
            year: merge(a.year, b.year).ok()?,
            month: merge(a.month, b.month).ok()?,
            day: merge(a.day, b.day).ok()?,
            hour: merge(a.hour, b.hour).ok()?,
            minute: merge(a.minute, b.minute).ok()?,
            dow: if exclude_dow { None } else { merge(a.dow, b.dow).ok()? },
            pod,
            span: Span::default(),
        })
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Time) -> bool {
        self.year == other.year
            && self.month == other.month
            && self.day == other.day
            && self.hour == other.hour
            && self.minute == other.minute
            && self.dow == other.dow
            && self.pod == other.pod
    }
}

impl Eq for Time {}

impl std::hash::Hash for Time {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.year.hash(state);
        self.month.hash(state);
        self.day.hash(state);
        self.hour.hash(state);
        self.minute.hash(state);
        self.dow.hash(state);
        self.pod.hash(state);
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(v: &Option<T>, width: usize) -> String {
            match v {
                Some(v) => format!("{v:0width$}"),
                None => "X".to_string(),
            }
        }
        write!(
            f,
            "{}-{}-{} {}:{} ({}/{})",
            opt(&self.year, 4),
            opt(&self.month, 2),
            opt(&self.day, 2),
            opt(&self.hour, 2),
            opt(&self.minute, 2),
            opt(&self.dow, 1),
            self.pod.as_deref().unwrap_or("X"),
        )
    }
}

static TIME_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}|X)-(\d{2}|X)-(\d{2}|X) (\d{2}|X):(\d{2}|X) \((\d|X)/(\w+)\)$").unwrap()
});

impl FromStr for Time {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Time, FormatError> {
        let caps = TIME_FORMAT.captures(text).ok_or(FormatError::new("Time"))?;
        fn num<T: FromStr>(s: &str) -> Option<T> {
            if s == "X" { None } else { s.parse().ok() }
        }
        let pod = caps.get(7).map(|m| m.as_str()).filter(|s| *s != "X");
        Ok(Time {
            year: num(&caps[1]),
            month: num(&caps[2]),
            day: num(&caps[3]),
            hour: num(&caps[4]),
            minute: num(&caps[5]),
            dow: num(&caps[6]),
            pod: pod.map(|s| s.to_string()),
            span: Span::default(),
        })
    }
}

// --- Interval ---------------------------------------------------------------

/// A time range; either end may be open.
#[derive(Debug, Clone, Default)]
pub struct Interval {
    pub t_from: Option<Time>,
    pub t_to: Option<Time>,
    pub span: Span,
}

impl Interval {
    /// Both ends present and pure times of day.
    pub fn is_time_interval(&self) -> bool {
        match (&self.t_from, &self.t_to) {
            (Some(f), Some(t)) => f.is_tod() && t.is_tod(),
            _ => false,
        }
    }

    /// Both ends present and full dates.
    pub fn is_date_interval(&self) -> bool {
        match (&self.t_from, &self.t_to) {
            (Some(f), Some(t)) => f.is_date() && t.is_date(),
            _ => false,
        }
    }

    pub fn start(&self) -> Option<Time> {
        self.t_from.as_ref().map(Time::start)
    }

    pub fn end(&self) -> Option<Time> {
        self.t_to.as_ref().map(Time::end)
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Interval) -> bool {
        self.t_from == other.t_from && self.t_to == other.t_to
    }
}

impl Eq for Interval {}

impl std::hash::Hash for Interval {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.t_from.hash(state);
        self.t_to.hash(state);
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn end(t: &Option<Time>) -> String {
            match t {
                Some(t) => t.to_string(),
                None => "None".to_string(),
            }
        }
        write!(f, "{} - {}", end(&self.t_from), end(&self.t_to))
    }
}

impl FromStr for Interval {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Interval, FormatError> {
        let (from, to) = text.split_once(" - ").ok_or(FormatError::new("Interval"))?;
        fn end(s: &str) -> Result<Option<Time>, FormatError> {
            if s == "None" { Ok(None) } else { s.parse().map(Some) }
        }
        Ok(Interval { t_from: end(from)?, t_to: end(to)?, span: Span::default() })
    }
}

// --- Duration ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Nights,
    Weeks,
    Months,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
            DurationUnit::Nights => "nights",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Months => "months",
        }
    }
}

impl FromStr for DurationUnit {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<DurationUnit, FormatError> {
        match text {
            "minutes" => Ok(DurationUnit::Minutes),
            "hours" => Ok(DurationUnit::Hours),
            "days" => Ok(DurationUnit::Days),
            "nights" => Ok(DurationUnit::Nights),
            "weeks" => Ok(DurationUnit::Weeks),
            "months" => Ok(DurationUnit::Months),
            _ => Err(FormatError::new("DurationUnit")),
        }
    }
}

/// An amount of time with a unit ("3 nights", "45 minutes").
#[derive(Debug, Clone)]
pub struct Duration {
    pub value: i64,
    pub unit: DurationUnit,
    pub span: Span,
}

impl PartialEq for Duration {
    fn eq(&self, other: &Duration) -> bool {
        self.value == other.value && self.unit == other.unit
    }
}

impl Eq for Duration {}

impl std::hash::Hash for Duration {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.unit.hash(state);
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.as_str())
    }
}

impl FromStr for Duration {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Duration, FormatError> {
        let (value, unit) = text.split_once(' ').ok_or(FormatError::new("Duration"))?;
        Ok(Duration {
            value: value.parse().map_err(|_| FormatError::new("Duration"))?,
            unit: unit.parse()?,
            span: Span::default(),
        })
    }
}

// --- Artifact ---------------------------------------------------------------

/// Any value produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Artifact {
    RegexMatch(RegexMatch),
    Time(Time),
    Interval(Interval),
    Duration(Duration),
}

impl Artifact {
    pub fn span(&self) -> Span {
        match self {
            Artifact::RegexMatch(m) => m.span,
            Artifact::Time(t) => t.span,
            Artifact::Interval(i) => i.span,
            Artifact::Duration(d) => d.span,
        }
    }

    pub(crate) fn set_span(&mut self, span: Span) {
        match self {
            Artifact::RegexMatch(m) => m.span = span,
            Artifact::Time(t) => t.span = span,
            Artifact::Interval(i) => i.span = span,
            Artifact::Duration(d) => d.span = span,
        }
    }

    pub fn mstart(&self) -> usize {
        self.span().mstart
    }

    pub fn mend(&self) -> usize {
        self.span().mend
    }

    pub fn len(&self) -> usize {
        self.span().len()
    }

    pub fn is_empty(&self) -> bool {
        self.span().is_empty()
    }

    fn kind(&self) -> &'static str {
        match self {
            Artifact::RegexMatch(_) => "RegexMatch",
            Artifact::Time(_) => "Time",
            Artifact::Interval(_) => "Interval",
            Artifact::Duration(_) => "Duration",
        }
    }

    fn body(&self) -> String {
        match self {
            Artifact::RegexMatch(m) => m.to_string(),
            Artifact::Time(t) => t.to_string(),
            Artifact::Interval(i) => i.to_string(),
            Artifact::Duration(d) => d.to_string(),
        }
    }

    /// Canonical text form without the span, e.g.
    /// `Time[]{2020-12-12 X:X (X/X)}`. Identical resolutions found at
    /// different positions share one `nb_str`.
    pub fn nb_str(&self) -> String {
        format!("{}[]{{{}}}", self.kind(), self.body())
    }

    pub fn is_regex_match(&self) -> bool {
        matches!(self, Artifact::RegexMatch(_))
    }

    pub fn as_regex_match(&self) -> Option<&RegexMatch> {
        match self {
            Artifact::RegexMatch(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&Time> {
        match self {
            Artifact::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            Artifact::Interval(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&Duration> {
        match self {
            Artifact::Duration(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(f, "{}[{}-{}]{{{}}}", self.kind(), span.mstart, span.mend, self.body())
    }
}

impl From<RegexMatch> for Artifact {
    fn from(m: RegexMatch) -> Artifact {
        Artifact::RegexMatch(m)
    }
}

impl From<Time> for Artifact {
    fn from(t: Time) -> Artifact {
        Artifact::Time(t)
    }
}

impl From<Interval> for Artifact {
    fn from(i: Interval) -> Artifact {
        Artifact::Interval(i)
    }
}

impl From<Duration> for Artifact {
    fn from(d: Duration) -> Artifact {
        Artifact::Duration(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_eq_ignores_span() {
        let a = Time { year: Some(2017), month: Some(12), span: Span::new(0, 5), ..Time::default() };
        let b = Time { year: Some(2017), month: Some(12), span: Span::new(3, 9), ..Time::default() };
        assert_eq!(a, b);

        let c = Time { year: Some(2017), month: Some(11), ..Time::default() };
        assert_ne!(a, c);
    }

    #[test]
    fn artifact_eq_distinguishes_variants() {
        let t = Artifact::from(Time::default());
        let i = Artifact::from(Interval::default());
        assert_ne!(t, i);
    }

    #[test]
    fn regex_match_identity() {
        let a = RegexMatch::new(7, Span::new(0, 3), "foo".into(), HashMap::new());
        let b = RegexMatch::new(7, Span::new(0, 3), "foo".into(), HashMap::new());
        let c = RegexMatch::new(7, Span::new(1, 4), "foo".into(), HashMap::new());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn predicates() {
        let doy = Time { month: Some(5), day: Some(8), ..Time::default() };
        assert!(doy.is_doy());
        assert!(doy.has_doy());
        assert!(!doy.is_dom());
        assert!(!doy.is_date());

        let tod = Time { hour: Some(8), minute: Some(30), ..Time::default() };
        assert!(tod.is_tod());
        assert!(tod.has_time());
        assert!(!tod.is_hour());

        let date = Time {
            year: Some(2020),
            month: Some(1),
            day: Some(2),
            ..Time::default()
        };
        assert!(date.is_date());
        assert!(date.has_date());
        assert!(!date.is_date_time());

        let dt = Time { hour: Some(12), ..date.clone() };
        assert!(dt.is_date_time());

        let pod = Time { pod: Some("morning".into()), ..Time::default() };
        assert!(pod.is_pod());
        assert!(pod.has_pod());
    }

    #[test]
    fn interval_predicates() {
        let tod = |h: u32| Time { hour: Some(h), ..Time::default() };
        let ti = Interval { t_from: Some(tod(8)), t_to: Some(tod(9)), span: Span::default() };
        assert!(ti.is_time_interval());
        assert!(!ti.is_date_interval());

        let open = Interval { t_from: Some(tod(8)), t_to: None, span: Span::default() };
        assert!(!open.is_time_interval());
    }

    #[test]
    fn pod_table() {
        assert_eq!(pod_hours("morning"), Some((6, 9)));
        assert_eq!(pod_hours("earlymorning"), Some((4, 7)));
        assert_eq!(pod_hours("lateevening"), Some((18, 21)));
        assert_eq!(pod_hours("latemorning"), Some((7, 10)));
        assert_eq!(pod_hours("veryearlymorning"), Some((4, 7)));
        assert_eq!(pod_hours("verylatenight"), Some((21, 23)));
        assert_eq!(pod_hours("first"), Some((0, 0)));
        assert_eq!(pod_hours("last"), Some((23, 23)));
        assert_eq!(pod_hours("earlyfirst"), Some((0, 0)));
        assert_eq!(pod_hours("lunchtime"), None);
    }

    #[test]
    fn start_and_end() {
        let pod = Time { pod: Some("morning".into()), ..Time::default() };
        assert_eq!(pod.start().hour, Some(6));
        assert_eq!(pod.start().minute, Some(0));
        assert_eq!(pod.end().hour, Some(9));
        assert_eq!(pod.end().minute, Some(59));

        let tod = Time { hour: Some(8), ..Time::default() };
        assert_eq!(tod.start().hour, Some(8));
        assert_eq!(tod.end().minute, Some(59));
    }

    #[test]
    fn dt_requires_full_date() {
        let t = Time { hour: Some(8), ..Time::default() };
        assert!(t.dt().is_none());

        let d = Time {
            year: Some(2020),
            month: Some(2),
            day: Some(29),
            hour: Some(8),
            ..Time::default()
        };
        let dt = d.dt().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2020-02-29 08:00");

        let bad = Time { year: Some(2019), month: Some(2), day: Some(29), ..Time::default() };
        assert!(bad.dt().is_none());
    }

    #[test]
    fn intersect_merges_and_rejects() {
        let date = Time {
            year: Some(2018),
            month: Some(3),
            day: Some(12),
            ..Time::default()
        };
        let dow = Time { dow: Some(0), pod: Some("morning".into()), ..Time::default() };
        let merged = Time::intersect(&date, &dow, true).unwrap();
        assert_eq!(merged.year, Some(2018));
        assert_eq!(merged.dow, None);
        assert_eq!(merged.pod.as_deref(), Some("morning"));

        let kept = Time::intersect(&date, &dow, false).unwrap();
        assert_eq!(kept.dow, Some(0));

        let other = Time { year: Some(2019), ..Time::default() };
        assert!(Time::intersect(&date, &other, false).is_none());
    }

    #[test]
    fn time_round_trip() {
        let t = Time {
            year: Some(2020),
            month: Some(12),
            day: Some(12),
            ..Time::default()
        };
        assert_eq!(t.to_string(), "2020-12-12 X:X (X/X)");
        assert_eq!(t.to_string().parse::<Time>().unwrap(), t);

        let t = Time { hour: Some(8), minute: Some(5), ..Time::default() };
        assert_eq!(t.to_string(), "X-X-X 08:05 (X/X)");
        assert_eq!(t.to_string().parse::<Time>().unwrap(), t);

        let t = Time { dow: Some(3), pod: Some("evening".into()), ..Time::default() };
        assert_eq!(t.to_string(), "X-X-X X:X (3/evening)");
        assert_eq!(t.to_string().parse::<Time>().unwrap(), t);

        assert!("gargel".parse::<Time>().is_err());
    }

    #[test]
    fn interval_round_trip() {
        let i = Interval {
            t_from: Some(Time { hour: Some(8), minute: Some(0), ..Time::default() }),
            t_to: None,
            span: Span::default(),
        };
        assert_eq!(i.to_string(), "X-X-X 08:00 (X/X) - None");
        assert_eq!(i.to_string().parse::<Interval>().unwrap(), i);

        let i = Interval {
            t_from: Some(Time { year: Some(2020), month: Some(11), day: Some(15), ..Time::default() }),
            t_to: Some(Time { year: Some(2020), month: Some(11), day: Some(18), ..Time::default() }),
            span: Span::default(),
        };
        assert_eq!(i.to_string().parse::<Interval>().unwrap(), i);
    }

    #[test]
    fn duration_round_trip() {
        let d = Duration { value: 3, unit: DurationUnit::Nights, span: Span::default() };
        assert_eq!(d.to_string(), "3 nights");
        assert_eq!(d.to_string().parse::<Duration>().unwrap(), d);
        assert!("three nights".parse::<Duration>().is_err());
    }

    #[test]
    fn nb_str_excludes_span() {
        let mut a = Artifact::from(Time { year: Some(2020), ..Time::default() });
        a.set_span(Span::new(3, 7));
        assert_eq!(a.nb_str(), "Time[]{2020-X-X X:X (X/X)}");
        assert_eq!(a.to_string(), "Time[3-7]{2020-X-X X:X (X/X)}");
    }
}
