//! Clock times: hh:mm forms, military time, named hours, clock idioms, and
//! combinations with dates and parts of day.

use chrono::Datelike;

use crate::artifact::Time;
use crate::RuleDef;

use super::helpers::int_group;
use super::predicates::{is_date, is_pod, is_tod};

/// "8:00 pm", "19.30", "8 Uhr", "7.25 pm" — hour with optional minute,
/// clock word and meridiem.
pub(crate) fn rule_hhmm() -> RuleDef {
    rule! {
        name: "hh:mm",
        pattern: [re!(
            r"(?&_bfr)(?P<hour>(?&_hour))((:|uhr|h|\.)(?P<minute>(?&_minute)))?\s*(uhr|h)?(\s*(?P<ampm>[ap]\.?m\.?))?\b"
        )],
        prod: |_ts, args| -> Option<Time> {
            let m = args[0].as_regex_match()?;
            let hour: u32 = int_group(m, "hour")?;
            let minute: u32 = int_group(m, "minute").unwrap_or(0);
            let meridiem = m.group("ampm").map(|s| s.to_lowercase());
            let hour = match meridiem.as_deref() {
                Some(p) if p.starts_with('p') && hour < 12 => hour + 12,
                // "13:30 am" makes no sense, take the hour as written
                _ => hour,
            };
            Some(Time { hour: Some(hour), minute: Some(minute), ..Time::default() })
        },
    }
}

/// "8 o'clock", "17 Uhr" — a bare hour with a clock word.
pub(crate) fn rule_hh_oclock() -> RuleDef {
    rule! {
        name: "hh o'clock",
        pattern: [re!(r"(?&_bfr)(?P<hour>(?&_hour))\s*(uhr|h|o'?clock)\b")],
        prod: |_ts, args| -> Option<Time> {
            Some(Time { hour: Some(int_group(args[0].as_regex_match()?, "hour")?), ..Time::default() })
        },
    }
}

/// "1430", "0800h" — military time. Four digits also spell years and
/// arbitrary numbers, so implausible readings are rejected: a value equal
/// to the reference year or the year after, or a minute off the
/// five-minute raster.
pub(crate) fn rule_hhmm_military() -> RuleDef {
    rule! {
        name: "hhmm military",
        pattern: [re!(r"(?&_bfr)(?P<hour>[01]\d|2[0-3])(?P<minute>(?&_minute))\s*h?\b")],
        prod: |ts, args| -> Option<Time> {
            let m = args[0].as_regex_match()?;
            let hour: u32 = int_group(m, "hour")?;
            let minute: u32 = int_group(m, "minute")?;
            let as_number = (hour * 100 + minute) as i32;
            if as_number == ts.year() || as_number == ts.year() + 1 {
                return None;
            }
            if minute % 5 != 0 {
                return None;
            }
            Some(Time { hour: Some(hour), minute: Some(minute), ..Time::default() })
        },
    }
}

const NAMED_HOURS: &[(&str, u32)] = &[
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
    ("eleven", 11),
    ("twelve", 12),
    ("eins", 1),
    ("ein", 1),
    ("zwei", 2),
    ("drei", 3),
    ("vier", 4),
    ("fünf", 5),
    ("sechs", 6),
    ("sieben", 7),
    ("acht", 8),
    ("neun", 9),
    ("zehn", 10),
    ("elf", 11),
    ("zwölf", 12),
];

/// "eight", "acht" — a spelled-out hour.
pub(crate) fn rule_named_hour() -> RuleDef {
    rule! {
        name: "named hour",
        pattern: [re!(
            r"\b(?P<hour>one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|eins?|zwei|drei|vier|fünf|sechs|sieben|acht|neun|zehn|elf|zwölf)\b"
        )],
        prod: |_ts, args| -> Option<Time> {
            let word = args[0].as_regex_match()?.group("hour")?.to_lowercase();
            let (_, hour) = NAMED_HOURS.iter().find(|(name, _)| *name == word)?;
            Some(Time { hour: Some(*hour), ..Time::default() })
        },
    }
}

/// "quarter to eight", "viertel vor acht" → hh-1:45.
pub(crate) fn rule_quarter_before() -> RuleDef {
    rule! {
        name: "quarter to <tod>",
        pattern: [
            re!(r"\b((a |one )?quarter( to| till| before| of)|(ein )?viertel vor)\b"),
            pred!(is_tod),
        ],
        prod: |_ts, args| -> Option<Time> {
            let t = args[1].as_time()?;
            if t.minute.unwrap_or(0) != 0 {
                return None;
            }
            let hour = t.hour?;
            Some(Time {
                hour: Some(if hour > 0 { hour - 1 } else { 23 }),
                minute: Some(45),
                ..Time::default()
            })
        },
    }
}

/// "quarter past eight", "viertel nach acht" → hh:15.
pub(crate) fn rule_quarter_after() -> RuleDef {
    rule! {
        name: "quarter past <tod>",
        pattern: [
            re!(r"\b((a |one )?quarter( past| after)|(ein )?viertel nach)\b"),
            pred!(is_tod),
        ],
        prod: |_ts, args| -> Option<Time> {
            let t = args[1].as_time()?;
            if t.minute.unwrap_or(0) != 0 {
                return None;
            }
            Some(Time { hour: t.hour, minute: Some(15), ..Time::default() })
        },
    }
}

/// "half past eight" → 8:30.
pub(crate) fn rule_half_past() -> RuleDef {
    rule! {
        name: "half past <tod>",
        pattern: [re!(r"\bhalf past\b"), pred!(is_tod)],
        prod: |_ts, args| -> Option<Time> {
            let t = args[1].as_time()?;
            if t.minute.unwrap_or(0) != 0 {
                return None;
            }
            Some(Time { hour: t.hour, minute: Some(30), ..Time::default() })
        },
    }
}

/// German "halb acht" → 7:30, half an hour *before* the named hour.
pub(crate) fn rule_half_before() -> RuleDef {
    rule! {
        name: "halb <tod>",
        pattern: [re!(r"\bhalb\b"), pred!(is_tod)],
        prod: |_ts, args| -> Option<Time> {
            let t = args[1].as_time()?;
            if t.minute.unwrap_or(0) != 0 {
                return None;
            }
            let hour = t.hour?;
            Some(Time {
                hour: Some(if hour > 0 { hour - 1 } else { 23 }),
                minute: Some(30),
                ..Time::default()
            })
        },
    }
}

fn merge_tod_pod(tod: &Time, pod: &Time) -> Option<Time> {
    let hour = tod.hour?;
    let tag = pod.pod.as_deref()?;
    let afternoonish =
        tag.contains("afternoon") || tag.contains("evening") || tag.contains("night");
    let morningish = tag.contains("morning") || tag.contains("forenoon");
    let hour = if (1..=11).contains(&hour) && afternoonish {
        hour + 12
    } else if hour > 12 && morningish {
        // "17 Uhr morgens" is nonsense, refuse to merge
        return None;
    } else {
        hour
    };
    Some(Time { hour: Some(hour), minute: tod.minute, ..Time::default() })
}

/// "3 in the afternoon" → 15:00.
pub(crate) fn rule_tod_pod() -> RuleDef {
    rule! {
        name: "<tod> <pod>",
        pattern: [pred!(is_tod), pred!(is_pod)],
        prod: |_ts, args| -> Option<Time> {
            merge_tod_pod(args[0].as_time()?, args[1].as_time()?)
        },
    }
}

/// "abends 8" → 20:00.
pub(crate) fn rule_pod_tod() -> RuleDef {
    rule! {
        name: "<pod> <tod>",
        pattern: [pred!(is_pod), pred!(is_tod)],
        prod: |_ts, args| -> Option<Time> {
            merge_tod_pod(args[1].as_time()?, args[0].as_time()?)
        },
    }
}

pub(crate) fn rule_date_tod() -> RuleDef {
    rule! {
        name: "<date> <tod>",
        pattern: [pred!(is_date), pred!(is_tod)],
        prod: |_ts, args| -> Option<Time> {
            let date = args[0].as_time()?;
            let tod = args[1].as_time()?;
            Some(Time { hour: tod.hour, minute: tod.minute, ..date.clone() })
        },
    }
}

pub(crate) fn rule_tod_date() -> RuleDef {
    rule! {
        name: "<tod> <date>",
        pattern: [pred!(is_tod), pred!(is_date)],
        prod: |_ts, args| -> Option<Time> {
            let tod = args[0].as_time()?;
            let date = args[1].as_time()?;
            Some(Time { hour: tod.hour, minute: tod.minute, ..date.clone() })
        },
    }
}

pub(crate) fn rule_date_pod() -> RuleDef {
    rule! {
        name: "<date> <pod>",
        pattern: [pred!(is_date), pred!(is_pod)],
        prod: |_ts, args| -> Option<Time> {
            let date = args[0].as_time()?;
            Some(Time { pod: args[1].as_time()?.pod.clone(), ..date.clone() })
        },
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![
        rule_hhmm(),
        rule_hh_oclock(),
        rule_hhmm_military(),
        rule_named_hour(),
        rule_quarter_before(),
        rule_quarter_after(),
        rule_half_past(),
        rule_half_before(),
        rule_tod_pod(),
        rule_pod_tod(),
        rule_date_tod(),
        rule_tod_date(),
        rule_date_pod(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;
    use crate::scorer::CoverageScorer;
    use crate::{Context, Options, parse_with_scorer};

    fn ts(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 43, 0).unwrap()
    }

    fn tod(hour: u32, minute: Option<u32>) -> Artifact {
        Artifact::from(Time { hour: Some(hour), minute, ..Time::default() })
    }

    fn pod(tag: &str) -> Artifact {
        Artifact::from(Time { pod: Some(tag.into()), ..Time::default() })
    }

    #[test]
    fn military_heuristics() {
        let rule = rule_hhmm_military();
        let m = |text: &str| {
            let hour = text[..2].to_string();
            let minute = text[2..4].to_string();
            Artifact::from(crate::artifact::RegexMatch::new(
                0,
                crate::artifact::Span::new(0, text.len()),
                text.into(),
                [("hour".to_string(), hour), ("minute".to_string(), minute)].into(),
            ))
        };
        let reference = ts(2018, 3, 7);
        assert!((rule.production)(&reference, &[m("1430")]).is_some());
        // the reference year and the year after read as years, not times
        assert!((rule.production)(&reference, &[m("2018")]).is_none());
        assert!((rule.production)(&reference, &[m("2019")]).is_none());
        // off the five-minute raster
        assert!((rule.production)(&reference, &[m("1433")]).is_none());
    }

    #[test]
    fn quarter_and_half_idioms() {
        let reference = ts(2018, 3, 7);
        let produced = (rule_quarter_before().production)(&reference, &[pod("x"), tod(8, None)]);
        assert_eq!(produced.unwrap().nb_str(), "Time[]{X-X-X 07:45 (X/X)}");

        let produced = (rule_quarter_after().production)(&reference, &[pod("x"), tod(8, None)]);
        assert_eq!(produced.unwrap().nb_str(), "Time[]{X-X-X 08:15 (X/X)}");

        let produced = (rule_half_before().production)(&reference, &[pod("x"), tod(8, None)]);
        assert_eq!(produced.unwrap().nb_str(), "Time[]{X-X-X 07:30 (X/X)}");

        let produced = (rule_half_past().production)(&reference, &[pod("x"), tod(8, None)]);
        assert_eq!(produced.unwrap().nb_str(), "Time[]{X-X-X 08:30 (X/X)}");

        // a minute already set refuses the idiom
        assert!(
            (rule_quarter_before().production)(&reference, &[pod("x"), tod(12, Some(1))])
                .is_none()
        );
        // midnight wraps backwards
        let produced = (rule_quarter_before().production)(&reference, &[pod("x"), tod(0, None)]);
        assert_eq!(produced.unwrap().nb_str(), "Time[]{X-X-X 23:45 (X/X)}");
    }

    #[test]
    fn tod_pod_merging() {
        let merged = merge_tod_pod(
            &Time { hour: Some(3), ..Time::default() },
            &Time { pod: Some("afternoon".into()), ..Time::default() },
        );
        assert_eq!(merged.unwrap().hour, Some(15));

        let refused = merge_tod_pod(
            &Time { hour: Some(17), ..Time::default() },
            &Time { pod: Some("morning".into()), ..Time::default() },
        );
        assert!(refused.is_none());

        let noon = merge_tod_pod(
            &Time { hour: Some(12), ..Time::default() },
            &Time { pod: Some("afternoon".into()), ..Time::default() },
        );
        assert_eq!(noon.unwrap().hour, Some(12));
    }

    #[test]
    fn end_to_end_clock_expressions() {
        let reference = Context { reference_time: ts(2018, 3, 7) };
        let opts = Options { timeout: 0.0, latent_time: false, max_stack_depth: 0, ..Options::default() };
        let resolve = |text: &str| {
            parse_with_scorer(text, &reference, &opts, &CoverageScorer)
                .map(|p| p.resolution.nb_str())
                .unwrap_or_else(|| panic!("no parse for {text:?}"))
        };
        assert_eq!(resolve("19:30"), "Time[]{X-X-X 19:30 (X/X)}");
        assert_eq!(resolve("7.25 pm"), "Time[]{X-X-X 19:25 (X/X)}");
        assert_eq!(resolve("1430"), "Time[]{X-X-X 14:30 (X/X)}");
        assert_eq!(resolve("quarter to eight"), "Time[]{X-X-X 07:45 (X/X)}");
        assert_eq!(resolve("viertel vor acht"), "Time[]{X-X-X 07:45 (X/X)}");
        assert_eq!(resolve("halb acht"), "Time[]{X-X-X 07:30 (X/X)}");

        // "3" also reads as a day of month, which grounds to a date of its
        // own; the 15:00 reading must be among the candidates either way
        let candidates: Vec<String> =
            crate::parse_stream_with_scorer("3 in the afternoon", &reference, &opts, &CoverageScorer)
                .map(|p| p.resolution.nb_str())
                .collect();
        assert!(candidates.iter().any(|c| c == "Time[]{X-X-X 15:00 (X/X)}"), "{candidates:?}");
    }
}
