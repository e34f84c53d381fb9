//! Weekday names, with optional fused part-of-day suffixes
//! ("Montagmorgen", "sunday night").

use crate::artifact::Time;
use crate::RuleDef;

use super::helpers::{WEEKDAY_POD, weekday_pod};

const WEEKDAYS: &[(&str, u32, &str)] = &[
    ("weekday:monday", 0, r"montags?|mondays?|mon?\.?"),
    ("weekday:tuesday", 1, r"die?nstags?|die?\.?|tuesdays?|tue?s?\.?"),
    ("weekday:wednesday", 2, r"mittwochs?|mi\.?|wednesdays?|wed\.?"),
    ("weekday:thursday", 3, r"donn?erstags?|don?\.?|thursdays?|thur?s?\.?"),
    ("weekday:friday", 4, r"freitags?|fridays?|fri?\.?"),
    ("weekday:saturday", 5, r"samstags?|sonnabends?|saturdays?|sat?\.?"),
    ("weekday:sunday", 6, r"sonntags?|so\.?|sundays?|sun?\.?"),
];

pub(crate) fn rules() -> Vec<RuleDef> {
    WEEKDAYS
        .iter()
        .map(|&(name, dow, pattern)| {
            rule! {
                name: name,
                pattern: [re!(format!(r"\b({pattern})\s*{WEEKDAY_POD}"))],
                prod: |_ts, args| -> Option<Time> {
                    let pod = weekday_pod(args[0].as_regex_match()?);
                    Some(Time { dow: Some(dow), pod, ..Time::default() })
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::scorer::CoverageScorer;
    use crate::{Context, Options, parse_with_scorer};

    fn reference() -> Context {
        Context {
            reference_time: chrono::NaiveDate::from_ymd_opt(2018, 3, 7)
                .unwrap()
                .and_hms_opt(12, 43, 0)
                .unwrap(),
        }
    }

    #[test]
    fn fused_pod_suffix_survives_grounding() {
        let opts = Options { timeout: 0.0, latent_time: false, max_stack_depth: 0, ..Options::default() };
        let res = parse_with_scorer("Montagmorgen", &reference(), &opts, &CoverageScorer).unwrap();
        assert_eq!(res.resolution.nb_str(), "Time[]{2018-03-12 X:X (X/morning)}");

        let res = parse_with_scorer("sunday night", &reference(), &opts, &CoverageScorer).unwrap();
        assert_eq!(res.resolution.nb_str(), "Time[]{2018-03-11 X:X (X/night)}");
    }
}
