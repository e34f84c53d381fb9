//! Month names, bare ("January", "Jan.") and fused with a day
//! ("8. Mai", "18 Nov").

use crate::artifact::Time;
use crate::RuleDef;

use super::helpers::int_group;

const MONTHS: &[(&str, &str, u32, &str)] = &[
    ("month:january", "day-month:january", 1, r"january?|jan\.?"),
    ("month:february", "day-month:february", 2, r"february?|feb\.?"),
    ("month:march", "day-month:march", 3, r"märz|march|mar\.?|mär\.?"),
    ("month:april", "day-month:april", 4, r"april|apr\.?"),
    ("month:may", "day-month:may", 5, r"mai|may\.?"),
    ("month:june", "day-month:june", 6, r"juni|june|jun\.?"),
    ("month:july", "day-month:july", 7, r"juli|july|jul\.?"),
    ("month:august", "day-month:august", 8, r"august|aug\.?"),
    ("month:september", "day-month:september", 9, r"september|sept?\.?"),
    ("month:october", "day-month:october", 10, r"oktober|october|oct\.?|okt\.?"),
    ("month:november", "day-month:november", 11, r"november|nov\.?"),
    ("month:december", "day-month:december", 12, r"december|dezember|dez\.?|dec\.?"),
];

pub(crate) fn rules() -> Vec<RuleDef> {
    let mut rules = Vec::with_capacity(MONTHS.len() * 2);
    for &(month_name, day_month_name, month, pattern) in MONTHS {
        rules.push(rule! {
            name: month_name,
            pattern: [re!(format!(r"\b({pattern})"))],
            prod: |_ts, _args| -> Option<Time> {
                Some(Time { month: Some(month), ..Time::default() })
            },
        });
        rules.push(rule! {
            name: day_month_name,
            pattern: [re!(format!(r"(?&_bfr)(?P<day>(?&_day))\s*[\./]?\s*({pattern})"))],
            prod: |_ts, args| -> Option<Time> {
                let day = int_group(args[0].as_regex_match()?, "day")?;
                Some(Time { month: Some(month), day: Some(day), ..Time::default() })
            },
        });
    }
    rules
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
    fn bare_month_names_stay_ungrounded() {
        let opts = Options { timeout: 0.0, latent_time: false, max_stack_depth: 0, ..Options::default() };
        for text in ["Januar", "Jan.", "january"] {
            let res = parse_with_scorer(text, &reference(), &opts, &CoverageScorer).unwrap();
            assert_eq!(res.resolution.nb_str(), "Time[]{X-01-X X:X (X/X)}", "{text}");
        }
    }

    #[test]
    fn fused_day_and_month() {
        let opts = Options { timeout: 0.0, latent_time: false, max_stack_depth: 0, ..Options::default() };
        let res = parse_with_scorer("8. Mai 2018", &reference(), &opts, &CoverageScorer).unwrap();
        assert_eq!(res.resolution.nb_str(), "Time[]{2018-05-08 X:X (X/X)}");
    }
}
