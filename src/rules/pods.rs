//! Part-of-day rules: morning/noon/evening words and their modifiers.

use crate::artifact::Time;
use crate::RuleDef;

use super::predicates::is_pod;

fn pod(tag: &str) -> Option<Time> {
    Some(Time { pod: Some(tag.to_string()), ..Time::default() })
}

pub(crate) fn rule_pod_first() -> RuleDef {
    rule! {
        name: "pod:first",
        pattern: [re!(
            r"\b(erster?|first|earliest|as early( as possible)?|frühe?st(ens?)?( wie möglich(er?)?)?|so früh( wie möglich)?)"
        )],
        prod: |_ts, _args| -> Option<Time> { pod("first") },
    }
}

pub(crate) fn rule_pod_last() -> RuleDef {
    rule! {
        name: "pod:last",
        pattern: [re!(
            r"\b(letzter?|last|latest|as late( as possible)?|spätest möglich(er?)?|so spät( wie möglich(er?)?)?)"
        )],
        prod: |_ts, _args| -> Option<Time> { pod("last") },
    }
}

/// "early", "very late", "später" before a part of day; composes into the
/// modifier tags the hour table understands.
pub(crate) fn rule_early_late_pod() -> RuleDef {
    rule! {
        name: "early|late <pod>",
        pattern: [
            re!(r"\b(?P<mod_very>(sehr|very)\s+)?((?P<mod_early>früh(er)?|early)|(?P<mod_late>spät(er)?|late))\b"),
            pred!(is_pod),
        ],
        prod: |_ts, args| -> Option<Time> {
            let m = args[0].as_regex_match()?;
            let base = args[1].as_time()?.pod.clone()?;
            let very = m.group("mod_very").is_some();
            let modifier = if m.group("mod_early").is_some() {
                if very { "veryearly" } else { "early" }
            } else if very {
                "verylate"
            } else {
                "late"
            };
            pod(&format!("{modifier}{base}"))
        },
    }
}

pub(crate) fn rule_pod_early_morning() -> RuleDef {
    rule! {
        name: "pod:earlymorning",
        pattern: [re!(r"\b(very early|sehr früh)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("earlymorning") },
    }
}

pub(crate) fn rule_pod_morning() -> RuleDef {
    rule! {
        name: "pod:morning",
        pattern: [re!(r"\b(morning|morgend?s?|(in der )?frühe?|early)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("morning") },
    }
}

pub(crate) fn rule_pod_forenoon() -> RuleDef {
    rule! {
        name: "pod:forenoon",
        pattern: [re!(r"\b(before\s*noon|vor\s*mittags?)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("forenoon") },
    }
}

pub(crate) fn rule_pod_noon() -> RuleDef {
    rule! {
        name: "pod:noon",
        pattern: [re!(r"\b(noon|mittags?)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("noon") },
    }
}

pub(crate) fn rule_pod_afternoon() -> RuleDef {
    rule! {
        name: "pod:afternoon",
        pattern: [re!(r"\b(after\s*noon|nach\s*mittags?)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("afternoon") },
    }
}

pub(crate) fn rule_pod_evening() -> RuleDef {
    rule! {
        name: "pod:evening",
        pattern: [re!(r"\b(evening|tonight|late|abend?s?|spät)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("evening") },
    }
}

pub(crate) fn rule_pod_late_evening() -> RuleDef {
    rule! {
        name: "pod:lateevening",
        pattern: [re!(r"\b(very late|sehr spät)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("lateevening") },
    }
}

pub(crate) fn rule_pod_night() -> RuleDef {
    rule! {
        name: "pod:night",
        pattern: [re!(r"\b(night|nachts?)\b")],
        prod: |_ts, _args| -> Option<Time> { pod("night") },
    }
}

pub(crate) fn rules() -> Vec<RuleDef> {
    vec![
        rule_pod_first(),
        rule_pod_last(),
        rule_early_late_pod(),
        rule_pod_early_morning(),
        rule_pod_morning(),
        rule_pod_forenoon(),
        rule_pod_noon(),
        rule_pod_afternoon(),
        rule_pod_evening(),
        rule_pod_late_evening(),
        rule_pod_night(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;

    fn ts() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2018, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn modifier_composition() {
        let rule = rule_early_late_pod();
        let m = |groups: &[(&str, &str)]| {
            Artifact::from(crate::artifact::RegexMatch::new(
                0,
                crate::artifact::Span::default(),
                String::new(),
                groups.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ))
        };
        let evening = Artifact::from(Time { pod: Some("evening".into()), ..Time::default() });

        let args = [m(&[("mod_early", "early")]), evening.clone()];
        let produced = (rule.production)(&ts(), &args).unwrap();
        assert_eq!(produced.as_time().unwrap().pod.as_deref(), Some("earlyevening"));

        let args = [m(&[("mod_very", "very "), ("mod_late", "late")]), evening];
        let produced = (rule.production)(&ts(), &args).unwrap();
        assert_eq!(produced.as_time().unwrap().pod.as_deref(), Some("verylateevening"));
    }
}
