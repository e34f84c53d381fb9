//! Rule registry: compiles declared rules into their runtime form.
//!
//! Regex literals in rule patterns are compiled here. Each distinct source
//! string gets a unique id and is compiled exactly once; rules sharing a
//! literal (the interval join expression, for example) therefore share one
//! id, which keeps the scorer's feature space small. The compiled expression
//! wraps the source in a named group `R<id>` whose span becomes the span of
//! the resulting [`RegexMatch`](crate::RegexMatch).
//!
//! Shared sub-patterns are written as `(?&_day)`, `(?&_month)`, `(?&_year)`,
//! `(?&_hour)` and `(?&_minute)` in rule sources and expanded textually
//! before compilation.
//!
//! A source may start with the marker `(?&_bfr)`: "not directly preceded by
//! a digit or a dot". It compiles to a guard class placed before the span
//! group, so the guard character is consumed by the overall match but never
//! part of the span. This stands in for a negative lookbehind, which the
//! regex engine does not support, and keeps `31` inside `331` or after
//! `12.` from matching as a day on its own.
//!
//! Registration fails hard (panics) on two programmer errors:
//!
//! - a pattern with two adjacent regex literals (they must be merged into
//!   one expression; the sequence aligner relies on this invariant), and
//! - a regex literal that matches the empty string.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Artifact, Dim, Production, RuleDef, RulePattern};

const HOUR: &str = r"(?:[01]?\d)|(?:2[0-3])";
const MINUTE: &str = r"[0-5]\d";
const DAY: &str = r"[012]?[1-9]|10|20|30|31";
const MONTH: &str = r"10|11|12|0?[1-9]";
const YEAR: &str = r"(?:19\d\d)|(?:20[0-2]\d)|(?:\d\d)";

fn expand_defines(src: &str) -> String {
    src.replace("(?&_hour)", &format!("(?:{HOUR})"))
        .replace("(?&_minute)", &format!("(?:{MINUTE})"))
        .replace("(?&_day)", &format!("(?:{DAY})"))
        .replace("(?&_month)", &format!("(?:{MONTH})"))
        .replace("(?&_year)", &format!("(?:{YEAR})"))
}

/// One atom of a compiled rule pattern.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PatternItem {
    /// Matches a [`RegexMatch`](crate::RegexMatch) artifact with this id.
    Regex(u32),
    /// Matches any artifact of the given variant.
    Dimension(Dim),
    /// Matches an artifact for which the predicate holds.
    Predicate(&'static str, fn(&Artifact) -> bool),
}

impl PatternItem {
    pub fn is_regex(&self) -> bool {
        matches!(self, PatternItem::Regex(_))
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        match self {
            PatternItem::Regex(id) => {
                matches!(artifact, Artifact::RegexMatch(m) if m.id == *id)
            }
            PatternItem::Dimension(Dim::Time) => matches!(artifact, Artifact::Time(_)),
            PatternItem::Dimension(Dim::Interval) => matches!(artifact, Artifact::Interval(_)),
            PatternItem::Dimension(Dim::Duration) => matches!(artifact, Artifact::Duration(_)),
            PatternItem::Predicate(_, pred) => pred(artifact),
        }
    }
}

/// A registered rule: the compiled pattern plus its production.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: Vec<PatternItem>,
    pub production: Production,
}

/// The process-wide rule and regex tables, immutable after construction.
pub(crate) struct Registry {
    rules: Vec<Rule>,
    regexes: Vec<(u32, Regex)>,
}

// Ids of production rules and regexes share one feature space in the scorer;
// regex ids start high so the numeric tokens never collide with rule names.
const FIRST_REGEX_ID: u32 = 100;

impl Registry {
    pub fn new(defs: Vec<RuleDef>) -> Registry {
        let mut regexes: Vec<(u32, Regex)> = Vec::new();
        let mut by_source: HashMap<(String, String), u32> = HashMap::new();
        let mut rules = Vec::with_capacity(defs.len());

        for def in defs {
            let mut pattern = Vec::with_capacity(def.pattern.len());
            let mut prev_was_regex = false;
            for item in def.pattern {
                let compiled = match item {
                    RulePattern::Regex(src) => {
                        if prev_was_regex {
                            panic!(
                                "rule {}: two adjacent regex literals, merge them into one",
                                def.name
                            );
                        }
                        prev_was_regex = true;
                        let (guard, body) = match src.strip_prefix("(?&_bfr)") {
                            Some(rest) => (r"(?:^|[^0-9.])", rest),
                            None => ("", src.as_str()),
                        };
                        let body = expand_defines(body);
                        let key = (guard.to_string(), body.clone());
                        let id = match by_source.get(&key) {
                            Some(&id) => id,
                            None => {
                                let id = FIRST_REGEX_ID + by_source.len() as u32;
                                let wrapped = format!("(?i){guard}(?P<R{id}>{body})");
                                let re = Regex::new(&wrapped).unwrap_or_else(|err| {
                                    panic!("rule {}: invalid regex: {err}", def.name)
                                });
                                if re.is_match("") {
                                    panic!(
                                        "rule {}: expression {src:?} matches the empty string",
                                        def.name
                                    );
                                }
                                by_source.insert(key, id);
                                regexes.push((id, re));
                                id
                            }
                        };
                        PatternItem::Regex(id)
                    }
                    RulePattern::Dimension(d) => {
                        prev_was_regex = false;
                        PatternItem::Dimension(d)
                    }
                    RulePattern::Predicate(name, pred) => {
                        prev_was_regex = false;
                        PatternItem::Predicate(name, pred)
                    }
                };
                pattern.push(compiled);
            }
            rules.push(Rule { name: def.name, pattern, production: def.production });
        }

        Registry { rules, regexes }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn regexes(&self) -> &[(u32, Regex)] {
        &self.regexes
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::new(crate::rules::all()));

/// The global registry, built once from the rule corpus on first use.
pub(crate) fn registry() -> &'static Registry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Time;

    fn noop() -> Production {
        Box::new(|_, _| None)
    }

    fn is_anything(_: &Artifact) -> bool {
        true
    }

    #[test]
    fn shared_sources_share_ids() {
        let reg = Registry::new(vec![
            RuleDef {
                name: "a",
                pattern: vec![RulePattern::Regex("foo".into())],
                production: noop(),
            },
            RuleDef {
                name: "b",
                pattern: vec![RulePattern::Regex("foo".into())],
                production: noop(),
            },
            RuleDef {
                name: "c",
                pattern: vec![RulePattern::Regex("bar".into())],
                production: noop(),
            },
        ]);
        assert_eq!(reg.regexes().len(), 2);
        let id = |rule: &Rule| match rule.pattern[0] {
            PatternItem::Regex(id) => id,
            _ => unreachable!(),
        };
        assert_eq!(id(&reg.rules()[0]), id(&reg.rules()[1]));
        assert_ne!(id(&reg.rules()[0]), id(&reg.rules()[2]));
    }

    #[test]
    fn defines_are_expanded() {
        let reg = Registry::new(vec![RuleDef {
            name: "a",
            pattern: vec![RulePattern::Regex(r"(?P<day>(?&_day))\.".into())],
            production: noop(),
        }]);
        let (_, re) = &reg.regexes()[0];
        assert!(re.is_match("8."));
        assert!(re.is_match("31."));
        assert!(!re.is_match("32."));
    }

    #[test]
    fn prefix_guard_keeps_the_span_clean() {
        let reg = Registry::new(vec![RuleDef {
            name: "a",
            pattern: vec![RulePattern::Regex(r"(?&_bfr)(?P<day>(?&_day))\b\.?".into())],
            production: noop(),
        }]);
        let (id, re) = &reg.regexes()[0];
        let key = format!("R{id}");

        // matches at the start and after a space; the span excludes the guard
        let caps = re.captures("x 8.").unwrap();
        let span = caps.name(&key).unwrap();
        assert_eq!((span.start(), span.end()), (2, 4));

        // digits directly after a dot are not days of their own
        assert_eq!(re.captures_iter("8.5.").count(), 1);
        assert_eq!(re.captures("8.5.").map(|c| c.name(&key).unwrap().range()), Some(0..2));
        assert_eq!(re.captures_iter("12.8").count(), 1);
    }

    #[test]
    #[should_panic(expected = "adjacent regex literals")]
    fn adjacent_regexes_fail_registration() {
        Registry::new(vec![RuleDef {
            name: "bad",
            pattern: vec![RulePattern::Regex("a".into()), RulePattern::Regex("b".into())],
            production: noop(),
        }]);
    }

    #[test]
    #[should_panic(expected = "matches the empty string")]
    fn empty_matching_regex_fails_registration() {
        Registry::new(vec![RuleDef {
            name: "bad",
            pattern: vec![RulePattern::Regex("x?".into())],
            production: noop(),
        }]);
    }

    #[test]
    fn pattern_item_matching() {
        let time = Artifact::from(Time::default());
        assert!(PatternItem::Dimension(Dim::Time).matches(&time));
        assert!(!PatternItem::Dimension(Dim::Interval).matches(&time));
        assert!(!PatternItem::Regex(100).matches(&time));
        assert!(PatternItem::Predicate("is_anything", is_anything).matches(&time));
    }
}
