//! Text preprocessing and the regex matching pass.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::artifact::{RegexMatch, Span};
use crate::registry::Registry;

// Runs of commas, semicolons, separators, invisible controls and brackets
// become a single space; dash and hyphen variants collapse to '-'.
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;\p{Z}\p{C}\p{Ps}\p{Pe}]+").unwrap());
static DASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\p{Pd}|[\u{2010}-\u{2015}]|\u{2043})+").unwrap());

/// Normalize raw input before matching. All spans produced by the engine
/// refer to this preprocessed form.
pub(crate) fn preprocess(txt: &str) -> String {
    let spaced = SEPARATORS.replace_all(txt, " ");
    DASHES.replace_all(spaced.trim(), "-").trim().to_string()
}

/// Match every registered expression against `txt`.
///
/// Returns all hits sorted by `(mstart, mend)`, deduplicated on
/// `(id, mstart, mend)`. Overlapping hits of different expressions are all
/// retained; the contiguity builder branches on them.
pub(crate) fn match_regex(txt: &str, registry: &Registry) -> Vec<RegexMatch> {
    let mut matches = Vec::new();
    let mut seen: HashSet<(u32, usize, usize)> = HashSet::new();
    for (id, re) in registry.regexes() {
        let key = format!("R{id}");
        for caps in re.captures_iter(txt) {
            let m = caps.name(&key).expect("outer group participates in every match");
            if !seen.insert((*id, m.start(), m.end())) {
                continue;
            }
            let mut groups = HashMap::new();
            for name in re.capture_names().flatten() {
                if name == key {
                    continue;
                }
                if let Some(g) = caps.name(name) {
                    groups.insert(name.to_string(), g.as_str().to_string());
                }
            }
            matches.push(RegexMatch::new(
                *id,
                Span::new(m.start(), m.end()),
                m.as_str().to_string(),
                groups,
            ));
        }
    }
    matches.sort_by_key(|m| (m.span.mstart, m.span.mend));
    log::debug!("matched {} expressions in {txt:?}", matches.len());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleDef, RulePattern};

    #[test]
    fn preprocess_folds_separators() {
        assert_eq!(preprocess("Mon, Nov 13"), "Mon Nov 13");
        assert_eq!(preprocess("a;;b,,c"), "a b c");
        assert_eq!(preprocess("  padded  "), "padded");
        assert_eq!(preprocess("(8:00)"), "8:00");
        assert_eq!(preprocess("15\u{2013}18 Nov"), "15-18 Nov");
        assert_eq!(preprocess("15 \u{2014} 18"), "15 - 18");
        assert_eq!(preprocess("a\u{00a0}b"), "a b");
    }

    fn test_registry(sources: &[&str]) -> Registry {
        Registry::new(
            sources
                .iter()
                .map(|src| RuleDef {
                    name: "test",
                    pattern: vec![RulePattern::Regex((*src).into())],
                    production: Box::new(|_, _| None),
                })
                .collect(),
        )
    }

    #[test]
    fn matches_are_ordered_and_overlaps_retained() {
        let reg = test_registry(&[r"\d+", r"12"]);
        let matches = match_regex("a 12 b 3", &reg);
        let spans: Vec<(usize, usize)> =
            matches.iter().map(|m| (m.span.mstart, m.span.mend)).collect();
        assert_eq!(spans, vec![(2, 4), (2, 4), (7, 8)]);
        assert_ne!(matches[0].id, matches[1].id);
    }

    #[test]
    fn named_groups_are_captured() {
        let reg = test_registry(&[r"(?P<day>\d+)\.(?P<month>\d+)"]);
        let matches = match_regex("8.5", &reg);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].group("day"), Some("8"));
        assert_eq!(matches[0].group("month"), Some("5"));
        assert_eq!(matches[0].group("year"), None);
        assert_eq!(matches[0].text(), "8.5");
    }
}
