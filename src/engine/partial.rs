//! Partial parses and the two pattern matchers that drive rule application.

use std::cmp::Ordering;
use std::rc::Rc;

use chrono::NaiveDateTime;

use crate::artifact::{Artifact, RegexMatch, Span};
use crate::registry::{PatternItem, Registry, Rule};
use crate::RuleId;

/// A partial parse: the current artifact sequence, the history of regexes
/// and rules that produced it, and the score the scorer assigned to it.
///
/// Construction from anything but a non-empty sequence is a programmer
/// error. A partial parse is immutable; applying a rule yields a new one
/// that shares the applicable-rule filter of its ancestor.
pub struct PartialParse {
    /// The current artifact sequence.
    pub prod: Vec<Artifact>,
    /// Ids of the regexes and rules applied so far, in order.
    pub rules: Vec<RuleId>,
    /// Characters of input this parse can at most cover, span of the first
    /// to span of the last artifact.
    pub max_covered_chars: usize,
    /// Score assigned by the scorer; ties in coverage are broken by this.
    pub score: f64,
    /// Indices into the registry of the rules that can possibly align on
    /// `prod`. Computed once per seed and shared by all descendants.
    applicable: Rc<Vec<usize>>,
}

impl PartialParse {
    pub(crate) fn new(prod: Vec<Artifact>, rules: Vec<RuleId>) -> PartialParse {
        assert!(!prod.is_empty(), "a partial parse needs at least one artifact");
        let max_covered_chars = prod.last().unwrap().mend() - prod[0].mstart();
        PartialParse {
            prod,
            rules,
            max_covered_chars,
            score: 0.0,
            applicable: Rc::new(Vec::new()),
        }
    }

    /// Seed a partial parse from a contiguous regex-match sequence and
    /// pre-filter the rules that can possibly apply to it.
    ///
    /// The filter pays off on larger inputs: descendants inherit it by
    /// reference instead of rescanning the full rule table.
    pub(crate) fn from_regex_matches(
        registry: &Registry,
        matches: Vec<RegexMatch>,
    ) -> PartialParse {
        let rules = matches.iter().map(|m| RuleId::Regex(m.id)).collect();
        let prod = matches.into_iter().map(Artifact::from).collect();
        let mut parse = PartialParse::new(prod, rules);
        let applicable: Vec<usize> = registry
            .rules()
            .iter()
            .enumerate()
            .filter(|(_, rule)| !seq_match(&parse.prod, &rule.pattern).is_empty())
            .map(|(idx, _)| idx)
            .collect();
        log::debug!(
            "{} of {} rules applicable to {} matches",
            applicable.len(),
            registry.rules().len(),
            parse.prod.len()
        );
        parse.applicable = Rc::new(applicable);
        parse
    }

    pub(crate) fn applicable(&self) -> &[usize] {
        &self.applicable
    }

    /// Apply `rule` to the window `[i_start, i_end)` of the sequence. On a
    /// successful production the window collapses to the produced artifact,
    /// whose span is expanded to cover everything it consumed.
    pub(crate) fn apply_rule(
        &self,
        ts: &NaiveDateTime,
        rule: &Rule,
        window: (usize, usize),
    ) -> Option<PartialParse> {
        let (i_start, i_end) = window;
        let mut produced = (rule.production)(ts, &self.prod[i_start..i_end])?;
        produced.set_span(Span::new(
            self.prod[i_start].mstart(),
            self.prod[i_end - 1].mend(),
        ));

        let mut prod = Vec::with_capacity(self.prod.len() - (i_end - i_start) + 1);
        prod.extend_from_slice(&self.prod[..i_start]);
        prod.push(produced);
        prod.extend_from_slice(&self.prod[i_end..]);

        let mut rules = self.rules.clone();
        rules.push(RuleId::Rule(rule.name));

        let mut parse = PartialParse::new(prod, rules);
        parse.applicable = Rc::clone(&self.applicable);
        Some(parse)
    }

    /// Stack order: longer coverage first, then higher score. The beam is
    /// kept sorted ascending by this so the best element is popped last.
    pub(crate) fn cmp_cover_score(&self, other: &PartialParse) -> Ordering {
        self.max_covered_chars
            .cmp(&other.max_covered_chars)
            .then_with(|| self.score.total_cmp(&other.score))
    }
}

impl std::fmt::Debug for PartialParse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialParse")
            .field("prod", &self.prod)
            .field("rules", &self.rules)
            .field("score", &self.score)
            .finish()
    }
}

/// Find every contiguous window of `seq` on which `pat` matches
/// artifact-by-artifact. Yields `(start, end)` index pairs, end exclusive.
pub(crate) fn match_rule(seq: &[Artifact], pat: &[PatternItem]) -> Vec<(usize, usize)> {
    let mut windows = Vec::new();
    if seq.is_empty() || pat.is_empty() {
        return windows;
    }
    for i_start in 0..seq.len() {
        if !pat[0].matches(&seq[i_start]) {
            continue;
        }
        let mut i_seq = i_start + 1;
        let mut i_pat = 1;
        while i_seq < seq.len() && i_pat < pat.len() && pat[i_pat].matches(&seq[i_seq]) {
            i_pat += 1;
            i_seq += 1;
        }
        if i_pat == pat.len() {
            windows.push((i_start, i_seq));
        }
    }
    windows
}

/// Determine whether `pat` can align on `seq` at all, and where its regex
/// atoms would land. Yields one index list per alignment, each holding the
/// positions in `seq` of all regex atoms of `pat`, in order.
///
/// An alignment requires at least one artifact of `seq` between two regex
/// atoms of `pat`: rule patterns never declare two adjacent regex atoms
/// (enforced at registration), so something must produce the artifact in
/// between. Likewise a leading or trailing non-regex atom consumes one
/// artifact at the respective end.
pub(crate) fn seq_match(seq: &[Artifact], pat: &[PatternItem]) -> Vec<Vec<usize>> {
    let mut alignments = Vec::new();
    collect(seq, pat, 0, &mut alignments);
    alignments
}

fn collect(seq: &[Artifact], pat: &[PatternItem], offset: usize, out: &mut Vec<Vec<usize>>) {
    if pat.is_empty() {
        // the empty pattern aligns exactly once, trivially
        out.push(Vec::new());
        return;
    }
    if seq.is_empty() {
        return;
    }
    if !pat[pat.len() - 1].is_regex() {
        // the trailing predicate needs one artifact at the end
        collect(&seq[..seq.len() - 1], &pat[..pat.len() - 1], offset, out);
        return;
    }
    if pat.len() > seq.len() {
        return;
    }
    if !pat[0].is_regex() {
        collect(&seq[1..], &pat[1..], offset + 1, out);
        return;
    }
    let n_regex = pat.iter().filter(|p| p.is_regex()).count();
    for (i, artifact) in seq.iter().enumerate() {
        if pat[0].matches(artifact) {
            let mut sub = Vec::new();
            collect(&seq[i + 1..], &pat[1..], offset + i + 1, &mut sub);
            for alignment in sub {
                // keep only alignments that placed every remaining regex atom
                if alignment.len() == n_regex - 1 {
                    let mut full = Vec::with_capacity(n_regex);
                    full.push(i + offset);
                    full.extend(alignment);
                    out.push(full);
                }
            }
        }
    }
}
