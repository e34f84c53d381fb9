//! The best-first search loop, exposed as a pull iterator over parses.

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDateTime;

use crate::api::{Options, Parse};
use crate::artifact::Artifact;
use crate::postprocess::anchor_latent;
use crate::registry::registry;
use crate::scorer::Scorer;

use super::contiguity::regex_stack;
use super::matcher::{match_regex, preprocess};
use super::partial::{PartialParse, match_rule};
use super::timing::Sentinel;

/// Streaming parse results. Owns the full search state; each `next()` call
/// advances the search until something is emitted or the search ends.
///
/// Emission order follows stack order: non-decreasing coverage, then
/// best-score-so-far, modulo ties. On timeout the stream ends cleanly with
/// whatever was already emitted.
pub struct ParseStream<'s> {
    txt: String,
    ts: NaiveDateTime,
    scorer: &'s dyn Scorer,
    latent_time: bool,
    max_stack_depth: usize,
    sentinel: Sentinel,
    stack: Vec<PartialParse>,
    /// Best score each production sequence was pushed with; a sequence is
    /// only re-pushed when it strictly improves.
    stack_prod: HashMap<Vec<Artifact>, f64>,
    /// Best final score each artifact was emitted with; an artifact is only
    /// re-emitted when it strictly improves.
    parse_prod: HashMap<Artifact, f64>,
    pending: VecDeque<Parse>,
    done: bool,
}

impl<'s> ParseStream<'s> {
    pub(crate) fn new(
        txt: &str,
        ts: NaiveDateTime,
        options: &Options,
        scorer: &'s dyn Scorer,
    ) -> ParseStream<'s> {
        let txt = preprocess(txt);
        let sentinel = Sentinel::new(options.timeout);
        let reg = registry();

        let matches = match_regex(&txt, reg);
        let sequences = match regex_stack(&txt, &matches, &sentinel) {
            Ok(sequences) => sequences,
            Err(_) => {
                log::debug!("timeout while building contiguous sequences for {txt:?}");
                Vec::new()
            }
        };

        let mut stack: Vec<PartialParse> = sequences
            .into_iter()
            .map(|seq| {
                let picked = seq.into_iter().map(|i| matches[i].clone()).collect();
                let mut parse = PartialParse::from_regex_matches(reg, picked);
                parse.score = scorer.score(&txt, &ts, &parse);
                parse
            })
            .collect();
        stack.sort_by(|a, b| a.cmp_cover_score(b));
        log::debug!("initial stack length: {}", stack.len());

        // drop seeds covering less than the required share of what the best
        // seed covers, then clamp the beam
        if let Some(best) = stack.last() {
            let min_cover = best.max_covered_chars as f64 * options.relative_match_len;
            stack.retain(|s| s.max_covered_chars as f64 >= min_cover);
        }
        truncate_beam(&mut stack, options.max_stack_depth);
        log::debug!("stack length after pruning: {}", stack.len());

        ParseStream {
            txt,
            ts,
            scorer,
            latent_time: options.latent_time,
            max_stack_depth: options.max_stack_depth,
            sentinel,
            stack,
            stack_prod: HashMap::new(),
            parse_prod: HashMap::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// One turn of the search loop: pop the best parse, expand it through
    /// every applicable rule, push what improves. Parses that no rule can
    /// extend emit their non-regex artifacts.
    fn step(&mut self) {
        if self.sentinel.check().is_err() {
            log::debug!("timeout on {:?}", self.txt);
            self.done = true;
            return;
        }
        let Some(parse) = self.stack.pop() else {
            self.done = true;
            return;
        };
        log::debug!("producing on {:?}, score={:.2}", parse.prod, parse.score);

        let reg = registry();
        let mut fresh = Vec::new();
        for &rule_idx in parse.applicable() {
            let rule = &reg.rules()[rule_idx];
            for window in match_rule(&parse.prod, &rule.pattern) {
                let Some(mut next) = parse.apply_rule(&self.ts, rule, window) else {
                    continue;
                };
                next.score = self.scorer.score(&self.txt, &self.ts, &next);
                let improves = self
                    .stack_prod
                    .get(&next.prod)
                    .is_none_or(|&best| best < next.score);
                if improves {
                    log::debug!("  {} -> {:?}, score={:.2}", rule.name, next.prod, next.score);
                    self.stack_prod.insert(next.prod.clone(), next.score);
                    fresh.push(next);
                }
            }
        }

        if fresh.is_empty() {
            // nothing applies anymore: emit all sub-productions
            for artifact in &parse.prod {
                if artifact.is_regex_match() {
                    continue;
                }
                let score = self.scorer.score_final(&self.txt, &self.ts, &parse, artifact);
                let improves = self
                    .parse_prod
                    .get(artifact)
                    .is_none_or(|&best| best < score);
                if improves {
                    self.parse_prod.insert(artifact.clone(), score);
                    log::debug!(" => {artifact}, score={score:.2}");
                    self.pending.push_back(Parse {
                        resolution: artifact.clone(),
                        production: parse.rules.clone(),
                        score,
                    });
                }
            }
        } else {
            self.stack.append(&mut fresh);
            self.stack.sort_by(|a, b| a.cmp_cover_score(b));
            truncate_beam(&mut self.stack, self.max_stack_depth);
        }
    }
}

impl Iterator for ParseStream<'_> {
    type Item = Parse;

    fn next(&mut self) -> Option<Parse> {
        loop {
            if let Some(mut parse) = self.pending.pop_front() {
                if self.latent_time {
                    // anchoring runs after scoring: the model was trained on
                    // the un-anchored resolutions
                    parse.resolution = anchor_latent(&self.ts, parse.resolution);
                }
                return Some(parse);
            }
            if self.done {
                return None;
            }
            self.step();
        }
    }
}

/// Keep the `depth` best elements of an ascending-sorted beam; zero means
/// unbounded.
fn truncate_beam(stack: &mut Vec<PartialParse>, depth: usize) {
    if depth > 0 && stack.len() > depth {
        stack.drain(..stack.len() - depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::DummyScorer;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn options() -> Options {
        Options { latent_time: false, ..Options::default() }
    }

    #[test]
    fn nonsense_yields_nothing() {
        let stream = ParseStream::new("gargelbabel", ts(2020, 1, 1, 0, 0), &options(), &DummyScorer);
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let stream = ParseStream::new("", ts(2020, 1, 1, 0, 0), &options(), &DummyScorer);
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn emissions_are_unique_per_resolution() {
        let opts = Options { max_stack_depth: 0, latent_time: false, ..Options::default() };
        let parses: Vec<Parse> =
            ParseStream::new("8.5.2018", ts(2018, 3, 7, 0, 0), &opts, &DummyScorer).collect();
        assert!(!parses.is_empty());
        let mut seen = std::collections::HashSet::new();
        for parse in &parses {
            assert!(seen.insert(parse.resolution.nb_str()), "duplicate emission with equal score");
        }
    }

    #[test]
    fn beam_never_exceeds_depth() {
        let opts = Options { max_stack_depth: 3, latent_time: false, ..Options::default() };
        let mut stream =
            ParseStream::new("8.5.2018 12:30", ts(2018, 3, 7, 0, 0), &opts, &DummyScorer);
        assert!(stream.stack.len() <= 3);
        while !stream.done {
            stream.step();
            assert!(stream.stack.len() <= 3);
        }
    }

    #[test]
    fn relative_match_len_prunes_short_seeds() {
        let opts = Options { relative_match_len: 1.0, latent_time: false, ..Options::default() };
        let stream = ParseStream::new("tomorrow xx 2019", ts(2018, 3, 7, 0, 0), &opts, &DummyScorer);
        let best = stream.stack.last().map(|s| s.max_covered_chars).unwrap_or(0);
        for parse in &stream.stack {
            assert_eq!(parse.max_covered_chars, best);
        }
    }

    #[test]
    fn expired_budget_ends_the_stream_cleanly() {
        let opts = Options { timeout: 1e-9, latent_time: false, ..Options::default() };
        let stream = ParseStream::new(
            "tomorrow 8 yesterday Sep 9 9 12 2023 1923",
            ts(2020, 1, 1, 0, 0),
            &opts,
            &DummyScorer,
        );
        // must terminate quickly and without panicking; emissions may or may
        // not have happened before the deadline
        let _ = stream.count();
    }
}
