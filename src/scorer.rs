//! Scoring interface for partial parses and emitted artifacts.

use chrono::NaiveDateTime;

use crate::artifact::Artifact;
use crate::engine::PartialParse;

/// Scores partial parses during the search and artifacts about to be
/// emitted.
///
/// The two operations differ in what the coverage penalty is measured
/// against: a live partial parse is judged by the characters its whole
/// sequence could cover, a final emission by the span of the emitted
/// artifact alone.
pub trait Scorer: Send + Sync {
    /// Score a partial parse on the stack.
    fn score(&self, txt: &str, ts: &NaiveDateTime, partial_parse: &PartialParse) -> f64;

    /// Score an artifact of `partial_parse` that is about to be emitted.
    fn score_final(
        &self,
        txt: &str,
        ts: &NaiveDateTime,
        partial_parse: &PartialParse,
        production: &Artifact,
    ) -> f64;
}

/// The null scorer: every parse scores zero. Used when no model is loaded
/// and when generating training data, where ranking must not bias the
/// search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyScorer;

impl Scorer for DummyScorer {
    fn score(&self, _txt: &str, _ts: &NaiveDateTime, _partial_parse: &PartialParse) -> f64 {
        0.0
    }

    fn score_final(
        &self,
        _txt: &str,
        _ts: &NaiveDateTime,
        _partial_parse: &PartialParse,
        _production: &Artifact,
    ) -> f64 {
        0.0
    }
}

/// Test scorer: ranks purely by coverage, the way the trained scorer's
/// final-length penalty does once the model term is dwarfed. Keeps ranking
/// assertions deterministic without a trained model.
#[cfg(test)]
pub(crate) struct CoverageScorer;

#[cfg(test)]
impl Scorer for CoverageScorer {
    fn score(&self, txt: &str, _ts: &NaiveDateTime, partial_parse: &PartialParse) -> f64 {
        (partial_parse.max_covered_chars as f64 / txt.len() as f64).ln()
    }

    fn score_final(
        &self,
        txt: &str,
        _ts: &NaiveDateTime,
        _partial_parse: &PartialParse,
        production: &Artifact,
    ) -> f64 {
        1000.0 * (production.len() as f64 / txt.len() as f64).ln()
    }
}
