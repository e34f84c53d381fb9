//! tempora — a rule-based parser for natural-language time expressions.
//!
//! Given a noisy text fragment ("next Monday morning", "15-18 Nov for 3
//! nights", "viertel vor acht") and a reference timestamp, tempora produces a
//! structured resolution: a [`Time`], an [`Interval`] or a [`Duration`],
//! ranked by a learned score.
//!
//! The pipeline, leaves first:
//!
//! ```text
//! text ── preprocess ── regex matches ── contiguous match sequences
//!                                              │
//!                                              ▼
//!                                 initial partial parses (scored,
//!                                 pruned, truncated)
//!                                              │
//!                                              ▼
//!                         best-first loop: pop best, apply production
//!                         rules, dedup, truncate; emit parses that
//!                         cannot be reduced further
//!                                              │
//!                                              ▼
//!                          latent anchoring ── ranked [`Parse`] values
//! ```
//!
//! The rule corpus lives under `src/rules/`, the search core under
//! `src/engine/`, and the learned scorer under `src/learn/`.

use chrono::NaiveDateTime;

#[macro_use]
mod macros;

mod api;
mod artifact;
mod corpus;
mod engine;
mod learn;
mod postprocess;
mod registry;
mod rules;
mod scorer;

pub use api::{
    Context, MODEL_ENV_VAR, Options, Parse, parse, parse_stream, parse_stream_with_scorer,
    parse_with, parse_with_scorer,
};
pub use artifact::{
    Artifact, Duration, DurationUnit, FormatError, Interval, RegexMatch, Span, Time,
};
pub use corpus::{CorpusEntry, CorpusError, CorpusStats, TrainingData, corpus, run_corpus};
pub use engine::{ParseStream, PartialParse};
pub use learn::{
    CountVectorizer, ModelError, MultinomialNaiveBayes, NaiveBayesScorer, Pipeline,
    train_naive_bayes,
};
pub use scorer::{DummyScorer, Scorer};

// --- Rule declaration model -------------------------------------------------

/// Artifact variants a rule pattern can require via `dim!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dim {
    Time,
    Interval,
    Duration,
}

/// One atom of a rule pattern, as declared by the rule corpus.
///
/// Regex sources are raw strings here; the registry compiles them, assigns
/// ids and memoizes identical sources (see `src/registry.rs`).
pub(crate) enum RulePattern {
    /// A regular expression matched against the preprocessed input text.
    Regex(String),
    /// Matches any artifact of the given variant.
    Dimension(Dim),
    /// Matches an artifact for which the named predicate holds.
    Predicate(&'static str, fn(&Artifact) -> bool),
}

impl std::fmt::Debug for RulePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulePattern::Regex(src) => f.debug_tuple("Regex").field(src).finish(),
            RulePattern::Dimension(d) => f.debug_tuple("Dimension").field(d).finish(),
            RulePattern::Predicate(name, _) => f.debug_tuple("Predicate").field(name).finish(),
        }
    }
}

/// A production: reference time plus a contiguous window of artifacts in,
/// optionally a new artifact out. `None` is a soft rejection.
pub(crate) type Production =
    Box<dyn Fn(&NaiveDateTime, &[Artifact]) -> Option<Artifact> + Send + Sync>;

/// A parsing rule as declared in `src/rules/`: a name, a positional pattern
/// and a production over the matched window.
pub(crate) struct RuleDef {
    pub name: &'static str,
    pub pattern: Vec<RulePattern>,
    pub production: Production,
}

impl std::fmt::Debug for RuleDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDef")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("production", &"<function>")
            .finish()
    }
}

/// One step of a production history: a matched regex (by id) or an applied
/// rule (by name).
///
/// These are the tokens the scorer extracts n-gram features from, so their
/// `Display` form must be stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    Regex(u32),
    Rule(&'static str),
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleId::Regex(id) => write!(f, "{id}"),
            RuleId::Rule(name) => f.write_str(name),
        }
    }
}
