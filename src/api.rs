//! Public parsing surface.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;

use crate::artifact::Artifact;
use crate::engine::ParseStream;
use crate::learn::NaiveBayesScorer;
use crate::scorer::{DummyScorer, Scorer};
use crate::RuleId;

/// Environment variable naming a scorer model file to load for the default
/// scorer.
pub const MODEL_ENV_VAR: &str = "TEMPORA_MODEL";

/// Parsing context: the reference time relative expressions resolve
/// against.
#[derive(Debug, Clone)]
pub struct Context {
    pub reference_time: NaiveDateTime,
}

impl Default for Context {
    fn default() -> Self {
        Context { reference_time: Local::now().naive_local() }
    }
}

/// Options controlling the search.
#[derive(Debug, Clone)]
pub struct Options {
    /// Parse budget in seconds; `0.0` means no budget.
    pub timeout: f64,
    /// Minimum share of characters an initial match sequence must cover,
    /// relative to the best initial sequence, to be searched at all.
    pub relative_match_len: f64,
    /// Beam depth: how many of the best partial parses survive each
    /// truncation; `0` means unbounded.
    pub max_stack_depth: usize,
    /// Anchor date-less resolutions to the reference time (see
    /// `src/postprocess.rs`).
    pub latent_time: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            timeout: 1.0,
            relative_match_len: 1.0,
            max_stack_depth: 10,
            latent_time: true,
        }
    }
}

/// One parse result: the resolved artifact, the production history that
/// built it and its final score.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub resolution: Artifact,
    pub production: Vec<RuleId>,
    pub score: f64,
}

impl fmt::Display for Parse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s={:.3} p=[", self.resolution, self.score)?;
        for (i, step) in self.production.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{step}")?;
        }
        f.write_str("]")
    }
}

/// Parse `text` with the default context (now), options and scorer; returns
/// the highest-scored resolution, if any.
pub fn parse(text: &str) -> Option<Parse> {
    parse_with(text, &Context::default(), &Options::default())
}

/// Parse `text` with the default scorer. Supply the context to make
/// resolution deterministic.
pub fn parse_with(text: &str, context: &Context, options: &Options) -> Option<Parse> {
    parse_with_scorer(text, context, options, default_scorer())
}

/// Parse `text`, ranking with the given scorer.
pub fn parse_with_scorer(
    text: &str,
    context: &Context,
    options: &Options,
    scorer: &dyn Scorer,
) -> Option<Parse> {
    let mut best: Option<Parse> = None;
    for parse in parse_stream_with_scorer(text, context, options, scorer) {
        let improves = best.as_ref().is_none_or(|b| parse.score >= b.score);
        if improves {
            best = Some(parse);
        }
    }
    if best.is_none() {
        log::warn!("failed to produce a result for {text:?}");
    }
    best
}

/// Like [`parse_with`], but yields every produced parse as the search finds
/// it, in non-decreasing-coverage, best-score-so-far order.
pub fn parse_stream(text: &str, context: &Context, options: &Options) -> ParseStream<'static> {
    parse_stream_with_scorer(text, context, options, default_scorer())
}

/// Like [`parse_stream`] with an explicit scorer.
pub fn parse_stream_with_scorer<'s>(
    text: &str,
    context: &Context,
    options: &Options,
    scorer: &'s dyn Scorer,
) -> ParseStream<'s> {
    ParseStream::new(text, context.reference_time, options, scorer)
}

static DEFAULT_SCORER: Lazy<Box<dyn Scorer>> = Lazy::new(|| {
    match std::env::var(MODEL_ENV_VAR) {
        Ok(path) => match NaiveBayesScorer::from_model_file(&path) {
            Ok(scorer) => {
                log::info!("loaded scorer model from {path}");
                Box::new(scorer)
            }
            Err(err) => {
                log::warn!("failed to load scorer model from {path}: {err}; using the null scorer");
                Box::new(DummyScorer)
            }
        },
        Err(_) => {
            log::warn!("no scorer model configured, using the null scorer");
            Box::new(DummyScorer)
        }
    }
});

fn default_scorer() -> &'static dyn Scorer {
    DEFAULT_SCORER.as_ref()
}
