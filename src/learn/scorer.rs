//! The naive-Bayes scorer: model log-odds plus a coverage penalty.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::artifact::Artifact;
use crate::engine::PartialParse;
use crate::scorer::Scorer;

use super::naive_bayes::MultinomialNaiveBayes;
use super::pipeline::Pipeline;
use super::vectorizer::CountVectorizer;

// Calibration constant, not a contract: for final emissions the coverage
// penalty is scaled up until it dominates the model log-odds, so fuller
// matches always outrank partial ones.
const FINAL_LEN_WEIGHT: f64 = 1000.0;

/// Scores a parse by the naive-Bayes log-odds of its production history
/// plus `ln(covered / len(text))`.
///
/// For a live partial parse the coverage is what the whole sequence could
/// span; for a final emission it is the span of the emitted artifact,
/// weighted by [`FINAL_LEN_WEIGHT`].
pub struct NaiveBayesScorer {
    model: Pipeline,
}

impl NaiveBayesScorer {
    pub fn new(model: Pipeline) -> NaiveBayesScorer {
        NaiveBayesScorer { model }
    }

    /// Load a scorer from a model file written by [`save_model_file`].
    ///
    /// [`save_model_file`]: NaiveBayesScorer::save_model_file
    pub fn from_model_file<P: AsRef<Path>>(path: P) -> Result<NaiveBayesScorer, ModelError> {
        let data = fs::read_to_string(path).map_err(ModelError::Io)?;
        let model = serde_json::from_str(&data).map_err(ModelError::Format)?;
        Ok(NaiveBayesScorer { model })
    }

    /// Serialize the model so [`from_model_file`] can restore it.
    ///
    /// [`from_model_file`]: NaiveBayesScorer::from_model_file
    pub fn save_model_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let data = serde_json::to_string(&self.model).map_err(ModelError::Format)?;
        fs::write(path, data).map_err(ModelError::Io)
    }

    fn log_odds(&self, partial_parse: &PartialParse) -> f64 {
        let tokens: Vec<String> =
            partial_parse.rules.iter().map(|step| step.to_string()).collect();
        let pred = self.model.predict_log_proba(std::slice::from_ref(&tokens));
        pred[0].1 - pred[0].0
    }
}

impl Scorer for NaiveBayesScorer {
    fn score(&self, txt: &str, _ts: &NaiveDateTime, partial_parse: &PartialParse) -> f64 {
        let len_score = (partial_parse.max_covered_chars as f64 / txt.len() as f64).ln();
        self.log_odds(partial_parse) + len_score
    }

    fn score_final(
        &self,
        txt: &str,
        _ts: &NaiveDateTime,
        partial_parse: &PartialParse,
        production: &Artifact,
    ) -> f64 {
        let len_score = (production.len() as f64 / txt.len() as f64).ln();
        self.log_odds(partial_parse) + FINAL_LEN_WEIGHT * len_score
    }
}

/// Train the default model on labeled production histories, e.g. the output
/// of [`run_corpus`](crate::run_corpus).
pub fn train_naive_bayes(x: &[Vec<String>], y: &[i32]) -> Pipeline {
    let mut pipeline = Pipeline::new(CountVectorizer::new((1, 3)), MultinomialNaiveBayes::new(1.0));
    pipeline.fit(x, y);
    pipeline
}

/// Failure to load or store a scorer model file.
#[derive(Debug)]
pub enum ModelError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Io(err) => write!(f, "model file: {err}"),
            ModelError::Format(err) => write!(f, "model format: {err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Io(err) => Some(err),
            ModelError::Format(err) => Some(err),
        }
    }
}
