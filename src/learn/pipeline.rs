//! Feature extraction chained with the estimator.

use serde::{Deserialize, Serialize};

use super::naive_bayes::MultinomialNaiveBayes;
use super::vectorizer::CountVectorizer;

/// Count vectorization followed by naive Bayes. More machinery than the two
/// steps strictly need, but it keeps the model file format stable if either
/// step is swapped out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    transformer: CountVectorizer,
    estimator: MultinomialNaiveBayes,
}

impl Pipeline {
    pub fn new(transformer: CountVectorizer, estimator: MultinomialNaiveBayes) -> Pipeline {
        Pipeline { transformer, estimator }
    }

    /// Fit the vectorizer, then the estimator on the transformed samples.
    pub fn fit(&mut self, x: &[Vec<String>], y: &[i32]) -> &mut Self {
        let transformed = self.transformer.fit_transform(x);
        self.estimator.fit(&transformed, y, self.transformer.vocabulary_len());
        self
    }

    /// Posterior log probabilities `(negative, positive)` per document.
    pub fn predict_log_proba(&self, x: &[Vec<String>]) -> Vec<(f64, f64)> {
        self.estimator.predict_log_probability(&self.transformer.transform(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn fit_then_predict() {
        let x = vec![
            doc(&["good", "rule"]),
            doc(&["good"]),
            doc(&["bad", "rule"]),
            doc(&["bad"]),
        ];
        let y = vec![1, 1, -1, -1];
        let mut pipeline =
            Pipeline::new(CountVectorizer::new((1, 3)), MultinomialNaiveBayes::new(1.0));
        pipeline.fit(&x, &y);

        let pred = pipeline.predict_log_proba(&[doc(&["good"]), doc(&["bad"])]);
        assert!(pred[0].1 > pred[0].0);
        assert!(pred[1].0 > pred[1].1);
    }
}
