//! Multinomial naive Bayes over sparse count vectors, for two classes.

use serde::{Deserialize, Serialize};

use super::vectorizer::CountVector;

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// Two-class multinomial naive Bayes with Lidstone smoothing. Labels are
/// `-1` (negative) and `1` (positive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    /// Log priors `(negative, positive)`.
    class_prior: (f64, f64),
    log_likelihood_negative: Vec<f64>,
    log_likelihood_positive: Vec<f64>,
}

impl MultinomialNaiveBayes {
    pub fn new(alpha: f64) -> MultinomialNaiveBayes {
        MultinomialNaiveBayes {
            alpha,
            class_prior: (0.0, 0.0),
            log_likelihood_negative: Vec::new(),
            log_likelihood_positive: Vec::new(),
        }
    }

    /// Fit priors and per-token likelihoods. `vocabulary_len` bounds the
    /// feature indices occurring in `x`.
    pub fn fit(&mut self, x: &[CountVector], y: &[i32], vocabulary_len: usize) -> &mut Self {
        let negative = y.iter().filter(|&&label| label == -1).count();
        let positive = y.len() - negative;
        let total = (negative + positive) as f64;
        self.class_prior = ((negative as f64 / total).ln(), (positive as f64 / total).ln());

        let mut counts_negative = vec![self.alpha; vocabulary_len];
        let mut counts_positive = vec![self.alpha; vocabulary_len];
        for (vector, &label) in x.iter().zip(y) {
            let counts = if label == 1 { &mut counts_positive } else { &mut counts_negative };
            for (&idx, &count) in vector {
                counts[idx] += count as f64;
            }
        }

        let sum_negative: f64 = counts_negative.iter().sum();
        let sum_positive: f64 = counts_positive.iter().sum();
        self.log_likelihood_negative =
            counts_negative.iter().map(|c| c.ln() - sum_negative.ln()).collect();
        self.log_likelihood_positive =
            counts_positive.iter().map(|c| c.ln() - sum_positive.ln()).collect();
        self
    }

    /// Posterior log probabilities `(negative, positive)` for each sample.
    pub fn predict_log_probability(&self, x: &[CountVector]) -> Vec<(f64, f64)> {
        x.iter()
            .map(|vector| {
                let mut negative = self.class_prior.0;
                let mut positive = self.class_prior.1;
                for (&idx, &count) in vector {
                    // unseen indices can only come from a stale vectorizer;
                    // skip them rather than corrupt the posterior
                    if idx >= self.log_likelihood_negative.len() {
                        continue;
                    }
                    negative += self.log_likelihood_negative[idx] * count as f64;
                    positive += self.log_likelihood_positive[idx] * count as f64;
                }
                let norm = log_sum_exp(&[negative, positive]);
                (negative - norm, positive - norm)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vector(pairs: &[(usize, usize)]) -> CountVector {
        pairs.iter().copied().collect::<HashMap<_, _>>()
    }

    #[test]
    fn log_sum_exp_is_stable() {
        let result = log_sum_exp(&[1000.0, 1000.0]);
        assert!((result - (1000.0 + 2f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn posteriors_normalize() {
        let x = vec![vector(&[(0, 2)]), vector(&[(1, 1)])];
        let y = vec![1, -1];
        let mut nb = MultinomialNaiveBayes::new(1.0);
        nb.fit(&x, &y, 2);
        for (neg, pos) in nb.predict_log_probability(&x) {
            assert!((neg.exp() + pos.exp() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn separable_classes_are_separated() {
        // token 0 marks the positive class, token 1 the negative one
        let x = vec![
            vector(&[(0, 3)]),
            vector(&[(0, 2)]),
            vector(&[(1, 3)]),
            vector(&[(1, 2)]),
        ];
        let y = vec![1, 1, -1, -1];
        let mut nb = MultinomialNaiveBayes::new(1.0);
        nb.fit(&x, &y, 2);

        let pred = nb.predict_log_probability(&[vector(&[(0, 1)]), vector(&[(1, 1)])]);
        assert!(pred[0].1 > pred[0].0, "token 0 should look positive");
        assert!(pred[1].0 > pred[1].1, "token 1 should look negative");
    }

    #[test]
    fn empty_vector_falls_back_to_the_prior() {
        let x = vec![vector(&[(0, 1)]), vector(&[(0, 1)]), vector(&[(1, 1)])];
        let y = vec![1, 1, -1];
        let mut nb = MultinomialNaiveBayes::new(1.0);
        nb.fit(&x, &y, 2);
        let pred = nb.predict_log_probability(&[vector(&[])]);
        // prior is 2:1 positive
        assert!(pred[0].1 > pred[0].0);
    }
}
