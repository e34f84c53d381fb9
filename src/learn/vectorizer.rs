//! Sparse n-gram count vectorization of token sequences.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sparse document embedding: feature index to occurrence count.
pub type CountVector = HashMap<usize, usize>;

/// Builds a vocabulary over token n-grams and embeds each document by
/// counting how often each vocabulary entry occurs in it.
///
/// Documents here are the production histories of parses, i.e. sequences of
/// regex-id and rule-name tokens; n-grams capture short chains of rule
/// applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
}

impl CountVectorizer {
    /// Create a vectorizer counting n-grams for `n` in `ngram_range`
    /// (inclusive on both ends).
    pub fn new(ngram_range: (usize, usize)) -> CountVectorizer {
        CountVectorizer { ngram_range, vocabulary: HashMap::new() }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn ngrams(&self, document: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let max_n = max_n.min(document.len());
        let mut ngrams = Vec::new();
        for n in min_n..=max_n {
            for window in document.windows(n) {
                ngrams.push(window.join(" "));
            }
        }
        ngrams
    }

    /// Learn the vocabulary from `documents` and return their embeddings.
    pub fn fit_transform(&mut self, documents: &[Vec<String>]) -> Vec<CountVector> {
        let mut counts: Vec<HashMap<String, usize>> = Vec::with_capacity(documents.len());
        for document in documents {
            let mut doc_counts: HashMap<String, usize> = HashMap::new();
            for feature in self.ngrams(document) {
                let next = self.vocabulary.len();
                self.vocabulary.entry(feature.clone()).or_insert(next);
                *doc_counts.entry(feature).or_insert(0) += 1;
            }
            counts.push(doc_counts);
        }
        counts.into_iter().map(|doc| self.embed_counts(doc)).collect()
    }

    /// Learn the vocabulary from `documents`, discarding the embeddings.
    pub fn fit(&mut self, documents: &[Vec<String>]) -> &mut Self {
        self.fit_transform(documents);
        self
    }

    /// Embed `documents` against the learned vocabulary; tokens outside the
    /// vocabulary are ignored.
    pub fn transform(&self, documents: &[Vec<String>]) -> Vec<CountVector> {
        documents
            .iter()
            .map(|document| {
                let mut doc_counts: HashMap<String, usize> = HashMap::new();
                for feature in self.ngrams(document) {
                    *doc_counts.entry(feature).or_insert(0) += 1;
                }
                self.embed_counts(doc_counts)
            })
            .collect()
    }

    fn embed_counts(&self, doc_counts: HashMap<String, usize>) -> CountVector {
        doc_counts
            .into_iter()
            .filter_map(|(feature, count)| {
                self.vocabulary.get(&feature).map(|&idx| (idx, count))
            })
            .collect()
    }
}
