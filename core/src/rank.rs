use crate::corpus::Corpus;
use crate::document::{DocIdGenerator, Document};
use crate::error::Result;
use crate::tokenizer::Preprocessor;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub score: f64,
}

impl Corpus {
    /// Ranks every document against a free-text query and returns the best
    /// `num_results` hits (at most the corpus size).
    ///
    /// The query becomes a synthetic document whose only tag is the raw string,
    /// so pass the preprocessor the documents were built with, if any.
    pub fn search(&self, query: &str, num_results: usize, preprocessor: Option<&Preprocessor>) -> Result<Vec<SearchHit>> {
        let query_doc = Document::query(&mut DocIdGenerator::new(), query, preprocessor);
        let query_vector = self.vectorize(&query_doc)?;
        tracing::debug!(query, known_terms = query_vector.iter().filter(|x| **x != 0.0).count(), "query vectorized");
        Ok(self.rank(&query_vector, num_results))
    }

    /// Cosine similarity of `query` against every stored vector, highest first.
    /// Equal scores keep matrix order.
    pub fn rank(&self, query: &Vector, num_results: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .tf_idf_matrix()
            .iter()
            .map(|(title, v)| SearchHit { title: title.clone(), score: v.cossim(query) })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(num_results.min(self.len()));
        hits
    }
}
