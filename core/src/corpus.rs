use crate::document::Document;
use crate::error::{Error, Result, TaskFailure};
use crate::parallel::map_collect;
use crate::vector::Vector;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusOptions {
    /// Worker count for the DF and TF-IDF phases; values below 2 run sequentially.
    pub threads: usize,
    /// Emit a debug event for every term and document processed.
    pub debug: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self { Self { threads: 1, debug: false } }
}

/// Documents plus their term index, document frequencies and TF-IDF matrix.
///
/// Every derived structure is computed in [`Corpus::new`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    docs: Vec<Document>,
    options: CorpusOptions,
    terms: IndexSet<String>,
    dfs: IndexMap<String, usize>,
    tf_idf: IndexMap<String, Vector>,
    failures: Vec<TaskFailure>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>, options: CorpusOptions) -> Result<Self> {
        let start = Instant::now();
        let mut corpus = Self {
            docs: documents,
            options,
            terms: IndexSet::new(),
            dfs: IndexMap::new(),
            tf_idf: IndexMap::new(),
            failures: Vec::new(),
        };

        corpus.terms = corpus.compute_terms();
        tracing::info!(num_docs = corpus.docs.len(), num_terms = corpus.terms.len(), "term index built");

        corpus.dfs = corpus.compute_dfs()?;
        tracing::info!(num_dfs = corpus.dfs.len(), "document frequencies computed");

        corpus.tf_idf = corpus.compute_tf_idf_matrix()?;
        tracing::info!(
            num_vectors = corpus.tf_idf.len(),
            failed_tasks = corpus.failures.len(),
            elapsed_s = start.elapsed().as_secs_f64(),
            "tf-idf matrix computed"
        );
        Ok(corpus)
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn get(&self, index: usize) -> Result<&Document> {
        self.docs.get(index).ok_or(Error::IndexOutOfRange { index, len: self.docs.len() })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> { self.docs.iter() }

    pub fn docs(&self) -> &[Document] { &self.docs }

    pub fn options(&self) -> CorpusOptions { self.options }

    /// Term -> vector position, in first-seen order.
    pub fn terms(&self) -> &IndexSet<String> { &self.terms }

    pub fn term_position(&self, term: &str) -> Option<usize> { self.terms.get_index_of(term) }

    pub fn dfs(&self) -> &IndexMap<String, usize> { &self.dfs }

    /// Recorded document frequency; `None` for unknown terms and for terms whose task failed.
    pub fn df(&self, term: &str) -> Option<usize> { self.dfs.get(term).copied() }

    /// Title -> TF-IDF vector, in document order.
    pub fn tf_idf_matrix(&self) -> &IndexMap<String, Vector> { &self.tf_idf }

    /// Keys dropped from the DF table or the matrix because their task failed.
    pub fn failures(&self) -> &[TaskFailure] { &self.failures }

    /// Number of documents whose words contain `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        if self.options.debug {
            tracing::debug!(term, "computing document frequency");
        }
        self.docs.iter().filter(|d| d.words().iter().any(|w| w == term)).count()
    }

    /// Picks the explicit `document`, or the stored one at `index`. Exactly one must be given.
    pub fn resolve_document<'a>(&'a self, document: Option<&'a Document>, index: Option<usize>) -> Result<&'a Document> {
        match (document, index) {
            (Some(doc), None) => Ok(doc),
            (None, Some(i)) => self.get(i),
            (None, None) => Err(Error::Validation("either document or index is required")),
            (Some(_), Some(_)) => Err(Error::Validation("either document or index must be passed in, not both")),
        }
    }

    /// `log10(1 + tf) * log10(N / (1 + df))`. Goes negative when a term occurs in every document.
    pub fn tf_idf(&self, term: &str, document: Option<&Document>, index: Option<usize>) -> Result<f64> {
        let doc = self.resolve_document(document, index)?;
        let df = self.df_for_scoring(term)?;
        Ok(self.score(doc.tf(term), df))
    }

    /// One score per known term, in term-index order. The document need not belong
    /// to the corpus; its words outside the term index are ignored.
    pub fn tf_idf_vector(&self, document: Option<&Document>, index: Option<usize>) -> Result<Vector> {
        let doc = self.resolve_document(document, index)?;
        let counts = doc.term_counts();
        self.terms
            .iter()
            .map(|term| {
                let tf = counts.get(term).copied().unwrap_or(0);
                Ok(self.score(tf, self.df_for_scoring(term)?))
            })
            .collect::<Result<Vec<f64>>>()
            .map(Vector::from)
    }

    pub fn vectorize(&self, document: &Document) -> Result<Vector> {
        self.tf_idf_vector(Some(document), None)
    }

    fn score(&self, tf: usize, df: usize) -> f64 {
        if self.docs.is_empty() {
            return 0.0;
        }
        let n = self.docs.len() as f64;
        (1.0 + tf as f64).log10() * (n / (1.0 + df as f64)).log10()
    }

    fn df_for_scoring(&self, term: &str) -> Result<usize> {
        match self.dfs.get(term) {
            Some(df) => Ok(*df),
            None if !self.terms.contains(term) => Ok(0),
            None => Err(Error::MissingDocumentFrequency(term.to_string())),
        }
    }

    fn compute_terms(&self) -> IndexSet<String> {
        let mut terms = IndexSet::new();
        for doc in &self.docs {
            for word in doc.words() {
                terms.insert(word);
            }
        }
        terms
    }

    fn compute_dfs(&mut self) -> Result<IndexMap<String, usize>> {
        let vocabularies: Vec<HashSet<String>> = self.docs.iter().map(|d| d.words().into_iter().collect()).collect();
        let terms: Vec<&String> = self.terms.iter().collect();
        let debug = self.options.debug;
        let outcome = map_collect(self.options.threads, &terms, |t| (*t).clone(), |term| {
            if debug {
                tracing::debug!(term = %term, "computing document frequency");
            }
            Ok(vocabularies.iter().filter(|v| v.contains(*term)).count())
        })?;
        self.failures.extend(outcome.failures);
        Ok(outcome.values)
    }

    fn compute_tf_idf_matrix(&mut self) -> Result<IndexMap<String, Vector>> {
        let outcome = map_collect(self.options.threads, &self.docs, |d| d.title().to_string(), |doc| {
            if self.options.debug {
                tracing::debug!(title = doc.title(), "computing tf-idf vector");
            }
            self.vectorize(doc)
        })?;
        self.failures.extend(outcome.failures);
        Ok(outcome.values)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter { self.docs.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocIdGenerator;

    fn corpus(threads: usize) -> Corpus {
        let mut ids = DocIdGenerator::new();
        let docs = vec![
            Document::from_words(&mut ids, "a", ["x", "y", "x"], None),
            Document::from_words(&mut ids, "b", ["y", "z"], None),
            Document::from_words(&mut ids, "c", ["w"], None),
        ];
        Corpus::new(docs, CorpusOptions { threads, debug: true }).unwrap()
    }

    #[test]
    fn terms_follow_first_occurrence() {
        let c = corpus(1);
        let terms: Vec<&str> = c.terms().iter().map(String::as_str).collect();
        assert_eq!(terms, vec!["x", "y", "z", "w"]);
        assert_eq!(c.term_position("z"), Some(2));
        assert_eq!(c.term_position("nope"), None);
    }

    #[test]
    fn df_table_matches_direct_count() {
        let c = corpus(1);
        for term in c.terms() {
            assert_eq!(c.df(term), Some(c.document_frequency(term)));
        }
        assert_eq!(c.df("y"), Some(2));
        assert_eq!(c.document_frequency("nope"), 0);
    }

    #[test]
    fn resolve_document_requires_exactly_one() {
        let c = corpus(1);
        let doc = c.get(0).unwrap().clone();
        assert!(matches!(c.resolve_document(None, None), Err(Error::Validation(_))));
        assert!(matches!(c.resolve_document(Some(&doc), Some(0)), Err(Error::Validation(_))));
        assert!(matches!(c.resolve_document(None, Some(3)), Err(Error::IndexOutOfRange { index: 3, len: 3 })));
        assert_eq!(c.resolve_document(None, Some(1)).unwrap().title(), "b");
        assert_eq!(c.resolve_document(Some(&doc), None).unwrap().title(), "a");
    }

    #[test]
    fn unknown_terms_score_zero() {
        let c = corpus(1);
        assert_eq!(c.tf_idf("nope", None, Some(0)).unwrap(), 0.0);
    }

    #[test]
    fn matrix_is_identical_across_thread_counts() {
        let seq = corpus(1);
        let par = corpus(4);
        assert_eq!(seq.tf_idf_matrix(), par.tf_idf_matrix());
        for (a, b) in seq.tf_idf_matrix().values().zip(par.tf_idf_matrix().values()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
        assert!(par.failures().is_empty());
    }

    #[test]
    fn iteration_and_indexing() {
        let c = corpus(1);
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
        let titles: Vec<&str> = (&c).into_iter().map(Document::title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert!(matches!(c.get(5), Err(Error::IndexOutOfRange { index: 5, len: 3 })));
    }

    #[test]
    fn empty_corpus_builds() {
        let c = Corpus::new(Vec::new(), CorpusOptions::default()).unwrap();
        assert!(c.is_empty());
        assert!(c.terms().is_empty());
        assert!(c.tf_idf_matrix().is_empty());
    }

    #[test]
    fn empty_corpus_scores_zero() {
        let c = Corpus::new(Vec::new(), CorpusOptions::default()).unwrap();
        let mut ids = DocIdGenerator::new();
        let doc = Document::from_words(&mut ids, "d", ["x"], None);
        assert_eq!(c.tf_idf("x", Some(&doc), None).unwrap(), 0.0);
        assert_eq!(c.tf_idf("y", Some(&doc), None).unwrap(), 0.0);
        assert!(c.vectorize(&doc).unwrap().is_empty());
        assert!(c.search("x", 5, None).unwrap().is_empty());
    }
}
