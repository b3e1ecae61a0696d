//! Vector-space retrieval over short text documents.
//!
//! A [`Corpus`] owns a list of [`Document`]s and eagerly computes the term index,
//! the document-frequency table and one TF-IDF [`Vector`] per document. Queries are
//! vectorized against the same term index and ranked by cosine similarity.

pub mod corpus;
pub mod document;
pub mod error;
pub mod parallel;
pub mod persist;
pub mod rank;
pub mod tokenizer;
pub mod vector;

pub use corpus::{Corpus, CorpusOptions};
pub use document::{DocId, DocIdGenerator, Document};
pub use error::{Error, Result, TaskFailure};
pub use rank::SearchHit;
pub use tokenizer::Preprocessor;
pub use vector::Vector;
