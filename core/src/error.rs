use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A raw document record lacks a required key.
    #[error("missing field `{0}` in document record")]
    MissingField(&'static str),
    /// A raw document record has a key of the wrong JSON type.
    #[error("field `{field}` must be {expected}")]
    InvalidField { field: &'static str, expected: &'static str },
    /// Malformed call, e.g. both or neither of document/index supplied.
    #[error("{0}")]
    Validation(&'static str),
    #[error("index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no document frequency recorded for term `{0}`")]
    MissingDocumentFrequency(String),
    #[error("worker task panicked: {0}")]
    TaskPanicked(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A parallel task that did not produce a value. Its key is absent from the result map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub key: String,
    pub error: String,
}
