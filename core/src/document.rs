use crate::error::{Error, Result};
use crate::tokenizer::Preprocessor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub type DocId = u64;

/// Sequential document identity allocator. Pass the same generator to every
/// constructor that should share one id space.
#[derive(Debug, Clone, Default)]
pub struct DocIdGenerator {
    last: DocId,
}

impl DocIdGenerator {
    pub fn new() -> Self { Self::default() }

    /// Returns the next id; the first id handed out is 1.
    pub fn next_id(&mut self) -> DocId {
        self.last += 1;
        self.last
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Body {
    Record {
        description: String,
        channel: String,
        tags: Vec<String>,
    },
    /// Already split (and possibly preprocessed) words.
    Words(Vec<String>),
}

/// Bag-of-words view over one record (title, description, channel, tags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: DocId,
    title: String,
    body: Body,
}

impl Document {
    /// Builds a document from a raw record with keys `title`, `description`, `channel`
    /// and `tags`. A non-empty `title` argument overrides the record's title, in which
    /// case the record need not carry one.
    pub fn from_record(
        ids: &mut DocIdGenerator,
        title: Option<&str>,
        record: &Map<String, Value>,
        preprocessor: Option<&Preprocessor>,
    ) -> Result<Self> {
        let title = match title.filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => string_field(record, "title")?,
        };
        let description = string_field(record, "description")?;
        let channel = string_field(record, "channel")?;
        let tags = match record.get("tags") {
            None => return Err(Error::MissingField("tags")),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or(Error::InvalidField { field: "tags", expected: "an array of strings" })?,
            Some(_) => return Err(Error::InvalidField { field: "tags", expected: "an array of strings" }),
        };

        let mut doc = Self { id: 0, title, body: Body::Record { description, channel, tags } };
        if let Some(p) = preprocessor {
            doc.body = Body::Words(p.process(doc.words()));
        }
        doc.id = ids.next_id();
        Ok(doc)
    }

    /// Builds a document from an already split word list. The title labels the
    /// document and is not part of its words.
    pub fn from_words<I, S>(ids: &mut DocIdGenerator, title: impl Into<String>, words: I, preprocessor: Option<&Preprocessor>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let words = match preprocessor {
            Some(p) => p.process(&words),
            None => words,
        };
        Self { id: ids.next_id(), title: title.into(), body: Body::Words(words) }
    }

    /// Synthetic query document: title, description and channel are empty and the
    /// raw query string is its only tag.
    pub fn query(ids: &mut DocIdGenerator, text: &str, preprocessor: Option<&Preprocessor>) -> Self {
        let body = match preprocessor {
            Some(p) => Body::Words(p.process([text])),
            None => Body::Record { description: String::new(), channel: String::new(), tags: vec![text.to_string()] },
        };
        Self { id: ids.next_id(), title: String::new(), body }
    }

    pub fn id(&self) -> DocId { self.id }

    pub fn title(&self) -> &str { &self.title }

    /// Title, description and channel split on whitespace, followed by each tag whole.
    pub fn words(&self) -> Vec<String> {
        match &self.body {
            Body::Record { description, channel, tags } => self
                .title
                .split_whitespace()
                .chain(description.split_whitespace())
                .chain(channel.split_whitespace())
                .chain(tags.iter().map(String::as_str))
                .map(str::to_string)
                .collect(),
            Body::Words(words) => words.clone(),
        }
    }

    /// Exact, case-sensitive occurrence count of `term` in [`Document::words`].
    pub fn tf(&self, term: &str) -> usize {
        self.words().iter().filter(|w| *w == term).count()
    }

    /// Occurrence count of every distinct word.
    pub fn term_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for word in self.words() {
            *counts.entry(word).or_insert(0) += 1;
        }
        counts
    }
}

fn string_field(record: &Map<String, Value>, field: &'static str) -> Result<String> {
    match record.get(field) {
        None => Err(Error::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Error::InvalidField { field, expected: "a string" }),
    }
}
