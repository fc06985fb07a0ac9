use scribe_types::WordKind;
use thiserror::Error;

/// A record the consolidation pass cannot safely absorb.
///
/// The whole run stops at the first one; `position` is the zero-based index of
/// the record in the input sequence.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("malformed record at position {position}: {reason}")]
pub struct MalformedRecordError {
    pub position: usize,
    pub reason: MalformedReason,
}

impl MalformedRecordError {
    pub fn new(position: usize, reason: MalformedReason) -> Self {
        Self { position, reason }
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum MalformedReason {
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("value of `{key}` is not a string")]
    NonStringValue { key: String },
    #[error("`{key}` is declared but empty")]
    EmptyValue { key: String },
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("unknown word type: {0}")]
    UnknownWordKind(String),
    #[error("{language} has no {kind} profile")]
    Unsupported { language: String, kind: WordKind },
    #[error("invalid profile for {language}: {message}")]
    Invalid { language: String, message: String },
    #[error("failed to parse profile: {0}")]
    Parse(#[from] serde_json::Error),
}
