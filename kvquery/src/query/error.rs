//! Query errors.

use thiserror::Error;

use crate::storage::{StoreError, TupleError, ValueError};

/// Errors returned by query execution.
///
/// Each I/O variant names the stage that produced it and keeps the
/// underlying store or codec error as its source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query cannot be executed: a `Nil` sentinel, a variable clear or a
    /// misplaced `MaybeMore`.
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },
    #[error("resolver: failed to list directory {path}: {source}")]
    DirectoryList { path: String, source: StoreError },
    #[error("resolver: failed to open directory {path}: {source}")]
    DirectoryOpen { path: String, source: StoreError },
    #[error("scanner: range read failed in {path}: {source}")]
    RangeFetch { path: String, source: StoreError },
    #[error("filter: failed to decode key in {path}: {source}")]
    KeyDecode { path: String, source: TupleError },
    #[error("failed to encode key: {0}")]
    KeyEncode(TupleError),
    #[error("failed to decode value of {key}: {source}")]
    ValueDecode { key: String, source: ValueError },
    #[error("failed to read {key}: {source}")]
    KeyFetch { key: String, source: StoreError },
}

impl QueryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }
}
