//! Read transactions.
//!
//! The query engine only reads. Every stage of a range read shares one
//! transaction concurrently, so implementations must allow concurrent reads
//! through `&self`.

use std::future::Future;

use futures::stream::BoxStream;
use thiserror::Error;

use super::directory::DirectorySubspace;
use super::range::KeyRange;

/// A raw key-value pair as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Stream of key-values returned by a range read, in ascending key order.
pub type RangeStream = BoxStream<'static, Result<RawKeyValue, StoreError>>;

/// A transaction that supports concurrent reads.
pub trait ReadTransaction: Send + Sync + 'static {
    /// Names of the immediate children of `path`.
    ///
    /// An empty path lists the root. Fails if `path` does not exist.
    fn list_directory(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Open the directory at `path`. Fails if it does not exist.
    fn open_directory(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<DirectorySubspace, StoreError>> + Send;

    /// Read a single key.
    fn get(&self, key: &[u8]) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Read every key in `range`.
    fn get_range(&self, range: KeyRange) -> RangeStream;
}

/// Errors raised by the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("directory does not exist: {path}")]
    DirectoryNotFound { path: String },
    #[error("the root directory cannot be opened")]
    RootDirectory,
    #[error("key range prefix must contain a byte other than 0xff")]
    InvalidPrefix,
    #[error("store lock poisoned")]
    LockPoisoned,
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
}
