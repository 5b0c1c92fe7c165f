//! In-memory store.
//!
//! `MemoryStore` keeps an ordered byte map and a directory table behind a
//! copy-on-write snapshot. `begin_read` hands out a `MemoryTransaction` bound
//! to the snapshot current at that moment, so concurrent readers see a
//! consistent view while writers continue.
//!
//! # Invariants
//!
//! - Every directory's prefix is a distinct tuple-encoded integer, so no
//!   prefix begins with another.
//! - Creating a directory creates all of its missing ancestors.

use std::collections::BTreeMap;
use std::future::{self, Future};
use std::sync::{Arc, RwLock};

use futures::StreamExt;
use futures::stream;

use super::directory::DirectorySubspace;
use super::range::KeyRange;
use super::transaction::{RangeStream, RawKeyValue, ReadTransaction, StoreError};
use super::tuple;
use crate::types::display_path;

#[derive(Debug, Clone, Default)]
struct StoreState {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    directories: BTreeMap<Vec<String>, Vec<u8>>,
    next_prefix: i64,
}

impl StoreState {
    fn list(&self, path: &[String]) -> Result<Vec<String>, StoreError> {
        if !path.is_empty() && !self.directories.contains_key(path) {
            return Err(StoreError::DirectoryNotFound {
                path: display_path(path),
            });
        }
        // Descendants of `path` are contiguous in lexicographic order.
        Ok(self
            .directories
            .range(path.to_vec()..)
            .map(|(candidate, _)| candidate)
            .take_while(|candidate| candidate.starts_with(path))
            .filter(|candidate| candidate.len() == path.len() + 1)
            .map(|child| child[path.len()].as_str().to_owned())
            .collect())
    }

    fn open(&self, path: &[String]) -> Result<DirectorySubspace, StoreError> {
        if path.is_empty() {
            return Err(StoreError::RootDirectory);
        }
        self.directories
            .get(path)
            .map(|prefix| DirectorySubspace::new(path.to_vec(), prefix.to_vec()))
            .ok_or_else(|| StoreError::DirectoryNotFound {
                path: display_path(path),
            })
    }

    fn allocate_prefix(&mut self) -> Vec<u8> {
        self.next_prefix += 1;
        tuple::pack_int(self.next_prefix)
    }
}

/// An in-memory, snapshot-isolated key-value store with a directory layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Arc<StoreState>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the directory at `path` (and any missing ancestors), or open it
    /// if it already exists.
    pub fn create_directory<I, S>(&self, path: I) -> Result<DirectorySubspace, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        if path.is_empty() {
            return Err(StoreError::RootDirectory);
        }

        let mut guard = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let state = Arc::make_mut(&mut guard);
        for depth in 1..=path.len() {
            let ancestor = &path[..depth];
            if !state.directories.contains_key(ancestor) {
                let prefix = state.allocate_prefix();
                tracing::debug!(
                    "created directory {} with prefix {:02x?}",
                    display_path(ancestor),
                    prefix
                );
                state.directories.insert(ancestor.to_vec(), prefix);
            }
        }
        state.open(&path)
    }

    /// Write a key.
    pub fn set(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        let mut guard = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        Arc::make_mut(&mut guard).data.insert(key, value);
        Ok(())
    }

    /// Remove a key. Removing a missing key is not an error.
    pub fn clear(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut guard = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        Arc::make_mut(&mut guard).data.remove(key);
        Ok(())
    }

    /// Begin a read transaction over the current snapshot.
    pub fn begin_read(&self) -> Result<MemoryTransaction, StoreError> {
        let guard = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(MemoryTransaction {
            state: Arc::clone(&guard),
        })
    }
}

/// A read transaction over one `MemoryStore` snapshot.
#[derive(Debug, Clone)]
pub struct MemoryTransaction {
    state: Arc<StoreState>,
}

impl ReadTransaction for MemoryTransaction {
    fn list_directory(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send {
        future::ready(self.state.list(path))
    }

    fn open_directory(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<DirectorySubspace, StoreError>> + Send {
        future::ready(self.state.open(path))
    }

    fn get(&self, key: &[u8]) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send {
        future::ready(Ok(self.state.data.get(key).map(|value| value.to_vec())))
    }

    fn get_range(&self, range: KeyRange) -> RangeStream {
        if range.begin > range.end {
            return stream::empty().boxed();
        }
        let items: Vec<Result<RawKeyValue, StoreError>> = self
            .state
            .data
            .range(range.begin..range.end)
            .map(|(key, value)| {
                Ok(RawKeyValue {
                    key: key.to_vec(),
                    value: value.to_vec(),
                })
            })
            .collect();
        stream::iter(items).boxed()
    }
}
