//! Range scanning.
//!
//! A pool of workers pulls resolved directories from the resolver and reads
//! every key under `directory prefix + encoded literal tuple prefix`. One
//! worker scans one directory from start to end, so keys from a single
//! directory reach the filter in store order.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{Mutex, mpsc};

use super::compare::{ElementClass, classify_element};
use super::error::QueryError;
use super::pipeline::{Coordinator, StageHandle};
use crate::constants::STAGE_CHANNEL_CAPACITY;
use crate::storage::tuple;
use crate::storage::{DirectorySubspace, KeyRange, RawKeyValue, ReadTransaction};
use crate::types::Tuple;

/// A raw key-value together with the directory it was read from.
#[derive(Debug, Clone)]
pub(crate) struct DirKeyValue {
    pub directory: Arc<DirectorySubspace>,
    pub kv: RawKeyValue,
}

/// The leading elements of `pattern` that contain no wildcard.
#[must_use]
pub fn literal_prefix(pattern: &Tuple) -> Tuple {
    pattern
        .iter()
        .take_while(|element| classify_element(element) == ElementClass::Constant)
        .cloned()
        .collect()
}

pub(crate) struct RangeScanner<T> {
    txn: Arc<T>,
    workers: usize,
    tuple_prefix: Arc<[u8]>,
}

impl<T: ReadTransaction> RangeScanner<T> {
    /// Prepare a scanner for `pattern`. Encodes the literal prefix once.
    pub(crate) fn new(txn: Arc<T>, workers: usize, pattern: &Tuple) -> Result<Self, QueryError> {
        let tuple_prefix = tuple::pack(&literal_prefix(pattern)).map_err(QueryError::KeyEncode)?;
        Ok(Self {
            txn,
            workers: workers.max(1),
            tuple_prefix: tuple_prefix.into(),
        })
    }

    /// Start the worker pool.
    pub(crate) fn spawn(
        self,
        input: mpsc::Receiver<Arc<DirectorySubspace>>,
        coordinator: &Coordinator,
    ) -> mpsc::Receiver<DirKeyValue> {
        let (tx, rx) = mpsc::channel(STAGE_CHANNEL_CAPACITY);
        let input = Arc::new(Mutex::new(input));
        tracing::debug!("starting {} scan workers", self.workers);

        for worker in 0..self.workers {
            let txn = Arc::clone(&self.txn);
            let tuple_prefix = Arc::clone(&self.tuple_prefix);
            let input = Arc::clone(&input);
            let output = tx.clone();
            let handle = coordinator.stage();
            tokio::spawn(async move {
                while let Some(directory) = handle.recv_shared(&input).await {
                    let scanned =
                        scan_directory(&*txn, &tuple_prefix, directory, &output, &handle).await;
                    if let Err(error) = scanned {
                        handle.fail(error);
                        break;
                    }
                }
                tracing::trace!("scan worker {worker} finished");
            });
        }
        rx
    }
}

async fn scan_directory<T: ReadTransaction>(
    txn: &T,
    tuple_prefix: &[u8],
    directory: Arc<DirectorySubspace>,
    output: &mpsc::Sender<DirKeyValue>,
    handle: &StageHandle,
) -> Result<(), QueryError> {
    let fetch_error = |source| QueryError::RangeFetch {
        path: directory.display(),
        source,
    };

    let mut prefix = directory.prefix().to_vec();
    prefix.extend_from_slice(tuple_prefix);
    let range = KeyRange::prefix(&prefix).map_err(fetch_error)?;
    tracing::trace!("scanning {}", directory.display());

    let mut rows = txn.get_range(range);
    loop {
        let Some(next) = handle.until_cancelled(rows.next()).await else {
            return Ok(());
        };
        let Some(row) = next else {
            return Ok(());
        };
        let kv = row.map_err(fetch_error)?;
        let item = DirKeyValue {
            directory: Arc::clone(&directory),
            kv,
        };
        if !handle.send(output, item).await {
            return Ok(());
        }
    }
}
