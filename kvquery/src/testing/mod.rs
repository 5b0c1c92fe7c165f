//! Test support: logging setup, store seeding and fault injection.

use std::future::{self, Future};
use std::sync::Once;

use futures::StreamExt;
use futures::stream;

use crate::storage::{
    ByteOrder, DirectorySubspace, KeyRange, MemoryStore, RangeStream, ReadTransaction,
    StoreError, pack_value,
};
use crate::types::{Tuple, Value};

static TRACING: Once = Once::new();

/// Install a fmt subscriber for test output.
///
/// Honors `RUST_LOG`, defaulting to `kvquery=debug`. Safe to call from every
/// test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kvquery=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Write `value` under `tuple` in `directory`, packing with big-endian order.
pub fn put(store: &MemoryStore, directory: &DirectorySubspace, tuple: Tuple, value: &Value) {
    #[allow(clippy::expect_used)]
    let key = directory.pack(&tuple).expect("test key should encode");
    #[allow(clippy::expect_used)]
    let bytes = pack_value(value, ByteOrder::Big).expect("test value should encode");
    #[allow(clippy::expect_used)]
    store.set(key, bytes).expect("store write should succeed");
}

/// Which store operation a `FaultyTransaction` breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Listing this path fails.
    List(Vec<String>),
    /// Opening this path fails.
    Open(Vec<String>),
    /// Every range read fails after yielding this many rows.
    RangeAfter(usize),
}

/// Wraps a transaction and fails one kind of operation.
#[derive(Debug, Clone)]
pub struct FaultyTransaction<T> {
    inner: T,
    fault: Fault,
}

impl<T> FaultyTransaction<T> {
    pub const fn new(inner: T, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

fn injected() -> StoreError {
    StoreError::TransactionFailed("injected fault".to_owned())
}

impl<T: ReadTransaction> ReadTransaction for FaultyTransaction<T> {
    fn list_directory(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send {
        let fail = matches!(&self.fault, Fault::List(target) if target.as_slice() == path);
        let inner = self.inner.list_directory(path);
        async move {
            if fail {
                return Err(injected());
            }
            inner.await
        }
    }

    fn open_directory(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<DirectorySubspace, StoreError>> + Send {
        let fail = matches!(&self.fault, Fault::Open(target) if target.as_slice() == path);
        let inner = self.inner.open_directory(path);
        async move {
            if fail {
                return Err(injected());
            }
            inner.await
        }
    }

    fn get(&self, key: &[u8]) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send {
        self.inner.get(key)
    }

    fn get_range(&self, range: KeyRange) -> RangeStream {
        let rows = self.inner.get_range(range);
        match self.fault {
            Fault::RangeAfter(limit) => rows
                .take(limit)
                .chain(stream::once(future::ready(Err(injected()))))
                .boxed(),
            Fault::List(_) | Fault::Open(_) => rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;
    use crate::types::TupleElement;

    #[tokio::test]
    async fn test_range_fault_after_limit() {
        let store = MemoryStore::new();
        let dir = store.create_directory(["d"]).unwrap();
        for n in 0..5 {
            put(&store, &dir, Tuple(vec![TupleElement::Int(n)]), &Value::Bool(true));
        }
        let txn = FaultyTransaction::new(store.begin_read().unwrap(), Fault::RangeAfter(2));

        let mut rows = txn.get_range(KeyRange::prefix(dir.prefix()).unwrap());
        assert!(rows.next().await.unwrap().is_ok());
        assert!(rows.next().await.unwrap().is_ok());
        assert_eq!(rows.next().await.unwrap(), Err(injected()));
        assert!(rows.next().await.is_none());
    }

    #[tokio::test]
    async fn test_list_fault_only_hits_target() {
        let store = MemoryStore::new();
        store.create_directory(["a", "b"]).unwrap();
        let txn = FaultyTransaction::new(
            store.begin_read().unwrap(),
            Fault::List(vec!["a".to_owned()]),
        );

        assert!(txn.list_directory(&[]).await.is_ok());
        assert_eq!(
            txn.list_directory(&["a".to_owned()]).await,
            Err(injected())
        );
        let rows: Vec<_> = txn
            .get_range(KeyRange::prefix(&[0x15]).unwrap())
            .try_collect()
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
