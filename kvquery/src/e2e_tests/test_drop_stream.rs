//! Test dropping a result stream early stops the pipeline.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::e2e_tests::helpers::*;
use crate::query::QueryEngine;
use crate::types::{TupleElement, Value};

#[test]
fn test_drop_stream_releases_transaction() {
    let test = TestStore::new();
    for shard in 0..4 {
        let directory = test.directory(&["big", &shard.to_string()]);
        for n in 0..500 {
            test.put(&directory, vec![TupleElement::Int(n)], Value::Int(n));
        }
    }

    let txn = Arc::new(test.store.begin_read().unwrap());
    let engine = QueryEngine::new(Arc::clone(&txn), crate::config::EngineConfig::default());
    let q = query(dir(&["big", "<>"]), vec![TupleElement::var()], Value::var());

    test.runtime.block_on(async {
        let mut stream = engine.range_read(&q).unwrap();
        let first = stream.next().await;
        assert!(matches!(first, Some(Ok(_))));
        drop(stream);

        // Every stage holds a clone of the transaction until it exits.
        let released = tokio::time::timeout(Duration::from_secs(5), async {
            while Arc::strong_count(&txn) > 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(released.is_ok(), "pipeline tasks kept running after drop");
    });
    drop(engine);
    assert_eq!(Arc::strong_count(&txn), 1);
}
