//! Test a trailing MaybeMore accepts zero or more extra elements.

use crate::e2e_tests::helpers::*;
use crate::types::{TupleElement, Value};

#[test]
fn test_filter_maybe_more() {
    let test = TestStore::new();
    let directory = test.directory(&["log"]);
    test.put(&directory, vec![5_i64.into()], Value::Int(0));
    test.put(&directory, vec![5_i64.into(), 1_i64.into()], Value::Int(0));
    test.put(&directory, vec![5_i64.into(), 1_i64.into(), 2_i64.into()], Value::Int(0));
    test.put(&directory, vec![6_i64.into()], Value::Int(0));
    test.put(&directory, vec![], Value::Int(0));

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(
            dir(&["log"]),
            vec![TupleElement::Int(5), TupleElement::MaybeMore],
            Value::Int(0),
        ),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.rendered(),
        sorted(vec![
            kv(&["log"], vec![5_i64.into()], Value::Int(0)),
            kv(&["log"], vec![5_i64.into(), 1_i64.into()], Value::Int(0)),
            kv(&["log"], vec![5_i64.into(), 1_i64.into(), 2_i64.into()], Value::Int(0)),
        ])
    );
}

#[test]
fn test_maybe_more_alone_reads_whole_directory() {
    let test = TestStore::new();
    let directory = test.directory(&["all"]);
    for n in 0..10 {
        test.put(&directory, vec![TupleElement::Int(n), "v".into()], Value::Int(n));
    }

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["all"]), vec![TupleElement::MaybeMore], Value::var()),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.results.len(), 10);
}

#[test]
fn test_misplaced_maybe_more_is_invalid() {
    let test = TestStore::new();
    test.directory(&["all"]);

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(
            dir(&["all"]),
            vec![TupleElement::MaybeMore, TupleElement::Int(1)],
            Value::var(),
        ),
    );

    assert!(matches!(
        outcome.errors.as_slice(),
        [crate::query::QueryError::InvalidQuery { .. }]
    ));
}
