//! Test a variable tuple element matches exactly one element of any kind.

use crate::e2e_tests::helpers::*;
use crate::types::{TupleElement, Value};

#[test]
fn test_filter_variable() {
    let test = TestStore::new();
    let directory = test.directory(&["items"]);
    test.put(&directory, vec![5_i64.into(), "x".into()], Value::Bool(true));
    test.put(&directory, vec![5_i64.into(), 10_i64.into()], Value::Bool(true));
    test.put(&directory, vec![6_i64.into(), "y".into()], Value::Bool(true));
    test.put(&directory, vec![5_i64.into()], Value::Bool(true));
    test.put(&directory, vec![5_i64.into(), 1_i64.into(), 2_i64.into()], Value::Bool(true));

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(
            dir(&["items"]),
            vec![TupleElement::Int(5), TupleElement::var()],
            Value::Bool(true),
        ),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.rendered(),
        sorted(vec![
            kv(&["items"], vec![5_i64.into(), 10_i64.into()], Value::Bool(true)),
            kv(&["items"], vec![5_i64.into(), "x".into()], Value::Bool(true)),
        ])
    );
}

#[test]
fn test_filter_variable_inside_nested_tuple() {
    let test = TestStore::new();
    let directory = test.directory(&["nested"]);
    let inner = |a: &str, b: i64| {
        TupleElement::Tuple(crate::types::Tuple(vec![a.into(), b.into()]))
    };
    test.put(&directory, vec![inner("k", 1)], Value::Int(0));
    test.put(&directory, vec![inner("k", 2)], Value::Int(0));
    test.put(&directory, vec![inner("j", 1)], Value::Int(0));

    let pattern = TupleElement::Tuple(crate::types::Tuple(vec!["k".into(), TupleElement::var()]));
    let engine = test.engine();
    let outcome = test.range(&engine, &query(dir(&["nested"]), vec![pattern], Value::var()));

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.results.len(), 2);
}
