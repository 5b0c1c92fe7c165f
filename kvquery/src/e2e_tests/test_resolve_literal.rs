//! Test a literal directory reads only from that directory.

use crate::e2e_tests::helpers::*;
use crate::types::{TupleElement, Value};

#[test]
fn test_resolve_literal() {
    let test = TestStore::new();
    let target = test.directory(&["a", "b"]);
    let sibling = test.directory(&["a", "c"]);
    test.put(&target, vec![1_i64.into()], Value::string("in"));
    test.put(&sibling, vec![1_i64.into()], Value::string("out"));

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["a", "b"]), vec![TupleElement::var()], Value::var()),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.rendered(),
        vec![kv(&["a", "b"], vec![1_i64.into()], Value::bytes(b"in".to_vec()))]
    );
}

#[test]
fn test_resolve_literal_missing_directory() {
    let test = TestStore::new();
    test.directory(&["a"]);

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["a", "nope"]), vec![TupleElement::MaybeMore], Value::var()),
    );

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors[0].to_string(),
        "resolver: failed to open directory /a/nope: directory does not exist: /a/nope"
    );
}
