//! Test variable directory segments expand to every matching child.

use crate::e2e_tests::helpers::*;
use crate::types::{TupleElement, Value};

#[test]
fn test_resolve_variable_middle_segment() {
    let test = TestStore::new();
    for child in ["b1", "b2"] {
        let directory = test.directory(&["a", child, "c"]);
        test.put(&directory, vec![child.into()], Value::Bool(true));
    }
    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["a", "<>", "c"]), vec![TupleElement::MaybeMore], Value::var()),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.rendered(),
        sorted(vec![
            kv(&["a", "b1", "c"], vec!["b1".into()], Value::bytes(vec![1])),
            kv(&["a", "b2", "c"], vec!["b2".into()], Value::bytes(vec![1])),
        ])
    );
}

#[test]
fn test_resolve_nested_variables() {
    let test = TestStore::new();
    let mut expected = Vec::new();
    for region in ["east", "west"] {
        for shard in ["0", "1", "2"] {
            let directory = test.directory(&["cluster", region, shard]);
            test.put(&directory, vec![TupleElement::Int(7)], Value::Int(1));
            expected.push(kv(
                &["cluster", region, shard],
                vec![TupleElement::Int(7)],
                Value::Int(1),
            ));
        }
    }
    expected.sort();

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["cluster", "<>", "<>"]), vec![TupleElement::Int(7)], Value::Int(1)),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.rendered(), expected);
}

#[test]
fn test_resolve_variable_no_children() {
    let test = TestStore::new();
    test.directory(&["empty"]);

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["empty", "<>"]), vec![TupleElement::var()], Value::var()),
    );

    assert!(outcome.errors.is_empty());
    assert!(outcome.results.is_empty());
}
