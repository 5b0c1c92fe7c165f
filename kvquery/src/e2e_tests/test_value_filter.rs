//! Test range reads apply the value spec as well as the key pattern.

use crate::e2e_tests::helpers::*;
use crate::types::{Tuple, TupleElement, Value, ValueType, Variable};

fn seed(test: &TestStore) {
    let directory = test.directory(&["inventory"]);
    test.put(&directory, vec!["apple".into()], Value::Int(3));
    test.put(&directory, vec!["pear".into()], Value::Int(0));
    test.put(&directory, vec!["plum".into()], Value::Int(3));
    test.put(&directory, vec!["note".into()], Value::string("restock"));
    test.put(
        &directory,
        vec!["crate".into()],
        Value::Tuple(Tuple(vec!["apple".into(), TupleElement::Int(12)])),
    );
}

#[test]
fn test_constant_value_must_match_exactly() {
    let test = TestStore::new();
    seed(&test);

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["inventory"]), vec![TupleElement::var()], Value::Int(3)),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.rendered(),
        sorted(vec![
            kv(&["inventory"], vec!["apple".into()], Value::Int(3)),
            kv(&["inventory"], vec!["plum".into()], Value::Int(3)),
        ])
    );
}

#[test]
fn test_typed_variable_rejects_undecodable_values() {
    let test = TestStore::new();
    seed(&test);

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(
            dir(&["inventory"]),
            vec![TupleElement::var()],
            Value::Variable(Variable::typed([ValueType::Tuple])),
        ),
    );

    // Only the tuple value decodes; every other value is rejected, not an error.
    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.rendered(),
        vec![kv(
            &["inventory"],
            vec!["crate".into()],
            Value::Tuple(Tuple(vec!["apple".into(), TupleElement::Int(12)])),
        )]
    );
}

#[test]
fn test_tuple_value_pattern() {
    let test = TestStore::new();
    seed(&test);

    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(
            dir(&["inventory"]),
            vec![TupleElement::var()],
            Value::Tuple(Tuple(vec!["apple".into(), TupleElement::var()])),
        ),
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(
        outcome.results[0].key.tuple,
        Tuple(vec!["crate".into()])
    );
}
