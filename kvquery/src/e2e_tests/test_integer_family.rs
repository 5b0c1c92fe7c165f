//! Test integer and float elements compare by kind and value.

use num_bigint::BigInt;

use crate::e2e_tests::helpers::*;
use crate::types::{TupleElement, Value};

fn seed(test: &TestStore) {
    let directory = test.directory(&["numbers"]);
    test.put(&directory, vec![TupleElement::Int(5), "int".into()], Value::Bool(true));
    test.put(&directory, vec![TupleElement::Float64(5.0), "double".into()], Value::Bool(true));
    test.put(&directory, vec![TupleElement::Float32(5.0), "float".into()], Value::Bool(true));
    test.put(&directory, vec![TupleElement::Uint(u64::MAX), "max".into()], Value::Bool(true));
    let huge = BigInt::from(u64::MAX) * 4;
    test.put(&directory, vec![TupleElement::BigInt(huge), "huge".into()], Value::Bool(true));
}

fn labels(test: &TestStore, first: TupleElement) -> Vec<String> {
    let engine = test.engine();
    let outcome = test.range(
        &engine,
        &query(dir(&["numbers"]), vec![first, TupleElement::var()], Value::var()),
    );
    assert!(outcome.errors.is_empty());
    let mut labels: Vec<String> = outcome
        .results
        .iter()
        .map(|kv| kv.key.tuple.elements()[1].to_string())
        .collect();
    labels.sort();
    labels
}

#[test]
fn test_int_does_not_match_float() {
    let test = TestStore::new();
    seed(&test);

    assert_eq!(labels(&test, TupleElement::Int(5)), vec!["\"int\""]);
    assert_eq!(labels(&test, TupleElement::Float64(5.0)), vec!["\"double\""]);
    assert_eq!(labels(&test, TupleElement::Float32(5.0)), vec!["\"float\""]);
}

#[test]
fn test_integer_kinds_share_encoding() {
    let test = TestStore::new();
    seed(&test);

    assert_eq!(labels(&test, TupleElement::Uint(5)), vec!["\"int\""]);
    assert_eq!(
        labels(&test, TupleElement::BigInt(BigInt::from(u64::MAX))),
        vec!["\"max\""]
    );
    assert_eq!(
        labels(&test, TupleElement::BigInt(BigInt::from(u64::MAX) * 4)),
        vec!["\"huge\""]
    );
}
