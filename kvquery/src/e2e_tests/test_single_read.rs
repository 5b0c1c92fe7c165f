//! Test single reads through `execute`.

use crate::e2e_tests::helpers::*;
use crate::query::{Execution, QueryError};
use crate::types::{Tuple, TupleElement, Value, ValueType, Variable};

fn single(test: &TestStore, q: crate::types::KeyValue) -> Result<Option<crate::types::KeyValue>, QueryError> {
    let engine = test.engine();
    match test.execute(&engine, q)? {
        Execution::Single(result) => Ok(result),
        other => panic!("expected a single read, got {other:?}"),
    }
}

#[test]
fn test_single_read_typed_value() {
    let test = TestStore::new();
    let directory = test.directory(&["users", "profile"]);
    test.put(&directory, vec!["alice".into(), "age".into()], Value::Int(34));
    test.put(&directory, vec!["alice".into(), "name".into()], Value::string("Alice"));

    let age = query(
        dir(&["users", "profile"]),
        vec!["alice".into(), "age".into()],
        Value::Variable(Variable::typed([ValueType::Int])),
    );
    let result = single(&test, age).unwrap().unwrap();
    assert_eq!(result.value, Value::Int(34));

    // The first type that decodes wins: five bytes are not an int.
    let name = query(
        dir(&["users", "profile"]),
        vec!["alice".into(), "name".into()],
        Value::Variable(Variable::typed([ValueType::Int, ValueType::String])),
    );
    let result = single(&test, name).unwrap().unwrap();
    assert_eq!(result.value, Value::string("Alice"));
}

#[test]
fn test_single_read_missing_key() {
    let test = TestStore::new();
    test.directory(&["users"]);

    let q = query(dir(&["users"]), vec!["bob".into()], Value::var());
    assert_eq!(single(&test, q).unwrap(), None);
}

#[test]
fn test_single_read_tuple_pattern() {
    let test = TestStore::new();
    let directory = test.directory(&["config"]);
    let stored = Tuple(vec!["v1".into(), TupleElement::Int(3), TupleElement::Bool(true)]);
    test.put(&directory, vec!["release".into()], Value::Tuple(stored.clone()));

    let matching = Value::Tuple(Tuple(vec!["v1".into(), TupleElement::MaybeMore]));
    let q = query(dir(&["config"]), vec!["release".into()], matching);
    let result = single(&test, q).unwrap().unwrap();
    assert_eq!(result.value, Value::Tuple(stored));

    let other = Value::Tuple(Tuple(vec!["v2".into(), TupleElement::MaybeMore]));
    let q = query(dir(&["config"]), vec!["release".into()], other);
    assert_eq!(single(&test, q).unwrap(), None);
}

#[test]
fn test_single_read_undecodable_value() {
    let test = TestStore::new();
    let directory = test.directory(&["users"]);
    test.put(&directory, vec!["carol".into()], Value::string("not a uuid"));

    let q = query(
        dir(&["users"]),
        vec!["carol".into()],
        Value::Variable(Variable::typed([ValueType::Uuid])),
    );
    let error = single(&test, q).unwrap_err();
    assert!(matches!(error, QueryError::ValueDecode { .. }));
    assert!(error.to_string().contains("/users(\"carol\")"));
}
