//! Element comparison and classification.
//!
//! Both functions dispatch on the closed set of element kinds. Comparison is
//! exact: kinds never coerce into one another, except that `Int`, `Uint` and
//! `BigInt` share one wire encoding and therefore compare by numeric value.

use crate::types::{DirElement, Directory, Tuple, TupleElement, Value};

/// What an element contributes to the class of the query containing it.
///
/// Ordered by strength: when combining, the strongest class wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementClass {
    /// No wildcard, clear marker or sentinel.
    Constant,
    /// Contains a `Variable` or `MaybeMore`.
    Variable,
    /// A value-position `Clear`.
    Clear,
    /// Contains a `Nil`.
    Nil,
}

#[must_use]
pub fn classify_element(element: &TupleElement) -> ElementClass {
    match element {
        TupleElement::Nil => ElementClass::Nil,
        TupleElement::Variable(_) | TupleElement::MaybeMore => ElementClass::Variable,
        TupleElement::Tuple(tuple) => classify_tuple(tuple),
        TupleElement::Int(_)
        | TupleElement::Uint(_)
        | TupleElement::BigInt(_)
        | TupleElement::Float32(_)
        | TupleElement::Float64(_)
        | TupleElement::Bool(_)
        | TupleElement::String(_)
        | TupleElement::Bytes(_)
        | TupleElement::Uuid(_) => ElementClass::Constant,
    }
}

#[must_use]
pub fn classify_tuple(tuple: &Tuple) -> ElementClass {
    tuple
        .iter()
        .map(classify_element)
        .fold(ElementClass::Constant, Ord::max)
}

#[must_use]
pub const fn classify_dir_element(element: &DirElement) -> ElementClass {
    match element {
        DirElement::Name(_) => ElementClass::Constant,
        DirElement::Variable(_) => ElementClass::Variable,
        DirElement::Nil => ElementClass::Nil,
    }
}

#[must_use]
pub fn classify_directory(directory: &Directory) -> ElementClass {
    directory
        .elements()
        .iter()
        .map(classify_dir_element)
        .fold(ElementClass::Constant, Ord::max)
}

#[must_use]
pub fn classify_value(value: &Value) -> ElementClass {
    match value {
        Value::Nil => ElementClass::Nil,
        Value::Clear => ElementClass::Clear,
        Value::Variable(_) => ElementClass::Variable,
        Value::Tuple(tuple) => classify_tuple(tuple),
        Value::Int(_)
        | Value::Uint(_)
        | Value::BigInt(_)
        | Value::Float32(_)
        | Value::Float64(_)
        | Value::Bool(_)
        | Value::String(_)
        | Value::Bytes(_)
        | Value::Uuid(_) => ElementClass::Constant,
    }
}

/// Compare a pattern element against a decoded candidate element.
///
/// A `Variable` pattern matches any candidate. Nested tuples are matched with
/// `match_tuple`, so they may contain wildcards of their own.
#[must_use]
pub fn equal(pattern: &TupleElement, candidate: &TupleElement) -> bool {
    use TupleElement as E;

    match (pattern, candidate) {
        (E::Variable(_), _) => true,
        (E::BigInt(a), E::BigInt(b)) => a == b,
        (E::Int(_) | E::Uint(_) | E::BigInt(_), E::Int(_) | E::Uint(_) | E::BigInt(_)) => {
            match (as_i128(pattern), as_i128(candidate)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (E::Float32(a), E::Float32(b)) => a.to_bits() == b.to_bits(),
        (E::Float64(a), E::Float64(b)) => a.to_bits() == b.to_bits(),
        (E::Bool(a), E::Bool(b)) => a == b,
        (E::String(a), E::String(b)) => a == b,
        (E::Bytes(a), E::Bytes(b)) => a == b,
        (E::Uuid(a), E::Uuid(b)) => a == b,
        (E::Tuple(a), E::Tuple(b)) => match_tuple(a, b),
        _ => false,
    }
}

fn as_i128(element: &TupleElement) -> Option<i128> {
    match element {
        TupleElement::Int(n) => Some(i128::from(*n)),
        TupleElement::Uint(n) => Some(i128::from(*n)),
        TupleElement::BigInt(n) => i128::try_from(n).ok(),
        _ => None,
    }
}

/// Match a candidate tuple against a pattern tuple.
///
/// Lengths must be equal unless the pattern ends with `MaybeMore`, in which
/// case the candidate only needs the elements before it; anything after is
/// accepted. Stops at the first mismatching element.
#[must_use]
pub fn match_tuple(pattern: &Tuple, candidate: &Tuple) -> bool {
    let open = pattern.ends_with_maybe_more();
    let fixed = if open {
        &pattern.elements()[..pattern.len() - 1]
    } else {
        pattern.elements()
    };
    if open {
        if candidate.len() < fixed.len() {
            return false;
        }
    } else if candidate.len() != fixed.len() {
        return false;
    }
    fixed
        .iter()
        .zip(candidate.iter())
        .all(|(p, c)| equal(p, c))
}
