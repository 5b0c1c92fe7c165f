//! Query classification and validation.
//!
//! `classify` maps the structural shape of a `KeyValue` to the operation it
//! performs. It is pure and total: every query gets a class, including the
//! two classes that can never be executed (`Nil` and `VariableClear`).
//!
//! # Decision Table
//!
//! Evaluated top to bottom:
//!
//! 1. `Nil` anywhere in the key or value: `Nil`
//! 2. Constant key, constant value: `Constant`
//! 3. Constant key, `Clear` value: `Clear`
//! 4. Constant key, variable value: `SingleRead`
//! 5. Variable key, `Clear` value: `VariableClear`
//! 6. Variable key, any other value: `RangeRead`

use std::fmt;

use super::compare::{ElementClass, classify_directory, classify_tuple, classify_value};
use super::error::QueryError;
use crate::types::{Key, KeyValue, Tuple, TupleElement, Value};

/// The operation a query performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// No wildcards or clear marker; a write of one key.
    Constant,
    /// Constant key with a `Clear` value; a delete of one key.
    Clear,
    /// Constant key with a variable value; a read of one key.
    SingleRead,
    /// Variable key without a `Clear` value; a read of many keys.
    RangeRead,
    /// Variable key with a `Clear` value. Not executable.
    VariableClear,
    /// Contains a `Nil` sentinel. Not executable.
    Nil,
}

impl Class {
    /// Whether a query of this class may be executed.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::VariableClear | Self::Nil)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Clear => "clear",
            Self::SingleRead => "single",
            Self::RangeRead => "range",
            Self::VariableClear => "variable clear",
            Self::Nil => "nil",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn classify_key(key: &Key) -> ElementClass {
    // A `Clear` can't appear in a key, so the result is never `Clear`.
    classify_directory(&key.directory).max(classify_tuple(&key.tuple))
}

/// Classify a query.
#[must_use]
pub fn classify(kv: &KeyValue) -> Class {
    let key = classify_key(&kv.key);
    let value = classify_value(&kv.value);

    if key == ElementClass::Nil || value == ElementClass::Nil {
        return Class::Nil;
    }
    if key == ElementClass::Constant {
        return match value {
            ElementClass::Clear => Class::Clear,
            ElementClass::Variable => Class::SingleRead,
            ElementClass::Constant | ElementClass::Nil => Class::Constant,
        };
    }
    if value == ElementClass::Clear {
        Class::VariableClear
    } else {
        Class::RangeRead
    }
}

/// Check the structural rules classification does not cover.
///
/// `MaybeMore` may only be the last element of a tuple. This applies to the
/// key tuple, a tuple value and every nested tuple inside either.
pub fn validate(kv: &KeyValue) -> Result<(), QueryError> {
    check_maybe_more(&kv.key.tuple)?;
    if let Value::Tuple(tuple) = &kv.value {
        check_maybe_more(tuple)?;
    }
    Ok(())
}

fn check_maybe_more(tuple: &Tuple) -> Result<(), QueryError> {
    let last = tuple.len().saturating_sub(1);
    for (index, element) in tuple.iter().enumerate() {
        match element {
            TupleElement::MaybeMore if index != last => {
                return Err(QueryError::invalid(format!(
                    "MaybeMore must be the last element of {tuple}"
                )));
            }
            TupleElement::Tuple(nested) => check_maybe_more(nested)?,
            _ => {}
        }
    }
    Ok(())
}
