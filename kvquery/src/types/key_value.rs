//! Keys, values and the `KeyValue` query unit.

use std::fmt;

use num_bigint::BigInt;
use uuid::Uuid;

use super::directory::Directory;
use super::tuple::{Tuple, Variable, write_hex};

/// A key pattern: a directory followed by a tuple.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Key {
    pub directory: Directory,
    pub tuple: Tuple,
}

impl Key {
    #[must_use]
    pub const fn new(directory: Directory, tuple: Tuple) -> Self {
        Self { directory, tuple }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.directory, self.tuple)
    }
}

/// The value half of a query or result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Invalid sentinel.
    Nil,
    /// Deletion intent.
    Clear,
    /// Read this value, decoding it as one of the variable's types.
    Variable(Variable),
    Int(i64),
    Uint(u64),
    BigInt(BigInt),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Tuple(Tuple),
}

impl Value {
    /// Create an untyped variable value.
    #[must_use]
    pub const fn var() -> Self {
        Self::Variable(Variable::any())
    }

    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    #[must_use]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Clear => f.write_str("clear"),
            Self::Variable(v) => write!(f, "{v}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Float32(n) => write!(f, "{n}"),
            Self::Float64(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write_hex(f, b),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Tuple(t) => write!(f, "{t}"),
        }
    }
}

/// A key paired with a value.
///
/// This is both the unit submitted to the engine and the shape of each
/// emitted result, where every pattern has been replaced by concrete data.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: Key,
    pub value: Value,
}

impl KeyValue {
    #[must_use]
    pub const fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
