//! Tuple elements used in key and value patterns.
//!
//! A `Tuple` is an ordered sequence of typed elements. Besides the concrete
//! kinds that can be stored in the database, a pattern tuple may contain the
//! wildcard markers `Variable` and `MaybeMore`, and the `Nil` sentinel which
//! invalidates any query it appears in.
//!
//! # Invariants
//!
//! - `MaybeMore` is only meaningful as the last element of a tuple.
//! - Decoded tuples never contain `Variable`, `MaybeMore` or `Nil`.

use std::fmt;

use num_bigint::BigInt;
use uuid::Uuid;

/// Types a `Variable` may be constrained to.
///
/// The type list only matters in value position, where it selects how the
/// raw value bytes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Any,
    Int,
    Uint,
    Bool,
    Float,
    BigInt,
    String,
    Bytes,
    Uuid,
    Tuple,
}

impl ValueType {
    /// The lowercase name used when displaying a typed variable.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::BigInt => "bigint",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::Tuple => "tuple",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A wildcard placeholder.
///
/// Matches exactly one directory segment or tuple element. An empty type
/// list is an untyped wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variable {
    /// Allowed value types, in order of preference.
    pub types: Vec<ValueType>,
}

impl Variable {
    /// Create an untyped variable.
    #[must_use]
    pub const fn any() -> Self {
        Self { types: Vec::new() }
    }

    /// Create a variable constrained to the given types.
    #[must_use]
    pub fn typed(types: impl IntoIterator<Item = ValueType>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for (i, typ) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{typ}")?;
        }
        f.write_str(">")
    }
}

/// A single tuple element.
#[derive(Debug, Clone, PartialEq)]
pub enum TupleElement {
    /// Invalid sentinel. Its presence anywhere invalidates the query.
    Nil,
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
    /// Matches any single element.
    Variable(Variable),
    /// Matches zero or more trailing elements.
    MaybeMore,
}

impl TupleElement {
    /// Create a string element.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create a byte string element.
    #[must_use]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Create an untyped variable element.
    #[must_use]
    pub const fn var() -> Self {
        Self::Variable(Variable::any())
    }

    /// Name of this element's kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::BigInt(_) => "bigint",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Uuid(_) => "uuid",
            Self::Tuple(_) => "tuple",
            Self::Variable(_) => "variable",
            Self::MaybeMore => "maybe-more",
        }
    }
}

impl fmt::Display for TupleElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
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
            Self::Variable(v) => write!(f, "{v}"),
            Self::MaybeMore => f.write_str("..."),
        }
    }
}

pub(crate) fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for b in bytes {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}

impl From<i64> for TupleElement {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for TupleElement {
    fn from(n: u64) -> Self {
        Self::Uint(n)
    }
}

impl From<BigInt> for TupleElement {
    fn from(n: BigInt) -> Self {
        Self::BigInt(n)
    }
}

impl From<f32> for TupleElement {
    fn from(n: f32) -> Self {
        Self::Float32(n)
    }
}

impl From<f64> for TupleElement {
    fn from(n: f64) -> Self {
        Self::Float64(n)
    }
}

impl From<bool> for TupleElement {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for TupleElement {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for TupleElement {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Uuid> for TupleElement {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<Tuple> for TupleElement {
    fn from(t: Tuple) -> Self {
        Self::Tuple(t)
    }
}

impl From<Variable> for TupleElement {
    fn from(v: Variable) -> Self {
        Self::Variable(v)
    }
}

/// An ordered sequence of tuple elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tuple(pub Vec<TupleElement>);

impl Tuple {
    /// Create an empty tuple.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the elements as a slice.
    #[must_use]
    pub fn elements(&self) -> &[TupleElement] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TupleElement> {
        self.0.iter()
    }

    /// Append an element.
    pub fn push(&mut self, element: impl Into<TupleElement>) {
        self.0.push(element.into());
    }

    /// Returns true if the last element is `MaybeMore`.
    #[must_use]
    pub fn ends_with_maybe_more(&self) -> bool {
        matches!(self.0.last(), Some(TupleElement::MaybeMore))
    }
}

impl From<Vec<TupleElement>> for Tuple {
    fn from(elements: Vec<TupleElement>) -> Self {
        Self(elements)
    }
}

impl FromIterator<TupleElement> for Tuple {
    fn from_iter<I: IntoIterator<Item = TupleElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a TupleElement;
    type IntoIter = std::slice::Iter<'a, TupleElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str(")")
    }
}
