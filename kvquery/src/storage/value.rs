//! Value encoding.
//!
//! Values are not self-describing: the reader chooses how to decode the raw
//! bytes. Fixed-width numbers use a configurable byte order; tuples use the
//! tuple encoding; strings and byte strings are stored as-is.

use num_bigint::BigInt;
use thiserror::Error;
use uuid::Uuid;

use super::tuple::{self, TupleError};
use crate::types::{Value, ValueType, Variable};

/// Byte order of fixed-width numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

/// Errors that can occur while encoding or decoding values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("cannot encode {kind} value")]
    Unencodable { kind: &'static str },
    #[error(transparent)]
    Tuple(#[from] TupleError),
    #[error("{len} bytes cannot be decoded as any of {types}")]
    Undecodable { types: String, len: usize },
}

/// Encode a concrete value.
pub fn pack_value(value: &Value, order: ByteOrder) -> Result<Vec<u8>, ValueError> {
    let bytes = match value {
        Value::Int(n) => match order {
            ByteOrder::Big => n.to_be_bytes().to_vec(),
            ByteOrder::Little => n.to_le_bytes().to_vec(),
        },
        Value::Uint(n) => match order {
            ByteOrder::Big => n.to_be_bytes().to_vec(),
            ByteOrder::Little => n.to_le_bytes().to_vec(),
        },
        Value::Float32(n) => match order {
            ByteOrder::Big => n.to_be_bytes().to_vec(),
            ByteOrder::Little => n.to_le_bytes().to_vec(),
        },
        Value::Float64(n) => match order {
            ByteOrder::Big => n.to_be_bytes().to_vec(),
            ByteOrder::Little => n.to_le_bytes().to_vec(),
        },
        Value::BigInt(n) => match order {
            ByteOrder::Big => n.to_signed_bytes_be(),
            ByteOrder::Little => n.to_signed_bytes_le(),
        },
        Value::Bool(b) => vec![u8::from(*b)],
        Value::String(s) => s.as_bytes().to_vec(),
        Value::Bytes(b) => b.to_vec(),
        Value::Uuid(u) => u.as_bytes().to_vec(),
        Value::Tuple(t) => tuple::pack(t)?,
        Value::Nil => return Err(ValueError::Unencodable { kind: "nil" }),
        Value::Clear => return Err(ValueError::Unencodable { kind: "clear" }),
        Value::Variable(_) => return Err(ValueError::Unencodable { kind: "variable" }),
    };
    Ok(bytes)
}

/// Decode raw bytes as the first of the variable's types that fits.
///
/// An untyped variable, or one that allows `any`, yields the raw bytes.
pub fn unpack_value(bytes: &[u8], variable: &Variable, order: ByteOrder) -> Result<Value, ValueError> {
    if variable.types.is_empty() {
        return Ok(Value::Bytes(bytes.to_vec()));
    }
    variable
        .types
        .iter()
        .find_map(|&typ| unpack_as(bytes, typ, order))
        .ok_or_else(|| ValueError::Undecodable {
            types: variable.to_string(),
            len: bytes.len(),
        })
}

fn unpack_as(bytes: &[u8], typ: ValueType, order: ByteOrder) -> Option<Value> {
    match typ {
        ValueType::Any | ValueType::Bytes => Some(Value::Bytes(bytes.to_vec())),
        ValueType::Int => {
            let raw: [u8; 8] = bytes.try_into().ok()?;
            Some(Value::Int(match order {
                ByteOrder::Big => i64::from_be_bytes(raw),
                ByteOrder::Little => i64::from_le_bytes(raw),
            }))
        }
        ValueType::Uint => {
            let raw: [u8; 8] = bytes.try_into().ok()?;
            Some(Value::Uint(match order {
                ByteOrder::Big => u64::from_be_bytes(raw),
                ByteOrder::Little => u64::from_le_bytes(raw),
            }))
        }
        ValueType::Float => match bytes.len() {
            4 => {
                let raw: [u8; 4] = bytes.try_into().ok()?;
                Some(Value::Float32(match order {
                    ByteOrder::Big => f32::from_be_bytes(raw),
                    ByteOrder::Little => f32::from_le_bytes(raw),
                }))
            }
            8 => {
                let raw: [u8; 8] = bytes.try_into().ok()?;
                Some(Value::Float64(match order {
                    ByteOrder::Big => f64::from_be_bytes(raw),
                    ByteOrder::Little => f64::from_le_bytes(raw),
                }))
            }
            _ => None,
        },
        ValueType::BigInt if !bytes.is_empty() => Some(Value::BigInt(match order {
            ByteOrder::Big => BigInt::from_signed_bytes_be(bytes),
            ByteOrder::Little => BigInt::from_signed_bytes_le(bytes),
        })),
        ValueType::BigInt => None,
        ValueType::Bool => match bytes {
            [0] => Some(Value::Bool(false)),
            [1] => Some(Value::Bool(true)),
            _ => None,
        },
        ValueType::String => std::str::from_utf8(bytes)
            .ok()
            .map(|s| Value::String(s.to_owned())),
        ValueType::Uuid => {
            let raw: [u8; 16] = bytes.try_into().ok()?;
            Some(Value::Uuid(Uuid::from_bytes(raw)))
        }
        ValueType::Tuple => tuple::unpack(bytes).ok().map(Value::Tuple),
    }
}
