//! Tuple encoding.
//!
//! Tuples are encoded with the order-preserving tuple layer format: every
//! element starts with a type code, variable-length elements are escaped and
//! terminated, and integers are length-prefixed so that the byte order of two
//! encoded tuples matches their element-wise order.
//!
//! # Type codes
//!
//! | Code          | Element                         |
//! |---------------|---------------------------------|
//! | `0x01`        | byte string                     |
//! | `0x02`        | UTF-8 string                    |
//! | `0x05`        | nested tuple                    |
//! | `0x0b`        | negative integer over 8 bytes   |
//! | `0x0c..=0x13` | negative integer, 1 to 8 bytes  |
//! | `0x14`        | zero                            |
//! | `0x15..=0x1c` | positive integer, 1 to 8 bytes  |
//! | `0x1d`        | positive integer over 8 bytes   |
//! | `0x20`        | 32-bit float                    |
//! | `0x21`        | 64-bit float                    |
//! | `0x26`/`0x27` | false / true                    |
//! | `0x30`        | UUID                            |

#![allow(clippy::cast_possible_truncation)] // Integer byte lengths are at most 8

use num_bigint::{BigInt, Sign};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{Tuple, TupleElement};

const BYTES_CODE: u8 = 0x01;
const STRING_CODE: u8 = 0x02;
const NESTED_CODE: u8 = 0x05;
const NEG_BIG_INT_CODE: u8 = 0x0b;
const INT_ZERO_CODE: u8 = 0x14;
const POS_BIG_INT_CODE: u8 = 0x1d;
const FLOAT_CODE: u8 = 0x20;
const DOUBLE_CODE: u8 = 0x21;
const FALSE_CODE: u8 = 0x26;
const TRUE_CODE: u8 = 0x27;
const UUID_CODE: u8 = 0x30;

const TERMINATOR: u8 = 0x00;
const ESCAPE: u8 = 0xff;

/// Errors that can occur while encoding or decoding tuples.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TupleError {
    /// Wildcards and sentinels have no encoding.
    #[error("cannot encode {kind} element")]
    Unencodable { kind: &'static str },
    #[error("unknown type code 0x{code:02x} at offset {offset}")]
    UnknownCode { code: u8, offset: usize },
    #[error("unexpected end of tuple at offset {offset}")]
    Truncated { offset: usize },
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("integer of {len} bytes is too large to encode")]
    IntegerTooLarge { len: usize },
    #[error("key does not start with the directory prefix")]
    PrefixMismatch,
}

/// Encode a tuple.
pub fn pack(tuple: &Tuple) -> Result<Vec<u8>, TupleError> {
    let mut out = Vec::new();
    pack_into(&mut out, tuple)?;
    Ok(out)
}

/// Encode a tuple, appending to `out`.
pub fn pack_into(out: &mut Vec<u8>, tuple: &Tuple) -> Result<(), TupleError> {
    for element in tuple {
        encode_element(out, element)?;
    }
    Ok(())
}

/// Decode a complete tuple.
pub fn unpack(bytes: &[u8]) -> Result<Tuple, TupleError> {
    let mut decoder = Decoder { bytes, pos: 0 };
    let mut elements = Vec::new();
    while decoder.pos < bytes.len() {
        elements.push(decoder.element()?);
    }
    Ok(Tuple(elements))
}

/// Encode a single integer element.
pub fn pack_int(n: i64) -> Vec<u8> {
    let mut out = Vec::new();
    encode_int(&mut out, i128::from(n));
    out
}

fn encode_element(out: &mut Vec<u8>, element: &TupleElement) -> Result<(), TupleError> {
    match element {
        TupleElement::Int(n) => encode_int(out, i128::from(*n)),
        TupleElement::Uint(n) => encode_int(out, i128::from(*n)),
        TupleElement::BigInt(n) => encode_big_int(out, n)?,
        TupleElement::Float32(x) => {
            out.push(FLOAT_CODE);
            out.extend_from_slice(&encode_f32_bits(x.to_bits()).to_be_bytes());
        }
        TupleElement::Float64(x) => {
            out.push(DOUBLE_CODE);
            out.extend_from_slice(&encode_f64_bits(x.to_bits()).to_be_bytes());
        }
        TupleElement::Bool(false) => out.push(FALSE_CODE),
        TupleElement::Bool(true) => out.push(TRUE_CODE),
        TupleElement::String(s) => {
            out.push(STRING_CODE);
            encode_escaped(out, s.as_bytes());
        }
        TupleElement::Bytes(b) => {
            out.push(BYTES_CODE);
            encode_escaped(out, b);
        }
        TupleElement::Uuid(u) => {
            out.push(UUID_CODE);
            out.extend_from_slice(u.as_bytes());
        }
        TupleElement::Tuple(t) => {
            out.push(NESTED_CODE);
            for nested in t {
                encode_element(out, nested)?;
            }
            out.push(TERMINATOR);
        }
        TupleElement::Nil | TupleElement::Variable(_) | TupleElement::MaybeMore => {
            return Err(TupleError::Unencodable {
                kind: element.kind(),
            });
        }
    }
    Ok(())
}

fn encode_escaped(out: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        out.push(b);
        if b == TERMINATOR {
            out.push(ESCAPE);
        }
    }
    out.push(TERMINATOR);
}

/// Encode an integer whose magnitude fits in 8 bytes.
fn encode_int(out: &mut Vec<u8>, n: i128) {
    if n == 0 {
        out.push(INT_ZERO_CODE);
        return;
    }
    let magnitude = n.unsigned_abs();
    let len = byte_len(magnitude);
    let be = magnitude.to_be_bytes();
    let significant = &be[be.len() - len..];
    if n > 0 {
        out.push(INT_ZERO_CODE + len as u8);
        out.extend_from_slice(significant);
    } else {
        out.push(INT_ZERO_CODE - len as u8);
        out.extend(significant.iter().map(|b| !b));
    }
}

fn encode_big_int(out: &mut Vec<u8>, n: &BigInt) -> Result<(), TupleError> {
    let (sign, magnitude) = n.to_bytes_be();
    if magnitude.len() <= 8 {
        let value = i128::from(be_u64(&magnitude));
        encode_int(out, if sign == Sign::Minus { -value } else { value });
        return Ok(());
    }
    let len = u8::try_from(magnitude.len()).map_err(|_| TupleError::IntegerTooLarge {
        len: magnitude.len(),
    })?;
    if sign == Sign::Minus {
        out.push(NEG_BIG_INT_CODE);
        out.push(len ^ 0xff);
        out.extend(magnitude.iter().map(|b| !b));
    } else {
        out.push(POS_BIG_INT_CODE);
        out.push(len);
        out.extend_from_slice(&magnitude);
    }
    Ok(())
}

fn byte_len(magnitude: u128) -> usize {
    (128 - magnitude.leading_zeros() as usize).div_ceil(8)
}

fn be_u64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}

// Negative floats have every bit flipped, positive floats only the sign bit,
// so that the encoded bytes sort in numeric order.
const fn encode_f32_bits(bits: u32) -> u32 {
    if bits & 0x8000_0000 == 0 { bits ^ 0x8000_0000 } else { !bits }
}

const fn decode_f32_bits(bits: u32) -> u32 {
    if bits & 0x8000_0000 == 0 { !bits } else { bits ^ 0x8000_0000 }
}

const fn encode_f64_bits(bits: u64) -> u64 {
    if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    }
}

const fn decode_f64_bits(bits: u64) -> u64 {
    if bits & 0x8000_0000_0000_0000 == 0 {
        !bits
    } else {
        bits ^ 0x8000_0000_0000_0000
    }
}

/// Map a decoded integer onto the narrowest element kind that holds it.
fn canonical_int(n: i128) -> TupleElement {
    if let Ok(v) = i64::try_from(n) {
        TupleElement::Int(v)
    } else if let Ok(v) = u64::try_from(n) {
        TupleElement::Uint(v)
    } else {
        TupleElement::BigInt(BigInt::from(n))
    }
}

fn canonical_big_int(n: BigInt) -> TupleElement {
    if let Ok(v) = i64::try_from(&n) {
        TupleElement::Int(v)
    } else if let Ok(v) = u64::try_from(&n) {
        TupleElement::Uint(v)
    } else {
        TupleElement::BigInt(n)
    }
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn byte(&mut self) -> Result<u8, TupleError> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(TupleError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], TupleError> {
        let end = self.pos + len;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(TupleError::Truncated { offset: self.bytes.len() })?;
        self.pos = end;
        Ok(slice)
    }

    fn escaped(&mut self) -> Result<Vec<u8>, TupleError> {
        let mut out = Vec::new();
        loop {
            let b = self.byte()?;
            if b != TERMINATOR {
                out.push(b);
            } else if self.peek() == Some(ESCAPE) {
                self.pos += 1;
                out.push(TERMINATOR);
            } else {
                return Ok(out);
            }
        }
    }

    fn element(&mut self) -> Result<TupleElement, TupleError> {
        let offset = self.pos;
        let code = self.byte()?;
        match code {
            BYTES_CODE => Ok(TupleElement::Bytes(self.escaped()?)),
            STRING_CODE => {
                let raw = self.escaped()?;
                String::from_utf8(raw)
                    .map(TupleElement::String)
                    .map_err(|_| TupleError::InvalidUtf8 { offset })
            }
            NESTED_CODE => self.nested(),
            NEG_BIG_INT_CODE => {
                let len = usize::from(self.byte()? ^ 0xff);
                let magnitude: Vec<u8> = self.take(len)?.iter().map(|b| !b).collect();
                Ok(canonical_big_int(BigInt::from_bytes_be(Sign::Minus, &magnitude)))
            }
            0x0c..=0x13 => {
                let len = usize::from(INT_ZERO_CODE - code);
                let magnitude = self.take(len)?.iter().fold(0_u64, |acc, &b| (acc << 8) | u64::from(!b));
                Ok(canonical_int(-i128::from(magnitude)))
            }
            INT_ZERO_CODE => Ok(TupleElement::Int(0)),
            0x15..=0x1c => {
                let len = usize::from(code - INT_ZERO_CODE);
                Ok(canonical_int(i128::from(be_u64(self.take(len)?))))
            }
            POS_BIG_INT_CODE => {
                let len = usize::from(self.byte()?);
                let magnitude = self.take(len)?;
                Ok(canonical_big_int(BigInt::from_bytes_be(Sign::Plus, magnitude)))
            }
            FLOAT_CODE => {
                let raw = self.take(4)?;
                let bits = raw.iter().fold(0_u32, |acc, &b| (acc << 8) | u32::from(b));
                Ok(TupleElement::Float32(f32::from_bits(decode_f32_bits(bits))))
            }
            DOUBLE_CODE => {
                let bits = be_u64(self.take(8)?);
                Ok(TupleElement::Float64(f64::from_bits(decode_f64_bits(bits))))
            }
            FALSE_CODE => Ok(TupleElement::Bool(false)),
            TRUE_CODE => Ok(TupleElement::Bool(true)),
            UUID_CODE => {
                let raw = self.take(16)?;
                let bytes: [u8; 16] = raw
                    .try_into()
                    .map_err(|_| TupleError::Truncated { offset })?;
                Ok(TupleElement::Uuid(Uuid::from_bytes(bytes)))
            }
            _ => Err(TupleError::UnknownCode { code, offset }),
        }
    }

    fn nested(&mut self) -> Result<TupleElement, TupleError> {
        let mut elements = Vec::new();
        loop {
            match self.peek() {
                None => return Err(TupleError::Truncated { offset: self.pos }),
                // A null inside a nested tuple is escaped; nulls are not a
                // supported element kind.
                Some(TERMINATOR) if self.bytes.get(self.pos + 1) == Some(&ESCAPE) => {
                    return Err(TupleError::UnknownCode {
                        code: TERMINATOR,
                        offset: self.pos,
                    });
                }
                Some(TERMINATOR) => {
                    self.pos += 1;
                    return Ok(TupleElement::Tuple(Tuple(elements)));
                }
                Some(_) => elements.push(self.element()?),
            }
        }
    }
}
