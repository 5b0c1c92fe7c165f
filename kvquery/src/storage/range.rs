//! Key ranges.

use super::transaction::StoreError;

/// A half-open range of keys: `begin <= key < end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub begin: Vec<u8>,
    pub end: Vec<u8>,
}

impl KeyRange {
    /// The range of every key that starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPrefix` if the prefix is empty or consists
    /// only of `0xff` bytes.
    pub fn prefix(prefix: &[u8]) -> Result<Self, StoreError> {
        Ok(Self {
            begin: prefix.to_vec(),
            end: strinc(prefix)?,
        })
    }
}

/// The first key that sorts after every key starting with `key`.
///
/// Trailing `0xff` bytes are dropped and the last remaining byte is
/// incremented.
pub fn strinc(key: &[u8]) -> Result<Vec<u8>, StoreError> {
    let last = key
        .iter()
        .rposition(|&b| b != 0xff)
        .ok_or(StoreError::InvalidPrefix)?;
    let mut out = key[..=last].to_vec();
    out[last] += 1;
    Ok(out)
}
