//! Opened directories.

use super::tuple::{self, TupleError};
use crate::types::{Directory, Tuple, display_path};

/// An opened directory bound to a fully literal path.
///
/// Every key stored in the directory begins with its prefix. Prefixes are
/// unique and self-delimiting, so no directory's prefix begins with another's.
///
/// # Invariants
///
/// - Never mutated after it is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySubspace {
    path: Vec<String>,
    prefix: Vec<u8>,
}

impl DirectorySubspace {
    #[must_use]
    pub const fn new(path: Vec<String>, prefix: Vec<u8>) -> Self {
        Self { path, prefix }
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The path as a literal `Directory`.
    #[must_use]
    pub fn directory(&self) -> Directory {
        Directory::from_path(self.path.iter().map(String::as_str))
    }

    /// Encode a tuple into a key inside this directory.
    pub fn pack(&self, tuple: &Tuple) -> Result<Vec<u8>, TupleError> {
        let mut key = self.prefix.to_vec();
        tuple::pack_into(&mut key, tuple)?;
        Ok(key)
    }

    /// Decode the tuple that follows this directory's prefix in `key`.
    pub fn unpack(&self, key: &[u8]) -> Result<Tuple, TupleError> {
        let rest = key
            .strip_prefix(self.prefix.as_slice())
            .ok_or(TupleError::PrefixMismatch)?;
        tuple::unpack(rest)
    }

    /// Path formatted for messages.
    #[must_use]
    pub fn display(&self) -> String {
        display_path(&self.path)
    }
}
