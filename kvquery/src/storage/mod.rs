//! Store collaborator.
//!
//! Keys live under a tree of named directories. Each opened directory maps to
//! a fixed binary prefix, and a key's tuple is appended to that prefix using
//! the order-preserving tuple encoding.
//!
//! # Usage
//!
//! ```ignore
//! use storage::{MemoryStore, ReadTransaction};
//!
//! let store = MemoryStore::new();
//! let dir = store.create_directory(["app", "users"])?;
//! store.set(dir.pack(&tuple)?, value)?;
//!
//! let txn = store.begin_read()?;
//! let children = txn.list_directory(&["app".to_owned()]).await?;
//! ```

pub mod directory;
pub mod memory;
pub mod range;
pub mod transaction;
pub mod tuple;
pub mod value;

pub use directory::DirectorySubspace;
pub use memory::{MemoryStore, MemoryTransaction};
pub use range::{KeyRange, strinc};
pub use transaction::{RangeStream, RawKeyValue, ReadTransaction, StoreError};
pub use tuple::TupleError;
pub use value::{ByteOrder, ValueError, pack_value, unpack_value};
