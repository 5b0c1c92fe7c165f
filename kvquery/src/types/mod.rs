//! Query data model.
//!
//! - `Directory` - a path pattern of literal names and variables
//! - `Tuple` - an ordered, typed pattern or decoded key suffix
//! - `Value` - a concrete value, a read placeholder, or a clear marker
//! - `KeyValue` - the unit submitted to the engine and emitted as results

pub mod directory;
pub mod key_value;
pub mod tuple;

pub use directory::{DirElement, Directory, display_path};
pub use key_value::{Key, KeyValue, Value};
pub use tuple::{Tuple, TupleElement, ValueType, Variable};
