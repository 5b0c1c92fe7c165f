// Evaluation of a query:
// 1. Classify the key-value by shape
// 2. Refuse nil and variable-clear queries
// 3. Constant and clear queries are handed back as writes
// 4. Single reads do one get on the literal key
// 5. Range reads run a pipeline:
//     - Resolve the directory pattern into opened directories
//     - Scan each directory's literal tuple prefix
//     - Decode and filter each candidate key and value
//     - Stream accepted results until done, an error, or the caller drops
//
// Components:
//  - Query data model (types)
//  - Store collaborator: transactions, tuple and value codecs (storage)
//  - Classifier, pipeline stages and engine (query)

pub mod config;
mod constants;
pub mod query;
pub mod storage;
pub mod types;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use config::{ConfigError, EngineConfig};
pub use query::{Class, Execution, QueryEngine, QueryError, ResultStream};
pub use storage::{MemoryStore, ReadTransaction};
pub use types::{DirElement, Directory, Key, KeyValue, Tuple, TupleElement, Value, ValueType, Variable};
