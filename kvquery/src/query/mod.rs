//! Query evaluation.
//!
//! A query is a `KeyValue` whose key and value may contain wildcards. The
//! engine classifies it, and for range reads runs a three-stage pipeline:
//!
//! 1. the resolver expands the directory pattern into opened directories;
//! 2. a pool of scanners reads every key under each directory's literal
//!    tuple prefix;
//! 3. a pool of filters decodes each key and keeps those matching the full
//!    pattern.
//!
//! # Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use kvquery::query::{Execution, QueryEngine};
//!
//! let engine = QueryEngine::new(Arc::new(store.begin_read()?), EngineConfig::default());
//! let query = KeyValue::new(
//!     Key::new(
//!         Directory(vec![DirElement::name("app"), DirElement::var()]),
//!         Tuple(vec![TupleElement::string("user"), TupleElement::MaybeMore]),
//!     ),
//!     Value::var(),
//! );
//!
//! if let Execution::Range(results) = engine.execute(query).await? {
//!     let rows: Vec<KeyValue> = results.try_collect().await?;
//! }
//! ```

pub mod class;
pub mod compare;
pub mod engine;
pub mod error;
pub mod filter;
mod pipeline;
mod resolver;
pub mod scanner;
pub mod stream;

pub use class::{Class, classify, validate};
pub use compare::{ElementClass, equal, match_tuple};
pub use engine::{Execution, QueryEngine};
pub use error::QueryError;
pub use filter::{MatchOutcome, match_value};
pub use scanner::literal_prefix;
pub use stream::ResultStream;
