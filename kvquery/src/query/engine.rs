//! Query engine.
//!
//! The entry point for evaluating a query against one read transaction.
//! Every query is classified first; `Nil` and `VariableClear` queries are
//! refused before the store is touched.
//!
//! # Execution Paths
//!
//! | Class         | Result                                     |
//! |---------------|--------------------------------------------|
//! | `Constant`    | `Execution::Set`, handed back to the caller |
//! | `Clear`       | `Execution::Clear`, handed back to the caller |
//! | `SingleRead`  | one `get` on the literal key               |
//! | `RangeRead`   | resolver, scanner and filter pipeline      |
//!
//! Range reads spawn tokio tasks and so must be started inside a runtime.

use std::sync::Arc;

use super::class::{Class, classify, validate};
use super::error::QueryError;
use super::filter::{TupleFilter, match_value};
use super::pipeline::Coordinator;
use super::resolver;
use super::scanner::RangeScanner;
use super::stream::ResultStream;
use crate::config::EngineConfig;
use crate::storage::{ReadTransaction, unpack_value};
use crate::types::{Key, KeyValue, Value, display_path};

/// What executing a query produced.
#[derive(Debug)]
pub enum Execution {
    /// A constant query: the key-value to write.
    Set(KeyValue),
    /// A clear query: the key to delete.
    Clear(Key),
    /// The result of a single read, if the key exists and its value matches.
    Single(Option<KeyValue>),
    /// The results of a range read.
    Range(ResultStream),
}

/// Evaluates queries within one shared read transaction.
#[derive(Debug)]
pub struct QueryEngine<T> {
    txn: Arc<T>,
    config: EngineConfig,
}

impl<T: ReadTransaction> QueryEngine<T> {
    #[must_use]
    pub const fn new(txn: Arc<T>, config: EngineConfig) -> Self {
        Self { txn, config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify a query without executing it.
    #[must_use]
    pub fn classify(&self, query: &KeyValue) -> Class {
        classify(query)
    }

    /// Execute a query according to its class.
    pub async fn execute(&self, query: KeyValue) -> Result<Execution, QueryError> {
        match admit(&query)? {
            Class::Constant => Ok(Execution::Set(query)),
            Class::Clear => Ok(Execution::Clear(query.key)),
            Class::SingleRead => Ok(Execution::Single(self.read_one(&query).await?)),
            Class::RangeRead => Ok(Execution::Range(self.start_range(&query)?)),
            class @ (Class::VariableClear | Class::Nil) => Err(refused(class)),
        }
    }

    /// Read the single key named by a `SingleRead` query.
    ///
    /// Returns `None` if the key does not exist or its value does not match
    /// a constant or tuple value pattern.
    pub async fn single_read(&self, query: &KeyValue) -> Result<Option<KeyValue>, QueryError> {
        expect_class(query, Class::SingleRead)?;
        self.read_one(query).await
    }

    /// Start the pipeline for a `RangeRead` query.
    pub fn range_read(&self, query: &KeyValue) -> Result<ResultStream, QueryError> {
        expect_class(query, Class::RangeRead)?;
        self.start_range(query)
    }

    async fn read_one(&self, query: &KeyValue) -> Result<Option<KeyValue>, QueryError> {
        let path = query
            .key
            .directory
            .to_path()
            .ok_or_else(|| QueryError::invalid("single read needs a literal directory"))?;
        let directory = self
            .txn
            .open_directory(&path)
            .await
            .map_err(|source| QueryError::DirectoryOpen {
                path: display_path(&path),
                source,
            })?;
        let key = directory.pack(&query.key.tuple).map_err(QueryError::KeyEncode)?;

        let fetched = self
            .txn
            .get(&key)
            .await
            .map_err(|source| QueryError::KeyFetch {
                key: query.key.to_string(),
                source,
            })?;
        let Some(raw) = fetched else {
            tracing::debug!("{} not found", query.key);
            return Ok(None);
        };

        let value = match &query.value {
            Value::Variable(variable) => unpack_value(&raw, variable, self.config.byte_order)
                .map_err(|source| QueryError::ValueDecode {
                    key: query.key.to_string(),
                    source,
                })?,
            pattern => match match_value(pattern, &raw, self.config.byte_order) {
                Some(value) => value,
                None => return Ok(None),
            },
        };
        Ok(Some(KeyValue::new(query.key.clone(), value)))
    }

    fn start_range(&self, query: &KeyValue) -> Result<ResultStream, QueryError> {
        tracing::debug!("starting range read for {query}");
        // Encode the tuple prefix before any task is spawned.
        let scanner = RangeScanner::new(
            Arc::clone(&self.txn),
            self.config.scan_workers,
            &query.key.tuple,
        )?;
        let filter = TupleFilter::new(
            query.key.tuple.clone(),
            query.value.clone(),
            self.config.byte_order,
        );

        let coordinator = Coordinator::new();
        let directories = resolver::spawn(
            Arc::clone(&self.txn),
            query.key.directory.clone(),
            self.config.resolve_concurrency,
            coordinator.stage(),
        );
        let candidates = scanner.spawn(directories, &coordinator);
        let results = filter.spawn(self.config.filter_workers, candidates, &coordinator);
        Ok(ResultStream::new(results, coordinator.into_completion()))
    }
}

fn refused(class: Class) -> QueryError {
    QueryError::invalid(format!("{class} queries cannot be executed"))
}

/// Classify and validate a query, refusing classes that cannot execute.
fn admit(query: &KeyValue) -> Result<Class, QueryError> {
    let class = classify(query);
    if !class.is_valid() {
        return Err(refused(class));
    }
    validate(query)?;
    Ok(class)
}

fn expect_class(query: &KeyValue, expected: Class) -> Result<(), QueryError> {
    let class = admit(query)?;
    if class == expected {
        Ok(())
    } else {
        Err(QueryError::invalid(format!(
            "expected a {expected} query, got {class}"
        )))
    }
}
