//! Candidate filtering.
//!
//! Decodes the tuple suffix of each scanned key and matches it, and then the
//! raw value, against the query. A mismatch is a silent reject; a key that
//! cannot be decoded fails the pipeline.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use super::compare::{ElementClass, classify_tuple, match_tuple};
use super::error::QueryError;
use super::pipeline::Coordinator;
use super::scanner::DirKeyValue;
use crate::constants::STAGE_CHANNEL_CAPACITY;
use crate::storage::{ByteOrder, pack_value, tuple, unpack_value};
use crate::types::{Key, KeyValue, Tuple, Value};

/// Outcome of checking one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Accepted(KeyValue),
    Rejected,
}

/// Match a raw value against a value spec.
///
/// Returns the decoded value on a match:
///
/// - a `Variable` decodes with the first of its types that fits;
/// - a tuple containing wildcards is decoded and matched element-wise;
/// - any other constant must encode to exactly the raw bytes.
#[must_use]
pub fn match_value(spec: &Value, raw: &[u8], order: ByteOrder) -> Option<Value> {
    match spec {
        Value::Variable(variable) => unpack_value(raw, variable, order).ok(),
        Value::Tuple(pattern) if classify_tuple(pattern) != ElementClass::Constant => {
            let candidate = tuple::unpack(raw).ok()?;
            match_tuple(pattern, &candidate).then_some(Value::Tuple(candidate))
        }
        Value::Nil | Value::Clear => None,
        constant => {
            let packed = pack_value(constant, order).ok()?;
            (packed == raw).then(|| constant.clone())
        }
    }
}

pub(crate) struct TupleFilter {
    pattern: Tuple,
    value: Value,
    byte_order: ByteOrder,
}

impl TupleFilter {
    pub(crate) const fn new(pattern: Tuple, value: Value, byte_order: ByteOrder) -> Self {
        Self {
            pattern,
            value,
            byte_order,
        }
    }

    /// Check one candidate against the key pattern and value spec.
    pub(crate) fn check(&self, item: &DirKeyValue) -> Result<MatchOutcome, QueryError> {
        let candidate = item
            .directory
            .unpack(&item.kv.key)
            .map_err(|source| QueryError::KeyDecode {
                path: item.directory.display(),
                source,
            })?;
        if !match_tuple(&self.pattern, &candidate) {
            return Ok(MatchOutcome::Rejected);
        }
        let Some(value) = match_value(&self.value, &item.kv.value, self.byte_order) else {
            return Ok(MatchOutcome::Rejected);
        };
        let key = Key::new(item.directory.directory(), candidate);
        Ok(MatchOutcome::Accepted(KeyValue::new(key, value)))
    }

    /// Start `workers` filter workers over `input`.
    pub(crate) fn spawn(
        self,
        workers: usize,
        input: mpsc::Receiver<DirKeyValue>,
        coordinator: &Coordinator,
    ) -> mpsc::Receiver<KeyValue> {
        let (tx, rx) = mpsc::channel(STAGE_CHANNEL_CAPACITY);
        let input = Arc::new(Mutex::new(input));
        let filter = Arc::new(self);
        let workers = workers.max(1);
        tracing::debug!("starting {workers} filter workers");

        for worker in 0..workers {
            let filter = Arc::clone(&filter);
            let input = Arc::clone(&input);
            let output = tx.clone();
            let handle = coordinator.stage();
            tokio::spawn(async move {
                while let Some(item) = handle.recv_shared(&input).await {
                    match filter.check(&item) {
                        Ok(MatchOutcome::Accepted(kv)) => {
                            tracing::trace!("accepted {kv}");
                            if !handle.send(&output, kv).await {
                                break;
                            }
                        }
                        Ok(MatchOutcome::Rejected) => {}
                        Err(error) => {
                            handle.fail(error);
                            break;
                        }
                    }
                }
                tracing::trace!("filter worker {worker} finished");
            });
        }
        rx
    }
}
