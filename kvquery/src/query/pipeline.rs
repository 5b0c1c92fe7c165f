//! Pipeline coordination.
//!
//! A range read runs as three stages of tokio tasks connected by bounded
//! channels. The `Coordinator` ties them together with one cancellation
//! signal and a single-slot error channel:
//!
//! - every stage holds a `StageHandle`, which carries a sender into the error
//!   slot and a view of the cancellation signal;
//! - the first stage to fail fills the slot and raises cancellation, and any
//!   later error is logged and dropped;
//! - every suspension point in a stage races against cancellation, so a
//!   cancelled stage exits within one suspension point;
//! - the pipeline has completed once every `StageHandle` is dropped, which
//!   closes the error slot.
//!
//! # Invariants
//!
//! - At most one error is ever delivered.
//! - Once cancellation is raised it is never lowered.
//! - Dropping the `Completion` raises cancellation.

use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, watch};

use super::error::QueryError;

/// Shared, one-way cancellation flag.
#[derive(Debug, Clone)]
pub(crate) struct CancelSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub(crate) fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once the signal has been raised.
    pub(crate) async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so this only returns once cancelled.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// A stage's connection to the coordinator.
#[derive(Debug, Clone)]
pub(crate) struct StageHandle {
    cancel: CancelSignal,
    errors: mpsc::Sender<QueryError>,
}

impl StageHandle {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Report a fatal error.
    ///
    /// The first error wins and raises cancellation. Errors reported after
    /// that are dropped without blocking.
    pub(crate) fn fail(&self, error: QueryError) {
        if self.is_cancelled() {
            tracing::warn!("dropping error after cancellation: {error}");
            return;
        }
        match self.errors.try_send(error) {
            Ok(()) => {
                tracing::debug!("pipeline stage failed, cancelling");
                self.cancel.cancel();
            }
            Err(TrySendError::Full(error) | TrySendError::Closed(error)) => {
                tracing::warn!("dropping secondary error: {error}");
            }
        }
    }

    /// Run `future` unless cancellation is raised first.
    ///
    /// Cancellation is checked before the future is polled.
    pub(crate) async fn until_cancelled<F: Future>(&self, future: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            output = future => Some(output),
        }
    }

    /// Send `item` downstream.
    ///
    /// Returns false if the pipeline was cancelled or the receiver is gone,
    /// in which case the stage should stop.
    pub(crate) async fn send<T>(&self, sender: &mpsc::Sender<T>, item: T) -> bool {
        matches!(self.until_cancelled(sender.send(item)).await, Some(Ok(())))
    }

    /// Receive the next item from a receiver shared by a worker pool.
    ///
    /// Returns `None` once the input is exhausted or the pipeline was
    /// cancelled.
    pub(crate) async fn recv_shared<T>(&self, receiver: &Mutex<mpsc::Receiver<T>>) -> Option<T> {
        self.until_cancelled(async { receiver.lock().await.recv().await })
            .await
            .flatten()
    }
}

/// Builds the stages of one pipeline invocation.
#[derive(Debug)]
pub(crate) struct Coordinator {
    cancel: CancelSignal,
    errors_tx: mpsc::Sender<QueryError>,
    errors_rx: mpsc::Receiver<QueryError>,
}

impl Coordinator {
    pub(crate) fn new() -> Self {
        let (errors_tx, errors_rx) = mpsc::channel(1);
        Self {
            cancel: CancelSignal::new(),
            errors_tx,
            errors_rx,
        }
    }

    /// A handle for one stage or worker.
    pub(crate) fn stage(&self) -> StageHandle {
        StageHandle {
            cancel: self.cancel.clone(),
            errors: self.errors_tx.clone(),
        }
    }

    /// Stop handing out stages and observe the pipeline's outcome.
    pub(crate) fn into_completion(self) -> Completion {
        Completion {
            cancel: self.cancel,
            errors: self.errors_rx,
        }
    }
}

/// The caller's view of a running pipeline.
#[derive(Debug)]
pub(crate) struct Completion {
    cancel: CancelSignal,
    errors: mpsc::Receiver<QueryError>,
}

impl Completion {
    /// Wait until every stage has finished or the first error is reported.
    ///
    /// `ResultStream` observes the same outcome through `poll_error`.
    #[cfg(test)]
    pub(crate) async fn wait(mut self) -> Result<(), QueryError> {
        self.errors.recv().await.map_or(Ok(()), Err)
    }

    /// `Ready(Some(_))` once an error has been reported, `Ready(None)` once
    /// every stage has finished without one.
    pub(crate) fn poll_error(&mut self, cx: &mut Context<'_>) -> Poll<Option<QueryError>> {
        self.errors.poll_recv(cx)
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.cancel();
    }
}
