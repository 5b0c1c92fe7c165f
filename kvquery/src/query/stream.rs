//! Incremental delivery of range read results.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use futures::stream::FusedStream;
use tokio::sync::mpsc;

use super::error::QueryError;
use super::pipeline::Completion;
use crate::types::KeyValue;

/// Results of a range read.
///
/// Yields zero or more results followed by either the end of the stream or
/// exactly one error. Nothing is yielded after an error. Dropping the stream
/// cancels the pipeline behind it.
///
/// Draining the stream is the caller's wait on the pipeline: it ends once
/// every stage has finished, and the first error is its last item.
#[derive(Debug)]
pub struct ResultStream {
    results: mpsc::Receiver<KeyValue>,
    /// `None` once the stream has terminated.
    completion: Option<Completion>,
}

impl ResultStream {
    pub(crate) const fn new(results: mpsc::Receiver<KeyValue>, completion: Completion) -> Self {
        Self {
            results,
            completion: Some(completion),
        }
    }

    fn finish(&mut self) {
        self.completion = None;
        self.results.close();
    }
}

impl Stream for ResultStream {
    type Item = Result<KeyValue, QueryError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        let Some(completion) = this.completion.as_mut() else {
            return Poll::Ready(None);
        };

        // An error takes priority over results still queued behind it.
        if let Poll::Ready(Some(error)) = completion.poll_error(cx) {
            this.finish();
            return Poll::Ready(Some(Err(error)));
        }

        match this.results.poll_recv(cx) {
            Poll::Ready(Some(kv)) => Poll::Ready(Some(Ok(kv))),
            Poll::Ready(None) => match completion.poll_error(cx) {
                Poll::Ready(Some(error)) => {
                    this.finish();
                    Poll::Ready(Some(Err(error)))
                }
                Poll::Ready(None) => {
                    tracing::debug!("range read finished");
                    this.finish();
                    Poll::Ready(None)
                }
                Poll::Pending => Poll::Pending,
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

impl FusedStream for ResultStream {
    fn is_terminated(&self) -> bool {
        self.completion.is_none()
    }
}
