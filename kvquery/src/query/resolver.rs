//! Directory resolution.
//!
//! Expands a directory pattern into the concrete directories it denotes.
//! Patterns are split at their first `Variable`; the literal part before it
//! is listed and each child produces a new pattern with that segment
//! replaced. Pending patterns are kept on an explicit work stack and at most
//! `concurrency` list/open calls are in flight at once, so the task's memory
//! is bounded by the width of the tree rather than by spawned tasks.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;

use super::error::QueryError;
use super::pipeline::StageHandle;
use crate::constants::STAGE_CHANNEL_CAPACITY;
use crate::storage::{DirectorySubspace, ReadTransaction};
use crate::types::{DirElement, Directory, display_path};

/// Result of expanding one pattern.
#[derive(Debug)]
enum Expansion {
    /// The pattern was fully literal and has been opened.
    Opened(DirectorySubspace),
    /// Patterns produced by substituting the first variable with each child.
    Children(Vec<Directory>),
}

struct Resolver<T> {
    txn: Arc<T>,
}

impl<T: ReadTransaction> Resolver<T> {
    async fn expand(&self, pattern: Directory) -> Result<Expansion, QueryError> {
        let Some(index) = pattern.first_variable() else {
            let path = literal_path(pattern.elements())?;
            let opened = self
                .txn
                .open_directory(&path)
                .await
                .map_err(|source| QueryError::DirectoryOpen {
                    path: display_path(&path),
                    source,
                })?;
            return Ok(Expansion::Opened(opened));
        };

        let (prefix, rest) = pattern.elements().split_at(index);
        let suffix = &rest[1..];
        let path = literal_path(prefix)?;
        let names = self
            .txn
            .list_directory(&path)
            .await
            .map_err(|source| QueryError::DirectoryList {
                path: display_path(&path),
                source,
            })?;
        tracing::trace!("{} has {} children", display_path(&path), names.len());

        let children = names
            .into_iter()
            .map(|name| {
                let mut elements = Vec::with_capacity(pattern.len());
                elements.extend_from_slice(prefix);
                elements.push(DirElement::Name(name));
                elements.extend_from_slice(suffix);
                Directory(elements)
            })
            .collect();
        Ok(Expansion::Children(children))
    }
}

fn literal_path(elements: &[DirElement]) -> Result<Vec<String>, QueryError> {
    elements
        .iter()
        .map(|element| match element {
            DirElement::Name(name) => Ok(name.as_str().to_owned()),
            DirElement::Variable(_) | DirElement::Nil => Err(QueryError::invalid(format!(
                "directory segment {element} is not a name"
            ))),
        })
        .collect()
}

/// Start resolving `pattern`, sending each opened directory downstream.
///
/// The returned receiver closes once resolution finishes, fails or is
/// cancelled.
pub(crate) fn spawn<T: ReadTransaction>(
    txn: Arc<T>,
    pattern: Directory,
    concurrency: usize,
    handle: StageHandle,
) -> mpsc::Receiver<Arc<DirectorySubspace>> {
    let (tx, rx) = mpsc::channel(STAGE_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        tracing::debug!("resolver started for {pattern}");
        let resolver = Resolver { txn };
        run(&resolver, pattern, concurrency.max(1), &handle, &tx).await;
        tracing::debug!("resolver finished");
    });
    rx
}

async fn run<T: ReadTransaction>(
    resolver: &Resolver<T>,
    pattern: Directory,
    concurrency: usize,
    handle: &StageHandle,
    output: &mpsc::Sender<Arc<DirectorySubspace>>,
) {
    let mut pending = vec![pattern];
    let mut in_flight = FuturesUnordered::new();

    loop {
        while in_flight.len() < concurrency {
            let Some(next) = pending.pop() else { break };
            in_flight.push(resolver.expand(next));
        }

        // `None` from the set means nothing is pending or in flight.
        let Some(next) = handle.until_cancelled(in_flight.next()).await else {
            return;
        };
        match next {
            None => return,
            Some(Ok(Expansion::Opened(directory))) => {
                tracing::trace!("resolved {}", directory.display());
                if !handle.send(output, Arc::new(directory)).await {
                    return;
                }
            }
            Some(Ok(Expansion::Children(children))) => pending.extend(children),
            Some(Err(error)) => {
                handle.fail(error);
                return;
            }
        }
    }
}
