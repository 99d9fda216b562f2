// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository serialized task queue.
//!
//! ```text
//! enqueue(key, task) --> TaskHandle (returns at once)
//!         |
//!         v
//!   chains: key --> Chain { tx, pending }
//!                     |
//!                     v  (unbounded mpsc, created on first use)
//!                  worker: job1 -> job2 -> job3 ...   one at a time
//!                     |
//!          Ok  --> handle
//!          Err --> error sink + handle   (chain keeps going)
//! ```
//!
//! Tasks on the same key never overlap and run in submission order. Each
//! key has its own worker, so different keys run concurrently. There is no
//! cancellation and no backlog limit.
//!
//! # Key Types
//!
//! | Type            | Purpose                                   |
//! |-----------------|-------------------------------------------|
//! | [`RepoQueue`]   | Registry of chains, cheap to clone        |
//! | [`RepoKey`]     | Identity of the shared working copy       |
//! | [`TaskHandle`]  | Awaitable result of one queued task       |
//! | [`ErrorSink`]   | Where failed tasks are reported           |

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::error::{PortError, PortResult, TaskError};
use crate::github::RepoSlug;

/// Identity of one shared working copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoKey(String);

impl RepoKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&RepoSlug> for RepoKey {
    fn from(slug: &RepoSlug) -> Self {
        Self(slug.to_string())
    }
}

/// Receives every task failure.
pub type ErrorSink = Arc<dyn Fn(&RepoKey, &PortError) + Send + Sync>;

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct Chain {
    tx: mpsc::UnboundedSender<Job>,
    pending: Arc<AtomicUsize>,
}

struct Inner {
    chains: Mutex<HashMap<RepoKey, Chain>>,
    sink: ErrorSink,
}

/// Registry of one task chain per repository.
///
/// Clones share the same chains. Workers exit once every clone is dropped
/// and their backlog is drained.
#[derive(Clone)]
pub struct RepoQueue {
    inner: Arc<Inner>,
}

impl fmt::Debug for RepoQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chains = self
            .inner
            .chains
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("RepoQueue")
            .field("keys", &chains.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RepoQueue {
    /// Creates an empty queue that reports failures to `sink`.
    #[must_use]
    pub fn new(sink: ErrorSink) -> Self {
        Self {
            inner: Arc::new(Inner {
                chains: Mutex::new(HashMap::new()),
                sink,
            }),
        }
    }

    /// Appends `task` to the chain for `key` and returns immediately.
    ///
    /// The task starts once every task enqueued earlier on `key` has
    /// finished, successfully or not. A failure (or panic) is reported to
    /// the error sink and to the returned handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue<T, F, Fut>(&self, key: RepoKey, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = PortResult<T>> + Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        let sink = Arc::clone(&self.inner.sink);
        let job_key = key.clone();

        let mut chains = self
            .inner
            .chains
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let chain = chains
            .entry(key.clone())
            .or_insert_with(|| spawn_worker(key.clone()));
        let pending = Arc::clone(&chain.pending);

        let job: Job = Box::new(move || {
            Box::pin(async move {
                let outcome = AssertUnwindSafe(async move { task().await })
                    .catch_unwind()
                    .await;
                let result = outcome.unwrap_or_else(|_| {
                    Err(TaskError::Panicked {
                        key: job_key.to_string(),
                    }
                    .into())
                });
                if let Err(e) = &result {
                    sink(&job_key, e);
                }
                pending.fetch_sub(1, Ordering::SeqCst);
                // Nobody waiting is fine.
                let _ = result_tx.send(result);
            })
        });

        chain.pending.fetch_add(1, Ordering::SeqCst);
        if chain.tx.send(job).is_err() {
            // Worker is gone; the dropped job resolves the handle as Dropped.
            chain.pending.fetch_sub(1, Ordering::SeqCst);
        }
        debug!(key = %key, pending = chain.pending.load(Ordering::SeqCst), "task enqueued");
        drop(chains);

        TaskHandle { key, rx: result_rx }
    }

    /// Tasks queued or running for `key`.
    #[must_use]
    pub fn pending(&self, key: &RepoKey) -> usize {
        self.inner
            .chains
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map_or(0, |chain| chain.pending.load(Ordering::SeqCst))
    }
}

impl Default for RepoQueue {
    /// Logs failures with `tracing::error!`.
    fn default() -> Self {
        Self::new(Arc::new(|key: &RepoKey, err: &PortError| {
            error!(repo = %key, error = %err, "queued task failed");
        }))
    }
}

fn spawn_worker(key: RepoKey) -> Chain {
    let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
    tokio::spawn(async move {
        debug!(key = %key, "queue worker started");
        while let Some(job) = rx.recv().await {
            job().await;
        }
        debug!(key = %key, "queue worker stopped");
    });

    Chain {
        tx,
        pending: Arc::new(AtomicUsize::new(0)),
    }
}

/// Result of one queued task.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    key: RepoKey,
    rx: oneshot::Receiver<PortResult<T>>,
}

impl<T> TaskHandle<T> {
    /// Key the task was queued on.
    #[must_use]
    pub const fn key(&self) -> &RepoKey {
        &self.key
    }

    /// Waits for the task to finish.
    ///
    /// # Errors
    ///
    /// Returns the task's own error, or `TaskError::Dropped` if the task was
    /// discarded without running to completion.
    pub async fn wait(self) -> PortResult<T> {
        self.rx.await.unwrap_or_else(|_| {
            Err(TaskError::Dropped {
                key: self.key.to_string(),
            }
            .into())
        })
    }
}

#[cfg(test)]
mod tests;
