// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{RepoKey, RepoQueue};
use crate::error::{self, PortError, TaskError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

fn recording_queue() -> (RepoQueue, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let queue = RepoQueue::new(Arc::new(move |key: &RepoKey, err: &PortError| {
        sink_seen.lock().expect("lock").push(format!("{key}: {err}"));
    }));
    (queue, seen)
}

#[tokio::test]
async fn test_same_key_runs_in_order() {
    let queue = RepoQueue::default();
    let key = RepoKey::new("o/r");
    let log = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let log = Arc::clone(&log);
            queue.enqueue(key.clone(), move || async move {
                log.lock().expect("lock").push(format!("start {i}"));
                // Later tasks finish faster; order must still hold.
                tokio::time::sleep(Duration::from_millis(10 * (5 - i))).await;
                log.lock().expect("lock").push(format!("end {i}"));
                Ok(i)
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.wait().await.expect("task succeeds"));
    }
    assert_eq!(results, vec![0, 1, 2, 3, 4]);

    let expected: Vec<String> = (0..5)
        .flat_map(|i| [format!("start {i}"), format!("end {i}")])
        .collect();
    assert_eq!(*log.lock().expect("lock"), expected);
}

#[tokio::test]
async fn test_failure_does_not_block_chain() {
    let (queue, seen) = recording_queue();
    let key = RepoKey::new("o/r");

    let failing = queue.enqueue(key.clone(), || async {
        Err::<(), _>(error::other("git exploded"))
    });
    let next = queue.enqueue(key.clone(), || async { Ok("ran") });

    assert!(failing.wait().await.is_err());
    assert_eq!(next.wait().await.expect("second task runs"), "ran");
    assert_eq!(*seen.lock().expect("lock"), vec!["o/r: git exploded"]);
}

#[tokio::test]
async fn test_panic_is_reported_and_chain_continues() {
    let (queue, seen) = recording_queue();
    let key = RepoKey::new("o/r");

    let panicking = queue.enqueue(key.clone(), || async {
        if true {
            panic!("boom");
        }
        Ok(())
    });
    let next = queue.enqueue(key.clone(), || async { Ok(1) });

    let err = panicking.wait().await.expect_err("panic becomes an error");
    assert!(matches!(err, PortError::Task(ref e) if matches!(**e, TaskError::Panicked { .. })));
    assert_eq!(next.wait().await.expect("chain continues"), 1);
    assert_eq!(seen.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn test_different_keys_overlap() {
    let queue = RepoQueue::default();
    let (a_started_tx, a_started_rx) = oneshot::channel::<()>();
    let (b_done_tx, b_done_rx) = oneshot::channel::<()>();

    // A waits for B. If keys were serialized together this would deadlock.
    let a = queue.enqueue(RepoKey::new("o/a"), move || async move {
        let _ = a_started_tx.send(());
        b_done_rx.await.map_err(|_| error::other("b never finished"))?;
        Ok::<_, PortError>("a")
    });
    let b = queue.enqueue(RepoKey::new("o/b"), move || async move {
        a_started_rx.await.map_err(|_| error::other("a never started"))?;
        let _ = b_done_tx.send(());
        Ok::<_, PortError>("b")
    });

    let (a, b) = tokio::time::timeout(Duration::from_secs(5), async {
        (a.wait().await, b.wait().await)
    })
    .await
    .expect("different keys must not block each other");
    assert_eq!(a.expect("a"), "a");
    assert_eq!(b.expect("b"), "b");
}

#[tokio::test]
async fn test_pending_counts() {
    let queue = RepoQueue::default();
    let key = RepoKey::new("o/r");
    assert_eq!(queue.pending(&key), 0);

    let (release_tx, release_rx) = oneshot::channel::<()>();
    let first = queue.enqueue(key.clone(), move || async move {
        let _ = release_rx.await;
        Ok(())
    });
    let second = queue.enqueue(key.clone(), || async { Ok(()) });
    assert_eq!(queue.pending(&key), 2);
    assert_eq!(queue.pending(&RepoKey::new("o/other")), 0);

    release_tx.send(()).expect("first task is waiting");
    first.wait().await.expect("first");
    second.wait().await.expect("second");
    assert_eq!(queue.pending(&key), 0);
}

#[tokio::test]
async fn test_dropped_handle_still_runs() {
    let queue = RepoQueue::default();
    let key = RepoKey::new("o/r");
    let (done_tx, done_rx) = oneshot::channel::<()>();

    drop(queue.enqueue(key.clone(), move || async move {
        let _ = done_tx.send(());
        Ok(())
    }));

    tokio::time::timeout(Duration::from_secs(5), done_rx)
        .await
        .expect("task ran")
        .expect("sender used");
}
