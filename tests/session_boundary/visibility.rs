//! Visibility waits against the kernel's applied-transaction watermark.

use crate::common::*;
use std::time::{Duration, Instant};

#[test]
fn satisfied_target_returns_without_waiting() {
    let (_arbor, session) = single_database(10);
    // Watermark starts at zero, so zero is already visible.
    session.await_up_to_date(0, Duration::ZERO).unwrap();
}

#[test]
fn committed_transaction_is_immediately_visible() {
    let (_arbor, session) = single_database(10);
    let handle = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Write,
            None,
        )
        .unwrap();
    let id = handle.commit().unwrap();

    session.await_up_to_date(id, Duration::ZERO).unwrap();
}

#[test]
fn unreachable_target_times_out_near_the_deadline() {
    let (_arbor, session) = single_database(10);
    let timeout = Duration::from_millis(50);

    let started = Instant::now();
    let err = session.await_up_to_date(1_000, timeout).unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_timeout());
    assert_eq!(
        err.failure_kind(),
        Some(TransactionFailureKind::VisibilityTimeout)
    );
    assert!(elapsed >= timeout);
    assert!(elapsed < Duration::from_secs(2));
}

#[test]
fn wait_wakes_when_another_thread_advances_the_watermark() {
    let (arbor, session) = single_database(10);
    let store = arbor.kernel("primary").unwrap().transaction_id_store();

    let advancer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        store.transaction_closed(42);
    });

    session.await_up_to_date(42, Duration::from_secs(5)).unwrap();
    advancer.join().unwrap();
}

#[test]
fn newest_encountered_tracks_commits() {
    let (_arbor, session) = single_database(10);
    assert_eq!(session.newest_encountered_tx_id(), 0);

    let first = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Write,
            None,
        )
        .unwrap()
        .commit()
        .unwrap();
    assert_eq!(session.newest_encountered_tx_id(), first);

    let second = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Write,
            None,
        )
        .unwrap()
        .commit()
        .unwrap();
    assert!(second > first);
    assert_eq!(session.newest_encountered_tx_id(), second);
}
