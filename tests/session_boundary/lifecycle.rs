//! Transaction lifecycle: begin, commit, rollback, timeouts, metadata.

use crate::common::*;
use std::time::Duration;

// ============================================================================
// Begin / commit / rollback
// ============================================================================

#[test]
fn begin_commit_advances_the_watermark() {
    let (_arbor, session) = single_database(10);
    assert_eq!(session.newest_encountered_tx_id(), 0);

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

    assert_eq!(session.newest_encountered_tx_id(), id);
}

#[test]
fn rollback_does_not_advance_the_watermark() {
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
    handle.rollback().unwrap();

    assert_eq!(session.newest_encountered_tx_id(), 0);
}

#[test]
fn queries_run_inside_the_handle_transaction() {
    let (_arbor, session) = single_database(10);
    let handle = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Read,
            None,
        )
        .unwrap();

    let result = handle.run_query("match (n) return n", &rows(7)).unwrap();
    assert_eq!(result.statistics.rows_affected, 7);
    handle.commit().unwrap();
}

#[test]
fn one_kernel_transaction_per_thread() {
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

    let err = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Write,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Kernel(_)));

    handle.rollback().unwrap();
}

// ============================================================================
// Metadata and timeout plumbing
// ============================================================================

#[test]
fn explicit_begin_with_metadata_and_no_timeout() {
    let (arbor, session) = single_database(10);
    let mut metadata = TransactionMetadata::new();
    metadata.insert("app".into(), json!("test"));

    let handle = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Write,
            Some(metadata.clone()),
        )
        .unwrap();

    let opened = arbor.kernel("primary").unwrap().last_transaction().unwrap();
    assert_eq!(opened.metadata().unwrap(), metadata);
    assert_eq!(opened.timeout(), None);
    assert_eq!(opened.kind(), TransactionKind::Explicit);

    handle.commit().unwrap();
}

#[test]
fn requested_timeout_reaches_the_kernel() {
    let (arbor, session) = single_database(10);
    let handle = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            Some(Duration::from_secs(5)),
            AccessMode::Write,
            None,
        )
        .unwrap();

    let opened = arbor.kernel("primary").unwrap().last_transaction().unwrap();
    assert_eq!(opened.timeout(), Some(Duration::from_secs(5)));

    handle.commit().unwrap();
}

#[test]
fn exceeding_the_kernel_timeout_is_a_timeout_failure_not_unavailable() {
    let (_arbor, session) = single_database(10);
    let handle = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            Some(Duration::from_millis(5)),
            AccessMode::Write,
            None,
        )
        .unwrap();

    std::thread::sleep(Duration::from_millis(25));
    let err = handle.commit().unwrap_err();

    assert_eq!(err.failure_kind(), Some(TransactionFailureKind::Timeout));
    assert!(!err.is_unavailable());
}

// ============================================================================
// Availability
// ============================================================================

#[test]
fn unavailable_database_refuses_session_construction() {
    let arbor = Arbor::ephemeral();
    arbor.create_database("primary").unwrap();
    arbor.kernel("primary").unwrap().set_available(false);

    let err = arbor.session("primary").unwrap_err();
    assert!(err.is_unavailable());
}

#[test]
fn availability_lost_after_construction_fails_the_operation_not_the_session() {
    let (arbor, session) = single_database(10);
    arbor.kernel("primary").unwrap().set_available(false);

    let err = session
        .begin_transaction(
            TransactionKind::Explicit,
            login(),
            client(),
            None,
            AccessMode::Write,
            None,
        )
        .unwrap_err();

    // A later failure is its own error, not the construction-time one.
    assert!(!err.is_unavailable());
    assert_eq!(err.failure_kind(), Some(TransactionFailureKind::Open));

    // The session itself still answers pure reads.
    assert_eq!(session.database_name(), "primary");
}
