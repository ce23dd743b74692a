//! Periodic-commit statements spanning several physical transactions.

use crate::common::*;

const QUERY: &str = "USING PERIODIC COMMIT 10 LOAD CSV ...";

#[test]
fn classification_goes_through_the_engine() {
    let (_arbor, session) = single_database(10);
    assert!(session.is_periodic_commit(QUERY));
    assert!(session.is_periodic_commit("  using periodic commit load ..."));
    assert!(!session.is_periodic_commit("MATCH (n) RETURN n"));
}

#[test]
fn executor_opens_nothing_until_first_use() {
    let (_arbor, session) = single_database(10);
    let executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);

    assert!(!executor.has_open_transaction());
    assert_eq!(executor.physical_commits(), 0);
    assert_eq!(executor.commit().unwrap(), None);
}

#[test]
fn four_batches_mean_three_boundary_commits_and_one_open() {
    let (_arbor, session) = single_database(10);
    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);

    // 35 rows at 10 per batch: boundaries after batches one through three,
    // the fourth left open.
    let result = executor.execute(QUERY, &rows(35)).unwrap();
    assert_eq!(result.statistics.rows_affected, 35);
    assert_eq!(executor.physical_commits(), 3);
    assert!(executor.has_open_transaction());

    let final_id = executor.commit().unwrap();
    assert!(final_id.is_some());
}

#[test]
fn exact_multiple_leaves_the_last_batch_uncommitted() {
    let (_arbor, session) = single_database(10);
    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);

    executor.execute(QUERY, &rows(30)).unwrap();
    // No boundary after the final batch even on an exact multiple.
    assert_eq!(executor.physical_commits(), 2);
    assert!(executor.has_open_transaction());
    executor.commit().unwrap();
}

#[test]
fn empty_workload_opens_one_transaction_and_commits_none() {
    let (_arbor, session) = single_database(10);
    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);

    executor.execute(QUERY, &rows(0)).unwrap();
    assert_eq!(executor.physical_commits(), 0);
    assert!(executor.has_open_transaction());
    executor.commit().unwrap();
}

#[test]
fn zero_batch_interval_behaves_like_one() {
    let (_arbor, session) = single_database(0);
    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);

    // Clamped to one row per batch: the statement terminates and commits a
    // boundary after every row but the last.
    let result = executor.execute(QUERY, &rows(3)).unwrap();
    assert_eq!(result.statistics.rows_affected, 3);
    assert_eq!(executor.physical_commits(), 2);
    executor.commit().unwrap();
}

#[test]
fn executor_transactions_are_implicit() {
    let (arbor, session) = single_database(10);
    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);
    executor.execute(QUERY, &rows(5)).unwrap();

    let opened = arbor.kernel("primary").unwrap().last_transaction().unwrap();
    assert_eq!(opened.kind(), TransactionKind::Implicit);
    executor.commit().unwrap();
}

#[test]
fn rollback_undoes_only_the_in_flight_batch() {
    let (_arbor, session) = single_database(10);
    let watermark_before = session.newest_encountered_tx_id();

    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);
    executor.execute(QUERY, &rows(25)).unwrap();
    assert_eq!(executor.physical_commits(), 2);
    executor.rollback().unwrap();

    // Two boundary commits are durable; only the third batch was undone.
    assert!(session.newest_encountered_tx_id() > watermark_before);
}

#[test]
fn boundary_commits_advance_the_visibility_watermark() {
    let (_arbor, session) = single_database(10);
    let mut executor =
        session.periodic_commit_executor(login(), client(), None, AccessMode::Write, None);

    executor.execute(QUERY, &rows(35)).unwrap();
    let final_id = executor.commit().unwrap().unwrap();

    assert_eq!(session.newest_encountered_tx_id(), final_id);
}
