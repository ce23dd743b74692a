//! Shared helpers for the session-boundary suite.

pub use arbordb::prelude::*;

/// One ephemeral database plus a session over it.
pub fn single_database(rows_per_batch: u64) -> (Arbor, SessionProvider) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let arbor = Arbor::with_rows_per_batch(rows_per_batch);
    arbor.create_database("primary").expect("fresh database");
    let session = arbor.session("primary").expect("available database");
    (arbor, session)
}

pub fn login() -> LoginContext {
    LoginContext::new("tester", "basic")
}

pub fn client() -> ClientConnectionInfo {
    ClientConnectionInfo::new("127.0.0.1:7687").with_user_agent("suite/1.0")
}

/// Params carrying a row workload for the in-memory engine.
pub fn rows(n: u64) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("rows".into(), json!(n));
    params
}
