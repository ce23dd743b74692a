//! Per-session entry point into the transaction boundary.
//!
//! A [`SessionProvider`] is created once per database session. Construction
//! fails fast when the database is unavailable; on success the kernel
//! collaborators are cached for the session's lifetime and never re-resolved
//! per request. The provider performs no internal threading — it is driven
//! synchronously by whichever thread services the session.

use crate::executor::BatchQueryExecutor;
use crate::handle::TransactionHandle;
use crate::request::TransactionRequest;
use arbor_core::{
    AccessMode, ClientConnectionInfo, Error, LoginContext, Result, TransactionKind,
    TransactionMetadata,
};
use arbor_kernel::{
    Clock, DatabaseFacade, QueryEngine, TransactionBridge, TransactionIdStore,
    TransactionIdTracker, TransactionalContextFactory,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The kernel collaborators a session provider needs, resolved by the
/// caller and injected at construction.
pub struct KernelDependencies {
    /// Thread-binding bridge for bound-transaction retrieval.
    pub bridge: Arc<dyn TransactionBridge>,
    /// Query execution engine.
    pub query_engine: Arc<dyn QueryEngine>,
    /// The kernel's applied-transaction watermark store.
    pub transaction_id_store: Arc<dyn TransactionIdStore>,
    /// Factory for transactional execution contexts.
    pub context_factory: Arc<dyn TransactionalContextFactory>,
}

/// Per-database-session transaction lifecycle operations.
pub struct SessionProvider {
    database_name: String,
    facade: Arc<dyn DatabaseFacade>,
    bridge: Arc<dyn TransactionBridge>,
    engine: Arc<dyn QueryEngine>,
    context_factory: Arc<dyn TransactionalContextFactory>,
    tracker: TransactionIdTracker,
}

impl SessionProvider {
    /// Build a provider for `database_name`.
    ///
    /// Fails with [`Error::Unavailable`] if the database is not available
    /// right now (point-in-time check, not a standing guarantee; later
    /// operations surface their own failures). On success the collaborators
    /// are cached exactly once and the visibility tracker is assembled from
    /// the injected watermark store and clock.
    pub fn new(
        facade: Arc<dyn DatabaseFacade>,
        clock: Arc<dyn Clock>,
        database_name: impl Into<String>,
        deps: KernelDependencies,
    ) -> Result<Self> {
        let database_name = database_name.into();
        if !facade.is_available(Duration::ZERO) {
            return Err(Error::Unavailable(database_name));
        }

        let tracker = TransactionIdTracker::new(deps.transaction_id_store, clock);
        debug!(database = %database_name, "session provider constructed");
        Ok(Self {
            database_name,
            facade,
            bridge: deps.bridge,
            engine: deps.query_engine,
            context_factory: deps.context_factory,
            tracker,
        })
    }

    /// Block until the kernel has applied transactions up to
    /// `target_version`, failing once `timeout` elapses.
    ///
    /// The only blocking operation on this type; no provider state is locked
    /// while waiting.
    pub fn await_up_to_date(&self, target_version: u64, timeout: Duration) -> Result<()> {
        self.tracker.await_up_to_date(target_version, timeout)
    }

    /// Most recent transaction version this session has observed.
    pub fn newest_encountered_tx_id(&self) -> u64 {
        self.tracker.newest_encountered_tx_id()
    }

    /// Open a transaction and hand back its handle.
    ///
    /// The recipe built from these parameters is retained by the handle so
    /// batch execution can mint replacement transactions later.
    pub fn begin_transaction(
        &self,
        kind: TransactionKind,
        login: LoginContext,
        client: ClientConnectionInfo,
        timeout: Option<Duration>,
        access_mode: AccessMode,
        metadata: Option<TransactionMetadata>,
    ) -> Result<TransactionHandle> {
        let request = TransactionRequest::new(kind, login, client, timeout, access_mode, metadata);
        TransactionHandle::open(
            request,
            self.facade.clone(),
            self.bridge.clone(),
            self.engine.clone(),
            self.context_factory.clone(),
        )
    }

    /// Executor for an implicit periodic-commit statement.
    ///
    /// Uses the same recipe parameters with the kind forced to
    /// [`TransactionKind::Implicit`]. No transaction is opened eagerly; the
    /// first physical transaction opens on first use.
    pub fn periodic_commit_executor(
        &self,
        login: LoginContext,
        client: ClientConnectionInfo,
        timeout: Option<Duration>,
        access_mode: AccessMode,
        metadata: Option<TransactionMetadata>,
    ) -> BatchQueryExecutor {
        let request = TransactionRequest::new(
            TransactionKind::Implicit,
            login,
            client,
            timeout,
            access_mode,
            metadata,
        );
        BatchQueryExecutor::new(
            request,
            self.facade.clone(),
            self.bridge.clone(),
            self.engine.clone(),
            self.context_factory.clone(),
        )
    }

    /// Whether `query_text` requires periodic-commit semantics.
    ///
    /// Pure delegation to the query engine's classification.
    pub fn is_periodic_commit(&self, query_text: &str) -> bool {
        self.engine.is_periodic_commit(query_text)
    }

    /// Name of the database this session is bound to.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

impl fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionProvider")
            .field("database_name", &self.database_name)
            .finish_non_exhaustive()
    }
}
