//! The transaction handle handed to the protocol layer.
//!
//! A handle owns exactly one live kernel transaction at a time, plus the
//! recipe that produced it. The protocol layer drives it to run queries and
//! resolve the transaction; batch execution additionally drives the
//! crate-internal reopen operation to commit one physical transaction and
//! start the next under the same handle.
//!
//! Handle operations are not reentrant: the handle is the serialization
//! point for its logical transaction, and the expected discipline is one
//! servicing thread per session.

use crate::request::TransactionRequest;
use arbor_core::{QueryParams, QueryResult, Result};
use arbor_kernel::{
    BatchBoundaryControl, DatabaseFacade, KernelTransaction, QueryEngine, TransactionBridge,
    TransactionalContext, TransactionalContextFactory,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One logical transaction: a live kernel transaction plus the recipe that
/// can mint its replacement.
pub struct TransactionHandle {
    transaction: Arc<dyn KernelTransaction>,
    request: TransactionRequest,
    facade: Arc<dyn DatabaseFacade>,
    bridge: Arc<dyn TransactionBridge>,
    engine: Arc<dyn QueryEngine>,
    context_factory: Arc<dyn TransactionalContextFactory>,
    physical_commits: u64,
}

impl TransactionHandle {
    /// Invoke the recipe once and wrap the transaction now bound to the
    /// calling thread.
    ///
    /// Open and bound-retrieval happen back to back on this thread; there is
    /// no suspension point in between.
    pub(crate) fn open(
        request: TransactionRequest,
        facade: Arc<dyn DatabaseFacade>,
        bridge: Arc<dyn TransactionBridge>,
        engine: Arc<dyn QueryEngine>,
        context_factory: Arc<dyn TransactionalContextFactory>,
    ) -> Result<Self> {
        let opened = request.open(facade.as_ref())?;
        let transaction = bridge.bound_transaction()?;
        debug_assert_eq!(opened.transaction_id(), transaction.transaction_id());

        Ok(Self {
            transaction,
            request,
            facade,
            bridge,
            engine,
            context_factory,
            physical_commits: 0,
        })
    }

    /// Id of the currently bound kernel transaction.
    pub fn transaction_id(&self) -> u64 {
        self.transaction.transaction_id()
    }

    /// Whether the current kernel transaction is still open.
    pub fn is_open(&self) -> bool {
        self.transaction.is_open()
    }

    /// Physical transactions committed under this handle by batch reopens.
    pub fn physical_commits(&self) -> u64 {
        self.physical_commits
    }

    /// Run a query inside the current transaction.
    pub fn run_query(&self, query_text: &str, params: &QueryParams) -> Result<QueryResult> {
        let context = self
            .context_factory
            .new_context(self.transaction.clone(), query_text);
        self.engine.execute(&context, params)
    }

    /// Commit the transaction. Returns the closed transaction id.
    pub fn commit(self) -> Result<u64> {
        self.transaction.commit()
    }

    /// Roll the transaction back.
    pub fn rollback(self) -> Result<()> {
        self.transaction.rollback()
    }

    /// Commit the current physical transaction and open its replacement
    /// from the recipe, rebinding to the calling thread.
    ///
    /// Invoked only between physical commits of a periodic-commit
    /// statement; the caller observes one uninterrupted logical operation.
    pub(crate) fn reopen(&mut self) -> Result<()> {
        let closed = self.transaction.commit()?;
        self.physical_commits += 1;

        let opened = self.request.open(self.facade.as_ref())?;
        let transaction = self.bridge.bound_transaction()?;
        debug_assert_eq!(opened.transaction_id(), transaction.transaction_id());
        debug!(
            closed_tx = closed,
            next_tx = transaction.transaction_id(),
            "batch boundary: transaction reopened"
        );
        self.transaction = transaction;
        Ok(())
    }
}

impl fmt::Debug for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionHandle")
            .field("transaction_id", &self.transaction.transaction_id())
            .field("open", &self.transaction.is_open())
            .field("physical_commits", &self.physical_commits)
            .finish_non_exhaustive()
    }
}

impl BatchBoundaryControl for TransactionHandle {
    fn current_context(&self, query_text: &str) -> Result<TransactionalContext> {
        Ok(self
            .context_factory
            .new_context(self.transaction.clone(), query_text))
    }

    fn on_batch_boundary(&mut self) -> Result<()> {
        self.reopen()
    }
}
