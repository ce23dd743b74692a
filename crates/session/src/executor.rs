//! Periodic-commit query execution.
//!
//! A [`BatchQueryExecutor`] holds a recipe, not a live transaction. The
//! first execution opens the first physical transaction; each batch
//! boundary the kernel signals commits the current one and opens the next,
//! so one logical statement spans many committed physical transactions.
//! The final physical transaction is left open for the caller to resolve
//! according to the statement's outcome.

use crate::handle::TransactionHandle;
use crate::request::TransactionRequest;
use arbor_core::{QueryParams, QueryResult, Result};
use arbor_kernel::{
    DatabaseFacade, QueryEngine, TransactionBridge, TransactionalContextFactory,
};
use std::sync::Arc;
use tracing::debug;

enum BatchState {
    /// Only the recipe exists; nothing has been opened.
    Unopened,
    /// A live handle over the current physical transaction.
    Active(TransactionHandle),
}

/// Executor for implicit, periodic-commit statements.
pub struct BatchQueryExecutor {
    state: BatchState,
    request: TransactionRequest,
    facade: Arc<dyn DatabaseFacade>,
    bridge: Arc<dyn TransactionBridge>,
    engine: Arc<dyn QueryEngine>,
    context_factory: Arc<dyn TransactionalContextFactory>,
}

impl BatchQueryExecutor {
    pub(crate) fn new(
        request: TransactionRequest,
        facade: Arc<dyn DatabaseFacade>,
        bridge: Arc<dyn TransactionBridge>,
        engine: Arc<dyn QueryEngine>,
        context_factory: Arc<dyn TransactionalContextFactory>,
    ) -> Self {
        Self {
            state: BatchState::Unopened,
            request,
            facade,
            bridge,
            engine,
            context_factory,
        }
    }

    /// Whether a physical transaction is currently open under this executor.
    pub fn has_open_transaction(&self) -> bool {
        match &self.state {
            BatchState::Unopened => false,
            BatchState::Active(handle) => handle.is_open(),
        }
    }

    /// Physical transactions committed so far at batch boundaries.
    pub fn physical_commits(&self) -> u64 {
        match &self.state {
            BatchState::Unopened => 0,
            BatchState::Active(handle) => handle.physical_commits(),
        }
    }

    /// Execute a periodic-commit statement.
    ///
    /// Opens the first physical transaction lazily on first use. The engine
    /// drives batch boundaries through the handle; each boundary commits
    /// the current physical transaction and opens the next from the recipe.
    pub fn execute(&mut self, query_text: &str, params: &QueryParams) -> Result<QueryResult> {
        if matches!(self.state, BatchState::Unopened) {
            let handle = TransactionHandle::open(
                self.request.clone(),
                self.facade.clone(),
                self.bridge.clone(),
                self.engine.clone(),
                self.context_factory.clone(),
            )?;
            debug!(tx_id = handle.transaction_id(), "batch executor opened first transaction");
            self.state = BatchState::Active(handle);
        }

        let engine = self.engine.clone();
        match &mut self.state {
            BatchState::Active(handle) => engine.execute_batched(handle, query_text, params),
            BatchState::Unopened => unreachable!("state set to Active above"),
        }
    }

    /// Commit the final physical transaction, if one is open.
    ///
    /// Returns the closed transaction id, or `None` when the executor was
    /// never used.
    pub fn commit(self) -> Result<Option<u64>> {
        match self.state {
            BatchState::Unopened => Ok(None),
            BatchState::Active(handle) => handle.commit().map(Some),
        }
    }

    /// Roll back the final physical transaction, if one is open.
    ///
    /// Batches already committed at boundaries stay committed; only the
    /// in-flight physical transaction is undone.
    pub fn rollback(self) -> Result<()> {
        match self.state {
            BatchState::Unopened => Ok(()),
            BatchState::Active(handle) => handle.rollback(),
        }
    }

    /// Surrender the live handle, if any, for the caller to resolve.
    pub fn into_handle(self) -> Option<TransactionHandle> {
        match self.state {
            BatchState::Unopened => None,
            BatchState::Active(handle) => Some(handle),
        }
    }
}
