//! Kernel collaborator contracts.
//!
//! These traits are the boundary the session layer is written against. The
//! kernel binds each opened transaction to the calling thread; the open call
//! and the bound-transaction retrieval must therefore happen on the same
//! thread with no suspension point in between.
//!
//! ## Timeout disambiguation
//!
//! The facade deliberately exposes two open entry points instead of one
//! taking an optional timeout. An absent timeout means "use the kernel's
//! ambient default"; a present timeout is passed through in the kernel's
//! time unit (milliseconds). Zero is a valid explicit value and is never
//! used as an "absent" sentinel.

use arbor_core::{
    AccessMode, ClientConnectionInfo, LoginContext, QueryParams, QueryResult, Result,
    TransactionKind, TransactionMetadata,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One live kernel transaction.
///
/// The kernel binds the transaction to the thread that opened it; commit and
/// rollback close it and release the binding.
pub trait KernelTransaction: Send + Sync + fmt::Debug {
    /// Kernel-assigned transaction id.
    fn transaction_id(&self) -> u64;

    /// Whether the transaction is still open.
    fn is_open(&self) -> bool;

    /// Attach caller-supplied metadata.
    ///
    /// Must be called after open and before any query execution.
    fn set_metadata(&self, metadata: &TransactionMetadata) -> Result<()>;

    /// Commit and close. Returns the closed transaction id.
    fn commit(&self) -> Result<u64>;

    /// Roll back and close.
    fn rollback(&self) -> Result<()>;
}

/// Kernel transaction factory plus point-in-time availability check.
pub trait DatabaseFacade: Send + Sync {
    /// Whether the database is available, waiting at most `timeout` for it
    /// to become so. `Duration::ZERO` is a pure point-in-time check.
    fn is_available(&self, timeout: Duration) -> bool;

    /// Open a transaction using the kernel's ambient default timeout.
    ///
    /// The new transaction is bound to the calling thread.
    fn begin_transaction(
        &self,
        kind: TransactionKind,
        login: &LoginContext,
        client: &ClientConnectionInfo,
        access_mode: AccessMode,
    ) -> Result<Arc<dyn KernelTransaction>>;

    /// Open a transaction with an explicit timeout in milliseconds.
    ///
    /// The new transaction is bound to the calling thread.
    fn begin_transaction_with_timeout(
        &self,
        kind: TransactionKind,
        login: &LoginContext,
        client: &ClientConnectionInfo,
        access_mode: AccessMode,
        timeout_ms: u64,
    ) -> Result<Arc<dyn KernelTransaction>>;
}

/// Retrieval of the kernel transaction bound to the calling thread.
pub trait TransactionBridge: Send + Sync {
    /// The transaction bound to the calling thread.
    ///
    /// Fails with a kernel error if no transaction is bound.
    fn bound_transaction(&self) -> Result<Arc<dyn KernelTransaction>>;

    /// Whether any transaction is bound to the calling thread.
    fn has_bound_transaction(&self) -> bool;
}

/// Execution context handed to the query engine: one live transaction plus
/// the query text it will run.
pub struct TransactionalContext {
    transaction: Arc<dyn KernelTransaction>,
    query_text: String,
}

impl TransactionalContext {
    /// Build a context over a live transaction.
    pub fn new(transaction: Arc<dyn KernelTransaction>, query_text: impl Into<String>) -> Self {
        Self {
            transaction,
            query_text: query_text.into(),
        }
    }

    /// The transaction this context executes in.
    pub fn transaction(&self) -> &Arc<dyn KernelTransaction> {
        &self.transaction
    }

    /// The query text.
    pub fn query_text(&self) -> &str {
        &self.query_text
    }
}

/// Factory packaging a live transaction and query text into a
/// [`TransactionalContext`].
pub trait TransactionalContextFactory: Send + Sync {
    /// Build an execution context.
    fn new_context(
        &self,
        transaction: Arc<dyn KernelTransaction>,
        query_text: &str,
    ) -> TransactionalContext;
}

/// The plain context factory; no decoration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardContextFactory;

impl TransactionalContextFactory for StandardContextFactory {
    fn new_context(
        &self,
        transaction: Arc<dyn KernelTransaction>,
        query_text: &str,
    ) -> TransactionalContext {
        TransactionalContext::new(transaction, query_text)
    }
}

/// Control surface the query engine drives during periodic-commit execution.
///
/// The engine signals each batch boundary; the implementor commits the
/// current physical transaction and opens the next one. `current_context`
/// always reflects the live transaction, so it must be re-fetched after a
/// boundary.
pub trait BatchBoundaryControl {
    /// Execution context over the currently open physical transaction.
    fn current_context(&self, query_text: &str) -> Result<TransactionalContext>;

    /// A batch boundary was reached: commit the current physical transaction
    /// and open the next.
    fn on_batch_boundary(&mut self) -> Result<()>;
}

/// Query execution engine.
pub trait QueryEngine: Send + Sync {
    /// Whether `query_text` requires implicit periodic-commit semantics.
    ///
    /// Pure classification of the text; no side effects.
    fn is_periodic_commit(&self, query_text: &str) -> bool;

    /// Execute a query inside an existing transaction.
    fn execute(&self, context: &TransactionalContext, params: &QueryParams)
        -> Result<QueryResult>;

    /// Execute a periodic-commit query, signaling batch boundaries through
    /// `control`.
    fn execute_batched(
        &self,
        control: &mut dyn BatchBoundaryControl,
        query_text: &str,
        params: &QueryParams,
    ) -> Result<QueryResult>;
}
