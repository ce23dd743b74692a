//! In-memory kernel.
//!
//! A self-contained implementation of the kernel contracts, used for
//! embedding and tests: atomic transaction-id allocation, a thread-local
//! binding slot, a watermark store advanced on commit, kernel-enforced
//! transaction timeouts, and a query engine that signals periodic-commit
//! boundaries at a configurable row interval.
//!
//! One kernel transaction is bound per thread, process-wide; that slot is
//! the thread-local binding contract the session layer is written against.

use crate::facade::{
    BatchBoundaryControl, DatabaseFacade, KernelTransaction, QueryEngine, TransactionBridge,
    TransactionalContext,
};
use crate::tracker::InMemoryTransactionIdStore;
use arbor_core::{
    AccessMode, ClientConnectionInfo, Error, LoginContext, QueryParams, QueryResult,
    QueryStatistics, Result, TransactionFailureKind, TransactionKind, TransactionMetadata,
};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

thread_local! {
    static BOUND_TRANSACTION: RefCell<Option<Arc<MemTransaction>>> = const { RefCell::new(None) };
}

fn bind_to_thread(tx: &Arc<MemTransaction>) -> Result<()> {
    BOUND_TRANSACTION.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(Error::Kernel(
                "a transaction is already bound to this thread".into(),
            ));
        }
        *slot = Some(tx.clone());
        Ok(())
    })
}

fn unbind_if_current(transaction_id: u64) {
    BOUND_TRANSACTION.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot
            .as_ref()
            .is_some_and(|tx| tx.transaction_id() == transaction_id)
        {
            *slot = None;
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Open,
    Committed,
    RolledBack,
}

/// One in-memory kernel transaction.
pub struct MemTransaction {
    id: u64,
    kind: TransactionKind,
    access_mode: AccessMode,
    login: LoginContext,
    client: ClientConnectionInfo,
    timeout: Option<Duration>,
    opened_at: Instant,
    state: Mutex<TxState>,
    metadata: Mutex<Option<TransactionMetadata>>,
    id_store: Arc<InMemoryTransactionIdStore>,
}

impl MemTransaction {
    /// Kind this transaction was opened with.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Access mode this transaction was opened with.
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Login context the transaction was opened under.
    pub fn login(&self) -> &LoginContext {
        &self.login
    }

    /// Connection the transaction was opened from.
    pub fn client(&self) -> &ClientConnectionInfo {
        &self.client
    }

    /// Explicit timeout, if one was requested. `None` means the kernel's
    /// ambient default applies.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Metadata attached to this transaction, if any.
    pub fn metadata(&self) -> Option<TransactionMetadata> {
        self.metadata.lock().clone()
    }

    fn close(&self, next: TxState) -> Result<()> {
        let mut state = self.state.lock();
        if *state != TxState::Open {
            return Err(Error::transaction_failure(
                TransactionFailureKind::NotOpen,
                format!("transaction {} is already closed", self.id),
            ));
        }
        *state = next;
        Ok(())
    }
}

impl fmt::Debug for MemTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemTransaction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("access_mode", &self.access_mode)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl KernelTransaction for MemTransaction {
    fn transaction_id(&self) -> u64 {
        self.id
    }

    fn is_open(&self) -> bool {
        *self.state.lock() == TxState::Open
    }

    fn set_metadata(&self, metadata: &TransactionMetadata) -> Result<()> {
        if !self.is_open() {
            return Err(Error::transaction_failure(
                TransactionFailureKind::NotOpen,
                format!("transaction {} is already closed", self.id),
            ));
        }
        trace!(tx_id = self.id, keys = metadata.len(), "metadata attached");
        *self.metadata.lock() = Some(metadata.clone());
        Ok(())
    }

    fn commit(&self) -> Result<u64> {
        // Kernel-enforced timeout: an expired transaction cannot commit.
        if let Some(limit) = self.timeout {
            if self.opened_at.elapsed() > limit {
                self.close(TxState::RolledBack)?;
                unbind_if_current(self.id);
                return Err(Error::transaction_failure(
                    TransactionFailureKind::Timeout,
                    format!(
                        "transaction {} exceeded its {} ms timeout",
                        self.id,
                        limit.as_millis()
                    ),
                ));
            }
        }

        self.close(TxState::Committed)?;
        self.id_store.transaction_closed(self.id);
        unbind_if_current(self.id);
        debug!(tx_id = self.id, "transaction committed");
        Ok(self.id)
    }

    fn rollback(&self) -> Result<()> {
        self.close(TxState::RolledBack)?;
        unbind_if_current(self.id);
        debug!(tx_id = self.id, "transaction rolled back");
        Ok(())
    }
}

/// In-memory kernel: transaction factory, availability flag, watermark store.
pub struct InMemoryKernel {
    database_name: String,
    available: AtomicBool,
    next_tx_id: AtomicU64,
    id_store: Arc<InMemoryTransactionIdStore>,
    last_transaction: Mutex<Option<Arc<MemTransaction>>>,
}

impl InMemoryKernel {
    /// Kernel for the named database, available, watermark at zero.
    pub fn new(database_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            database_name: database_name.into(),
            available: AtomicBool::new(true),
            next_tx_id: AtomicU64::new(1),
            id_store: Arc::new(InMemoryTransactionIdStore::new(0)),
            last_transaction: Mutex::new(None),
        })
    }

    /// Name of the database this kernel backs.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// The kernel's applied-transaction watermark store.
    pub fn transaction_id_store(&self) -> Arc<InMemoryTransactionIdStore> {
        self.id_store.clone()
    }

    /// Flip the availability flag. Affects both the construction-time check
    /// and subsequent transaction opens.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// The most recently opened transaction, for inspection.
    pub fn last_transaction(&self) -> Option<Arc<MemTransaction>> {
        self.last_transaction.lock().clone()
    }

    fn open(
        &self,
        kind: TransactionKind,
        login: &LoginContext,
        client: &ClientConnectionInfo,
        access_mode: AccessMode,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn KernelTransaction>> {
        if !self.available.load(Ordering::SeqCst) {
            // Availability lost after construction: a kernel failure of its
            // own, distinct from the construction-time Unavailable error.
            return Err(Error::transaction_failure(
                TransactionFailureKind::Open,
                format!(
                    "database `{}` is not accepting transactions",
                    self.database_name
                ),
            ));
        }

        let id = self.next_tx_id.fetch_add(1, Ordering::SeqCst);
        let tx = Arc::new(MemTransaction {
            id,
            kind,
            access_mode,
            login: login.clone(),
            client: client.clone(),
            timeout,
            opened_at: Instant::now(),
            state: Mutex::new(TxState::Open),
            metadata: Mutex::new(None),
            id_store: self.id_store.clone(),
        });
        bind_to_thread(&tx)?;
        *self.last_transaction.lock() = Some(tx.clone());
        debug!(tx_id = id, ?kind, "transaction opened");
        Ok(tx)
    }
}

impl DatabaseFacade for InMemoryKernel {
    fn is_available(&self, _timeout: Duration) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn begin_transaction(
        &self,
        kind: TransactionKind,
        login: &LoginContext,
        client: &ClientConnectionInfo,
        access_mode: AccessMode,
    ) -> Result<Arc<dyn KernelTransaction>> {
        self.open(kind, login, client, access_mode, None)
    }

    fn begin_transaction_with_timeout(
        &self,
        kind: TransactionKind,
        login: &LoginContext,
        client: &ClientConnectionInfo,
        access_mode: AccessMode,
        timeout_ms: u64,
    ) -> Result<Arc<dyn KernelTransaction>> {
        self.open(
            kind,
            login,
            client,
            access_mode,
            Some(Duration::from_millis(timeout_ms)),
        )
    }
}

/// Bridge to the process-wide thread-local binding slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryBridge;

impl TransactionBridge for InMemoryBridge {
    fn bound_transaction(&self) -> Result<Arc<dyn KernelTransaction>> {
        BOUND_TRANSACTION.with(|slot| {
            slot.borrow()
                .clone()
                .map(|tx| tx as Arc<dyn KernelTransaction>)
                .ok_or_else(|| Error::Kernel("no transaction bound to this thread".into()))
        })
    }

    fn has_bound_transaction(&self) -> bool {
        BOUND_TRANSACTION.with(|slot| slot.borrow().is_some())
    }
}

/// Query engine over the in-memory kernel.
///
/// Queries carry their workload in the `rows` parameter; a periodic-commit
/// query signals a batch boundary after every `rows_per_batch` rows that
/// still have rows following them.
pub struct InMemoryQueryEngine {
    rows_per_batch: u64,
}

impl InMemoryQueryEngine {
    /// Engine signaling a boundary every `rows_per_batch` rows.
    ///
    /// A zero interval would never make progress; it is clamped to one.
    pub fn new(rows_per_batch: u64) -> Arc<Self> {
        Arc::new(Self {
            rows_per_batch: rows_per_batch.max(1),
        })
    }

    fn workload(params: &QueryParams) -> u64 {
        params.get("rows").and_then(|v| v.as_u64()).unwrap_or(0)
    }
}

impl QueryEngine for InMemoryQueryEngine {
    fn is_periodic_commit(&self, query_text: &str) -> bool {
        query_text
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("using periodic commit")
    }

    fn execute(
        &self,
        context: &TransactionalContext,
        params: &QueryParams,
    ) -> Result<QueryResult> {
        if !context.transaction().is_open() {
            return Err(Error::transaction_failure(
                TransactionFailureKind::NotOpen,
                "query executed against a closed transaction",
            ));
        }
        let rows = Self::workload(params);
        Ok(QueryResult::with_statistics(QueryStatistics {
            rows_returned: 0,
            rows_affected: rows,
        }))
    }

    fn execute_batched(
        &self,
        control: &mut dyn BatchBoundaryControl,
        query_text: &str,
        params: &QueryParams,
    ) -> Result<QueryResult> {
        let total = Self::workload(params);
        let mut processed = 0u64;

        while processed < total {
            let chunk = self.rows_per_batch.min(total - processed);
            let context = control.current_context(query_text)?;
            if !context.transaction().is_open() {
                return Err(Error::transaction_failure(
                    TransactionFailureKind::NotOpen,
                    "batched query executed against a closed transaction",
                ));
            }
            processed += chunk;
            // Boundary only when more rows follow; the final batch is left
            // to the caller's explicit commit or rollback.
            if processed < total {
                control.on_batch_boundary()?;
            }
        }

        Ok(QueryResult::with_statistics(QueryStatistics {
            rows_returned: 0,
            rows_affected: total,
        }))
    }
}
