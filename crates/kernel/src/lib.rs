//! Kernel contracts consumed by the arbor session layer.
//!
//! This crate defines the seams between the transaction-boundary layer and
//! the database kernel:
//! - [`DatabaseFacade`]: availability check + transaction-open entry points
//! - [`KernelTransaction`]: one live kernel transaction
//! - [`TransactionBridge`]: thread-bound transaction retrieval
//! - [`QueryEngine`]: query execution and periodic-commit classification
//! - [`TransactionIdTracker`]: watermark-based visibility waits
//!
//! It also ships an in-memory kernel ([`mem`]) implementing the contracts,
//! so the boundary layer can run end to end without an external server.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod facade;
pub mod mem;
pub mod tracker;

pub use clock::{Clock, SystemClock};
pub use facade::{
    BatchBoundaryControl, DatabaseFacade, KernelTransaction, QueryEngine,
    StandardContextFactory, TransactionBridge, TransactionalContext,
    TransactionalContextFactory,
};
pub use mem::{InMemoryBridge, InMemoryKernel, InMemoryQueryEngine, MemTransaction};
pub use tracker::{InMemoryTransactionIdStore, TransactionIdStore, TransactionIdTracker};
