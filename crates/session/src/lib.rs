//! Transaction-boundary layer between a wire-protocol session and the
//! database kernel.
//!
//! This crate owns transaction lifecycle orchestration and nothing else: it
//! opens kernel transactions on behalf of the protocol layer, binds them to
//! the calling thread, honors per-request timeouts, attaches caller
//! metadata, and blocks callers on causal-visibility waits. Query planning,
//! storage, and the wire protocol itself live behind the contracts defined
//! in `arbor-kernel`.
//!
//! ## Surface
//!
//! - [`SessionProvider`]: one per database session; validated available at
//!   construction, exposes the lifecycle operations.
//! - [`TransactionHandle`]: wraps one live kernel transaction plus the
//!   recipe that produced it; commit/rollback/run-query.
//! - [`TransactionRequest`]: the recipe — a reusable description of how to
//!   open one physical transaction.
//! - [`BatchQueryExecutor`]: periodic-commit execution; transparently
//!   commits and re-opens physical transactions at kernel-signaled batch
//!   boundaries.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod executor;
pub mod handle;
pub mod provider;
pub mod request;

pub use executor::BatchQueryExecutor;
pub use handle::TransactionHandle;
pub use provider::{KernelDependencies, SessionProvider};
pub use request::TransactionRequest;
