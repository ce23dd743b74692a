//! # Arbor
//!
//! Transaction-boundary layer between wire-protocol sessions and a database
//! kernel.
//!
//! Arbor orchestrates transaction lifecycle for a protocol layer: opening
//! kernel transactions with per-request timeouts and caller metadata,
//! periodic-commit execution that transparently commits and re-opens
//! physical transactions, and watermark-based causal-visibility waits.
//!
//! ## Quick Start
//!
//! ```ignore
//! use arbordb::prelude::*;
//!
//! let arbor = Arbor::ephemeral();
//! arbor.create_database("orders")?;
//!
//! let session = arbor.session("orders")?;
//! let handle = session.begin_transaction(
//!     TransactionKind::Explicit,
//!     LoginContext::anonymous(),
//!     ClientConnectionInfo::embedded(),
//!     None,
//!     AccessMode::Write,
//!     None,
//! )?;
//! handle.commit()?;
//! ```
//!
//! The session layer itself lives in `arbor-session`; the kernel contracts
//! and the in-memory kernel live in `arbor-kernel`.

#![warn(missing_docs)]

mod database;

pub mod prelude;

// Re-export main entry points
pub use database::Arbor;

// Re-export the session surface
pub use arbor_session::{
    BatchQueryExecutor, KernelDependencies, SessionProvider, TransactionHandle,
    TransactionRequest,
};

// Re-export shared types and errors
pub use arbor_core::{
    AccessMode, ClientConnectionInfo, Error, LoginContext, QueryParams, QueryResult,
    QueryStatistics, Result, TransactionFailureKind, TransactionKind, TransactionMetadata,
};
