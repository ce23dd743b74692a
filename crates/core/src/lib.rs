//! Core types for the arbor transaction-boundary layer.
//!
//! This crate holds the value types shared by the kernel contracts and the
//! session layer: the unified error type, transaction request parameters
//! (kind, login context, connection info, metadata), and the query
//! result/parameter types handed across the boundary.
//!
//! Nothing in this crate performs I/O or holds locks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result, TransactionFailureKind};
pub use types::{
    AccessMode, ClientConnectionInfo, LoginContext, QueryParams, QueryResult, QueryStatistics,
    TransactionKind, TransactionMetadata,
};
