//! Convenient imports for Arbor.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use arbordb::prelude::*;
//!
//! let arbor = Arbor::ephemeral();
//! arbor.create_database("orders")?;
//! let session = arbor.session("orders")?;
//! ```

// Main entry point
pub use crate::database::Arbor;

// Error handling
pub use crate::{Error, Result, TransactionFailureKind};

// Session surface
pub use crate::{BatchQueryExecutor, SessionProvider, TransactionHandle};

// Request types
pub use crate::{
    AccessMode, ClientConnectionInfo, LoginContext, QueryParams, QueryResult, TransactionKind,
    TransactionMetadata,
};

// Re-export serde_json for convenience
pub use serde_json::json;
