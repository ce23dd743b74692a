//! Value types carried across the transaction boundary.
//!
//! This module defines the request-side types a wire-protocol session hands
//! to the boundary layer when opening a transaction:
//! - [`TransactionKind`]: explicit vs implicit (batch) transactions
//! - [`LoginContext`]: authenticated caller identity
//! - [`ClientConnectionInfo`]: connection descriptor for audit/metadata
//! - [`TransactionMetadata`]: caller-supplied key/value annotations
//!
//! and the result-side types handed back: [`QueryResult`] and
//! [`QueryStatistics`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of kernel transaction to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Client-managed transaction spanning multiple requests.
    Explicit,
    /// Kernel-managed transaction; used for auto-commit and periodic-commit
    /// execution, where many physical commits serve one logical statement.
    Implicit,
}

/// Requested access mode for a transaction.
///
/// Carried through to the kernel unchanged; this layer attaches no semantics
/// to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    /// Read-only access.
    Read,
    /// Read-write access.
    Write,
}

/// Authenticated caller identity, as produced by the authentication layer.
///
/// Construction of login contexts (credential checks, auth schemes) is owned
/// by the protocol layer; this type only carries the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginContext {
    /// Principal name the caller authenticated as.
    pub principal: String,
    /// Authentication scheme that produced this context (e.g. "basic").
    pub scheme: String,
}

impl LoginContext {
    /// Login context for the given principal.
    pub fn new(principal: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            scheme: scheme.into(),
        }
    }

    /// The anonymous login context.
    pub fn anonymous() -> Self {
        Self::new("", "none")
    }
}

/// Descriptor of the client connection a transaction originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConnectionInfo {
    /// Unique connection identifier.
    pub connection_id: Uuid,
    /// Remote client address, as reported by the protocol layer.
    pub client_address: String,
    /// Client user agent, when the protocol announces one.
    pub user_agent: Option<String>,
}

impl ClientConnectionInfo {
    /// Connection info for the given client address.
    pub fn new(client_address: impl Into<String>) -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            client_address: client_address.into(),
            user_agent: None,
        }
    }

    /// Attach a user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Connection info for an embedded (in-process) caller.
    pub fn embedded() -> Self {
        Self::new("embedded")
    }
}

/// Caller-supplied transaction metadata: unique string keys, arbitrary
/// JSON values, order irrelevant.
pub type TransactionMetadata = HashMap<String, serde_json::Value>;

/// Query parameters: string keys mapped to JSON values.
pub type QueryParams = HashMap<String, serde_json::Value>;

/// Counters describing what a query execution did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStatistics {
    /// Rows produced by the query.
    pub rows_returned: u64,
    /// Rows written (inserted/updated/deleted) by the query.
    pub rows_affected: u64,
}

/// Result of a query execution, handed back to the protocol layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, in projection order.
    pub columns: Vec<String>,
    /// Result rows; each row has one value per column.
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Execution counters.
    pub statistics: QueryStatistics,
}

impl QueryResult {
    /// An empty result with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result carrying only statistics (no rows), for write-only queries.
    pub fn with_statistics(statistics: QueryStatistics) -> Self {
        Self {
            statistics,
            ..Self::default()
        }
    }
}
