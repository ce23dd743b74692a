//! Unified error types for the transaction-boundary layer.
//!
//! Three categories exist at this boundary:
//!
//! - [`Error::Unavailable`] — the database was not available when a session
//!   provider was constructed. Fatal to construction, never retried here.
//! - [`Error::TransactionFailure`] — a visibility wait exceeded its timeout,
//!   or opening/committing/rolling back a kernel transaction failed. Surfaced
//!   to the caller; retry policy belongs to the caller.
//! - [`Error::Kernel`] — unclassified kernel errors raised during query
//!   execution. Propagated unchanged; this layer adds no translation.

use thiserror::Error;

/// Classification of a transaction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFailureKind {
    /// A visibility wait ended before the watermark reached the target.
    VisibilityTimeout,
    /// The kernel enforced the per-transaction timeout.
    Timeout,
    /// Opening a new kernel transaction failed.
    Open,
    /// Committing the kernel transaction failed.
    Commit,
    /// Rolling back the kernel transaction failed.
    Rollback,
    /// The operation requires an open transaction but none is open.
    NotOpen,
}

impl std::fmt::Display for TransactionFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionFailureKind::VisibilityTimeout => "visibility timeout",
            TransactionFailureKind::Timeout => "transaction timeout",
            TransactionFailureKind::Open => "open failed",
            TransactionFailureKind::Commit => "commit failed",
            TransactionFailureKind::Rollback => "rollback failed",
            TransactionFailureKind::NotOpen => "transaction not open",
        };
        f.write_str(s)
    }
}

/// All errors surfaced by the transaction-boundary layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The database was unavailable at session-provider construction time.
    #[error("database `{0}` is unavailable")]
    Unavailable(String),

    /// A transaction-level failure (timeout, open/commit/rollback failure).
    #[error("transaction failure ({kind}): {message}")]
    TransactionFailure {
        /// What failed.
        kind: TransactionFailureKind,
        /// Kernel-supplied detail.
        message: String,
    },

    /// Unclassified kernel error, propagated unchanged.
    #[error("kernel error: {0}")]
    Kernel(String),
}

/// Result type for boundary-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a transaction failure of the given kind.
    pub fn transaction_failure(
        kind: TransactionFailureKind,
        message: impl Into<String>,
    ) -> Self {
        Error::TransactionFailure {
            kind,
            message: message.into(),
        }
    }

    /// A visibility wait that ran out of time.
    pub fn visibility_timeout(target: u64, waited_ms: u128) -> Self {
        Error::transaction_failure(
            TransactionFailureKind::VisibilityTimeout,
            format!(
                "database not up to transaction {} within {} ms",
                target, waited_ms
            ),
        )
    }

    /// Check if this is the construction-time unavailability error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }

    /// Check if this is a timeout of either kind (visibility or transaction).
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::TransactionFailure {
                kind: TransactionFailureKind::VisibilityTimeout
                    | TransactionFailureKind::Timeout,
                ..
            }
        )
    }

    /// The failure kind, if this is a transaction failure.
    pub fn failure_kind(&self) -> Option<TransactionFailureKind> {
        match self {
            Error::TransactionFailure { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
