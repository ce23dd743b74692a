//! The transaction-open recipe.
//!
//! A [`TransactionRequest`] is a deferred computation over (kind, identity,
//! connection info, timeout, access mode, metadata) that opens exactly one
//! new kernel transaction each time it is invoked. A handle owns its own
//! recipe instance so batch execution can mint replacement transactions
//! with the same parameters.

use arbor_core::{
    AccessMode, ClientConnectionInfo, LoginContext, Result, TransactionKind, TransactionMetadata,
};
use arbor_kernel::{DatabaseFacade, KernelTransaction};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Reusable description of how to open one physical kernel transaction.
///
/// Immutable once constructed; invoking [`open`](Self::open) repeatedly
/// opens independent transactions with identical parameters.
#[derive(Clone)]
pub struct TransactionRequest {
    kind: TransactionKind,
    login: LoginContext,
    client: ClientConnectionInfo,
    timeout: Option<Duration>,
    access_mode: AccessMode,
    metadata: Option<TransactionMetadata>,
}

impl TransactionRequest {
    /// Build a request.
    ///
    /// `timeout = None` means the kernel's ambient default applies; the
    /// no-timeout kernel entry point is used in that case. A present
    /// timeout — including zero — is passed through explicitly.
    pub fn new(
        kind: TransactionKind,
        login: LoginContext,
        client: ClientConnectionInfo,
        timeout: Option<Duration>,
        access_mode: AccessMode,
        metadata: Option<TransactionMetadata>,
    ) -> Self {
        Self {
            kind,
            login,
            client,
            timeout,
            access_mode,
            metadata,
        }
    }

    /// Transaction kind this recipe opens.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Requested timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Requested access mode.
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Caller metadata, if any.
    pub fn metadata(&self) -> Option<&TransactionMetadata> {
        self.metadata.as_ref()
    }

    /// Open one new kernel transaction.
    ///
    /// The two timeout paths are deliberately separate calls: presence, not
    /// value, decides which kernel entry point is used. Metadata, when
    /// present, is attached strictly after the open succeeds and before any
    /// query runs; if the attach fails the transaction is rolled back so
    /// nothing stays bound to the calling thread, and the attach error
    /// propagates.
    pub fn open(&self, facade: &dyn DatabaseFacade) -> Result<Arc<dyn KernelTransaction>> {
        let transaction = match self.timeout {
            None => facade.begin_transaction(
                self.kind,
                &self.login,
                &self.client,
                self.access_mode,
            )?,
            Some(timeout) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                facade.begin_transaction_with_timeout(
                    self.kind,
                    &self.login,
                    &self.client,
                    self.access_mode,
                    timeout_ms,
                )?
            }
        };
        trace!(
            tx_id = transaction.transaction_id(),
            kind = ?self.kind,
            "recipe opened transaction"
        );

        if let Some(metadata) = &self.metadata {
            if let Err(attach_err) = transaction.set_metadata(metadata) {
                // Best-effort cleanup; the attach failure is the error the
                // caller needs to see.
                let _ = transaction.rollback();
                return Err(attach_err);
            }
        }

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(timeout: Option<Duration>) -> TransactionRequest {
        TransactionRequest::new(
            TransactionKind::Explicit,
            LoginContext::anonymous(),
            ClientConnectionInfo::embedded(),
            timeout,
            AccessMode::Write,
            None,
        )
    }

    #[test]
    fn request_is_immutable_and_cloneable() {
        let req = request(Some(Duration::from_secs(5)));
        let cloned = req.clone();
        assert_eq!(cloned.kind(), TransactionKind::Explicit);
        assert_eq!(cloned.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cloned.access_mode(), AccessMode::Write);
        assert!(cloned.metadata().is_none());
    }

    #[test]
    fn absent_timeout_is_not_zero() {
        // None and Some(ZERO) are distinct recipes; the open path differs.
        let ambient = request(None);
        let explicit_zero = request(Some(Duration::ZERO));
        assert_eq!(ambient.timeout(), None);
        assert_eq!(explicit_zero.timeout(), Some(Duration::ZERO));
    }
}
