//! Embedding entry point.
//!
//! `Arbor` wires the in-memory kernel to session providers: one kernel per
//! named database, shared query engine, system clock. It is the bootstrap
//! surface the boundary layer deliberately excludes from its core.

use crate::{Error, Result};
use arbor_kernel::{
    InMemoryBridge, InMemoryKernel, InMemoryQueryEngine, StandardContextFactory, SystemClock,
};
use arbor_session::{KernelDependencies, SessionProvider};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Default row interval between periodic-commit batch boundaries.
const DEFAULT_ROWS_PER_BATCH: u64 = 1000;

/// Multi-database embedding facade over the in-memory kernel.
///
/// Create with [`Arbor::ephemeral`], add databases, then open one
/// [`SessionProvider`] per session.
pub struct Arbor {
    databases: Mutex<HashMap<String, Arc<InMemoryKernel>>>,
    engine: Arc<InMemoryQueryEngine>,
}

impl Arbor {
    /// Ephemeral instance with the default batch interval.
    pub fn ephemeral() -> Self {
        Self::with_rows_per_batch(DEFAULT_ROWS_PER_BATCH)
    }

    /// Ephemeral instance signaling a periodic-commit boundary every
    /// `rows_per_batch` rows. Zero is clamped to one.
    pub fn with_rows_per_batch(rows_per_batch: u64) -> Self {
        Self {
            databases: Mutex::new(HashMap::new()),
            engine: InMemoryQueryEngine::new(rows_per_batch),
        }
    }

    /// Create a named database.
    ///
    /// Fails if the name is already taken.
    pub fn create_database(&self, name: &str) -> Result<()> {
        let mut databases = self.databases.lock();
        if databases.contains_key(name) {
            return Err(Error::Kernel(format!("database `{}` already exists", name)));
        }
        databases.insert(name.to_string(), InMemoryKernel::new(name));
        Ok(())
    }

    /// Drop a named database. Returns `true` if it existed.
    ///
    /// Sessions already constructed keep their kernel alive; new sessions
    /// fail with `Unavailable`.
    pub fn drop_database(&self, name: &str) -> bool {
        self.databases.lock().remove(name).is_some()
    }

    /// The kernel backing a database, for direct inspection or control
    /// (availability toggling, watermark advancement).
    pub fn kernel(&self, name: &str) -> Option<Arc<InMemoryKernel>> {
        self.databases.lock().get(name).cloned()
    }

    /// Open a session provider for a named database.
    ///
    /// Fails with [`Error::Unavailable`] when the database does not exist
    /// or reports unavailable right now.
    pub fn session(&self, name: &str) -> Result<SessionProvider> {
        let kernel = self
            .kernel(name)
            .ok_or_else(|| Error::Unavailable(name.to_string()))?;
        SessionProvider::new(
            kernel.clone(),
            Arc::new(SystemClock),
            name,
            KernelDependencies {
                bridge: Arc::new(InMemoryBridge),
                query_engine: self.engine.clone(),
                transaction_id_store: kernel.transaction_id_store(),
                context_factory: Arc::new(StandardContextFactory),
            },
        )
    }
}

impl Default for Arbor {
    fn default() -> Self {
        Self::ephemeral()
    }
}
