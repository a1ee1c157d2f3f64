//! Error types for taskarena-sync.

use thiserror::Error;

use taskarena_core::{RegistryError, StoreError};

use crate::engine::EngineState;

/// All errors that can arise from reconciliation.
///
/// Per-record save failures are NOT errors — they surface as
/// [`taskarena_core::SaveOutcome`] values in the apply reports so one
/// failed entry never aborts the rest of the pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from a record store adapter (query/insert/open).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An error from the arena registry.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A pipeline phase was invoked out of order.
    #[error("sync pipeline is in state {actual:?}, expected {expected:?}")]
    Phase {
        expected: EngineState,
        actual: EngineState,
    },
}
