//! `tarena sync` — run the reconciliation pipeline for one arena.

use anyhow::Result;
use clap::Args;

use crate::terminal::TerminalGateway;

use super::{load_registry, open_arena};

/// Arguments for `tarena sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Name of the arena to reconcile.
    pub arena: String,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let registry = load_registry()?;
        let mut arena = open_arena(&registry, &self.arena)?;

        // Cancellation is a clean outcome: the plan is discarded, nothing
        // is written, and the exit status stays zero.
        let mut gateway = TerminalGateway::new();
        arena.sync(&mut gateway)?;
        Ok(())
    }
}
