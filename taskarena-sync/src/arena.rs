//! Runtime arena: a named sync scope binding two record stores to one
//! reconciliation engine.

use taskarena_core::{ArenaName, ArenaSpec, FileStore, Filter, RecordStore, SharedRecord};

use crate::engine::{ReconciliationEngine, SyncOutcome};
use crate::error::SyncError;
use crate::gateway::InteractionGateway;

/// A named sync scope owning a local and a remote store adapter.
#[derive(Debug)]
pub struct Arena {
    pub name: ArenaName,
    local: FileStore,
    remote: FileStore,
}

impl Arena {
    /// Open both stores named by a durable registry record. Opening runs
    /// each store's idempotent schema migration.
    pub fn open(spec: &ArenaSpec) -> Result<Self, SyncError> {
        Ok(Arena {
            name: spec.name.clone(),
            local: FileStore::open(&spec.local_data)?,
            remote: FileStore::open(&spec.remote_data)?,
        })
    }

    /// Tag every local record matching `filter` as a member of this arena
    /// and persist it. Records already tagged keep their identity token.
    /// Returns the tagged set.
    pub fn add(&mut self, filter: &Filter) -> Result<Vec<SharedRecord>, SyncError> {
        let mut tasks = self.local.query(filter)?;
        for task in &mut tasks {
            task.join(&self.name);
            let outcome = task.save(&mut self.local);
            if let taskarena_core::SaveOutcome::Failed { cause } = &outcome {
                tracing::warn!("could not tag '{}': {cause}", task.record.description());
            }
        }
        Ok(tasks)
    }

    /// Untag every local member of this arena matching `filter`. The
    /// underlying records are never deleted.
    pub fn remove(&mut self, filter: &Filter) -> Result<Vec<SharedRecord>, SyncError> {
        let members = filter.clone().and_arena(&self.name);
        let mut tasks = self.local.query(&members)?;
        for task in &mut tasks {
            task.leave();
            let outcome = task.save(&mut self.local);
            if let taskarena_core::SaveOutcome::Failed { cause } = &outcome {
                tracing::warn!("could not untag '{}': {cause}", task.record.description());
            }
        }
        Ok(tasks)
    }

    /// Best-effort removal of every local membership tag; used when the
    /// arena is deleted from the registry. Returns how many records were
    /// untagged.
    pub fn clear_membership(&mut self) -> Result<usize, SyncError> {
        Ok(self.remove(&Filter::all())?.len())
    }

    /// Run the full reconciliation pipeline in one call: generate a plan,
    /// seed suggestions, let the operator review through `gateway`, and
    /// apply the confirmed actions. A cancel at review short-circuits
    /// before apply.
    ///
    /// Precondition (documented, not enforced): the caller has exclusive,
    /// non-overlapping access to both stores for the duration of this
    /// call. Concurrent syncs of the same arena, or external mutation of
    /// either store mid-pipeline, are unguarded races.
    pub fn sync(&mut self, gateway: &mut dyn InteractionGateway) -> Result<SyncOutcome, SyncError> {
        let mut engine =
            ReconciliationEngine::new(self.name.clone(), &mut self.local, &mut self.remote);
        engine.run(gateway)
    }
}
