//! The reconciliation engine: generate → suggest → review → apply.
//!
//! One engine instance drives exactly one pipeline run. States move
//! `Idle → Planned → Reviewed → Applied`, with `Cancelled` as the terminal
//! state of an aborted review; the next sync invocation starts from a
//! fresh engine.
//!
//! Apply is best-effort per entry: a failed save is reported and the loop
//! moves on. There is no cross-entry atomicity and no rollback.

use taskarena_core::{ArenaName, Filter, RecordStore, SaveOutcome, SharedRecord};

use crate::error::SyncError;
use crate::gateway::{InteractionGateway, PlanDecision};
use crate::plan::{EntryChoice, PlanEntry, SyncAction, SyncPlan};

// ---------------------------------------------------------------------------
// States and outcomes
// ---------------------------------------------------------------------------

/// Pipeline state of a [`ReconciliationEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Planned,
    Reviewed,
    Applied,
    Cancelled,
}

/// Per-entry apply result; one report per confirmed upload or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub description: String,
    pub action: SyncAction,
    pub outcome: SaveOutcome,
}

/// Terminal outcome of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The plan was empty — both replicas already agree.
    Clean,
    /// The operator cancelled during review; no store was mutated.
    Cancelled,
    /// Apply ran; one report per acted entry, independent outcomes.
    Applied(Vec<ApplyReport>),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Orchestrates plan generation, suggestion, interactive review, and
/// bi-directional apply over two record stores.
pub struct ReconciliationEngine<'s> {
    arena: ArenaName,
    local: &'s mut dyn RecordStore,
    remote: &'s mut dyn RecordStore,
    state: EngineState,
    plan: SyncPlan,
}

impl<'s> ReconciliationEngine<'s> {
    pub fn new(
        arena: ArenaName,
        local: &'s mut dyn RecordStore,
        remote: &'s mut dyn RecordStore,
    ) -> Self {
        ReconciliationEngine {
            arena,
            local,
            remote,
            state: EngineState::Idle,
            plan: SyncPlan::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn plan(&self) -> &SyncPlan {
        &self.plan
    }

    fn expect_state(&self, expected: EngineState) -> Result<(), SyncError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SyncError::Phase {
                expected,
                actual: self.state,
            })
        }
    }

    /// Build the plan from the full record sets of both stores
    /// (`Idle → Planned`).
    ///
    /// Matching is by identity token only. Pairs whose editable fields
    /// already agree produce no entry at all. Suggestions are seeded here
    /// in the same pass: one-sided entries structurally, two-sided ones by
    /// last-modified precedence with ties resolved to upload.
    pub fn generate_plan(&mut self) -> Result<(), SyncError> {
        self.expect_state(EngineState::Idle)?;

        let local_tasks = self.local.query(&Filter::all())?;
        let remote_tasks = self.remote.query(&Filter::all())?;
        let mut matched = vec![false; remote_tasks.len()];

        for ltask in local_tasks {
            let counterpart = remote_tasks
                .iter()
                .enumerate()
                .find(|(_, rtask)| rtask.same_identity(&ltask));
            match counterpart {
                Some((index, rtask)) => {
                    matched[index] = true;
                    let fields = ltask.different_fields(rtask);
                    if fields.is_empty() {
                        continue; // already in sync
                    }
                    let suggestion = suggest_direction(&ltask, rtask);
                    let mut entry = PlanEntry::conflict(ltask, rtask.clone(), fields);
                    entry.suggestion = suggestion;
                    self.plan.entries.push(entry);
                }
                None => self.plan.entries.push(PlanEntry::one_sided_local(ltask)),
            }
        }

        for (index, rtask) in remote_tasks.into_iter().enumerate() {
            if !matched[index] {
                self.plan.entries.push(PlanEntry::one_sided_remote(rtask));
            }
        }

        tracing::debug!(
            "arena '{}': planned {} entr(y/ies)",
            self.arena,
            self.plan.len()
        );
        self.state = EngineState::Planned;
        Ok(())
    }

    /// Interactive confirmation (`Planned → Reviewed` or `Cancelled`).
    ///
    /// A cancel at the batch prompt, or at *any* entry of a manual pass,
    /// discards the entire plan — including entries already confirmed.
    pub fn review(&mut self, gateway: &mut dyn InteractionGateway) -> Result<(), SyncError> {
        self.expect_state(EngineState::Planned)?;

        gateway.notify(&format!(
            "Suggesting the following sync operations on '{}'...",
            self.arena
        ));
        match gateway.review_plan(&self.plan) {
            PlanDecision::All => {
                for entry in &mut self.plan.entries {
                    entry.action = entry.suggestion;
                }
            }
            PlanDecision::Cancel => {
                self.cancel(gateway);
                return Ok(());
            }
            PlanDecision::Manual => {
                gateway.notify("Starting manual sync...");
                for index in 0..self.plan.entries.len() {
                    let choices = self.plan.entries[index].valid_choices();
                    let choice = gateway.review_entry(&self.plan.entries[index], choices);
                    let entry = &mut self.plan.entries[index];
                    match choice {
                        EntryChoice::Upload => {
                            entry.action = SyncAction::Upload;
                            gateway.notify("Task marked for upload.");
                        }
                        EntryChoice::Download => {
                            entry.action = SyncAction::Download;
                            gateway.notify("Task marked for download.");
                        }
                        EntryChoice::Skip => {
                            entry.action = SyncAction::Skip;
                            gateway.notify("Task skipped.");
                        }
                        EntryChoice::Cancel => {
                            self.cancel(gateway);
                            return Ok(());
                        }
                    }
                }
            }
        }

        self.state = EngineState::Reviewed;
        Ok(())
    }

    fn cancel(&mut self, gateway: &mut dyn InteractionGateway) {
        // The whole plan is discarded, confirmed entries included.
        self.plan.entries.clear();
        self.state = EngineState::Cancelled;
        gateway.notify("Sync canceled.");
    }

    /// Apply every confirmed action (`Reviewed → Applied`).
    ///
    /// Entries are independent: a failed save is reported in its entry's
    /// [`ApplyReport`] and never blocks or rolls back the others.
    pub fn apply(&mut self) -> Result<Vec<ApplyReport>, SyncError> {
        self.expect_state(EngineState::Reviewed)?;

        let mut reports = Vec::new();
        for entry in &mut self.plan.entries {
            match entry.action {
                SyncAction::Upload => {
                    let outcome = transfer(
                        &self.arena,
                        entry.local.as_ref(),
                        &mut entry.remote,
                        self.remote,
                    );
                    reports.push(ApplyReport {
                        description: entry.description().to_owned(),
                        action: SyncAction::Upload,
                        outcome,
                    });
                }
                SyncAction::Download => {
                    let outcome = transfer(
                        &self.arena,
                        entry.remote.as_ref(),
                        &mut entry.local,
                        self.local,
                    );
                    reports.push(ApplyReport {
                        description: entry.description().to_owned(),
                        action: SyncAction::Download,
                        outcome,
                    });
                }
                SyncAction::Skip | SyncAction::Pending => {}
            }
        }

        for report in &reports {
            match &report.outcome {
                SaveOutcome::Saved => {
                    tracing::info!("{}: '{}' saved", report.action, report.description)
                }
                SaveOutcome::Failed { cause } => tracing::warn!(
                    "{}: '{}' failed: {cause}",
                    report.action,
                    report.description
                ),
            }
        }

        self.state = EngineState::Applied;
        Ok(reports)
    }

    /// Run the full pipeline in one call.
    ///
    /// A cancel during review short-circuits before apply; an empty plan
    /// skips review entirely.
    pub fn run(&mut self, gateway: &mut dyn InteractionGateway) -> Result<SyncOutcome, SyncError> {
        self.generate_plan()?;

        if self.plan.is_empty() {
            gateway.notify(&format!("Arena '{}' is in sync.", self.arena));
            self.state = EngineState::Applied;
            return Ok(SyncOutcome::Clean);
        }

        self.review(gateway)?;
        if self.state == EngineState::Cancelled {
            return Ok(SyncOutcome::Cancelled);
        }

        let reports = self.apply()?;
        let failures = reports.iter().filter(|r| !r.outcome.is_saved()).count();
        if failures == 0 {
            gateway.notify("Sync complete.");
        } else {
            gateway.notify(&format!("Sync complete with {failures} failed save(s)."));
        }
        Ok(SyncOutcome::Applied(reports))
    }
}

/// Upload precedence: local wins on an exact timestamp tie.
fn suggest_direction(local: &SharedRecord, remote: &SharedRecord) -> SyncAction {
    if local.last_modified() >= remote.last_modified() {
        SyncAction::Upload
    } else {
        SyncAction::Download
    }
}

/// Copy `source` onto `target` within `target_store`.
///
/// When no counterpart exists yet, a new record is inserted and tagged
/// with the *same* identity token as the source, preserving cross-replica
/// identity.
fn transfer(
    arena: &ArenaName,
    source: Option<&SharedRecord>,
    target: &mut Option<SharedRecord>,
    target_store: &mut dyn RecordStore,
) -> SaveOutcome {
    let Some(source) = source else {
        // Entries always have the acting side present; guarded by
        // valid_choices during review.
        return SaveOutcome::Failed {
            cause: "entry has no source record".to_owned(),
        };
    };

    match target {
        Some(existing) => {
            existing.update_from(source);
            existing.save(target_store)
        }
        None => match target_store.insert(source) {
            Ok(mut created) => {
                created.record.arena = Some(arena.clone());
                created.record.arena_task_id = source.token();
                let outcome = created.save(target_store);
                *target = Some(created);
                outcome
            }
            Err(err) => SaveOutcome::Failed {
                cause: err.to_string(),
            },
        },
    }
}
