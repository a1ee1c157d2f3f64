//! Interaction gateway — the operator-facing seam of the engine.
//!
//! The engine never talks to a terminal (or any global) directly; it is
//! handed an implementation of [`InteractionGateway`] at construction. The
//! CLI provides a prompt-driven one, tests provide a scripted one.

use crate::plan::{EntryChoice, PlanEntry, SyncPlan};

/// Batch decision for a whole plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDecision {
    /// Confirm every entry's suggestion as its action.
    All,
    /// Review entries one by one.
    Manual,
    /// Discard the plan; nothing is applied.
    Cancel,
}

/// Presents plans and prompts to the operator, returns decisions.
///
/// The review phase blocks on these calls with no timeout; the only way
/// out is an explicit decision.
pub trait InteractionGateway {
    /// Present the full plan and ask for a batch decision.
    fn review_plan(&mut self, plan: &SyncPlan) -> PlanDecision;

    /// Present a single entry during manual review. The returned choice
    /// must be drawn from `choices`.
    fn review_entry(&mut self, entry: &PlanEntry, choices: &[EntryChoice]) -> EntryChoice;

    /// Surface a terminal outcome or progress message to the operator.
    fn notify(&mut self, message: &str);
}

/// Scripted gateway for tests: canned decisions, recorded notifications.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    pub plan_decision: Option<PlanDecision>,
    /// Entry decisions consumed front to back during manual review.
    pub entry_choices: Vec<EntryChoice>,
    pub notifications: Vec<String>,
    pub reviewed_entries: usize,
}

impl ScriptedGateway {
    pub fn confirm_all() -> Self {
        ScriptedGateway {
            plan_decision: Some(PlanDecision::All),
            ..Default::default()
        }
    }

    pub fn cancel() -> Self {
        ScriptedGateway {
            plan_decision: Some(PlanDecision::Cancel),
            ..Default::default()
        }
    }

    pub fn manual(choices: impl IntoIterator<Item = EntryChoice>) -> Self {
        ScriptedGateway {
            plan_decision: Some(PlanDecision::Manual),
            entry_choices: choices.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl InteractionGateway for ScriptedGateway {
    fn review_plan(&mut self, _plan: &SyncPlan) -> PlanDecision {
        self.plan_decision.expect("scripted plan decision")
    }

    fn review_entry(&mut self, _entry: &PlanEntry, choices: &[EntryChoice]) -> EntryChoice {
        let choice = self.entry_choices.remove(0);
        assert!(
            choices.contains(&choice),
            "scripted choice {choice:?} not in valid set {choices:?}"
        );
        self.reviewed_entries += 1;
        choice
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_owned());
    }
}
