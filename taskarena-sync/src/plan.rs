//! Sync plans — the rows the reconciliation engine builds and applies.

use std::fmt;

use chrono::{DateTime, Utc};

use taskarena_core::{FieldTag, SharedRecord};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A reconciliation direction, either suggested or confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy local → remote.
    Upload,
    /// Copy remote → local.
    Download,
    /// Leave both sides untouched.
    Skip,
    /// Not yet decided.
    Pending,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Upload => write!(f, "upload"),
            SyncAction::Download => write!(f, "download"),
            SyncAction::Skip => write!(f, "skip"),
            SyncAction::Pending => write!(f, "pending"),
        }
    }
}

/// One option offered to the operator for a single entry during manual
/// review. `Cancel` aborts the entire plan, not just the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChoice {
    Upload,
    Download,
    Skip,
    Cancel,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One row of a reconciliation plan: a matched or unmatched record pair,
/// the differing editable fields, a suggested action and (after review) a
/// confirmed one. At least one side is always present.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub local: Option<SharedRecord>,
    pub remote: Option<SharedRecord>,
    /// Differing editable fields, canonical order; populated only when
    /// both sides are present.
    pub fields: Vec<FieldTag>,
    /// System-proposed action.
    pub suggestion: SyncAction,
    /// Operator-confirmed action; `Pending` until review.
    pub action: SyncAction,
}

impl PlanEntry {
    pub fn one_sided_local(local: SharedRecord) -> Self {
        PlanEntry {
            local: Some(local),
            remote: None,
            fields: Vec::new(),
            suggestion: SyncAction::Upload,
            action: SyncAction::Pending,
        }
    }

    pub fn one_sided_remote(remote: SharedRecord) -> Self {
        PlanEntry {
            local: None,
            remote: Some(remote),
            fields: Vec::new(),
            suggestion: SyncAction::Download,
            action: SyncAction::Pending,
        }
    }

    pub fn conflict(local: SharedRecord, remote: SharedRecord, fields: Vec<FieldTag>) -> Self {
        PlanEntry {
            local: Some(local),
            remote: Some(remote),
            fields,
            suggestion: SyncAction::Pending,
            action: SyncAction::Pending,
        }
    }

    pub fn is_two_sided(&self) -> bool {
        self.local.is_some() && self.remote.is_some()
    }

    /// The option set the operator may pick from during manual review.
    pub fn valid_choices(&self) -> &'static [EntryChoice] {
        const BOTH: [EntryChoice; 4] = [
            EntryChoice::Upload,
            EntryChoice::Download,
            EntryChoice::Skip,
            EntryChoice::Cancel,
        ];
        const LOCAL_ONLY: [EntryChoice; 3] =
            [EntryChoice::Upload, EntryChoice::Skip, EntryChoice::Cancel];
        const REMOTE_ONLY: [EntryChoice; 3] =
            [EntryChoice::Download, EntryChoice::Skip, EntryChoice::Cancel];

        if self.is_two_sided() {
            &BOTH
        } else if self.local.is_some() {
            &LOCAL_ONLY
        } else {
            &REMOTE_ONLY
        }
    }

    pub fn local_description(&self) -> &str {
        self.local
            .as_ref()
            .map(|t| t.record.description())
            .unwrap_or("")
    }

    pub fn remote_description(&self) -> &str {
        self.remote
            .as_ref()
            .map(|t| t.record.description())
            .unwrap_or("")
    }

    /// Whichever description is present, for per-entry reporting.
    pub fn description(&self) -> &str {
        let local = self.local_description();
        if local.is_empty() {
            self.remote_description()
        } else {
            local
        }
    }

    pub fn local_last_modified(&self) -> Option<DateTime<Utc>> {
        self.local.as_ref().map(|t| t.last_modified())
    }

    pub fn remote_last_modified(&self) -> Option<DateTime<Utc>> {
        self.remote.as_ref().map(|t| t.last_modified())
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// An ordered reconciliation plan, built fresh per sync invocation and
/// discarded after apply.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub entries: Vec<PlanEntry>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskarena_core::{ArenaName, Record};

    fn shared(description: &str) -> SharedRecord {
        let mut task = SharedRecord::new(Record::new(description));
        task.join(&ArenaName::from("house"));
        task
    }

    #[test]
    fn one_sided_entries_carry_structural_suggestions() {
        let upload = PlanEntry::one_sided_local(shared("paint walls"));
        assert_eq!(upload.suggestion, SyncAction::Upload);
        assert_eq!(upload.action, SyncAction::Pending);

        let download = PlanEntry::one_sided_remote(shared("clean floor"));
        assert_eq!(download.suggestion, SyncAction::Download);
        assert_eq!(download.action, SyncAction::Pending);
    }

    #[test]
    fn choice_sets_follow_sidedness() {
        let both = PlanEntry::conflict(
            shared("paint walls"),
            shared("paint ceiling"),
            vec![FieldTag::Description],
        );
        assert_eq!(both.valid_choices().len(), 4);

        let local_only = PlanEntry::one_sided_local(shared("paint walls"));
        assert_eq!(
            local_only.valid_choices(),
            &[EntryChoice::Upload, EntryChoice::Skip, EntryChoice::Cancel]
        );

        let remote_only = PlanEntry::one_sided_remote(shared("clean floor"));
        assert_eq!(
            remote_only.valid_choices(),
            &[EntryChoice::Download, EntryChoice::Skip, EntryChoice::Cancel]
        );
    }

    #[test]
    fn description_prefers_the_present_side() {
        let entry = PlanEntry::one_sided_remote(shared("clean floor"));
        assert_eq!(entry.description(), "clean floor");
        assert_eq!(entry.local_description(), "");
    }
}
