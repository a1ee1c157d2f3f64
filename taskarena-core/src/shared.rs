//! Shared records — cross-replica identity, diffing, and field transfer.
//!
//! A [`SharedRecord`] wraps a [`Record`] and carries the identity protocol:
//! joining an arena assigns a stable [`ArenaTaskId`] token exactly once,
//! leaving clears the two identity fields and nothing else, and matching
//! across replicas consults the token only — never store-local ids.

use chrono::{DateTime, Utc};

use crate::fields::FieldTag;
use crate::store::RecordStore;
use crate::types::{ArenaName, ArenaTaskId, Record};

/// Outcome of persisting a record to its backing store.
///
/// Store faults are converted to a value here so the apply loop can treat
/// each entry independently; callers distinguish "skipped" from "failed"
/// without an error crossing the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written to the store.
    Saved,
    /// The store rejected or failed the write; `cause` is advisory only.
    Failed { cause: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// A record decorated with cross-replica identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedRecord {
    pub record: Record,
}

impl SharedRecord {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    /// Tag this record as a member of `arena`.
    ///
    /// Assigns a fresh identity token only if none exists yet; repeated
    /// joins never change an already-assigned token.
    pub fn join(&mut self, arena: &ArenaName) {
        self.record.arena = Some(arena.clone());
        if self.record.arena_task_id.is_none() {
            self.record.arena_task_id = Some(ArenaTaskId::generate());
        }
    }

    /// Clear the two identity fields. The underlying record survives.
    pub fn leave(&mut self) {
        self.record.arena = None;
        self.record.arena_task_id = None;
    }

    /// The identity token, if this record has joined an arena.
    pub fn token(&self) -> Option<ArenaTaskId> {
        self.record.arena_task_id
    }

    /// True iff both sides carry an assigned token and the tokens are equal.
    ///
    /// Store-local ids are never consulted: they differ between replicas.
    pub fn same_identity(&self, other: &SharedRecord) -> bool {
        match (self.token(), other.token()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Modification timestamp, falling back to creation time for records
    /// never modified since creation.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.record.modified.unwrap_or(self.record.entry)
    }

    /// Overwrite every differing editable field with `other`'s value.
    ///
    /// Special and read-only fields are untouched.
    pub fn update_from(&mut self, other: &SharedRecord) {
        for tag in FieldTag::EDITABLE {
            if self.record.field(tag) != other.record.field(tag) {
                self.record.set_field(tag, other.record.field(tag));
            }
        }
    }

    /// Editable fields whose values differ, in canonical diff order.
    ///
    /// Empty exactly when [`SharedRecord::update_from`] would be a no-op.
    pub fn different_fields(&self, other: &SharedRecord) -> Vec<FieldTag> {
        FieldTag::EDITABLE
            .into_iter()
            .filter(|&tag| self.record.field(tag) != other.record.field(tag))
            .collect()
    }

    /// Persist to the backing store. Any store fault is reported as a
    /// [`SaveOutcome::Failed`] value; the caller decides how to react.
    pub fn save(&self, store: &mut dyn RecordStore) -> SaveOutcome {
        match store.persist(&self.record) {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => SaveOutcome::Failed {
                cause: err.to_string(),
            },
        }
    }
}
