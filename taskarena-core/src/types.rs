//! Domain types for taskarena.
//!
//! All durable types are serializable via serde + serde_json. Names and
//! identity tokens are newtypes; never bare `String`/`Uuid` in signatures.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::FieldTag;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a sync arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaName(pub String);

impl fmt::Display for ArenaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArenaName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArenaName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The process-wide-unique token establishing cross-replica task identity.
///
/// Assigned exactly once, when a record first joins an arena, and stable
/// thereafter. Store-local ids differ between replicas and are never used
/// for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaTaskId(pub Uuid);

impl ArenaTaskId {
    /// Generate a fresh random token (collision-negligible, 128-bit).
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArenaTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A timestamped note attached to a record.
///
/// Annotations are the one *special* field class: never diffed and never
/// copied by sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub entry: DateTime<Utc>,
    pub description: String,
}

/// A single task record as held by one replica's store.
///
/// Editable content lives in `fields`, keyed by the closed [`FieldTag`]
/// schema; an absent key is equivalent to an empty value. `id`, `uuid`,
/// `entry` and `modified` are read-only bookkeeping owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-local id. Differs between replicas; never compared by sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Store-local universal id.
    pub uuid: Uuid,
    /// Creation time.
    pub entry: DateTime<Utc>,
    /// Last modification time, if ever modified since creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Editable fields; absent key means empty.
    #[serde(default)]
    pub fields: BTreeMap<FieldTag, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Arena membership tag; cleared on leave.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena: Option<ArenaName>,
    /// Cross-replica identity token; cleared on leave.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena_task_id: Option<ArenaTaskId>,
}

impl Record {
    /// A fresh unsaved record with the given description.
    pub fn new(description: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        let description = description.into();
        if !description.is_empty() {
            fields.insert(FieldTag::Description, description);
        }
        Record {
            id: None,
            uuid: Uuid::new_v4(),
            entry: Utc::now(),
            modified: None,
            fields,
            annotations: Vec::new(),
            arena: None,
            arena_task_id: None,
        }
    }

    /// Value of an editable field; empty string when unset.
    pub fn field(&self, tag: FieldTag) -> &str {
        self.fields.get(&tag).map(String::as_str).unwrap_or("")
    }

    /// Set an editable field. An empty value clears the entry so that
    /// "unset" and "empty" stay indistinguishable.
    pub fn set_field(&mut self, tag: FieldTag, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.fields.remove(&tag);
        } else {
            self.fields.insert(tag, value);
        }
    }

    /// Short description preview for messages and plan tables.
    pub fn description(&self) -> &str {
        self.field(FieldTag::Description)
    }
}
