//! Closed field schema for task records.
//!
//! Fields fall into three disjoint classes:
//! - *editable* — diffed and copied during sync ([`FieldTag::EDITABLE`])
//! - *special* — annotations; never diffed, never auto-copied
//! - *read-only* — store-local id, entry/modified timestamps, universal id;
//!   identity and bookkeeping only, never written by sync
//!
//! Records never carry arbitrary string-keyed fields: everything sync can
//! touch is a [`FieldTag`] variant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One editable field of a task record, in fixed diff order.
///
/// The declaration order below is the canonical order in which field
/// differences are reported and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTag {
    Depends,
    Description,
    Due,
    End,
    Imask,
    Mask,
    Parent,
    Priority,
    Project,
    Recur,
    Scheduled,
    Start,
    Status,
    Tags,
    Until,
    Wait,
}

impl FieldTag {
    /// All editable fields, in canonical diff order.
    pub const EDITABLE: [FieldTag; 16] = [
        FieldTag::Depends,
        FieldTag::Description,
        FieldTag::Due,
        FieldTag::End,
        FieldTag::Imask,
        FieldTag::Mask,
        FieldTag::Parent,
        FieldTag::Priority,
        FieldTag::Project,
        FieldTag::Recur,
        FieldTag::Scheduled,
        FieldTag::Start,
        FieldTag::Status,
        FieldTag::Tags,
        FieldTag::Until,
        FieldTag::Wait,
    ];

    /// Lowercase wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldTag::Depends => "depends",
            FieldTag::Description => "description",
            FieldTag::Due => "due",
            FieldTag::End => "end",
            FieldTag::Imask => "imask",
            FieldTag::Mask => "mask",
            FieldTag::Parent => "parent",
            FieldTag::Priority => "priority",
            FieldTag::Project => "project",
            FieldTag::Recur => "recur",
            FieldTag::Scheduled => "scheduled",
            FieldTag::Start => "start",
            FieldTag::Status => "status",
            FieldTag::Tags => "tags",
            FieldTag::Until => "until",
            FieldTag::Wait => "wait",
        }
    }

    /// Parse a lowercase wire name back into a tag.
    pub fn parse(name: &str) -> Option<FieldTag> {
        FieldTag::EDITABLE.iter().copied().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
