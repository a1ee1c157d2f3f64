//! # taskarena-sync
//!
//! The reconciliation engine for taskarena: plan generation, conflict
//! suggestion, interactive review through an injected
//! [`InteractionGateway`], and best-effort bi-directional apply.
//!
//! Call [`Arena::sync`] for the full pipeline, or drive
//! [`ReconciliationEngine`] phase by phase.

pub mod arena;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod plan;

pub use arena::Arena;
pub use engine::{ApplyReport, EngineState, ReconciliationEngine, SyncOutcome};
pub use error::SyncError;
pub use gateway::{InteractionGateway, PlanDecision, ScriptedGateway};
pub use plan::{EntryChoice, PlanEntry, SyncAction, SyncPlan};
