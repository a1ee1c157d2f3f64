//! Taskarena core library — field schema, records, store adapter, registry.
//!
//! Public API surface:
//! - [`fields`] — the closed editable-field schema
//! - [`types`] — newtypes and the record model
//! - [`shared`] — cross-replica identity, diff, and transfer logic
//! - [`store`] — the [`RecordStore`] adapter seam and the bundled [`FileStore`]
//! - [`registry`] — durable arena registry, load / save / CRUD
//! - [`error`] — [`RegistryError`] and [`StoreError`]

pub mod error;
pub mod fields;
pub mod registry;
pub mod shared;
pub mod store;
pub mod types;

pub use error::{RegistryError, StoreError};
pub use fields::FieldTag;
pub use registry::{ArenaSpec, Registry, RegistryLoad, RegistryStatus};
pub use shared::{SaveOutcome, SharedRecord};
pub use store::{FileStore, Filter, RecordStore};
pub use types::{Annotation, ArenaName, ArenaTaskId, Record};
