//! Record store adapter — the seam between the engine and a replica.
//!
//! The engine only ever talks to [`RecordStore`]: an opaque filtered query,
//! an insert that copies editable fields, and a persist. [`FileStore`] is
//! the bundled adapter: one JSON document per data directory, written with
//! the same `.tmp` + rename discipline as the registry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{store_io_err, StoreError};
use crate::fields::FieldTag;
use crate::shared::SharedRecord;
use crate::types::{ArenaName, Record};

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// An opaque conjunctive filter expression, evaluated by the store.
///
/// Recognized terms: `arena:<name>`, `status:<v>`, `project:<v>`,
/// `priority:<v>`; any other word matches as a description substring.
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    terms: Vec<String>,
}

impl Filter {
    /// The empty filter — matches all records.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.trim().is_empty())
                .collect(),
        }
    }

    /// Narrow this filter to members of `arena`.
    pub fn and_arena(mut self, arena: &ArenaName) -> Self {
        self.terms.push(format!("arena:{arena}"));
        self
    }

    fn matches(&self, record: &Record) -> bool {
        self.terms.iter().all(|term| match term.split_once(':') {
            Some(("arena", name)) => {
                record.arena.as_ref().map(|a| a.0.as_str()) == Some(name)
            }
            Some(("status", value)) => record.field(FieldTag::Status) == value,
            Some(("project", value)) => record.field(FieldTag::Project) == value,
            Some(("priority", value)) => record.field(FieldTag::Priority) == value,
            _ => record.description().contains(term.as_str()),
        })
    }
}

// ---------------------------------------------------------------------------
// Adapter trait
// ---------------------------------------------------------------------------

/// Query/insert/persist interface over one replica's task collection.
///
/// Query order is store-defined and carries no meaning to the engine.
pub trait RecordStore {
    /// All records matching `filter`, wrapped for identity handling.
    fn query(&self, filter: &Filter) -> Result<Vec<SharedRecord>, StoreError>;

    /// Create a new record in this store, copying every editable field from
    /// `template`. The new record gets fresh store-local identity; the
    /// cross-replica token is left for the caller to assign.
    fn insert(&mut self, template: &SharedRecord) -> Result<SharedRecord, StoreError>;

    /// Write `record` back to the store, stamping its modification time.
    fn persist(&mut self, record: &Record) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed adapter
// ---------------------------------------------------------------------------

/// On-disk task document: `<data_dir>/tasks.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    tasks: Vec<Record>,
}

impl Default for StoreFile {
    fn default() -> Self {
        StoreFile {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

/// Declared field schema: `<data_dir>/schema.json`.
///
/// Opening a store migrates the schema so it recognizes the two arena
/// identity fields; the migration is idempotent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Schema {
    fields: Vec<String>,
}

const IDENTITY_FIELDS: [&str; 2] = ["arena", "arena_task_id"];

/// JSON-file-backed [`RecordStore`] rooted at a data directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store at `root`, creating the directory and migrating the
    /// field schema if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| store_io_err(&root, e))?;
        let store = FileStore { root };
        store.migrate_schema()?;
        Ok(store)
    }

    /// `<root>/tasks.json` — pure, no I/O.
    pub fn tasks_path(&self) -> PathBuf {
        self.root.join("tasks.json")
    }

    /// `<root>/schema.json` — pure, no I/O.
    pub fn schema_path(&self) -> PathBuf {
        self.root.join("schema.json")
    }

    /// Ensure `schema.json` declares the arena identity fields.
    fn migrate_schema(&self) -> Result<(), StoreError> {
        let path = self.schema_path();
        let mut schema = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| store_io_err(&path, e))?;
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            Schema::default()
        };

        let mut changed = !path.exists();
        for field in IDENTITY_FIELDS {
            if !schema.fields.iter().any(|f| f == field) {
                schema.fields.push(field.to_owned());
                changed = true;
            }
        }
        if changed {
            self.write_json(&path, &schema)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<StoreFile, StoreError> {
        let path = self.tasks_path();
        if !path.exists() {
            return Ok(StoreFile::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| store_io_err(&path, e))?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })
    }

    fn save(&self, file: &StoreFile) -> Result<(), StoreError> {
        self.write_json(&self.tasks_path(), file)
    }

    /// Serialize → sibling `.tmp` → rename (atomic on POSIX).
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| store_io_err(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| store_io_err(path, e))?;
        Ok(())
    }

    /// Append a brand-new record, assigning its store-local id.
    ///
    /// Used by seeding code and tests; sync itself only ever inserts through
    /// [`RecordStore::insert`].
    pub fn add_record(&mut self, mut record: Record) -> Result<Record, StoreError> {
        let mut file = self.load()?;
        record.id = Some(file.next_id);
        file.next_id += 1;
        file.tasks.push(record.clone());
        self.save(&file)?;
        Ok(record)
    }
}

impl RecordStore for FileStore {
    fn query(&self, filter: &Filter) -> Result<Vec<SharedRecord>, StoreError> {
        let file = self.load()?;
        Ok(file
            .tasks
            .into_iter()
            .filter(|t| filter.matches(t))
            .map(SharedRecord::new)
            .collect())
    }

    fn insert(&mut self, template: &SharedRecord) -> Result<SharedRecord, StoreError> {
        let mut record = Record::new("");
        for tag in FieldTag::EDITABLE {
            record.set_field(tag, template.record.field(tag));
        }
        let record = self.add_record(record)?;
        Ok(SharedRecord::new(record))
    }

    fn persist(&mut self, record: &Record) -> Result<(), StoreError> {
        let mut file = self.load()?;
        let Some(slot) = file.tasks.iter_mut().find(|t| t.uuid == record.uuid) else {
            return Err(StoreError::UnknownRecord {
                uuid: record.uuid,
                path: self.tasks_path(),
            });
        };
        let id = slot.id;
        *slot = record.clone();
        slot.id = id;
        slot.modified = Some(chrono::Utc::now());
        self.save(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> FileStore {
        FileStore::open(dir.path().join("data")).expect("open store")
    }

    #[test]
    fn open_migrates_schema_idempotently() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let first = std::fs::read_to_string(store.schema_path()).expect("schema written");
        assert!(first.contains("arena_task_id"));

        // Reopen: the schema must not change again.
        let store = open_store(&dir);
        let second = std::fs::read_to_string(store.schema_path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn open_preserves_existing_schema_fields() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("data");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("schema.json"), r#"{"fields":["estimate"]}"#).unwrap();

        let store = FileStore::open(&root).expect("open");
        let schema = std::fs::read_to_string(store.schema_path()).unwrap();
        assert!(schema.contains("estimate"));
        assert!(schema.contains("arena"));
    }

    #[test]
    fn query_empty_filter_returns_everything_in_store_order() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add_record(Record::new("paint walls")).unwrap();
        store.add_record(Record::new("clean floor")).unwrap();

        let all = store.query(&Filter::all()).expect("query");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].record.description(), "paint walls");
        assert_eq!(all[1].record.description(), "clean floor");
        assert_eq!(all[0].record.id, Some(1));
        assert_eq!(all[1].record.id, Some(2));
    }

    #[test]
    fn filter_terms_are_conjunctive() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let mut a = Record::new("paint walls");
        a.set_field(FieldTag::Project, "house");
        a.set_field(FieldTag::Priority, "H");
        store.add_record(a).unwrap();
        let mut b = Record::new("paint ceiling");
        b.set_field(FieldTag::Project, "house");
        store.add_record(b).unwrap();

        let hits = store
            .query(&Filter::new(["project:house", "priority:H"]))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.description(), "paint walls");

        let hits = store.query(&Filter::new(["paint"])).unwrap();
        assert_eq!(hits.len(), 2, "bare word matches description substring");
    }

    #[test]
    fn arena_filter_matches_membership() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let mut record = Record::new("paint walls");
        record.arena = Some(ArenaName::from("house"));
        store.add_record(record).unwrap();
        store.add_record(Record::new("untagged")).unwrap();

        let filter = Filter::all().and_arena(&ArenaName::from("house"));
        let hits = store.query(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.description(), "paint walls");
    }

    #[test]
    fn insert_copies_editable_fields_only() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let mut template = SharedRecord::new(Record::new("paint walls"));
        template.record.set_field(FieldTag::Priority, "H");
        template.join(&ArenaName::from("house"));

        let created = store.insert(&template).expect("insert");
        assert_eq!(created.record.description(), "paint walls");
        assert_eq!(created.record.field(FieldTag::Priority), "H");
        assert_ne!(created.record.uuid, template.record.uuid);
        assert!(
            created.token().is_none(),
            "identity token is the caller's to assign"
        );
    }

    #[test]
    fn persist_updates_in_place_and_stamps_modified() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let saved = store.add_record(Record::new("paint walls")).unwrap();

        let mut edited = saved.clone();
        edited.set_field(FieldTag::Description, "paint ceiling");
        store.persist(&edited).expect("persist");

        let all = store.query(&Filter::all()).unwrap();
        assert_eq!(all.len(), 1, "persist must not duplicate");
        assert_eq!(all[0].record.description(), "paint ceiling");
        assert_eq!(all[0].record.id, Some(1), "store-local id preserved");
        assert!(all[0].record.modified.is_some());
    }

    #[test]
    fn persist_unknown_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let err = store.persist(&Record::new("ghost")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownRecord { .. }), "got: {err}");
    }
}
