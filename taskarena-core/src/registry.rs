//! Arena registry — the system's durable state.
//!
//! A single JSON document (`~/.taskarena/arenas.json` by default) holding
//! the ordered list of arena records `{name, local_data, remote_data}`.
//!
//! # API pattern
//!
//! Every path-touching function has two forms:
//! - `fn_at(path: &Path, …)` — explicit config path; used in tests with `TempDir`
//! - `fn(…)` — derives the path from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.
//!
//! Load never aborts: a missing file becomes a fresh empty registry and a
//! corrupt file degrades to an empty registry with a warning status (the
//! prior state is lost unless recovered externally — callers must surface
//! the warning).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{registry_io_err, RegistryError};
use crate::types::ArenaName;

// ---------------------------------------------------------------------------
// Durable types
// ---------------------------------------------------------------------------

/// One durable arena record: a name plus its two store locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaSpec {
    pub name: ArenaName,
    pub local_data: PathBuf,
    pub remote_data: PathBuf,
}

/// Ordered collection of arenas. Name uniqueness is enforced on create
/// only, never globally revalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub arenas: Vec<ArenaSpec>,
}

impl Registry {
    /// Append a new arena. Rejects an exact-name duplicate without
    /// creating anything.
    pub fn create(
        &mut self,
        name: ArenaName,
        local_data: PathBuf,
        remote_data: PathBuf,
    ) -> Result<&ArenaSpec, RegistryError> {
        if self.find(&name).is_some() {
            return Err(RegistryError::ArenaExists { name });
        }
        self.arenas.push(ArenaSpec {
            name,
            local_data,
            remote_data,
        });
        let last = self.arenas.len() - 1;
        Ok(&self.arenas[last])
    }

    /// Linear exact-match lookup.
    pub fn find(&self, name: &ArenaName) -> Option<&ArenaSpec> {
        self.arenas.iter().find(|a| &a.name == name)
    }

    /// Remove an arena by name, returning it if present.
    pub fn remove(&mut self, name: &ArenaName) -> Option<ArenaSpec> {
        let index = self.arenas.iter().position(|a| &a.name == name)?;
        Some(self.arenas.remove(index))
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// How the registry document was obtained on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryStatus {
    /// Parsed from an existing file.
    Loaded,
    /// No file existed; an empty registry was created.
    Created,
    /// The file was unreadable or malformed; degraded to an empty
    /// registry. Data-loss risk — callers must warn the operator.
    Corrupt,
}

/// Result of [`load_at`]: the registry plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLoad {
    pub registry: Registry,
    pub status: RegistryStatus,
}

/// `<home>/.taskarena/arenas.json` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".taskarena").join("arenas.json")
}

/// `config_path_at` convenience wrapper (uses `dirs::home_dir()`).
pub fn config_path() -> Result<PathBuf, RegistryError> {
    Ok(config_path_at(&home()?))
}

/// Load the registry document at `path`.
///
/// Missing file → empty registry persisted at `path` ([`RegistryStatus::Created`]).
/// Unreadable or malformed content → empty registry in memory, the file
/// left untouched until the next save ([`RegistryStatus::Corrupt`]).
pub fn load_at(path: &Path) -> Result<RegistryLoad, RegistryError> {
    if !path.exists() {
        let registry = Registry::default();
        save_at(path, &registry)?;
        return Ok(RegistryLoad {
            registry,
            status: RegistryStatus::Created,
        });
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| serde_json::from_str::<Registry>(&contents).map_err(|e| e.to_string()));

    match parsed {
        Ok(registry) => Ok(RegistryLoad {
            registry,
            status: RegistryStatus::Loaded,
        }),
        Err(_) => Ok(RegistryLoad {
            registry: Registry::default(),
            status: RegistryStatus::Corrupt,
        }),
    }
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<RegistryLoad, RegistryError> {
    load_at(&config_path()?)
}

/// Atomically save the full registry to `path` (full overwrite).
///
/// Write flow: serialize → `.tmp` sibling → `rename`. The `.tmp` lives in
/// the same directory as the target, so the rename never crosses a
/// filesystem boundary.
pub fn save_at(path: &Path, registry: &Registry) -> Result<(), RegistryError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| registry_io_err(dir, e))?;
    }
    let json = serde_json::to_string_pretty(registry)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| registry_io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| registry_io_err(path, e))?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(registry: &Registry) -> Result<(), RegistryError> {
    save_at(&config_path()?, registry)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, RegistryError> {
    dirs::home_dir().ok_or(RegistryError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> PathBuf {
        config_path_at(dir.path())
    }

    #[test]
    fn config_path_is_under_dot_taskarena() {
        let home = TempDir::new().unwrap();
        let path = config_path_at(home.path());
        assert!(path.ends_with(".taskarena/arenas.json"));
    }

    #[test]
    fn load_missing_creates_empty_file() {
        let home = TempDir::new().unwrap();
        let loaded = load_at(&config(&home)).expect("load");
        assert_eq!(loaded.status, RegistryStatus::Created);
        assert!(loaded.registry.arenas.is_empty());
        assert!(config(&home).exists(), "empty config must be created");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = TempDir::new().unwrap();
        let mut registry = Registry::default();
        registry
            .create(
                ArenaName::from("house"),
                PathBuf::from("/data/local"),
                PathBuf::from("/data/remote"),
            )
            .expect("create");
        save_at(&config(&home), &registry).expect("save");

        let loaded = load_at(&config(&home)).expect("load");
        assert_eq!(loaded.status, RegistryStatus::Loaded);
        assert_eq!(loaded.registry, registry);
    }

    #[test]
    fn save_cleans_up_tmp_file() {
        let home = TempDir::new().unwrap();
        save_at(&config(&home), &Registry::default()).expect("save");
        let tmp = config(&home).with_extension("json.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn corrupt_config_degrades_to_empty() {
        let home = TempDir::new().unwrap();
        let path = config(&home);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json at all").unwrap();

        let loaded = load_at(&path).expect("load must not fail");
        assert_eq!(loaded.status, RegistryStatus::Corrupt);
        assert!(loaded.registry.arenas.is_empty());
    }

    #[test]
    fn duplicate_name_rejected_without_side_effect() {
        let mut registry = Registry::default();
        registry
            .create(
                ArenaName::from("house"),
                PathBuf::from("/a"),
                PathBuf::from("/b"),
            )
            .expect("first create");
        let err = registry
            .create(
                ArenaName::from("house"),
                PathBuf::from("/c"),
                PathBuf::from("/d"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::ArenaExists { .. }), "got: {err}");
        assert_eq!(registry.arenas.len(), 1);
        assert_eq!(registry.arenas[0].local_data, PathBuf::from("/a"));
    }

    #[test]
    fn find_is_exact_match() {
        let mut registry = Registry::default();
        registry
            .create(
                ArenaName::from("house"),
                PathBuf::from("/a"),
                PathBuf::from("/b"),
            )
            .expect("create");
        assert!(registry.find(&ArenaName::from("house")).is_some());
        assert!(registry.find(&ArenaName::from("hous")).is_none());
        assert!(registry.find(&ArenaName::from("House")).is_none());
    }

    #[test]
    fn remove_returns_the_spec() {
        let mut registry = Registry::default();
        registry
            .create(
                ArenaName::from("house"),
                PathBuf::from("/a"),
                PathBuf::from("/b"),
            )
            .expect("create");
        let removed = registry.remove(&ArenaName::from("house")).expect("removed");
        assert_eq!(removed.name, ArenaName::from("house"));
        assert!(registry.arenas.is_empty());
        assert!(registry.remove(&ArenaName::from("house")).is_none());
    }
}
