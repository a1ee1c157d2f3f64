//! Subcommand implementations.

pub mod install;
pub mod membership;
pub mod registry;
pub mod sync;

use anyhow::{Context, Result};
use colored::Colorize;

use taskarena_core::registry::{config_path, load_at, RegistryLoad, RegistryStatus};
use taskarena_core::{ArenaSpec, Registry};
use taskarena_sync::Arena;

/// Load the registry from the default config path, surfacing the
/// degraded-state warning when the file was corrupt.
pub(crate) fn load_registry() -> Result<Registry> {
    let path = config_path().context("could not determine config path")?;
    let RegistryLoad { registry, status } =
        load_at(&path).with_context(|| format!("failed to load '{}'", path.display()))?;
    if status == RegistryStatus::Corrupt {
        eprintln!(
            "{} arena config at '{}' is corrupt; continuing with an empty registry",
            "warning:".yellow().bold(),
            path.display()
        );
    }
    Ok(registry)
}

/// Persist the registry to the default config path.
pub(crate) fn save_registry(registry: &Registry) -> Result<()> {
    let path = config_path().context("could not determine config path")?;
    taskarena_core::registry::save_at(&path, registry)
        .with_context(|| format!("failed to save '{}'", path.display()))
}

/// Find an arena by name or fail with a validation error.
pub(crate) fn find_arena<'r>(registry: &'r Registry, name: &str) -> Result<&'r ArenaSpec> {
    registry
        .find(&taskarena_core::ArenaName::from(name))
        .with_context(|| format!("arena '{name}' not found"))
}

/// Open both stores of a named arena.
pub(crate) fn open_arena(registry: &Registry, name: &str) -> Result<Arena> {
    let spec = find_arena(registry, name)?;
    Arena::open(spec).with_context(|| format!("failed to open stores for arena '{name}'"))
}
