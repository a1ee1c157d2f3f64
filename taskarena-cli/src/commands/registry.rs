//! `tarena create`, `tarena delete`, `tarena ls` — registry CRUD.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use taskarena_core::ArenaName;
use taskarena_sync::Arena;

use super::{find_arena, load_registry, open_arena, save_registry};

/// Arguments for `tarena create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Arena name, unique within the registry.
    pub name: String,

    /// Data directory of the local task store.
    pub local_data: PathBuf,

    /// Data directory of the remote task store.
    pub remote_data: PathBuf,
}

impl CreateArgs {
    pub fn run(self) -> Result<()> {
        let mut registry = load_registry()?;
        let spec = registry
            .create(
                ArenaName::from(self.name.clone()),
                self.local_data,
                self.remote_data,
            )
            .context("cannot create arena")?
            .clone();

        // Bind both adapters now so their schemas are migrated up front.
        Arena::open(&spec)
            .with_context(|| format!("failed to open stores for arena '{}'", spec.name))?;

        save_registry(&registry)?;
        println!("Arena '{}' created.", spec.name);
        Ok(())
    }
}

/// Arguments for `tarena delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Name of the arena to delete.
    pub name: String,
}

impl DeleteArgs {
    pub fn run(self) -> Result<()> {
        let mut registry = load_registry()?;
        find_arena(&registry, &self.name)?;

        // Best effort: untag local members, but never let a store fault
        // keep the arena in the registry.
        match open_arena(&registry, &self.name).and_then(|mut arena| {
            arena
                .clear_membership()
                .context("failed to clear membership tags")
        }) {
            Ok(cleared) if cleared > 0 => println!("Untagged {cleared} record(s)."),
            Ok(_) => {}
            Err(err) => eprintln!(
                "{} could not untag local records: {err:#}",
                "warning:".yellow().bold()
            ),
        }

        registry.remove(&ArenaName::from(self.name.clone()));
        save_registry(&registry)?;
        println!("Arena '{}' deleted.", self.name);
        Ok(())
    }
}

/// Arguments for `tarena ls`.
#[derive(Args, Debug)]
pub struct LsArgs {}

#[derive(Tabled)]
struct ArenaRow {
    #[tabled(rename = "arena")]
    name: String,
    #[tabled(rename = "local")]
    local: String,
    #[tabled(rename = "remote")]
    remote: String,
}

impl LsArgs {
    pub fn run(self) -> Result<()> {
        let registry = load_registry()?;
        if registry.arenas.is_empty() {
            println!("No arenas created. Run `tarena create <name> <local> <remote>`.");
            return Ok(());
        }

        let rows: Vec<ArenaRow> = registry
            .arenas
            .iter()
            .map(|a| ArenaRow {
                name: a.name.to_string(),
                local: a.local_data.display().to_string(),
                remote: a.remote_data.display().to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
