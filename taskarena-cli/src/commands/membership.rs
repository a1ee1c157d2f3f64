//! `tarena add` / `tarena remove` — arena membership tagging.

use anyhow::Result;
use clap::Args;

use taskarena_core::Filter;

use super::{load_registry, open_arena};

/// Arguments for `tarena add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the arena to tag records into.
    pub arena: String,

    /// Filter terms selecting local records (empty selects everything).
    #[arg(trailing_var_arg = true)]
    pub filter: Vec<String>,
}

impl AddArgs {
    pub fn run(self) -> Result<()> {
        let registry = load_registry()?;
        let mut arena = open_arena(&registry, &self.arena)?;
        let tagged = arena.add(&Filter::new(self.filter))?;
        println!("{} record(s) now shared in '{}'.", tagged.len(), self.arena);
        Ok(())
    }
}

/// Arguments for `tarena remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Name of the arena to untag records from.
    pub arena: String,

    /// Filter terms selecting members (empty selects all members).
    #[arg(trailing_var_arg = true)]
    pub filter: Vec<String>,
}

impl RemoveArgs {
    pub fn run(self) -> Result<()> {
        let registry = load_registry()?;
        let mut arena = open_arena(&registry, &self.arena)?;
        let removed = arena.remove(&Filter::new(self.filter))?;
        println!(
            "{} record(s) removed from '{}'. The tasks themselves are kept.",
            removed.len(),
            self.arena
        );
        Ok(())
    }
}
