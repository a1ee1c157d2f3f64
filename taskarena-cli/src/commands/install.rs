//! `tarena install` / `tarena uninstall` — arena config lifecycle.
//!
//! Per-store schema setup is not handled here: opening a store migrates
//! its schema idempotently, so `create`/`sync` take care of it.

use anyhow::{Context, Result};
use clap::Args;

use taskarena_core::registry::{config_path, save_at};
use taskarena_core::Registry;

/// Arguments for `tarena install`.
#[derive(Args, Debug)]
pub struct InstallArgs {}

impl InstallArgs {
    pub fn run(self) -> Result<()> {
        let path = config_path().context("could not determine config path")?;
        if path.exists() {
            println!("TaskArena already installed at '{}'.", path.display());
            return Ok(());
        }
        save_at(&path, &Registry::default())
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        println!("TaskArena installed. Config: '{}'.", path.display());
        Ok(())
    }
}

/// Arguments for `tarena uninstall`.
#[derive(Args, Debug)]
pub struct UninstallArgs {}

impl UninstallArgs {
    pub fn run(self) -> Result<()> {
        let path = config_path().context("could not determine config path")?;
        if !path.exists() {
            println!("Nothing to uninstall.");
            return Ok(());
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove '{}'", path.display()))?;
        println!("TaskArena uninstalled.");
        Ok(())
    }
}
