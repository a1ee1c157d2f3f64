//! tarena — share and reconcile tasks between two replicas.
//!
//! # Usage
//!
//! ```text
//! tarena install
//! tarena uninstall
//! tarena create <name> <local_data> <remote_data>
//! tarena delete <name>
//! tarena ls
//! tarena add <arena> [filter...]
//! tarena remove <arena> [filter...]
//! tarena sync <arena>
//! ```

mod commands;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    install::{InstallArgs, UninstallArgs},
    membership::{AddArgs, RemoveArgs},
    registry::{CreateArgs, DeleteArgs, LsArgs},
    sync::SyncArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tarena",
    version,
    about = "Reconcile a shared task collection across two replicas",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the arena config file.
    Install(InstallArgs),

    /// Remove the arena config file.
    Uninstall(UninstallArgs),

    /// Create a new arena bound to two task store locations.
    Create(CreateArgs),

    /// Delete an arena, untagging its local records.
    Delete(DeleteArgs),

    /// List all arenas.
    Ls(LsArgs),

    /// Tag local records matching a filter as arena members.
    Add(AddArgs),

    /// Untag arena members matching a filter. Records are kept.
    Remove(RemoveArgs),

    /// Reconcile an arena's two stores interactively.
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Install(args) => args.run(),
        Commands::Uninstall(args) => args.run(),
        Commands::Create(args) => args.run(),
        Commands::Delete(args) => args.run(),
        Commands::Ls(args) => args.run(),
        Commands::Add(args) => args.run(),
        Commands::Remove(args) => args.run(),
        Commands::Sync(args) => args.run(),
    }
}
