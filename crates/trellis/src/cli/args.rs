//! Argument structs for the CLI commands.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `init` command.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Label that marks an issue as an epic
    #[arg(long)]
    pub epic_label: Option<String>,
}

/// Arguments for the `render` command.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Hide closed issues
    #[arg(long)]
    pub hide_closed: bool,

    /// Hide orphan and epic-unlinked issues
    #[arg(long)]
    pub hide_orphans: bool,

    /// Write the diagram to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `stats` command.
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Output in JSON format for programmatic use
    #[arg(long)]
    pub json: bool,
}
