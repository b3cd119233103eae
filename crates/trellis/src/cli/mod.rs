//! CLI argument parsing and command dispatch.
//!
//! Command-line interface for trellis using clap's derive API.
//!
//! # Commands
//!
//! - `init`: Initialize a trellis repository
//! - `render`: Resolve the collection and emit a DOT diagram
//! - `resolve`: Resolve the collection and persist the derived state
//! - `stats`: Show collection statistics
//!
//! # Example
//!
//! ```bash
//! trellis init --epic-label milestone
//! trellis render --hide-closed -o graph.dot
//! trellis stats
//! ```

mod args;
mod execute;

use clap::{Parser, Subcommand};

pub use args::{InitArgs, RenderArgs, StatsArgs};

/// Trellis - issue dependency graph mining and visualization
///
/// Mines issue bodies for dependency directives, resolves them into a
/// graph, and renders the result as a Graphviz DOT diagram.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a trellis repository
    ///
    /// Creates the `.trellis/` directory with configuration and an empty
    /// issue snapshot. Run once in your project root.
    Init(InitArgs),

    /// Resolve the collection and emit a DOT diagram
    ///
    /// Loads the snapshot, runs the resolution passes, and writes the
    /// diagram to stdout or a file.
    Render(RenderArgs),

    /// Resolve the collection and persist the derived state
    ///
    /// After this, consumers can load the snapshot without re-resolving.
    Resolve,

    /// Show collection statistics
    Stats(StatsArgs),
}

impl Cli {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Propagates command execution failures.
    pub async fn execute(self) -> crate::error::Result<()> {
        execute::run(self.command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from(["trellis", "render", "--hide-closed", "--hide-orphans"])
            .unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert!(args.hide_closed);
                assert!(args.hide_orphans);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn init_accepts_epic_label() {
        let cli =
            Cli::try_parse_from(["trellis", "init", "--epic-label", "milestone"]).unwrap();
        match cli.command {
            Commands::Init(args) => assert_eq!(args.epic_label.as_deref(), Some("milestone")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
