//! Trellis CLI binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use trellis::cli::Cli;

/// Main entry point for the trellis CLI.
///
/// Uses tokio's current_thread runtime; the CLI performs sequential
/// I/O-bound work and needs no thread pool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via the RUST_LOG environment variable, e.g.
    // RUST_LOG=trellis=debug,trellis_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trellis=info,trellis_jsonl=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse_args();
    cli.execute().await?;

    Ok(())
}
