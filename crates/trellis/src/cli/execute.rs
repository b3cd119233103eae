//! Command execution.

use super::{Commands, InitArgs, RenderArgs, StatsArgs};
use crate::app::{App, RenderOptions};
use crate::commands::init;
use crate::error::Result;
use std::path::Path;

pub(super) async fn run(command: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match command {
        Commands::Init(args) => run_init(&cwd, args).await,
        Commands::Render(args) => run_render(&cwd, args).await,
        Commands::Resolve => run_resolve(&cwd).await,
        Commands::Stats(args) => run_stats(&cwd, args).await,
    }
}

async fn run_init(cwd: &Path, args: InitArgs) -> Result<()> {
    let result = init::init(cwd, args.epic_label.as_deref()).await?;
    println!(
        "Initialized trellis repository in {} (epic label: {})",
        result.trellis_dir.display(),
        result.epic_label
    );
    Ok(())
}

async fn run_render(cwd: &Path, args: RenderArgs) -> Result<()> {
    let app = App::from_directory(cwd).await?;
    let dot = app.resolve_and_render(RenderOptions {
        hide_closed: args.hide_closed,
        hide_orphans: args.hide_orphans,
    })?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &dot).await?;
            println!("Wrote {}", path.display());
        }
        None => print!("{dot}"),
    }
    Ok(())
}

async fn run_resolve(cwd: &Path) -> Result<()> {
    let mut app = App::from_directory(cwd).await?;
    app.resolve();
    app.save().await?;
    println!("Resolved {} issues", app.collection().len());
    Ok(())
}

async fn run_stats(cwd: &Path, args: StatsArgs) -> Result<()> {
    let mut app = App::from_directory(cwd).await?;
    app.resolve();

    let collection = app.collection();
    let total = collection.len();
    let open = collection.iter().filter(|i| !i.is_closed()).count();
    let hidden = collection.iter().filter(|i| i.hidden).count();
    let orphans = collection
        .iter()
        .filter(|i| !i.hidden && i.is_orphan)
        .count();
    let epics = collection
        .iter()
        .filter(|i| i.is_epic(&app.config().epic_label))
        .count();
    let edges: usize = collection.iter().map(|i| i.depends_on.len()).sum();
    let cycle = collection.find_cycle();

    if args.json {
        let stats = serde_json::json!({
            "issues": total,
            "open": open,
            "hidden": hidden,
            "orphans": orphans,
            "epics": epics,
            "edges": edges,
            "cycle": cycle.as_ref().map(|urls| {
                urls.iter().map(ToString::to_string).collect::<Vec<_>>()
            }),
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Issues:  {total} ({open} open, {hidden} hidden)");
    println!("Orphans: {orphans}");
    println!("Epics:   {epics}");
    println!("Edges:   {edges}");
    match cycle {
        Some(urls) => println!("Cycle:   {}", urls_line(&urls)),
        None => println!("Cycle:   none"),
    }
    Ok(())
}

fn urls_line(urls: &[crate::domain::IssueUrl]) -> String {
    urls.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
