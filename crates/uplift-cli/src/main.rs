mod cmd;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "uplift",
    about = "Upgrade an app project's configuration layout to the v3 schema",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .appkit/ or .git/)
    #[arg(long, global = true, env = "UPLIFT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the project can be upgraded
    Status,

    /// Upgrade the project, with full rollback on any failure
    Upgrade,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Upgrade => cmd::upgrade::run(&root, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
