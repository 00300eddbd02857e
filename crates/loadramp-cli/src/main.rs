mod cmd;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "loadramp",
    about = "Retry driver for an external load-test harness: doubles archived ramp-up heights between attempts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working directory (default: auto-detect from loadramp.yaml or config.tcl)
    #[arg(long, global = true, env = "LOADRAMP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default loadramp.yaml
    Init,

    /// Run the retry loop until the harness log reports success
    Run {
        /// Harness command override (whitespace-separated argv)
        #[arg(long)]
        command: Option<String>,

        /// Mutate-cycle cap override
        #[arg(long)]
        max_cycles: Option<u32>,
    },

    /// Run one mutation pipeline pass without invoking the harness
    Mutate,

    /// Print the scenario-level ramp-up height mapping
    Heights,

    /// Validate loadramp.yaml for common mistakes
    Validate,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run { .. } | Commands::Mutate => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Run {
            command,
            max_cycles,
        } => cmd::run::run(&root, command.as_deref(), max_cycles),
        Commands::Mutate => cmd::mutate::run(&root),
        Commands::Heights => cmd::heights::run(&root, cli.json),
        Commands::Validate => cmd::validate::run(&root, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
