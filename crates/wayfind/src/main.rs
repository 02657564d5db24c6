mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wayfind_core::ConfigLoader;

#[derive(Parser)]
#[command(name = "wayfind", version, about = "Turn recorded browser actions into replayable workflows")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to ./wayfind.yaml, then ~/.wayfind/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a recorded trace into a workflow definition
    Convert {
        /// Recorded trace (JSON)
        trace: PathBuf,
        /// Workflow name (defaults to the trace name, then the file name)
        #[arg(long)]
        name: Option<String>,
        /// Workflow description
        #[arg(long)]
        description: Option<String>,
        /// Output file; `.yaml`/`.yml` writes YAML, anything else JSON. Prints to stdout if omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Resolve the target of one workflow step against a page snapshot
    Resolve {
        /// Workflow definition (JSON or YAML)
        workflow: PathBuf,
        /// Zero-based step index
        #[arg(long)]
        step: usize,
        /// Page snapshot (JSON)
        snapshot: PathBuf,
    },
    /// Print the locator strategies generated for a captured element
    Strategies {
        /// Captured element (JSON)
        element: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };

    match args.command {
        Command::Convert {
            trace,
            name,
            description,
            output,
        } => {
            commands::convert(&config, &trace, name, description, output.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve {
            workflow,
            step,
            snapshot,
        } => {
            let found = commands::resolve(&config, &workflow, step, &snapshot).await?;
            Ok(if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Strategies { element } => {
            commands::strategies(&config, &element).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
