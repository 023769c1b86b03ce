//! Command line front end.
//!
//! ```sh
//! ontograph start --port 8000
//! ontograph --environment production export --output snapshot.json
//! ontograph search "mass analyzer"
//! ontograph term MS:1000031
//! ontograph clean-markup data/psi-ms-zh.owl
//! ```

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::{
    boot,
    config::{self, Config},
    environment::{resolve_from_env, Environment},
    logger::{self, Output},
    ontology::{ConceptNode, MarkupCleaner, OntologyService},
    Result,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration environment (`config/<environment>.yaml`).
    #[arg(global = true, short, long, default_value_t = resolve_from_env())]
    environment: String,

    /// Folder holding the configuration files.
    #[arg(global = true, long, default_value = config::DEFAULT_FOLDER)]
    config_folder: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Start {
        /// Server binding, overriding the configuration.
        #[arg(short, long)]
        binding: Option<String>,
        /// Server port, overriding the configuration.
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Build the concept graph and write it as JSON.
    Export {
        /// Destination file. Defaults to a timestamped file in the export directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print graph statistics.
    Stats,
    /// Search labels and definitions.
    Search {
        query: String,
    },
    /// Print one term as JSON.
    Term {
        id: String,
    },
    /// Escape stray markup in labels and definitions of an ontology file.
    CleanMarkup {
        input: PathBuf,
        /// Destination file. Defaults to `<stem>_cleaned.owl` next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parses the process arguments and runs the selected command.
///
/// # Errors
/// Any failure of the selected command.
pub async fn main() -> Result<ExitCode> {
    run(Cli::parse()).await
}

/// Runs an already parsed command line.
///
/// # Errors
/// Any failure of the selected command.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let environment = Environment::from(cli.environment);
    let folder = cli.config_folder.as_path();

    match cli.command {
        Commands::Start { binding, port } => {
            let config = prepare(&environment, folder, Output::Stdout)?;
            let ctx = boot::create_context(&environment, config).await?;
            boot::serve(ctx, binding, port).await?;
        }
        Commands::Export { output } => {
            let service = offline_service(&environment, folder)?;
            let nodes = service.statistics()?.total_terms;
            let path = service.export_snapshot(output.as_deref())?;
            println!("{} {}", "exported to".green(), path.display());
            println!("{} {nodes}", "nodes:".bold());
        }
        Commands::Stats => {
            let stats = offline_service(&environment, folder)?.statistics()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Search { query } => {
            let hits = offline_service(&environment, folder)?.search(&query)?;
            for node in &hits {
                print_hit(node);
            }
            println!("{} {}", hits.len().to_string().bold(), "matching terms".dimmed());
        }
        Commands::Term { id } => {
            let Some(node) = offline_service(&environment, folder)?.get_by_id(&id)? else {
                eprintln!("{}", format!("Term with ID '{id}' not found").red());
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", serde_json::to_string_pretty(&node)?);
        }
        Commands::CleanMarkup { input, output } => {
            let (path, rewritten) =
                MarkupCleaner::default().clean_file(&input, output.as_deref())?;
            println!(
                "{} {} ({rewritten} fragments rewritten)",
                "cleaned document written to".green(),
                path.display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads the configuration and installs the logger.
fn prepare(environment: &Environment, folder: &Path, output: Output) -> Result<Config> {
    let config = environment.load_from_folder(folder)?;
    logger::init(&config.logger, output);
    Ok(config)
}

/// Service for one-shot commands. Logs go to stderr so stdout stays parseable.
fn offline_service(environment: &Environment, folder: &Path) -> Result<OntologyService> {
    let config = prepare(environment, folder, Output::Stderr)?;
    Ok(OntologyService::from_config(&config.ontology))
}

fn print_hit(node: &ConceptNode) {
    let label = node.label().or(node.label_zh()).unwrap_or("-");
    match node.label_zh().filter(|zh| Some(*zh) != node.label()) {
        Some(zh) => println!("{}  {label} / {zh}", node.id().cyan()),
        None => println!("{}  {label}", node.id().cyan()),
    }
}
