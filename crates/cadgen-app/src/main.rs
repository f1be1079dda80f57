//! Text-to-CAD generator.
//!
//! Sends a natural-language description to the Zoo text-to-CAD API, waits
//! for the model and saves it as a STEP or STL file.

mod config;
mod error;
mod generate;
mod progress;
mod prompts;
mod staging;

use std::process::ExitCode;

use cadgen_core::OutputFormat;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::generate::GenerateArgs;
use crate::prompts::EXAMPLE_PROMPTS;

/// Generate CAD models from text descriptions
#[derive(Parser)]
#[command(name = "cadgen")]
#[command(about = "Generate CAD files from natural-language descriptions")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a CAD file from a prompt
    Generate(GenerateArgs),

    /// List example prompts to try
    Examples,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Examples => {
            println!("Example prompts:");
            for prompt in EXAMPLE_PROMPTS {
                println!("  {prompt}");
            }
            println!("\nFormats:");
            for format in OutputFormat::all() {
                println!("  {format:<5} {}", format.description());
            }
            ExitCode::SUCCESS
        }
        Commands::Generate(args) => match generate::run(args).await {
            Ok(outcome) => {
                println!("CAD file saved to: {}", outcome.path.display());
                if outcome.artifact.is_degraded() {
                    println!(
                        "note: taken from the service's '{}' output",
                        outcome.artifact.source_key
                    );
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error[{}]: {err}", err.label());
                if let Some(hint) = err.hint() {
                    eprintln!("hint: {hint}");
                }
                ExitCode::from(err.exit_code())
            }
        },
    }
}
