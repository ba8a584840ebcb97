//! # ponto CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity maps onto the tracing filter.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ponto_cli::certificate::{run_certificate, CertificateArgs};
use ponto_cli::files::{run_files, FilesArgs};
use ponto_cli::generate::{run_generate, GenerateArgs};
use ponto_cli::run_migrate;

/// ponto — compliance file toolchain
///
/// Generates and signs the AFD and AEJ audit files required by Portaria
/// MTP 671/2021, and manages the employer digital certificates that make
/// signing possible.
#[derive(Parser, Debug)]
#[command(name = "ponto", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate AFD/AEJ compliance files.
    Generate(GenerateArgs),

    /// Certificate lifecycle (validate, store, status, remove).
    Certificate(CertificateArgs),

    /// Generated-file management (list, download, sign, delete).
    Files(FilesArgs),

    /// Apply the database migrations this stack owns.
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("ponto CLI starting");

    let result = match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Certificate(args) => run_certificate(args).await,
        Commands::Files(args) => run_files(args).await,
        Commands::Migrate => run_migrate().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
