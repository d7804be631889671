//! # efile CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// BSA e-filing batch toolchain.
///
/// Validates batch documents, converts between the XML and JSON wire
/// formats, and renumbers document trees before submission.
#[derive(Parser, Debug)]
#[command(name = "efile", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a batch document.
    Validate(efile_cli::validate::ValidateArgs),
    /// Convert a batch document between wire formats.
    Convert(efile_cli::convert::ConvertArgs),
    /// Assign sequence numbers and regenerate aggregate attributes.
    Renumber(efile_cli::renumber::RenumberArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => efile_cli::validate::run(args),
        Commands::Convert(args) => efile_cli::convert::run(args),
        Commands::Renumber(args) => efile_cli::renumber::run(args),
    }
}
