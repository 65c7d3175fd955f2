//! Slugline CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP API gateway
//! - `assist` — Run the agent once against a screenplay file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "slugline",
    about = "Slugline — screenplay writing agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the agent once against a screenplay file
    Assist {
        /// What you want done
        message: String,

        /// Screenplay file to read and update in place. Omit to start
        /// from a blank screenplay printed to stdout.
        #[arg(short, long)]
        file: Option<std::path::PathBuf>,

        /// Writing voice from the [voices] config section
        #[arg(long)]
        voice: Option<String>,

        /// Emit raw NDJSON events instead of formatted progress
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Assist {
            message,
            file,
            voice,
            json,
        } => commands::assist::run(message, file, voice, json).await?,
    }

    Ok(())
}
