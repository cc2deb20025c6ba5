//! `hookgrade` -- CLI binary for the hookgrade service.
//!
//! Provides the following subcommands:
//!
//! - `hookgrade serve` -- Run the HTTP API until Ctrl+C.
//! - `hookgrade grade` -- Grade one hook from the terminal.
//! - `hookgrade config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// Ad hook grading service.
#[derive(Parser)]
#[command(name = "hookgrade", about = "Grade short-form ad hooks", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(commands::serve::ServeArgs),

    /// Grade a single hook through the backend chain.
    Grade(commands::grade::GradeArgs),

    /// Show resolved configuration.
    Config {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Grade(args) => commands::grade::run(args).await?,
        Commands::Config { config } => {
            let cfg = commands::load_config(config.as_deref())?;
            commands::config_cmd::config_show(&cfg);
        }
    }

    Ok(())
}
