//! BFarm CLI - Command-line interface for the BFarm API.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use tracing::debug;

/// BFarm CLI - authenticate against the BFarm API and issue requests.
#[derive(Parser)]
#[command(name = "bfarm")]
#[command(about = "BFarm CLI for authentication and API access")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Email address (prompted when omitted)
        #[arg(long, env = "BFARM_EMAIL")]
        email: Option<String>,
    },

    /// Logout and clear the stored credential
    Logout,

    /// Check authentication status
    Status,

    /// Show the identity decoded from the access token
    Whoami,

    /// Issue an authenticated GET request and print the JSON response
    Get {
        /// Request path, e.g. /items
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    bfarm_config::init_logging(&cli.log_level);
    debug!(log_level = %cli.log_level, "CLI starting");

    let exit_code = match &cli.command {
        Commands::Login { email } => commands::login(email.as_deref(), &cli.format).await?,
        Commands::Logout => commands::logout(&cli.format)?,
        Commands::Status => commands::status(&cli.format)?,
        Commands::Whoami => commands::whoami(&cli.format)?,
        Commands::Get { path } => commands::get(path, &cli.format).await?,
    };

    std::process::exit(exit_code);
}
