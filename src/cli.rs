use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pricing-sim", version, about = "Cloud video analytics pricing simulator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start {
        /// Path to PID file
        #[arg(short, long)]
        pid_file: Option<PathBuf>,
    },

    /// Re-read the price workbooks of a running server (sends SIGHUP)
    Reload {
        /// Path to PID file
        #[arg(short, long)]
        pid_file: Option<PathBuf>,
    },

    /// Validate configuration and load both catalogs
    Test,

    /// Print a price catalog as a table
    Catalog {
        /// Show the grouped solutions workbook instead of the services one
        #[arg(short, long)]
        legacy: bool,
    },

    /// Compute a quote from a JSON request file and print its summary
    Quote {
        /// Quote request file (`{"items": [...], "marginPercent": 30}`)
        file: PathBuf,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Start { pid_file: None })
    }
}
