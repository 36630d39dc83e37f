use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod pid;

use pricing_simulator::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Logging settings come from the config; a broken config still gets
    // default logging so the error is reported
    let cfg = config::load_config(&args.config);
    match &cfg {
        Ok(c) => init_tracing(&c.server.log_level, &c.server.log_format),
        Err(_) => init_tracing("info", "text"),
    }

    match args.get_command() {
        cli::Commands::Version => {
            println!("Pricing Simulator v{}", env!("CARGO_PKG_VERSION"));
        }
        cli::Commands::Reload { pid_file } => {
            commands::reload::execute(pid_file)?;
        }
        cli::Commands::Start { pid_file } => {
            commands::start::execute(cfg?, pid_file).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(cfg?).await?;
        }
        cli::Commands::Catalog { legacy } => {
            commands::catalog::execute(cfg?, legacy).await?;
        }
        cli::Commands::Quote { file } => {
            commands::quote::execute(cfg?, &file).await?;
        }
    }

    Ok(())
}
