use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use prs_hook::cli::{self, Cli, Command, ConfigCommand};
use prs_hook::orchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    // Default to run when no subcommand is given.
    let command = cli.command.unwrap_or(Command::Run { event: None });

    match command {
        Command::Run { event } => {
            let (config, _config_path) = cli::load_config()?;
            orchestrator::run(&config, event.map(PathBuf::from)).await?;
            Ok(())
        }
        Command::Check { tenant } => {
            let (config, _config_path) = cli::load_config()?;
            orchestrator::check(&config, &tenant).await?;
            Ok(())
        }
        Command::Config(ConfigCommand::Validate) => {
            let (config, config_path) = cli::load_config()?;
            if !cli::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => {
            let (config, _config_path) = cli::load_config()?;
            cli::show(&config)
        }
        Command::Version => {
            println!("prsense {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Compact stderr-only tracing so diagnostic output never pollutes stdout.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
