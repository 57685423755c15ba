use clap::{Parser, Subcommand};

use prs_domain::config::{Config, ConfigSeverity};

/// PRSense — bilingual pull-request summaries with a monthly quota.
#[derive(Debug, Parser)]
#[command(name = "prsense", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Handle one pull-request event end to end (default when no
    /// subcommand is given).
    Run {
        /// Path to the event payload JSON (defaults to $GITHUB_EVENT_PATH).
        #[arg(long)]
        event: Option<String>,
    },
    /// Print the quota decision for a tenant. Consumes no quota.
    Check {
        /// Tenant (owning account) id.
        tenant: String,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `PRSENSE_CONFIG` (or
/// `config.toml` by default). Returns the parsed [`Config`] and the path
/// that was used. A missing file is not an error: every field has a
/// default, and deployments that configure everything through the
/// environment carry no config file at all.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path =
        std::env::var("PRSENSE_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        Config::default()
    };

    Ok((config, config_path))
}

/// Print validation issues; returns `false` when any is an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();
    if issues.is_empty() {
        println!("{config_path}: OK");
        return true;
    }
    for issue in &issues {
        println!("{issue}");
    }
    !issues
        .iter()
        .any(|i| i.severity == ConfigSeverity::Error)
}

/// Dump the resolved configuration as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
