/*
[INPUT]:  CLI arguments, optional YAML configuration file, KORBIT_* env vars
[OUTPUT]: Pretty-printed JSON from the selected endpoint
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use korbit_adapter::{Credentials, KorbitClient};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::Command;
use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "korbit", version, about = "Korbit exchange API client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    let client_config = config.client_config();
    info!(
        base_url = %client_config.base_url,
        api_version = %client_config.api_version,
        "configuration loaded"
    );

    let credentials = if args.command.is_private() {
        config.credentials()?
    } else {
        Credentials::empty()
    };

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let client = KorbitClient::with_config(client_config, credentials)
        .context("build Korbit client")?;

    match commands::run(&client, args.command).await {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Err(err) => {
            error!(kind = ?err.kind(), message = %err.message(), "request failed");
            Err(err.into())
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<CliConfig> {
    let path_str = path
        .to_str()
        .context("config path must be valid utf-8")?;
    CliConfig::from_file(path_str).context("load config")
}
