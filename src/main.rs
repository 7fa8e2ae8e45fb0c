#![allow(non_snake_case)]

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use eventCounter::cli::Cli;
use eventCounter::clients::connpass_client::ConnpassClient;
use eventCounter::config::{AppConfig, Settings};
use eventCounter::error::Result;
use eventCounter::tasks::collect_task::run_collection;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let get_prop = |key: &str| -> Option<String> { config.lookup(key) };

    let mut settings = Settings::resolve(get_prop)?;
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }

    let client = ConnpassClient::new(settings.host.clone())?;
    run_collection(&client, &settings, Utc::now()).await?;
    Ok(())
}
