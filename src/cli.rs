use clap::Parser;

use crate::service::report_service::PersistMode;

/// Counts recently updated events per hour and records them to CSV.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// dotenv-style config file; `.env` is read when present
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Overrides PERSIST_MODE (merge | delayed)
    #[arg(long)]
    pub mode: Option<PersistMode>,
}
