use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use redfreelance::config::{ClientConfig, ConfigOverrides};
use redfreelance::logging::{self, LogTarget};

use crate::Commands;

#[derive(Parser)]
#[command(name = "redfreelance")]
#[command(about = "RedFreelance marketplace client", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the session store, config and logs
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL of the auth service
    #[arg(long, global = true, value_name = "URL")]
    auth_url: Option<String>,

    /// Base URL of the service catalog
    #[arg(long, global = true, value_name = "URL")]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        data_dir: cli.data_dir,
        auth_url: cli.auth_url,
        catalog_url: cli.catalog_url,
    };
    let config = ClientConfig::resolve(&overrides)?;

    match cli.command {
        None => {
            logging::init(LogTarget::File(config.log_path()))?;
            redfreelance::tui::run(redfreelance::tui::TuiRunOptions { config })?;
        }
        Some(command) => {
            logging::init(LogTarget::Stderr)?;
            crate::cli_exec::handle_command(config, command)?
        }
    }

    Ok(())
}
