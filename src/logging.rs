use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const ENV_LOG: &str = "REDFREELANCE_LOG";

pub enum LogTarget {
    Stderr,
    /// The TUI owns the terminal, so its diagnostics go to a file.
    File(PathBuf),
}

pub fn init(target: LogTarget) -> Result<()> {
    match target {
        LogTarget::Stderr => {
            let filter = EnvFilter::try_from_env(ENV_LOG)
                .unwrap_or_else(|_| EnvFilter::new("redfreelance=warn"));
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("install stderr logger")?;
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).context("create log directory")?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let filter = EnvFilter::try_from_env(ENV_LOG)
                .unwrap_or_else(|_| EnvFilter::new("redfreelance=info"));
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .context("install file logger")?;
        }
    }
    Ok(())
}
