use clap::{Subcommand, ValueEnum};

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ConfigKey {
    AuthUrl,
    CatalogUrl,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Persist a backend URL in the data dir
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        value: String,
    },
}
