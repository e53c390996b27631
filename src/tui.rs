use anyhow::Result;

use crate::config::ClientConfig;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    pub config: ClientConfig,
}

pub fn run(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run(opts)
}
