use anyhow::Result;

mod app;

mod commands;
mod input;
mod modal;
mod suggest;
mod views;

// Make core TUI types available to submodules via `super::...`.
use app::{App, CommandDef, Page};

pub(crate) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
