mod cli_commands;
mod cli_exec;
mod cli_runtime;

pub(crate) use cli_commands::Commands;
pub(crate) use cli_commands::catalog::ServicesCommands;
pub(crate) use cli_commands::settings::ConfigCommands;

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
