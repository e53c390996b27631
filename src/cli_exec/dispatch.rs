use super::catalog::{handle_categories_command, handle_services_command};
use super::session::{
    handle_login_command, handle_logout_command, handle_probe_command, handle_register_command,
    handle_whoami_command,
};
use super::settings::handle_config_command;
use super::*;

pub(super) fn handle_command(config: ClientConfig, command: Commands) -> Result<()> {
    let env = CliEnv::open(config)?;
    match command {
        Commands::Login(args) => handle_login_command(&env, args.email, args.password)?,
        Commands::Logout => handle_logout_command(&env)?,
        Commands::Register(args) => {
            handle_register_command(&env, args.email, args.password, args.role.into())?
        }
        Commands::Whoami(args) => handle_whoami_command(&env, args.json)?,
        Commands::Probe(args) => handle_probe_command(&env, args.target.into())?,
        Commands::Categories(args) => handle_categories_command(&env, args.landing, args.json)?,
        Commands::Services { command } => handle_services_command(&env, command)?,
        Commands::Config { command } => handle_config_command(&env, command)?,
    }
    Ok(())
}
