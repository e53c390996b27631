use redfreelance::config::{ConfigFile, normalize_base_url, read_config_file, write_config_file};

use crate::cli_commands::settings::ConfigKey;

use super::*;

pub(super) fn handle_config_command(env: &CliEnv, command: ConfigCommands) -> Result<()> {
    let config = &env.config;
    match command {
        ConfigCommands::Show { json } => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "auth_url": config.auth_url,
                        "catalog_url": config.catalog_url,
                        "data_dir": config.data_dir.display().to_string(),
                    })
                );
            } else {
                println!("auth_url: {}", config.auth_url);
                println!("catalog_url: {}", config.catalog_url);
                println!("data_dir: {}", config.data_dir.display());
            }
        }
        ConfigCommands::Set { key, value } => {
            let mut file = read_config_file(&config.data_dir)?.unwrap_or(ConfigFile {
                version: 1,
                ..Default::default()
            });
            let value = normalize_base_url(&value)?;
            match key {
                ConfigKey::AuthUrl => file.auth_url = Some(value),
                ConfigKey::CatalogUrl => file.catalog_url = Some(value),
            }
            write_config_file(&config.data_dir, &file)?;
            println!("Saved {}", config.data_dir.join("config.json").display());
        }
    }
    Ok(())
}
