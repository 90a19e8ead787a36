//! Configuration commands: `bangbang config`.

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    use bangbang::config::{BangbangConfig, BangbangToml, CONFIG_FILE_NAME};

    let config_path = dir.join(CONFIG_FILE_NAME);

    match command {
        None | Some(ConfigCommands::Show) => {
            if config_path.exists() {
                println!("# Config file: {}", config_path.display());
            } else {
                println!("# No {} found; showing defaults", CONFIG_FILE_NAME);
            }
            // Effective values, with env overrides applied.
            let config = BangbangConfig::load(dir.to_path_buf())?;
            print!("{}", config.toml.to_toml_string()?);
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                anyhow::bail!("{} already exists at {}", CONFIG_FILE_NAME, config_path.display());
            }
            BangbangToml::default().save(&config_path)?;
            println!("Created {}", config_path.display());
        }
    }

    Ok(())
}
