//! Configuration inspection commands

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration, tokens redacted
    Show,
    /// Print the default config file location
    Path,
}

pub fn handle_config_command(cmd: ConfigCommands, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let text = config.redacted().to_toml()?;
            if text.trim().is_empty() {
                println!("{}", "(empty configuration)".dimmed());
            } else {
                print!("{}", text);
            }
        }
        ConfigCommands::Path => match Config::default_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the config directory for this platform"),
        },
    }
    Ok(())
}
