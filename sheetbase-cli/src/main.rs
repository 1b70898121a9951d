mod api;
mod cli;
mod config;
mod sheets;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use cli::Cli;
use cli::commands::Commands;
use cli::commands::config::handle_config_command;
use cli::commands::table::{
    handle_delete_command, handle_describe_command, handle_insert_command, handle_tables_command,
};
use config::Config;
use sheets::Sheets;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(id) = cli.spreadsheet.clone() {
        config.spreadsheet_id = Some(id);
    }

    match cli.command {
        Commands::Config(cmd) => handle_config_command(cmd, &config),
        Commands::Insert(args) => handle_insert_command(args, &connect(&config)?).await,
        Commands::Delete(args) => handle_delete_command(args, &connect(&config)?).await,
        Commands::Tables => handle_tables_command(&connect(&config)?).await,
        Commands::Describe(args) => handle_describe_command(args, &connect(&config)?).await,
    }
}

/// Open the configured spreadsheet through the Sheets API
fn connect(config: &Config) -> Result<Sheets> {
    let client = config.client()?;
    log::debug!("Using Sheets API at {}", client.base_url());
    let sheets = Sheets::new(Arc::new(client), config.spreadsheet_id()?);
    log::debug!("Using spreadsheet {}", sheets.spreadsheet_id());
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::AuthConfig;

    #[test]
    fn test_connect_requires_credentials_and_spreadsheet() {
        let mut config = Config {
            spreadsheet_id: Some("doc".into()),
            auth: AuthConfig {
                access_token: Some("tok".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let sheets = connect(&config).unwrap();
        assert_eq!(sheets.spreadsheet_id(), "doc");

        config.spreadsheet_id = None;
        assert!(connect(&config).is_err());
    }
}
