//! Command-line interface

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "sheetbase", version, about = "Use a Google Sheets spreadsheet as a table store")]
pub struct Cli {
    /// Config file (default: <config dir>/sheetbase/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Spreadsheet ID, overriding config and environment
    #[arg(long, global = true, value_name = "ID")]
    pub spreadsheet: Option<String>,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}
