//! Subcommand definitions and handlers

pub mod config;
pub mod table;

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Append a row to a table; its ID is assigned from the row position
    Insert(table::InsertArgs),
    /// Blank the first row of a table matching a column value
    Delete(table::DeleteArgs),
    /// List the tables in the directory (columns A:B)
    Tables,
    /// Show a table's range and column layout
    Describe(table::DescribeArgs),
    /// Inspect configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),
}
