//! Table commands: insert, delete, list and describe

pub mod handler;

use clap::Args;

pub use handler::{handle_delete_command, handle_describe_command, handle_insert_command, handle_tables_command};

use crate::sheets::{CellValue, Record, WhereClause};

#[derive(Args, Debug, Clone)]
pub struct InsertArgs {
    /// Table name as listed in the directory
    pub table: String,

    /// Column value, repeatable: --set Name=Rex --set Age=3
    #[arg(short = 's', long = "set", value_name = "COLUMN=VALUE", value_parser = parse_assignment, required = true)]
    pub values: Vec<(String, String)>,
}

impl InsertArgs {
    /// Fields in the order given on the command line, as typed. The sheet
    /// interprets them on write.
    pub fn record(&self) -> Record {
        self.values
            .iter()
            .fold(Record::new(), |record, (column, value)| {
                record.with(column.clone(), value.clone())
            })
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Table name as listed in the directory
    pub table: String,

    /// Equality predicate; only the first one is applied
    #[arg(short = 'w', long = "where", value_name = "COLUMN=VALUE", value_parser = parse_assignment, required = true)]
    pub predicates: Vec<(String, String)>,
}

impl DeleteArgs {
    /// Predicates compare against the cell text as displayed, so values are
    /// kept exactly as typed
    pub fn where_clause(&self) -> WhereClause {
        self.predicates
            .iter()
            .fold(WhereClause::new(), |clause, (column, value)| {
                clause.and(column.clone(), CellValue::from(value.clone()))
            })
    }
}

#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    /// Table name as listed in the directory
    pub table: String,
}

/// Split `COLUMN=VALUE` at the first `=`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", s))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    Ok((column.to_string(), value.to_string()))
}
