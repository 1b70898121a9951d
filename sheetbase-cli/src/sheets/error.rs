//! Error types for spreadsheet table operations

use thiserror::Error;

use crate::api::RemoteError;

/// Everything that can go wrong while resolving or modifying a table
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Table '{table}' is not listed in the directory")]
    TableNotFound { table: String },

    #[error("Invalid range descriptor '{0}' (expected e.g. 'A1:C10')")]
    MalformedRange(String),

    #[error("Column {column} offset by {offset} runs past column Z")]
    ColumnOutOfRange { column: char, offset: usize },

    #[error("Row {row} is past the last row a document can hold")]
    RowOutOfRange { row: usize },

    #[error("Table '{table}' has no header row")]
    EmptyHeader { table: String },

    #[error("Table '{table}' has no column named '{column}'")]
    UnknownColumn { table: String, column: String },

    #[error("A where clause needs at least one column = value pair")]
    EmptyPredicate,

    #[error("No record in '{table}' where {column} = {value}")]
    RecordNotFound {
        table: String,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
