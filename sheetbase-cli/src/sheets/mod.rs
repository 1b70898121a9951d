//! Spreadsheet-backed table store
//!
//! A single spreadsheet document acts as a tiny database. Columns A and B of
//! the document form a directory mapping each table name to the range that
//! currently holds it (`Dogs | B5:D12`). Each table's first row is a header
//! naming its columns; data rows follow directly below.
//!
//! Nothing is cached: every operation re-reads the directory and, for
//! deletes, the header row. There is no locking, so two writers racing on
//! the same table can both claim the same next row.

pub mod directory;
pub mod error;
pub mod range;
pub mod service;
pub mod table;
pub mod value;

pub use directory::{DirectoryEntry, HeaderMap};
pub use error::SheetError;
pub use range::RangeDescriptor;
pub use service::SpreadsheetService;
pub use table::{Record, WhereClause};
pub use value::CellValue;

use std::sync::Arc;

/// Handle to one spreadsheet document used as a table store
#[derive(Clone)]
pub struct Sheets {
    service: Arc<dyn SpreadsheetService>,
    spreadsheet_id: String,
}

impl Sheets {
    pub fn new(service: Arc<dyn SpreadsheetService>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            service,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn read(&self, range: &str) -> Result<Vec<Vec<CellValue>>, SheetError> {
        log::debug!("Reading range {}", range);
        Ok(self.service.read_range(&self.spreadsheet_id, range).await?)
    }
}

impl std::fmt::Debug for Sheets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sheets")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}
