//! The remote operations the table layer needs from a spreadsheet service

use async_trait::async_trait;

use super::value::CellValue;
use crate::api::{BatchClearValuesResponse, RemoteError, UpdateValuesResponse, ValueInputOption};

/// Read/write/clear access to ranges of a spreadsheet document
///
/// Ranges are A1 notation strings (`A1:B3`, `C:C`). Implementations must not
/// retry; each call is a single attempt.
#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    /// Read a range as rows of cells. Blank rows inside the range come back
    /// as empty rows; trailing blank rows may be missing entirely.
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<CellValue>>, RemoteError>;

    /// Overwrite `range` with exactly one row of values
    async fn write_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<CellValue>,
        input: ValueInputOption,
    ) -> Result<UpdateValuesResponse, RemoteError>;

    /// Blank every cell in `ranges` without removing rows
    async fn clear_ranges(
        &self,
        spreadsheet_id: &str,
        ranges: Vec<String>,
    ) -> Result<BatchClearValuesResponse, RemoteError>;
}
