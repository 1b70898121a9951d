//! Table directory lookup and header resolution

use std::collections::HashMap;

use super::Sheets;
use super::error::SheetError;
use super::range::{CellRef, RangeDescriptor, parse_range_descriptor};

/// One row of the directory: a table name and its range text as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub table: String,
    pub range: String,
}

impl DirectoryEntry {
    /// Parse the stored range text
    pub fn descriptor(&self) -> Result<RangeDescriptor, SheetError> {
        self.range.parse()
    }
}

/// Column name to header cell, for one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, CellRef>,
    order: Vec<String>,
}

impl HeaderMap {
    /// Header cell for `name`, if the table has such a column
    pub fn get(&self, name: &str) -> Option<CellRef> {
        self.columns.get(name).copied()
    }

    /// Column names in sheet order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Entries in sheet order
    pub fn iter(&self) -> impl Iterator<Item = (&str, CellRef)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.columns.get(name).map(|cell| (name.as_str(), *cell)))
    }

    fn insert(&mut self, name: String, cell: CellRef) {
        if self.columns.insert(name.clone(), cell).is_some() {
            // Later header cell with the same name wins
            self.order.retain(|n| n != &name);
        }
        self.order.push(name);
    }
}

impl Sheets {
    /// Read every directory row (column A names, column B ranges)
    pub async fn read_directory(&self) -> Result<Vec<DirectoryEntry>, SheetError> {
        let names = self.read("A:A").await?;
        let row_count = names.len();
        if row_count == 0 {
            return Ok(Vec::new());
        }

        let rows = self.read(&format!("A1:B{}", row_count)).await?;
        let entries = rows
            .into_iter()
            .filter_map(|row| {
                let mut cells = row.into_iter();
                let table = cells.next()?.to_string();
                if table.is_empty() {
                    return None;
                }
                let range = cells.next().map(|c| c.to_string()).unwrap_or_default();
                Some(DirectoryEntry { table, range })
            })
            .collect();

        Ok(entries)
    }

    /// Find the range currently holding `table`
    pub async fn resolve_table_range(&self, table: &str) -> Result<RangeDescriptor, SheetError> {
        let directory: HashMap<String, String> = self
            .read_directory()
            .await?
            .into_iter()
            .map(|entry| (entry.table, entry.range))
            .collect();

        let range_text = directory
            .get(table)
            .ok_or_else(|| SheetError::TableNotFound {
                table: table.to_string(),
            })?;

        let range = parse_range_descriptor(range_text)?;
        log::debug!("Table {} spans {}", table, range);
        Ok(range)
    }

    /// Read the header row of `range` and locate each named column
    pub async fn header_map(
        &self,
        table: &str,
        range: &RangeDescriptor,
    ) -> Result<HeaderMap, SheetError> {
        let header_range = range.header_range();
        let rows = self.read(&header_range.to_string()).await?;

        let header = match rows.into_iter().next() {
            Some(row) if row.iter().any(|c| !c.is_empty()) => row,
            _ => {
                return Err(SheetError::EmptyHeader {
                    table: table.to_string(),
                });
            }
        };

        let mut map = HeaderMap::default();
        for (index, cell) in header.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let column = range.start_col.offset(index)?;
            map.insert(cell.to_string(), CellRef::new(column, range.start_row));
        }

        log::debug!("Header of {}: {:?}", table, map.names());
        Ok(map)
    }
}
