//! A1-style coordinates for tables stored in a spreadsheet
//!
//! Tables are addressed by range descriptors such as `B5:D12`: a single
//! column letter and a 1-based row on each side of the colon. Only the
//! single-letter columns `A` through `Z` are supported, and rows run from 1
//! to [`MAX_ROW`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use super::error::SheetError;

/// Highest row a document can hold (the service caps a document at ten
/// million cells)
pub const MAX_ROW: u32 = 10_000_000;

static RANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z])(\d+):([A-Za-z])(\d+)$").expect("valid range regex"));

/// A single spreadsheet column, `A` through `Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column(u8);

impl Column {
    /// Number of addressable columns (`A`..=`Z`)
    pub const COUNT: u8 = 26;

    /// Build a column from a 0-based index (0 = `A`)
    pub fn from_index(index: u8) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    /// Build a column from its letter, case-insensitively
    pub fn from_letter(letter: char) -> Option<Self> {
        if letter.is_ascii_alphabetic() {
            Some(Self(letter.to_ascii_uppercase() as u8 - b'A'))
        } else {
            None
        }
    }

    /// 0-based index of this column
    pub fn index(self) -> u8 {
        self.0
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }

    /// Column `by` places to the right of this one.
    ///
    /// Fails instead of wrapping when the result would pass `Z`.
    pub fn offset(self, by: usize) -> Result<Self, SheetError> {
        (self.0 as usize)
            .checked_add(by)
            .and_then(|target| u8::try_from(target).ok())
            .and_then(Self::from_index)
            .ok_or(SheetError::ColumnOutOfRange {
                column: self.letter(),
                offset: by,
            })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Absolute address of one cell, e.g. `C5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: Column,
    /// 1-based row number
    pub row: u32,
}

impl CellRef {
    pub fn new(column: Column, row: u32) -> Self {
        Self { column, row }
    }

    /// Whole-column range for this cell's column, e.g. `C:C`
    pub fn column_range(&self) -> String {
        format!("{0}:{0}", self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Rectangular region of the document holding one table
///
/// The start row is the table's header row; the end row is the last
/// populated data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeDescriptor {
    pub start_col: Column,
    pub start_row: u32,
    pub end_col: Column,
    pub end_row: u32,
}

impl RangeDescriptor {
    pub fn new(start_col: Column, start_row: u32, end_col: Column, end_row: u32) -> Self {
        Self {
            start_col,
            start_row,
            end_col,
            end_row,
        }
    }

    /// Single-row range directly below the table, spanning the same columns.
    /// This is where an inserted row lands. Parsed ranges end at or before
    /// [`MAX_ROW`], so this cannot overflow.
    pub fn next_row_range(&self) -> Self {
        let row = self.end_row + 1;
        Self::new(self.start_col, row, self.end_col, row)
    }

    /// Single-row range covering the header row
    pub fn header_range(&self) -> Self {
        self.row_range(self.start_row)
    }

    /// Single-row range at an absolute `row`, spanning the table's columns
    pub fn row_range(&self, row: u32) -> Self {
        Self::new(self.start_col, row, self.end_col, row)
    }

    /// Number of columns the table spans
    pub fn width(&self) -> usize {
        (self.end_col.index() as usize).saturating_sub(self.start_col.index() as usize) + 1
    }
}

impl fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.start_col, self.start_row, self.end_col, self.end_row
        )
    }
}

impl FromStr for RangeDescriptor {
    type Err = SheetError;

    /// Parse `<col><row>:<col><row>`, e.g. `A5:C12`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SheetError::MalformedRange(s.to_string());

        let caps = RANGE_PATTERN.captures(s.trim()).ok_or_else(malformed)?;

        let column = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().chars().next())
                .and_then(Column::from_letter)
                .ok_or_else(malformed)
        };
        let row = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|row| (1..=MAX_ROW).contains(row))
                .ok_or_else(malformed)
        };

        Ok(Self::new(column(1)?, row(2)?, column(3)?, row(4)?))
    }
}

/// Parse a range descriptor string such as `A5:C12`
pub fn parse_range_descriptor(text: &str) -> Result<RangeDescriptor, SheetError> {
    text.parse()
}
