//! Row-level table operations: insert and delete

use super::Sheets;
use super::error::SheetError;
use super::range::MAX_ROW;
use super::value::{CellValue, values_match};
use crate::api::{BatchClearValuesResponse, UpdateValuesResponse, ValueInputOption};

/// Name of the identifier column every table starts with
pub const ID_COLUMN: &str = "ID";

/// Ordered field values for one row, in header column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; builder style
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Append a field, replacing any earlier field with the same name in place
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record with `ID` set to `id` as the first field
    fn with_id(&self, id: u32) -> Self {
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.push((ID_COLUMN.to_string(), CellValue::from(id)));
        fields.extend(
            self.fields
                .iter()
                .filter(|(name, _)| name != ID_COLUMN)
                .cloned(),
        );
        Self { fields }
    }

    /// Cell values in field order
    fn into_row(self) -> Vec<CellValue> {
        self.fields.into_iter().map(|(_, value)| value).collect()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.push(column, value);
        }
        record
    }
}

/// Equality predicates for selecting a row
///
/// Only the first predicate is applied; the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    predicates: Vec<(String, CellValue)>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.predicates.push((column.into(), value.into()));
        self
    }

    pub fn predicates(&self) -> &[(String, CellValue)] {
        &self.predicates
    }

    /// The predicate that is actually applied
    fn primary(&self) -> Result<(&str, &CellValue), SheetError> {
        let (column, value) = self.predicates.first().ok_or(SheetError::EmptyPredicate)?;
        if self.predicates.len() > 1 {
            log::warn!(
                "Only the first where predicate ({} = {}) is used, ignoring {} more",
                column,
                value,
                self.predicates.len() - 1
            );
        }
        Ok((column.as_str(), value))
    }
}

impl Sheets {
    /// Append `record` directly below `table`'s last row
    ///
    /// The row's `ID` is the table's current end row number, so IDs follow
    /// row position rather than a stored counter. Deleting rows and then
    /// inserting, or two concurrent inserts, can hand out the same ID twice.
    pub async fn insert_into(
        &self,
        table: &str,
        record: &Record,
    ) -> Result<UpdateValuesResponse, SheetError> {
        let range = self.resolve_table_range(table).await?;
        let target = range.next_row_range();
        if record.is_empty() {
            log::warn!("Inserting a row into {} with only an ID", table);
        }
        let row = record.with_id(range.end_row).into_row();

        log::debug!("Inserting into {} at {}: {:?}", table, target, row);

        let response = self
            .service
            .write_row(
                &self.spreadsheet_id,
                &target.to_string(),
                row,
                ValueInputOption::UserEntered,
            )
            .await?;

        log::info!("Inserted row {} into {}", target, table);
        Ok(response)
    }

    /// Blank the first row of `table` whose column matches the where clause
    ///
    /// The whole sheet column is scanned, not just the table's rows, and the
    /// matched row is cleared in place: later rows keep their positions and
    /// IDs.
    pub async fn delete_from(
        &self,
        table: &str,
        where_clause: &WhereClause,
    ) -> Result<BatchClearValuesResponse, SheetError> {
        let range = self.resolve_table_range(table).await?;
        let header = self.header_map(table, &range).await?;

        let (column, wanted) = where_clause.primary()?;
        let header_cell = header.get(column).ok_or_else(|| SheetError::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
        })?;

        // One value per sheet row; blank rows keep their slot so indices
        // stay aligned with row numbers
        let column_values: Vec<CellValue> = self
            .read(&header_cell.column_range())
            .await?
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect();

        let data_index = column_values
            .iter()
            .skip(1)
            .position(|value| values_match(value, wanted));

        let Some(data_index) = data_index else {
            log::warn!(
                "Record not found in {} where {} = {} ({} rows scanned)",
                table,
                column,
                wanted,
                column_values.len().saturating_sub(1)
            );
            return Err(SheetError::RecordNotFound {
                table: table.to_string(),
                column: column.to_string(),
                value: wanted.to_string(),
            });
        };

        let row = data_index + 2;
        let row = u32::try_from(row)
            .ok()
            .filter(|row| *row <= MAX_ROW)
            .ok_or(SheetError::RowOutOfRange { row })?;
        let target = range.row_range(row);
        log::debug!("Clearing {} in {}", target, table);

        let response = self
            .service
            .clear_ranges(&self.spreadsheet_id, vec![target.to_string()])
            .await?;

        log::info!("Cleared row {} of {}", target, table);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteError;
    use crate::sheets::service::fake::{Call, FakeSheet};
    use std::sync::Arc;

    fn sheets(fake: FakeSheet) -> (Sheets, Arc<FakeSheet>) {
        let fake = Arc::new(fake);
        (Sheets::new(fake.clone(), "doc"), fake)
    }

    /// Directory in A:B, a Dogs table at D1:F3 with two data rows
    fn dogs() -> FakeSheet {
        FakeSheet::new()
            .with_row("A1", &["Dogs", "D1:F3"])
            .with_row("A2", &["Users", "H1:J1"])
            .with_row("D1", &["ID", "Name", "Age"])
            .with_row("D2", &["1", "Bello", "10"])
            .with_row("D3", &["2", "Rex", "3"])
            .with_row("H1", &["ID", "Name", "Age"])
    }

    #[tokio::test]
    async fn test_insert_assigns_end_row_as_id() {
        let (sheets, fake) = sheets(dogs());
        let record = Record::new().with("Name", "Johnny").with("Age", 25i64);

        let response = sheets.insert_into("Dogs", &record).await.unwrap();
        assert_eq!(response.updated_range, "D4:F4");

        assert_eq!(
            fake.writes(),
            vec![Call::Write {
                range: "D4:F4".into(),
                row: vec![CellValue::Int(3), "Johnny".into(), CellValue::Int(25)],
                input: ValueInputOption::UserEntered,
            }]
        );
        assert_eq!(fake.cell("D4"), CellValue::from("3"));
        assert_eq!(fake.cell("E4"), CellValue::from("Johnny"));
    }

    #[tokio::test]
    async fn test_insert_into_header_only_table() {
        let (sheets, fake) = sheets(dogs());
        let record = Record::new().with("Name", "Martijn").with("Age", 30i64);

        sheets.insert_into("Users", &record).await.unwrap();

        let writes = fake.writes();
        assert_eq!(writes.len(), 1);
        assert!(matches!(
            &writes[0],
            Call::Write { range, row, .. } if range == "H2:J2" && row[0] == CellValue::Int(1)
        ));
    }

    #[tokio::test]
    async fn test_insert_overrides_caller_id() {
        let (sheets, fake) = sheets(dogs());
        let record = Record::new().with("Name", "Rex").with("ID", 99i64);

        sheets.insert_into("Dogs", &record).await.unwrap();

        let writes = fake.writes();
        let Call::Write { row, .. } = &writes[0] else {
            panic!("expected a write");
        };
        assert_eq!(row, &vec![CellValue::Int(3), CellValue::from("Rex")]);
    }

    #[tokio::test]
    async fn test_insert_with_oversized_end_row_is_rejected() {
        let fixture = FakeSheet::new()
            .with_row("A1", &["Huge", "C1:E4294967295"])
            .with_row("C1", &["ID", "Name", "Age"]);
        let (sheets, fake) = sheets(fixture);

        let err = sheets
            .insert_into("Huge", &Record::new().with("Name", "Rex"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::MalformedRange(ref t) if t == "C1:E4294967295"));
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn test_insert_unknown_table_writes_nothing() {
        let (sheets, fake) = sheets(dogs());

        let err = sheets
            .insert_into("Cats", &Record::new().with("Name", "Tom"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::TableNotFound { .. }));
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_clears_matching_row() {
        let (sheets, fake) = sheets(dogs());

        let response = sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Rex"))
            .await
            .unwrap();
        assert_eq!(response.cleared_ranges, vec!["D3:F3".to_string()]);

        // Header map read, then the whole Name column
        assert!(fake.calls().contains(&Call::Read("D1:F1".into())));
        assert!(fake.calls().contains(&Call::Read("E:E".into())));
        assert_eq!(fake.writes(), vec![Call::Clear(vec!["D3:F3".into()])]);
        assert_eq!(fake.cell("E3"), CellValue::Empty);
        assert_eq!(fake.cell("E2"), CellValue::from("Bello"));
    }

    #[tokio::test]
    async fn test_delete_matches_numbers_against_text() {
        let (sheets, fake) = sheets(dogs());

        sheets
            .delete_from("Dogs", &WhereClause::new().and("Age", CellValue::from("10")))
            .await
            .unwrap();
        assert_eq!(fake.writes(), vec![Call::Clear(vec!["D2:F2".into()])]);
    }

    #[tokio::test]
    async fn test_delete_matches_displayed_text_literally() {
        let fixture = FakeSheet::new()
            .with_row("A1", &["Parts", "C1:E4"])
            .with_row("C1", &["ID", "Code", "Price"])
            .with_row("C2", &["1", "7", "2.5"])
            .with_row("C3", &["2", "007", "2.50"])
            .with_row("C4", &["3", "+44", "1e3"]);
        let (sheets, fake) = sheets(fixture);

        sheets
            .delete_from("Parts", &WhereClause::new().and("Price", "2.50"))
            .await
            .unwrap();
        sheets
            .delete_from("Parts", &WhereClause::new().and("Code", "+44"))
            .await
            .unwrap();
        let err = sheets
            .delete_from("Parts", &WhereClause::new().and("Code", "007"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::RecordNotFound { .. }));

        assert_eq!(
            fake.writes(),
            vec![
                Call::Clear(vec!["C3:E3".into()]),
                Call::Clear(vec!["C4:E4".into()])
            ]
        );
        assert_eq!(fake.cell("D2"), CellValue::from("7"));
    }

    #[tokio::test]
    async fn test_delete_numeric_predicate() {
        let (sheets, fake) = sheets(dogs());

        sheets
            .delete_from("Dogs", &WhereClause::new().and("Age", 3i64))
            .await
            .unwrap();
        assert_eq!(fake.writes(), vec![Call::Clear(vec!["D3:F3".into()])]);
    }

    #[tokio::test]
    async fn test_delete_without_match_issues_no_clear() {
        let (sheets, fake) = sheets(dogs());

        let err = sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Fido"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::RecordNotFound { ref column, ref value, .. } if column == "Name" && value == "Fido"
        ));
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_does_not_match_header() {
        let (sheets, fake) = sheets(dogs());

        let err = sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Name"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::RecordNotFound { .. }));
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_uses_first_match_only() {
        let (sheets, fake) = sheets(dogs().with_row("D4", &["3", "Rex", "7"]));

        sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Rex"))
            .await
            .unwrap();
        assert_eq!(fake.writes(), vec![Call::Clear(vec!["D3:F3".into()])]);
        assert_eq!(fake.cell("E4"), CellValue::from("Rex"));
    }

    #[tokio::test]
    async fn test_delete_ignores_extra_predicates() {
        let (sheets, fake) = sheets(dogs());

        let clause = WhereClause::new().and("Name", "Bello").and("Age", 3i64);
        sheets.delete_from("Dogs", &clause).await.unwrap();
        assert_eq!(fake.writes(), vec![Call::Clear(vec!["D2:F2".into()])]);
    }

    #[tokio::test]
    async fn test_delete_after_cleared_row_keeps_alignment() {
        let (sheets, fake) = sheets(dogs());

        sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Bello"))
            .await
            .unwrap();
        sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Rex"))
            .await
            .unwrap();

        assert_eq!(
            fake.writes(),
            vec![
                Call::Clear(vec!["D2:F2".into()]),
                Call::Clear(vec!["D3:F3".into()])
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_column() {
        let (sheets, fake) = sheets(dogs());

        let err = sheets
            .delete_from("Dogs", &WhereClause::new().and("Breed", "Poodle"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::UnknownColumn { ref table, ref column } if table == "Dogs" && column == "Breed"
        ));
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_empty_where_clause() {
        let (sheets, _) = sheets(dogs());

        let err = sheets
            .delete_from("Dogs", &WhereClause::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::EmptyPredicate));
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let (sheets, fake) = sheets(dogs().failing(403));

        let err = sheets
            .insert_into("Dogs", &Record::new().with("Name", "Rex"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::Remote(RemoteError::Status { status: 403, .. })
        ));
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_then_delete_round() {
        let (sheets, fake) = sheets(dogs());

        sheets
            .insert_into("Dogs", &Record::new().with("Name", "Johnny").with("Age", 25i64))
            .await
            .unwrap();
        // The directory still says D1:F3, but the column scan finds row 4
        sheets
            .delete_from("Dogs", &WhereClause::new().and("Name", "Johnny"))
            .await
            .unwrap();

        assert_eq!(fake.writes().last(), Some(&Call::Clear(vec!["D4:F4".into()])));
        assert_eq!(fake.cell("E4"), CellValue::Empty);
    }

    #[test]
    fn test_record_push_replaces_in_place() {
        let mut record = Record::new().with("Name", "Rex").with("Age", 3i64);
        record.push("Name", "Fido");
        assert_eq!(record.fields().len(), 2);
        assert_eq!(
            record.fields()[0],
            ("Name".to_string(), CellValue::from("Fido"))
        );
    }

    #[test]
    fn test_record_with_id_is_first() {
        let record: Record = vec![("Name", "Rex"), ("Age", "3")].into_iter().collect();
        let row = record.with_id(6).into_row();
        assert_eq!(
            row,
            vec![CellValue::Int(6), CellValue::from("Rex"), CellValue::from("3")]
        );
    }
}
