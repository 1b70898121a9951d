//! Table command handlers

use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;

use super::{DeleteArgs, DescribeArgs, InsertArgs};
use crate::sheets::{DirectoryEntry, HeaderMap, RangeDescriptor, SheetError, Sheets};

/// Append one row to a table
pub async fn handle_insert_command(args: InsertArgs, sheets: &Sheets) -> Result<()> {
    let record = args.record();
    log::debug!("Inserting into {}: {:?}", args.table, record.fields());

    println!("Connecting to your spreadsheet database...");
    let start = Instant::now();

    let response = sheets
        .insert_into(&args.table, &record)
        .await
        .map_err(explain)
        .with_context(|| format!("Failed to insert into '{}'", args.table))?;

    println!(
        "{} {} {}",
        "Record added!".bright_green().bold(),
        "→".dimmed(),
        response.updated_range.cyan()
    );
    log::info!(
        "Insert into {} took {:.2}ms",
        args.table,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

/// Blank the first row matching the where clause
pub async fn handle_delete_command(args: DeleteArgs, sheets: &Sheets) -> Result<()> {
    let clause = args.where_clause();
    log::debug!("Deleting from {} where {:?}", args.table, clause.predicates());

    println!("Connecting to your spreadsheet database...");
    let start = Instant::now();

    let response = sheets
        .delete_from(&args.table, &clause)
        .await
        .map_err(explain)
        .with_context(|| format!("Failed to delete from '{}'", args.table))?;

    println!(
        "{} {} {}",
        "Record deleted!".bright_green().bold(),
        "→".dimmed(),
        response.cleared_ranges.join(", ").cyan()
    );
    log::info!(
        "Delete from {} took {:.2}ms",
        args.table,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

/// List every table in the directory
pub async fn handle_tables_command(sheets: &Sheets) -> Result<()> {
    let entries = sheets
        .read_directory()
        .await
        .map_err(explain)
        .context("Failed to read table directory")?;

    if entries.is_empty() {
        println!("{}", "No tables found in the directory (columns A:B).".yellow());
        return Ok(());
    }

    print!("{}", format_directory(&entries));
    Ok(())
}

/// Show where a table lives and how its columns map to cells
pub async fn handle_describe_command(args: DescribeArgs, sheets: &Sheets) -> Result<()> {
    let range = sheets
        .resolve_table_range(&args.table)
        .await
        .map_err(explain)
        .with_context(|| format!("Failed to resolve table '{}'", args.table))?;
    let header = sheets
        .header_map(&args.table, &range)
        .await
        .map_err(explain)
        .with_context(|| format!("Failed to read header of '{}'", args.table))?;

    print!("{}", format_description(&args.table, &range, &header));
    Ok(())
}

/// Attach a hint to errors the user can act on
fn explain(err: SheetError) -> anyhow::Error {
    let hint = match &err {
        SheetError::Remote(remote) if remote.is_auth() => {
            Some("check the configured credentials (access token, key file or token command)")
        }
        SheetError::TableNotFound { .. } => Some("run `sheetbase tables` to list known tables"),
        SheetError::UnknownColumn { .. } => Some("run `sheetbase describe <table>` to list columns"),
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::Error::new(err).context(format!("hint: {}", hint)),
        None => anyhow::Error::new(err),
    }
}

fn format_directory(entries: &[DirectoryEntry]) -> String {
    let width = entries.iter().map(|e| e.table.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let range = match entry.descriptor() {
            Ok(range) => range.to_string().normal(),
            Err(_) => format!("{} (invalid)", entry.range).red(),
        };
        let name = format!("{:<width$}", entry.table, width = width);
        out.push_str(&format!("{}  {}\n", name.bold(), range));
    }
    out
}

fn format_description(table: &str, range: &RangeDescriptor, header: &HeaderMap) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "Table:".bold(), table));
    out.push_str(&format!("{} {}\n", "Range:".bold(), range));
    out.push_str(&format!(
        "{} {}\n",
        "Data rows:".bold(),
        range.end_row.saturating_sub(range.start_row)
    ));
    out.push_str(&format!("{} {}\n", "Next row:".bold(), range.next_row_range()));
    out.push_str(&format!(
        "{} {} named, {} spanned\n",
        "Columns:".bold(),
        header.len(),
        range.width()
    ));
    for (name, cell) in header.iter() {
        let cell = format!("{:<4}", cell.to_string());
        out.push_str(&format!("  {} {}\n", cell.cyan(), name));
    }
    out
}
