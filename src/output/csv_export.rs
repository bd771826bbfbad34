//! Dated CSV export of product records

use crate::record::ProductRecord;
use crate::ScrapeError;
use std::io::Write;
use std::path::Path;

/// Name of the export file for a run: `<slug>_<YYYY-MM-DD>.csv`
pub fn export_file_name(source_slug: &str, date: &str) -> String {
    format!("{}_{}.csv", source_slug, date)
}

/// Indices into [`ProductRecord::COLUMNS`] of the columns set on at least one record
///
/// Columns keep schema order; a column unset on every record is dropped.
pub fn present_columns(records: &[ProductRecord]) -> Vec<usize> {
    let mut present = [false; ProductRecord::COLUMNS.len()];
    for record in records {
        for (idx, cell) in record.cells().iter().enumerate() {
            present[idx] |= cell.is_some();
        }
    }

    present
        .iter()
        .enumerate()
        .filter_map(|(idx, is_present)| is_present.then_some(idx))
        .collect()
}

/// Writes records as CSV, one row per record
///
/// Cells for fields unset on a particular record are left empty. Nothing is
/// written for an empty record list.
pub fn write_csv<W: Write>(records: &[ProductRecord], writer: W) -> Result<(), ScrapeError> {
    let columns = present_columns(records);
    let mut writer = csv::Writer::from_writer(writer);

    if !records.is_empty() {
        writer.write_record(columns.iter().map(|&idx| ProductRecord::COLUMNS[idx]))?;
    }

    for record in records {
        let cells = record.cells();
        writer.write_record(
            columns
                .iter()
                .map(|&idx| cells[idx].as_deref().unwrap_or("")),
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the export file, creating its directory if needed
pub fn write_csv_file(records: &[ProductRecord], path: &Path) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_csv(records, std::io::BufWriter::new(file))?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
