//! Schema variants and the CSV writer they share.

pub mod app;
pub mod bi;
pub mod csv;

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::errors::GenerationError;
use crate::model::TableReport;

pub(crate) fn write_table<T: Serialize>(
    out_dir: &Path,
    file: &str,
    rows: &[T],
) -> Result<TableReport, GenerationError> {
    let path = out_dir.join(file);
    let bytes = self::csv::write_records(&path, rows)?;
    let table = file.trim_end_matches(".csv").to_string();
    info!(table = %table, rows = rows.len(), bytes, path = %path.display(), "table written");
    Ok(TableReport {
        table,
        file: file.to_string(),
        rows: rows.len() as u64,
        bytes,
    })
}
