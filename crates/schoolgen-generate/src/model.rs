use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::variant::SchemaVariant;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where the CSV files and the report are written.
    pub out_dir: PathBuf,
    /// Output schema to emit.
    pub variant: SchemaVariant,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            variant: SchemaVariant::default(),
        }
    }
}

/// Summary of a written table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub file: String,
    pub rows: u64,
    pub bytes: u64,
}

/// Report for a generation run.
///
/// Holds no timestamps or run ids so that reruns with the same seed produce
/// an identical file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub variant: SchemaVariant,
    pub seed: u64,
    pub population: usize,
    pub tables: Vec<TableReport>,
    pub rows_total: u64,
    pub bytes_written: u64,
}

impl GenerationReport {
    pub fn new(variant: SchemaVariant, seed: u64, population: usize) -> Self {
        Self {
            variant,
            seed,
            population,
            tables: Vec::new(),
            rows_total: 0,
            bytes_written: 0,
        }
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.rows_total += table.rows;
        self.bytes_written += table.bytes;
        self.tables.push(table);
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == name)
    }
}
