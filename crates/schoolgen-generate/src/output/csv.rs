use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::errors::GenerationError;

/// Write records as CSV, returning the number of bytes written.
///
/// The header is the field list of `T`, emitted with the first record. An
/// empty slice is rejected before the file is created.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<u64, GenerationError> {
    if records.is_empty() {
        return Err(GenerationError::EmptyTable(path.display().to_string()));
    }

    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(counting);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row<'a> {
        id: u32,
        nome: &'a str,
        data_evasao: Option<&'a str>,
    }

    fn temp_path(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("schoolgen_csv_{label}_{}.csv", uuid::Uuid::new_v4()))
    }

    #[test]
    fn header_comes_from_field_order_and_fields_are_quoted() {
        let path = temp_path("quoted");
        let rows = [
            Row {
                id: 1,
                nome: "Silva, Ana",
                data_evasao: None,
            },
            Row {
                id: 2,
                nome: "Linha\nquebrada",
                data_evasao: Some("2025-05-01"),
            },
        ];
        let bytes = write_records(&path, &rows).expect("write csv");
        let contents = std::fs::read_to_string(&path).expect("read csv");

        assert_eq!(bytes, contents.len() as u64);
        assert!(contents.starts_with("id,nome,data_evasao\n"));
        assert!(contents.contains("1,\"Silva, Ana\",\n"));
        assert!(contents.contains("2,\"Linha\nquebrada\",2025-05-01\n"));
    }

    #[test]
    fn empty_tables_are_rejected() {
        let path = temp_path("empty");
        let rows: [Row<'_>; 0] = [];
        let result = write_records(&path, &rows);
        assert!(matches!(result, Err(GenerationError::EmptyTable(_))));
        assert!(!path.exists());
    }
}
