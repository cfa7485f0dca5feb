//! Worksheet sources feeding the pipeline.
//!
//! The spreadsheet itself lives outside this crate; a source only has to hand
//! back a header row and untyped text rows. CSV exports are read with polars
//! with schema inference disabled so every cell stays text.

use crate::error::{Result, SemaforoError};
use crate::table::RawTable;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Anything that can produce the current snapshot of one worksheet
pub trait TableSource: Send + Sync {
    /// Worksheet name used in logs and errors
    fn name(&self) -> &str;

    /// Pull the full current snapshot
    fn load(&self) -> Result<RawTable>;
}

/// CSV export of a worksheet on disk
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    name: String,
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvTableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<RawTable> {
        if !self.path.exists() {
            return Err(SemaforoError::SourceNotFound {
                path: self.path.clone(),
            });
        }
        if std::fs::metadata(&self.path)?.len() == 0 {
            return Err(SemaforoError::EmptySource {
                table: self.name.clone(),
            });
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()
            .map_err(|e| SemaforoError::SourceUnreadable {
                table: self.name.clone(),
                reason: e.to_string(),
            })?;

        let table = dataframe_to_table(&self.name, &df)?;
        debug!(
            "Loaded {} rows x {} columns from {}",
            table.len(),
            table.headers().len(),
            self.path.display()
        );
        Ok(table)
    }
}

/// Convert an all-text frame into a raw table; nulls become empty cells
fn dataframe_to_table(name: &str, df: &DataFrame) -> Result<RawTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|column| column.to_string())
        .collect();

    let mut rows = vec![Vec::with_capacity(headers.len()); df.height()];
    for column in df.get_columns() {
        let values = column.str()?;
        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            row.push(value.unwrap_or_default().to_string());
        }
    }

    Ok(RawTable::new(name, headers, rows))
}

/// Worksheet snapshot held in memory
#[derive(Debug, Clone)]
pub struct MemoryTableSource {
    table: RawTable,
}

impl MemoryTableSource {
    pub fn new(table: RawTable) -> Self {
        Self { table }
    }
}

impl TableSource for MemoryTableSource {
    fn name(&self) -> &str {
        self.table.name()
    }

    fn load(&self) -> Result<RawTable> {
        Ok(self.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_csv_source_reads_every_cell_as_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logistica.csv");
        fs::write(
            &path,
            " Remision ,no. pedido,Demora,Factura\nR1,0042,1,\nR2,0043,2.5,N/A\n",
        )
        .unwrap();

        let table = CsvTableSource::new("Logistica", &path).load().unwrap();

        assert_eq!(table.headers(), &["Remision", "no. pedido", "Demora", "Factura"]);
        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        // Leading zeros survive because nothing is inferred as a number
        assert_eq!(rows[0].get("no. pedido"), Some("0042"));
        assert_eq!(rows[0].get("Factura"), Some(""));
        assert_eq!(rows[1].get("Demora"), Some("2.5"));
    }

    #[test]
    fn test_csv_source_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");

        match CsvTableSource::new("Logistica", &path).load() {
            Err(SemaforoError::SourceNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("Expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_source_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        let result = CsvTableSource::new("Ped Pendientes", &path).load();
        assert!(matches!(result, Err(SemaforoError::EmptySource { .. })));
    }

    #[test]
    fn test_memory_source_returns_snapshot() {
        let table = RawTable::new("t", vec!["a".to_string()], vec![vec!["1".to_string()]]);
        let source = MemoryTableSource::new(table.clone());
        assert_eq!(source.name(), "t");
        assert_eq!(source.load().unwrap(), table);
    }
}
