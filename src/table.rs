//! Raw worksheet tables and header handling.
//!
//! A worksheet arrives as a header row plus rows of untyped text cells.
//! Header names are stripped of surrounding whitespace before they are used
//! as keys, and every row is padded or cut to the header width so lookups by
//! column never go out of bounds.

use crate::classify::normalize::normalize_header;
use crate::error::{Result, SemaforoError};
use tracing::debug;

/// Header plus text rows of one worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from a header row and data rows
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Build a table from the full sheet dump where the first row is the header
    pub fn from_values(name: impl Into<String>, mut values: Vec<Vec<String>>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(SemaforoError::EmptySource { table: name });
        }
        let headers = values.remove(0);
        Ok(Self::new(name, headers, values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the first `limit` columns
    pub fn truncate_columns(mut self, limit: usize) -> Self {
        if self.headers.len() > limit {
            debug!(
                "Truncating table '{}' from {} to {} columns",
                self.name,
                self.headers.len(),
                limit
            );
            self.headers.truncate(limit);
            for row in &mut self.rows {
                row.truncate(limit);
            }
        }
        self
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Index of a column the invocation cannot proceed without
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| SemaforoError::missing_column(&self.name, column))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| RowView {
            table: self,
            index,
            cells,
        })
    }
}

/// Borrowed view of one data row, addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a RawTable,
    index: usize,
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    /// Zero-based data row index (header excluded)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw cell text, `None` when the column does not exist
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.table
            .column_index(column)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }

    /// Raw cell text by position
    pub fn get_at(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_headers_are_trimmed() {
        let table = RawTable::new(
            "Logistica",
            strings(&[" Remision ", "Factura\t"]),
            vec![strings(&["R1", "F1"])],
        );
        assert_eq!(table.headers(), &["Remision", "Factura"]);
        assert_eq!(table.column_index("Factura"), Some(1));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = RawTable::new("t", strings(&["a", "b", "c"]), vec![strings(&["1"])]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("c"), Some(""));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_truncate_columns_keeps_leading_columns() {
        let table = RawTable::new(
            "Ped Pendientes",
            strings(&["a", "b", "c", "d"]),
            vec![strings(&["1", "2", "3", "4"])],
        )
        .truncate_columns(2);
        assert_eq!(table.headers(), &["a", "b"]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("b"), Some("2"));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn test_from_values_requires_header() {
        let result = RawTable::from_values("empty", Vec::new());
        assert!(matches!(result, Err(SemaforoError::EmptySource { .. })));
    }

    #[test]
    fn test_require_column_reports_table_and_column() {
        let table = RawTable::new("Logistica", strings(&["Remision"]), Vec::new());
        match table.require_column("no. pedido") {
            Err(SemaforoError::MissingColumn { table, column }) => {
                assert_eq!(table, "Logistica");
                assert_eq!(column, "no. pedido");
            }
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }
}
