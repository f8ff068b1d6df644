use std::path::Path;

use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Table – a small string-typed data frame
// ---------------------------------------------------------------------------

/// Rows of text cells under a header row.
///
/// Cells are kept as the text read from disk, so filtering and re-writing a
/// table never reformats the values it keeps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a comma-separated file. The header row defines the columns and
    /// whitespace around every field is trimmed, so `a, b` reads as `a`,`b`.
    pub fn read_csv(path: &Path) -> Result<Self> {
        Self::read_delimited(path, b',')
    }

    pub fn read_delimited(path: &Path, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| WorkflowError::csv(path, e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| WorkflowError::csv(path, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| WorkflowError::csv(path, e))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        log::debug!("read {} rows x {} columns from {}", rows.len(), headers.len(), path.display());
        Ok(Table { headers, rows })
    }

    /// Write a standard CSV file: header first, no index column.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        self.write_delimited(path, b',')
    }

    /// Like [`Table::write_csv`] with another separator. Cells holding the
    /// separator are quoted, so [`Table::read_delimited`] with the same byte
    /// reads the table back unchanged.
    pub fn write_delimited(&self, path: &Path, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|e| WorkflowError::csv(path, e))?;
        writer
            .write_record(&self.headers)
            .map_err(|e| WorkflowError::csv(path, e))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| WorkflowError::csv(path, e))?;
        }
        writer.flush().map_err(|e| WorkflowError::io(path, e))?;
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Numeric view of a column; cells that do not parse are `None`.
    pub fn column_f64(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|c| c.parse::<f64>().ok()))
                .collect(),
        )
    }

    /// Keep the rows whose mask entry is `true`, in their original order.
    pub fn select(&self, mask: &[bool]) -> Table {
        debug_assert_eq!(mask.len(), self.rows.len());
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(row, _)| row.clone())
            .collect();
        Table {
            headers: self.headers.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_comma_space_rows_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "Name,Iata Code,Latitude,Longitude\nFoo, FOO, 1.0000, 2.0000\n").unwrap();

        let t = Table::read_csv(&path).unwrap();
        assert_eq!(t.headers, ["Name", "Iata Code", "Latitude", "Longitude"]);
        assert_eq!(t.rows, vec![vec!["Foo", "FOO", "1.0000", "2.0000"]]);
        assert_eq!(t.column_f64("Latitude").unwrap(), vec![Some(1.0)]);
        assert!(t.column_f64("Altitude").is_none());
    }

    #[test]
    fn select_keeps_order_and_headers() {
        let mut t = Table::new(vec!["v".into()]);
        t.rows = vec![vec!["a".into()], vec!["b".into()], vec!["c".into()]];
        let s = t.select(&[true, false, true]);
        assert_eq!(s.headers, t.headers);
        assert_eq!(s.rows, vec![vec!["a".to_string()], vec!["c".to_string()]]);
    }

    #[test]
    fn write_then_read_keeps_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut t = Table::new(vec!["Name".into(), "Latitude".into()]);
        t.rows = vec![vec!["Kai, Tak".into(), "22.3000".into()]];
        t.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Name,Latitude\n\"Kai, Tak\",22.3000\n");
        assert_eq!(Table::read_csv(&path).unwrap(), t);
    }

    #[test]
    fn semicolon_table_reads_back_with_semicolon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut t = Table::new(vec!["Name".into(), "Longitude".into()]);
        t.rows = vec![vec!["A;B".into(), "1.0000".into()]];
        t.write_delimited(&path, b';').unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Name;Longitude\n\"A;B\";1.0000\n");
        assert_eq!(Table::read_delimited(&path, b';').unwrap(), t);
    }

    #[test]
    fn missing_file_is_csv_error() {
        let err = Table::read_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, WorkflowError::Csv { .. }));
    }
}
