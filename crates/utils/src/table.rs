//! Whitespace delimited numeric tables with a header row

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::files::zopen;

// external crates
use log::debug;

/// A numeric table read from whitespace separated columns
///
/// Many ARTIS outputs share this layout: one header row of column names,
/// optionally prefixed with `#`, followed by rows of numbers. Fields that are
/// not valid numbers are stored as NaN, and rows with the wrong number of
/// fields are skipped.
///
/// ```rust
/// # use artistools_utils::WhitespaceTable;
/// let text = "#timestep tstart_days\n0 1.5\n1 1.8\n";
/// let table = WhitespaceTable::from_lines(text.lines().map(String::from)).unwrap();
/// assert_eq!(table.columns, vec!["timestep", "tstart_days"]);
/// assert_eq!(table.column("tstart_days").unwrap(), vec![1.5, 1.8]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhitespaceTable {
    /// Column names in file order
    pub columns: Vec<String>,
    /// Row values, each with one entry per column
    pub rows: Vec<Vec<f64>>,
}

impl WhitespaceTable {
    /// Construct an empty table with the given column names
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Read a possibly compressed table from disk
    ///
    /// An empty file gives an empty table rather than an error.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = zopen(path.as_ref())?;
        let lines = std::io::BufRead::lines(reader).collect::<std::io::Result<Vec<String>>>()?;
        Self::from_lines(lines.into_iter())
    }

    /// Build a table from an iterator of text lines
    pub fn from_lines<I: Iterator<Item = String>>(lines: I) -> Result<Self> {
        let mut lines = lines.filter(|l| !l.trim().is_empty());

        let Some(header) = lines.next() else {
            return Ok(Self::default());
        };

        let columns = header
            .trim()
            .trim_start_matches('#')
            .split_whitespace()
            .map(|c| c.to_string())
            .collect::<Vec<String>>();

        if columns.is_empty() {
            return Err(Error::MissingHeader);
        }

        let mut table = Self::with_columns(columns);

        for line in lines {
            if line.trim_start().starts_with('#') {
                continue;
            }

            let row = line
                .split_whitespace()
                .map(|v| v.parse::<f64>().unwrap_or(f64::NAN))
                .collect::<Vec<f64>>();

            if row.len() != table.columns.len() {
                debug!(
                    "Skipping row with {} fields, expected {}",
                    row.len(),
                    table.columns.len()
                );
                continue;
            }

            table.rows.push(row);
        }

        Ok(table)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Index of a named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Copy of all values in a named column
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Single value by row index and column name
    pub fn get(&self, row: usize, name: &str) -> Option<f64> {
        let idx = self.column_index(name).ok()?;
        self.rows.get(row).map(|r| r[idx])
    }

    /// New table keeping only rows that satisfy the predicate
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&[f64]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// New table keeping only rows where a column equals `value`
    ///
    /// ```rust
    /// # use artistools_utils::WhitespaceTable;
    /// let text = "a b\n1 10\n2 20\n1 30\n";
    /// let table = WhitespaceTable::from_lines(text.lines().map(String::from)).unwrap();
    /// let subset = table.filter_eq("a", 1.0).unwrap();
    /// assert_eq!(subset.column("b").unwrap(), vec![10.0, 30.0]);
    /// ```
    pub fn filter_eq(&self, name: &str, value: f64) -> Result<Self> {
        let idx = self.column_index(name)?;
        Ok(self.filter(|r| r[idx] == value))
    }

    /// Append a column, padding or truncating values to the row count
    pub fn push_column(&mut self, name: &str, values: &[f64]) {
        self.columns.push(name.to_string());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(values.get(i).copied().unwrap_or(f64::NAN));
        }
    }

    /// Append another table with identical columns
    pub fn extend(&mut self, other: Self) -> Result<()> {
        if self.columns.is_empty() {
            *self = other;
            return Ok(());
        }

        if other.columns.is_empty() {
            return Ok(());
        }

        if self.columns != other.columns {
            return Err(Error::MismatchedSliceLengths {
                left: self.columns.len(),
                right: other.columns.len(),
            });
        }

        self.rows.extend(other.rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> impl Iterator<Item = String> + '_ {
        text.lines().map(String::from)
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = WhitespaceTable::from_lines(lines("")).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let table = WhitespaceTable::from_lines(lines("a b\n1 2\n3\n4 5 6\n7 x\n")).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get(1, "b").unwrap().is_nan());
    }

    #[test]
    fn missing_column_is_an_error() {
        let table = WhitespaceTable::from_lines(lines("a b\n1 2\n")).unwrap();
        assert_eq!(
            table.column("c"),
            Err(Error::MissingColumn {
                name: "c".to_string()
            })
        );
    }

    #[test]
    fn extend_checks_columns() {
        let mut a = WhitespaceTable::from_lines(lines("a b\n1 2\n")).unwrap();
        let b = WhitespaceTable::from_lines(lines("a b\n3 4\n")).unwrap();
        let c = WhitespaceTable::from_lines(lines("x\n3\n")).unwrap();
        a.extend(b).unwrap();
        assert_eq!(a.len(), 2);
        assert!(a.extend(c).is_err());
    }
}
