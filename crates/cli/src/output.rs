//! Tab separated tables and JSON written to a file or standard output

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

// crate modules
use crate::error::Result;

// external crates
use artistools_utils::{f, ValueExt, WhitespaceTable};
use log::info;
use serde::Serialize;

/// Where and how command results are written
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct OutputArgs {
    /// Write results to a file rather than the terminal
    #[arg(help_heading("Output options"))]
    #[arg(short, long, value_name = "path")]
    pub outputfile: Option<PathBuf>,

    /// Write structured JSON instead of a table
    #[arg(help_heading("Output options"))]
    #[arg(long)]
    pub json: bool,
}

impl OutputArgs {
    fn writer(&self) -> Result<Box<dyn Write>> {
        Ok(match &self.outputfile {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(std::io::stdout().lock()),
        })
    }

    fn saved(&self) {
        if let Some(path) = &self.outputfile {
            info!("Saved {}", path.display());
        }
    }

    /// Write `value` as JSON when asked for, otherwise the table built by `table`
    pub fn emit<T, F>(&self, value: &T, table: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> Result<Table>,
    {
        match self.json {
            true => self.write_json(value),
            false => self.write_table(&table()?),
        }
    }

    /// Write a table regardless of the JSON flag
    pub fn write_table(&self, table: &Table) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(false)
            .from_writer(self.writer()?);

        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        self.saved();
        Ok(())
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let mut writer = self.writer()?;
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;

        self.saved();
        Ok(())
    }

    /// Plain text, such as the timestep listing
    pub fn write_text(&self, text: &str) -> Result<()> {
        let mut writer = self.writer()?;
        writeln!(writer, "{text}")?;
        writer.flush()?;

        self.saved();
        Ok(())
    }
}

/// Column names and formatted rows
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl From<&WhitespaceTable> for Table {
    fn from(table: &WhitespaceTable) -> Self {
        Self {
            columns: table.columns.clone(),
            rows: table
                .rows
                .iter()
                .map(|row| row.iter().map(|v| value(*v)).collect())
                .collect(),
        }
    }
}

/// Format a number compactly, switching to exponents for very large or small values
///
/// ```rust
/// # use artistools_cli::value;
/// assert_eq!(value(12.5), "12.5");
/// assert_eq!(value(0.0), "0");
/// assert_eq!(value(3.2e-13), "3.200000e-13");
/// assert_eq!(value(f64::NAN), "NaN");
/// ```
pub fn value(v: f64) -> String {
    match v.abs() {
        a if a == 0.0 || !a.is_finite() || (1e-3..1e6).contains(&a) => f!("{v}"),
        _ => v.sci(6, 2),
    }
}

/// Format an optional number, empty when missing
pub(crate) fn optional(v: Option<f64>) -> String {
    v.map(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_table_conversion() {
        let mut table = WhitespaceTable::with_columns(vec!["a".into(), "b".into()]);
        table.rows.push(vec![1.0, 2.5e-9]);

        let table = Table::from(&table);
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2.500000e-09".to_string()]]);
    }

    #[test]
    fn missing_values_are_blank() {
        assert_eq!(optional(None), "");
        assert_eq!(optional(Some(2.0)), "2");
    }
}
