//! Elemental mass fractions from `abundances.txt`

// standard library
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_utils::{f, get_elsymbol, zopen};
use log::info;
use serde::{Deserialize, Serialize};

/// Mass fractions of each element in one model cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbundanceRow {
    /// One-based cell number
    pub inputcellid: usize,
    /// Mass fraction of element `Z` at index `Z - 1`
    pub massfractions: Vec<f64>,
}

impl AbundanceRow {
    /// Mass fraction of an element, zero if not listed
    pub fn massfraction(&self, atomic_number: usize) -> f64 {
        atomic_number
            .checked_sub(1)
            .and_then(|i| self.massfractions.get(i))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Elemental mass fractions of every cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialAbundances {
    /// Rows in cell order
    pub rows: Vec<AbundanceRow>,
}

impl InitialAbundances {
    /// Highest atomic number with a column
    pub fn max_atomic_number(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.massfractions.len())
            .max()
            .unwrap_or(0)
    }

    /// Column names in file order, `X_H`, `X_He`, ...
    pub fn column_names(&self) -> Result<Vec<String>> {
        (1..=self.max_atomic_number())
            .map(|z| Ok(f!("X_{}", get_elsymbol(z)?)))
            .collect()
    }
}

/// Read `abundances.txt` from a model folder
pub fn get_initialabundances<P: AsRef<Path>>(modelpath: P) -> Result<InitialAbundances> {
    let path = modelpath.as_ref();
    let filename = match path.is_dir() {
        true => path.join("abundances.txt"),
        false => path.to_path_buf(),
    };
    info!("Reading {}", filename.display());

    let mut rows = Vec::new();
    for line in zopen(&filename)?.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let Some(first) = fields.next() else {
            continue;
        };

        rows.push(AbundanceRow {
            inputcellid: first.parse()?,
            massfractions: fields
                .map(str::parse::<f64>)
                .collect::<core::result::Result<Vec<f64>, _>>()?,
        });
    }

    if rows.is_empty() {
        return Err(Error::UnexpectedEndOfFile(filename.display().to_string()));
    }

    Ok(InitialAbundances { rows })
}

/// Write elemental mass fractions in `abundances.txt` format
pub fn save_initialabundances<P: AsRef<Path>>(
    abundances: &InitialAbundances,
    path: P,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    for row in &abundances.rows {
        let fractions = row
            .massfractions
            .iter()
            .map(|x| f!("{x}"))
            .collect::<Vec<String>>()
            .join(" ");
        writeln!(writer, "{} {fractions}", row.inputcellid)?;
    }

    writer.flush()?;
    info!("Saved {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lookup() {
        let row = AbundanceRow {
            inputcellid: 1,
            massfractions: vec![0.7, 0.3],
        };
        assert_eq!(row.massfraction(1), 0.7);
        assert_eq!(row.massfraction(2), 0.3);
        assert_eq!(row.massfraction(26), 0.0);
        assert_eq!(row.massfraction(0), 0.0);

        let abundances = InitialAbundances { rows: vec![row] };
        assert_eq!(abundances.column_names().unwrap(), vec!["X_H", "X_He"]);
    }
}
