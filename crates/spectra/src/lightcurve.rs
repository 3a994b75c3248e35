//! Bolometric light curves from `light_curve.out`
//!
//! Each row is a time in days, the luminosity and the comoving-frame
//! luminosity in solar luminosities. The angle-averaged file repeats the time
//! column a second time with other content, so only the first half is kept.
//! Files with viewing angle bins (`light_curve_res.out`) repeat the whole
//! table once per angle.

// standard library
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::floats;

// external crates
use artistools_utils::{compression_variants, firstexisting, zopen};
use log::info;
use serde::{Deserialize, Serialize};

/// One row of a light curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightCurvePoint {
    /// Time in days
    pub time: f64,
    /// Luminosity in solar luminosities
    pub lum: f64,
    /// Comoving frame luminosity in solar luminosities
    pub lum_cmf: f64,
}

impl TryFrom<&[f64]> for LightCurvePoint {
    type Error = Error;

    fn try_from(row: &[f64]) -> Result<Self> {
        match row {
            [time, lum, lum_cmf, ..] => Ok(Self {
                time: *time,
                lum: *lum,
                lum_cmf: *lum_cmf,
            }),
            _ => Err(Error::WrongNumberOfValues {
                what: "light curve row".to_string(),
                expected: 3,
                found: row.len(),
            }),
        }
    }
}

/// Every non-blank row of a whitespace separated numeric file
pub fn parse_rows<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let values = floats(&line?)?;
        if !values.is_empty() {
            rows.push(values);
        }
    }
    Ok(rows)
}

/// Split a table that repeats itself into one chunk per repetition
///
/// A new chunk starts at every row where column `index_of_repeated_value`
/// equals its value in the first row. This is the time of the first
/// timestep, column 0 for light curves and 1 for spectra.
///
/// ```rust
/// # use artistools_spectra::lightcurve::gather_res_data;
/// let rows = vec![vec![1.0, 5.0], vec![2.0, 6.0], vec![1.0, 7.0], vec![2.0, 8.0]];
/// let chunks = gather_res_data(&rows, 0);
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[1][0], vec![1.0, 7.0]);
/// ```
pub fn gather_res_data<T: AsRef<[f64]>>(rows: &[T], index_of_repeated_value: usize) -> Vec<&[T]> {
    let Some(first) = rows.first().and_then(|r| r.as_ref().get(index_of_repeated_value)) else {
        return Vec::new();
    };

    let starts = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.as_ref().get(index_of_repeated_value) == Some(first))
        .map(|(i, _)| i)
        .collect::<Vec<usize>>();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| match starts.get(n + 1) {
            Some(&end) => &rows[start..end],
            None => &rows[start..],
        })
        .collect()
}

/// Read an angle-averaged light curve, keeping the first half of the rows
pub fn readfile<P: AsRef<Path>>(path: P) -> Result<Vec<LightCurvePoint>> {
    let path = path.as_ref();
    info!("Reading {}", path.display());

    let rows = parse_rows(zopen(path)?)?;
    rows[..rows.len() / 2]
        .iter()
        .map(|row| LightCurvePoint::try_from(row.as_slice()))
        .collect()
}

/// Read a light curve with one table per viewing angle bin
pub fn readfile_res<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<LightCurvePoint>>> {
    let path = path.as_ref();
    info!("Reading {}", path.display());

    let rows = parse_rows(zopen(path)?)?;
    gather_res_data(&rows, 0)
        .into_iter()
        .map(|chunk| {
            chunk
                .iter()
                .map(|row| LightCurvePoint::try_from(row.as_slice()))
                .collect()
        })
        .collect()
}

/// Light curve of a model folder from `light_curve.out[.xz|.gz]`
pub fn get_lightcurve<P: AsRef<Path>>(modelpath: P) -> Result<Vec<LightCurvePoint>> {
    let path = firstexisting(&compression_variants("light_curve.out"), modelpath)?;
    readfile(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_without_rows() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(gather_res_data(&rows, 0).is_empty());
    }

    #[test]
    fn gather_on_second_column() {
        let rows = vec![
            vec![0.0, 10.0],
            vec![1.0, 11.0],
            vec![2.0, 12.0],
            vec![0.0, 10.0],
            vec![1.0, 11.0],
        ];
        let chunks = gather_res_data(&rows, 1);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn short_rows_are_errors() {
        assert!(LightCurvePoint::try_from([1.0, 2.0].as_slice()).is_err());
    }
}
