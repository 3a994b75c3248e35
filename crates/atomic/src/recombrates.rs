//! Radiative recombination rate coefficients from `recombrates.txt`

// standard library
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{field, floats, ints};

// external crates
use artistools_utils::{f, zopen};
use log::info;
use serde::{Deserialize, Serialize};

/// Rate coefficients against electron temperature for one recombining ion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecombRates {
    /// log10 of the electron temperature in K
    #[serde(rename = "log10T_e")]
    pub log10t_e: Vec<f64>,
    /// Electron temperature in K
    #[serde(rename = "T_e")]
    pub t_e: Vec<f64>,
    /// Rate coefficient into the low n levels in cm^3/s
    pub rrc_low_n: Vec<f64>,
    /// Total rate coefficient in cm^3/s
    pub rrc_total: Vec<f64>,
}

/// Parse recombination rate tables keyed by (Z, upper ion stage)
pub fn parse_recombratefile<R: BufRead>(reader: R) -> Result<BTreeMap<(usize, usize), RecombRates>> {
    let mut lines = reader.lines();
    let mut recombdata = BTreeMap::new();

    while let Some(line) = lines.next() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let header = ints(&line)?;
        let atomic_number = field(&header, 0, "recombrates Z")?;
        let upper_ionstage = field(&header, 1, "recombrates ion stage")?;
        let t_count = field(&header, 2, "recombrates count")?;

        let mut rates = RecombRates::default();
        for _ in 0..t_count {
            let row = match lines.next() {
                Some(row) => row?,
                None => return Err(Error::UnexpectedEndOfFile("recombrates.txt".into())),
            };
            let values = floats(&row)?;
            let [log10t, rrc_low_n, rrc_total] = values[..] else {
                return Err(Error::ParseError(f!("recombination rate '{row}'")));
            };
            rates.log10t_e.push(log10t);
            rates.t_e.push(10.0_f64.powf(log10t));
            rates.rrc_low_n.push(rrc_low_n);
            rates.rrc_total.push(rrc_total);
        }

        recombdata.insert((atomic_number, upper_ionstage), rates);
    }

    Ok(recombdata)
}

/// Read `recombrates.txt` from a model folder
pub fn get_ionrecombratecalibration<P: AsRef<Path>>(
    modelpath: P,
) -> Result<BTreeMap<(usize, usize), RecombRates>> {
    let path = modelpath.as_ref().join("recombrates.txt");
    info!("Reading {}", path.display());
    parse_recombratefile(zopen(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperatures_from_logs() {
        let text = "26 3 2\n3.0 1e-12 2e-12\n4.0 5e-13 9e-13\n\n27 4 1\n3.5 1e-11 1e-11\n";
        let recombdata = parse_recombratefile(text.as_bytes()).unwrap();
        assert_eq!(recombdata.len(), 2);

        let fe3 = &recombdata[&(26, 3)];
        assert_eq!(fe3.log10t_e, vec![3.0, 4.0]);
        assert!((fe3.t_e[1] - 1e4).abs() < 1e-8);
        assert_eq!(fe3.rrc_total[0], 2e-12);
    }
}
