//! Parser for the `estimators_????.out` files written by every MPI rank

// standard library
use std::collections::BTreeMap;
use std::io::BufRead;

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_utils::f;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Estimators of one model grid cell at one timestep
///
/// Scalar values such as `TR`, `Te`, `W`, `nne` and the `heating_*` and
/// `cooling_*` rates are kept in [Estimators::values]. Per-ion quantities
/// such as `populations` are stored by variable name, atomic number and ion
/// stage, with the element totals (`SUM:`) kept separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Estimators {
    /// Timestep of the block
    pub timestep: usize,
    /// Model grid cell of the block
    pub modelgridindex: usize,
    /// Cell has no material and no estimators
    pub emptycell: bool,
    /// Midpoint of the timestep in days, when timesteps are known
    pub tdays: Option<f64>,
    /// Scalar values by name
    pub values: BTreeMap<String, f64>,
    /// Ion values by variable, then atomic number, then ion stage
    pub ion_values: BTreeMap<String, BTreeMap<usize, BTreeMap<usize, f64>>>,
    /// Element totals by variable, then atomic number
    pub element_values: BTreeMap<String, BTreeMap<usize, f64>>,
}

impl Estimators {
    /// Scalar value by name, e.g. `Te`
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of a per-ion variable
    pub fn ion(&self, variable: &str, atomic_number: usize, ion_stage: usize) -> Option<f64> {
        self.ion_values
            .get(variable)?
            .get(&atomic_number)?
            .get(&ion_stage)
            .copied()
    }

    /// Element total of a per-ion variable
    pub fn element(&self, variable: &str, atomic_number: usize) -> Option<f64> {
        self.element_values
            .get(variable)?
            .get(&atomic_number)
            .copied()
    }

    /// Sum of all element populations
    pub fn total_population(&self) -> Option<f64> {
        self.get("populations_total")
    }

    fn add_heating(&mut self, pairs: &[&str]) -> Result<()> {
        for pair in pairs.chunks_exact(2) {
            let key = match pair[0].starts_with("heating_") {
                true => pair[0].to_string(),
                false => f!("heating_{}", pair[0]),
            };
            self.values.insert(key, parse_artis_float(pair[1])?);
        }

        if let (Some(dep), Some(ratio)) = (self.get("heating_dep"), self.get("heating_dep/total_dep")) {
            if ratio > 0.0 {
                self.values.insert("total_dep".into(), dep / ratio);
            }
        }
        if let (Some(gamma), Some(ratio)) = (
            self.get("heating_gamma"),
            self.get("heating_gamma/gamma_dep"),
        ) {
            if ratio > 0.0 {
                self.values.insert("gamma_dep".into(), gamma / ratio);
            }
        }
        Ok(())
    }

    fn add_cooling(&mut self, pairs: &[&str]) -> Result<()> {
        for pair in pairs.chunks_exact(2) {
            self.values
                .insert(f!("cooling_{}", pair[0]), parse_artis_float(pair[1])?);
        }
        Ok(())
    }

    /// A line like `populations Z=26 1: 1e5 2: 3e6 SUM: 3.1e6`
    fn add_ion_row(&mut self, row: &[&str]) -> Result<()> {
        let variablename = row[0];
        let (atomic_number, startindex) = match row[1] {
            "Z=" => (row.get(2).copied().unwrap_or_default(), 3),
            token => (token.trim_start_matches("Z="), 2),
        };
        let atomic_number = atomic_number
            .parse::<usize>()
            .map_err(|_| Error::ParseError(f!("atomic number in '{}'", row.join(" "))))?;

        let values = row.get(startindex..).unwrap_or_default();
        for pair in values.chunks_exact(2) {
            let label = pair[0].trim();
            if label == "(or" {
                continue;
            }
            let value = parse_artis_float(pair[1].trim_end_matches(','))?;

            if label == "SUM:" {
                self.element_values
                    .entry(variablename.to_string())
                    .or_default()
                    .insert(atomic_number, value);
                continue;
            }

            match label.trim_end_matches(':').parse::<usize>() {
                Ok(ion_stage) => {
                    self.ion_values
                        .entry(variablename.to_string())
                        .or_default()
                        .entry(atomic_number)
                        .or_default()
                        .insert(ion_stage, value);
                }
                Err(_) => debug!("Skipping '{label}' in {variablename} of Z={atomic_number}"),
            }
        }

        if variablename == "populations" {
            if let Some(elpop) = self.element("populations", atomic_number) {
                *self.values.entry("populations_total".into()).or_insert(0.0) += elpop;
            }
        }
        Ok(())
    }
}

/// Parse a float as written by ARTIS
///
/// Very small values may be printed without the exponent marker, such as
/// `1.5-100` for `1.5e-100`.
///
/// ```rust
/// # use artistools_estimators::parse_artis_float;
/// assert_eq!(parse_artis_float("2.5e3").unwrap(), 2500.0);
/// assert_eq!(parse_artis_float("1.5-100").unwrap(), 1.5e-100);
/// assert!(parse_artis_float("abc").is_err());
/// ```
pub fn parse_artis_float(s: &str) -> Result<f64> {
    if let Ok(value) = s.parse::<f64>() {
        return Ok(value);
    }

    match s.rfind(['-', '+']) {
        Some(i) if i > 0 && !s[..i].ends_with(['e', 'E']) => {
            f!("{}e{}", &s[..i], &s[i..])
                .parse::<f64>()
                .map_err(|_| Error::ParseError(f!("value '{s}'")))
        }
        _ => Err(Error::ParseError(f!("value '{s}'"))),
    }
}

/// Parse every block of an estimators file
///
/// Blocks start with a `timestep N modelgridindex M` header, followed by
/// name value pairs or `EMPTYCELL`.
pub fn parse_estimfile<R: BufRead>(reader: R, skip_emptycells: bool) -> Result<Vec<Estimators>> {
    let mut blocks = Vec::new();
    let mut current: Option<Estimators> = None;

    let keep = |block: Option<Estimators>, blocks: &mut Vec<Estimators>| {
        if let Some(block) = block {
            if !(skip_emptycells && block.emptycell) {
                blocks.push(block);
            }
        }
    };

    for line in reader.lines() {
        let line = line?;
        let row = line.split_whitespace().collect::<Vec<&str>>();
        if row.is_empty() {
            continue;
        }

        if row[0] == "timestep" {
            keep(current.take(), &mut blocks);
            current = Some(parse_header(&row)?);
            continue;
        }

        let Some(block) = current.as_mut() else {
            trace!("Skipping line before first block: {line}");
            continue;
        };
        if block.emptycell {
            continue;
        }

        match row[0] {
            "heating:" => block.add_heating(&row[1..])?,
            "cooling:" => block.add_cooling(&row[1..])?,
            _ if row.len() > 1 && row[1].starts_with("Z=") => block.add_ion_row(&row)?,
            _ => trace!("Skipping estimator line: {line}"),
        }
    }
    keep(current, &mut blocks);

    Ok(blocks)
}

fn parse_header(row: &[&str]) -> Result<Estimators> {
    let index = |i: usize| -> Result<usize> {
        row.get(i)
            .and_then(|v| v.parse::<usize>().ok())
            .ok_or_else(|| Error::ParseError(f!("estimator header '{}'", row.join(" "))))
    };

    let mut block = Estimators {
        timestep: index(1)?,
        modelgridindex: index(3)?,
        ..Default::default()
    };

    block.emptycell = row.get(4) == Some(&"EMPTYCELL");
    if !block.emptycell {
        for pair in row.get(4..).unwrap_or_default().chunks_exact(2) {
            match parse_artis_float(pair[1]) {
                Ok(value) => {
                    block.values.insert(pair[0].to_string(), value);
                }
                Err(_) => debug!("Ignoring header value {} = {}", pair[0], pair[1]),
            }
        }
    }

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESTIMATORS: &str = "\
timestep 5 modelgridindex 0 titeration 0 TR 6000.0 Te 5500.0 W 0.1 TJ 4500.0 nne 1.0e8
populations             Z=26   1: 1.0e+05  2: 2.0e+06  3: 1.0e+05  SUM: 2.2e+06
populations             Z= 8   1: 3.0e+06  SUM: 3.0e+06
heating: ff 1e-10 bf 2e-10 coll 3e-10 nt 0 dep 8e-10 heating_dep/total_dep 0.5
cooling: ff 1e-11 fb 2e-11 coll 3e-11 adiabatic 4e-11

timestep 5 modelgridindex 1 EMPTYCELL
";

    #[test]
    fn block_values() {
        let blocks = parse_estimfile(ESTIMATORS.as_bytes(), false).unwrap();
        assert_eq!(blocks.len(), 2);

        let block = &blocks[0];
        assert_eq!(block.timestep, 5);
        assert_eq!(block.get("Te"), Some(5500.0));
        assert_eq!(block.ion("populations", 26, 2), Some(2.0e6));
        assert_eq!(block.element("populations", 8), Some(3.0e6));
        assert_eq!(block.total_population(), Some(5.2e6));
        assert_eq!(block.get("heating_bf"), Some(2e-10));
        assert_eq!(block.get("cooling_adiabatic"), Some(4e-11));
        assert_eq!(block.get("total_dep"), Some(1.6e-9));

        assert!(blocks[1].emptycell);
        assert!(blocks[1].values.is_empty());
    }

    #[test]
    fn empty_cells_can_be_skipped() {
        let blocks = parse_estimfile(ESTIMATORS.as_bytes(), true).unwrap();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn bad_header_is_an_error() {
        assert!(parse_estimfile("timestep x modelgridindex 0\n".as_bytes(), false).is_err());
    }
}
