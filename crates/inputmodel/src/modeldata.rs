//! 1D spherical `model.txt` files

// standard library
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::abundances::{get_initialabundances, InitialAbundances};
use crate::error::{Error, Result};

// external crates
use artistools_utils::constants::DAY_S;
use artistools_utils::{f, zopen};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Isotope columns always present in a 1D model
const ISOTOPES: [&str; 5] = ["Fegroup", "Ni56", "Co56", "Fe52", "Cr48"];

/// Isotope columns present in newer 1D models
const ISOTOPES_EXTRA: [&str; 2] = ["Ni57", "Co57"];

/// A single spherical shell of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCell {
    /// One-based cell number from the file
    pub inputcellid: usize,
    /// Inner boundary velocity in km/s, the previous outer velocity
    pub velocity_inner: f64,
    /// Outer boundary velocity in km/s
    pub velocity_outer: f64,
    /// log10 of the density in g/cm^3 at the model time
    pub logrho: f64,
    /// Mass fractions in the order of [InputModel::isotopes]
    pub massfractions: Vec<f64>,
    /// Shell mass in grams
    pub cellmass_grams: f64,
}

impl ModelCell {
    /// Density in g/cm^3 at the model time
    pub fn rho(&self) -> f64 {
        10.0_f64.powf(self.logrho)
    }

    /// Shell volume in cm^3 at a time in seconds
    pub fn volume(&self, t_seconds: f64) -> f64 {
        4.0 / 3.0
            * PI
            * (self.velocity_outer.powi(3) - self.velocity_inner.powi(3))
            * (1e5 * t_seconds).powi(3)
    }
}

/// A 1D ARTIS input model with optional elemental abundances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputModel {
    /// Time in days at which the densities are given
    pub t_model_init_days: f64,
    /// Names of the isotope mass fraction columns, e.g. `Ni56`
    pub isotopes: Vec<String>,
    /// Shells in order of increasing velocity
    pub cells: Vec<ModelCell>,
    /// Elemental mass fractions from `abundances.txt`, if requested
    pub abundances: Option<InitialAbundances>,
}

impl InputModel {
    /// Model time in seconds
    pub fn t_model_init_seconds(&self) -> f64 {
        self.t_model_init_days * DAY_S
    }

    /// Outer velocity of the model in cm/s
    pub fn vmax_cmps(&self) -> f64 {
        self.cells
            .iter()
            .map(|c| c.velocity_outer)
            .fold(0.0, f64::max)
            * 1e5
    }

    /// Total mass of all shells in grams
    pub fn total_mass_grams(&self) -> f64 {
        self.cells.iter().map(|c| c.cellmass_grams).sum()
    }

    /// Index of an isotope column by name, e.g. `Ni56`
    pub fn isotope_index(&self, name: &str) -> Option<usize> {
        self.isotopes.iter().position(|iso| iso == name)
    }

    /// Recompute every shell mass from the density and velocities
    pub fn update_cell_masses(&mut self) {
        let t_seconds = self.t_model_init_seconds();
        for cell in &mut self.cells {
            cell.cellmass_grams = cell.rho() * cell.volume(t_seconds);
        }
    }
}

/// Path to `model.txt` from either a model folder or the file itself
pub fn model_file_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match path.is_dir() {
        true => path.join("model.txt"),
        false => path.to_path_buf(),
    }
}

/// Read a 1D `model.txt`, optionally with `abundances.txt` from the same folder
///
/// ```rust, no_run
/// # use artistools_inputmodel::get_modeldata;
/// let model = get_modeldata("/path/to/model", true).unwrap();
/// println!("{} shells at {} days", model.cells.len(), model.t_model_init_days);
/// ```
pub fn get_modeldata<P: AsRef<Path>>(path: P, get_abundances: bool) -> Result<InputModel> {
    let filename = model_file_path(path);
    info!("Reading {}", filename.display());

    let lines = zopen(&filename)?
        .lines()
        .collect::<std::io::Result<Vec<String>>>()?;
    let mut model = parse_modeldata(lines.iter().map(String::as_str))?;

    if get_abundances {
        let folder = filename.parent().unwrap_or(Path::new("."));
        let abundances = get_initialabundances(folder)?;
        if abundances.rows.len() != model.cells.len() {
            return Err(Error::AbundanceCountMismatch {
                cells: model.cells.len(),
                abundances: abundances.rows.len(),
            });
        }
        model.abundances = Some(abundances);
    }

    Ok(model)
}

/// Parse the lines of a 1D `model.txt`
pub fn parse_modeldata<'a, I: Iterator<Item = &'a str>>(mut lines: I) -> Result<InputModel> {
    let mut next = |what: &str| {
        lines
            .next()
            .map(str::trim)
            .ok_or_else(|| Error::UnexpectedEndOfFile(f!("model.txt before {what}")))
    };

    let npts_model = next("cell count")?.parse::<usize>()?;
    let t_model_init_days = next("model time")?.parse::<f64>()?;

    let mut cells: Vec<ModelCell> = Vec::with_capacity(npts_model);
    let mut ncolumns = None;
    while let Ok(line) = next("") {
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let inputcellid = fields
            .next()
            .ok_or_else(|| Error::UnexpectedEndOfFile("model row".into()))?
            .parse::<usize>()?;
        let values = fields
            .map(str::parse::<f64>)
            .collect::<core::result::Result<Vec<f64>, _>>()?;

        let expected = *ncolumns.get_or_insert(values.len() + 1);
        if values.len() + 1 != expected {
            return Err(Error::WrongNumberOfColumns {
                cell: inputcellid,
                expected,
                found: values.len() + 1,
            });
        }

        if !matches!(expected, 8 | 10) {
            return Err(Error::UnsupportedModelColumns(expected));
        }

        let velocity_inner = cells.last().map(|c| c.velocity_outer).unwrap_or(0.0);
        cells.push(ModelCell {
            inputcellid,
            velocity_inner,
            velocity_outer: values[0],
            logrho: values[1],
            massfractions: values[2..].to_vec(),
            cellmass_grams: 0.0,
        });
    }

    if cells.len() != npts_model {
        return Err(Error::CellCountMismatch {
            declared: npts_model,
            found: cells.len(),
        });
    }

    let isotopes = match ncolumns {
        Some(10) => ISOTOPES.iter().chain(ISOTOPES_EXTRA.iter()).collect::<Vec<_>>(),
        _ => ISOTOPES.iter().collect::<Vec<_>>(),
    }
    .into_iter()
    .map(|s| s.to_string())
    .collect();

    let mut model = InputModel {
        t_model_init_days,
        isotopes,
        cells,
        abundances: None,
    };
    model.update_cell_masses();
    debug!(
        "{} shells, vmax {:.3e} cm/s",
        model.cells.len(),
        model.vmax_cmps()
    );

    Ok(model)
}

/// Write a 1D model in `model.txt` format
///
/// Abundances are not written, see [crate::save_initialabundances].
pub fn save_modeldata<P: AsRef<Path>>(model: &InputModel, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);

    writeln!(writer, "{}", model.cells.len())?;
    writeln!(writer, "{}", model.t_model_init_days)?;
    for cell in &model.cells {
        let fractions = cell
            .massfractions
            .iter()
            .map(|x| f!("{x}"))
            .collect::<Vec<String>>()
            .join(" ");
        writeln!(
            writer,
            "{:6}   {:9.2}   {:10.8} {fractions}",
            cell.inputcellid, cell.velocity_outer, cell.logrho
        )?;
    }

    writer.flush()?;
    info!("Saved {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "\
3
1.0
1 5000.0 -10.0 0.1 0.5 0.0 0.0 0.0
2 10000.0 -11.0 0.0 0.2 0.0 0.0 0.0
3 20000.0 -12.0 0.0 0.0 0.0 0.0 0.0
";

    #[test]
    fn shells_and_masses() {
        let model = parse_modeldata(MODEL.lines()).unwrap();
        assert_eq!(model.cells.len(), 3);
        assert_eq!(model.isotopes.len(), 5);
        assert_eq!(model.cells[1].velocity_inner, 5000.0);
        assert_eq!(model.vmax_cmps(), 2e9);

        let t = DAY_S;
        let expected = 1e-10 * 4.0 / 3.0 * PI * 5000.0_f64.powi(3) * (1e5 * t).powi(3);
        assert!((model.cells[0].cellmass_grams / expected - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inconsistent_rows_are_errors() {
        let short = "2\n1.0\n1 5000.0 -10.0 0.1 0.5 0.0 0.0 0.0\n";
        assert!(matches!(
            parse_modeldata(short.lines()),
            Err(Error::CellCountMismatch { declared: 2, found: 1 })
        ));

        let ragged = "2\n1.0\n1 5000.0 -10.0 0.1 0.5 0.0 0.0 0.0\n2 6000.0 -10.0 0.1\n";
        assert!(matches!(
            parse_modeldata(ragged.lines()),
            Err(Error::WrongNumberOfColumns { cell: 2, .. })
        ));
    }
}
