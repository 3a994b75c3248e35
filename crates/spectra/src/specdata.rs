//! Spectra binned by exspec into `spec.out`
//!
//! The first row holds a placeholder followed by the midpoint time in days of
//! every timestep. Each following row is a frequency in Hz and the flux
//! density f_nu at 1 Mpc for every timestep.

// standard library
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::floats;

// external crates
use artistools_model::{get_spec_path, TimestepTimes};
use artistools_utils::constants::C_ANGSTROM_PER_S;
use artistools_utils::{f, zopen, SliceExt, SortExt};
use log::info;
use serde::{Deserialize, Serialize};

/// Full contents of a `spec.out` file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecData {
    /// Timestep midpoint times in days from the header row
    pub times: Vec<f64>,
    /// Frequency of every row in Hz
    pub nu: Vec<f64>,
    /// f_nu in erg/s/cm^2/Hz, indexed by row then timestep
    pub f_nu: Vec<Vec<f64>>,
}

/// Flux density on an ascending wavelength grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spectrum {
    /// Wavelengths in Angstroms
    pub lambda_angstroms: Vec<f64>,
    /// f_lambda in erg/s/cm^2/Angstrom
    pub f_lambda: Vec<f64>,
}

impl SpecData {
    /// Number of timesteps in the file
    pub fn ntimesteps(&self) -> usize {
        self.times.len()
    }

    /// Delta-t weighted mean spectrum over an inclusive timestep range
    ///
    /// `twidths` are the widths of every timestep in days, normally from
    /// [TimestepTimes].
    pub fn spectrum(&self, tsmin: usize, tsmax: usize, twidths: &[f64]) -> Result<Spectrum> {
        if tsmin > tsmax {
            return Err(Error::BadTimestepRange { tsmin, tsmax });
        }

        let ntimesteps = self.ntimesteps().min(twidths.len());
        if tsmax >= ntimesteps {
            return Err(Error::TimestepOutOfRange {
                timestep: tsmax,
                ntimesteps,
            });
        }

        let weights = &twidths[tsmin..=tsmax];
        let total_weight: f64 = weights.iter().sum();

        let f_nu = self
            .f_nu
            .iter()
            .map(|row| {
                row[tsmin..=tsmax]
                    .iter()
                    .zip(weights)
                    .map(|(flux, dt)| flux * dt)
                    .sum::<f64>()
                    / total_weight
            })
            .collect::<Vec<f64>>();

        Ok(Spectrum::from_f_nu(&self.nu, &f_nu))
    }

    /// Spectrum of a single timestep, which needs no timestep widths
    pub fn timestep_spectrum(&self, timestep: usize) -> Result<Spectrum> {
        if timestep >= self.ntimesteps() {
            return Err(Error::TimestepOutOfRange {
                timestep,
                ntimesteps: self.ntimesteps(),
            });
        }

        let f_nu = self.f_nu.iter().map(|row| row[timestep]).collect::<Vec<f64>>();
        Ok(Spectrum::from_f_nu(&self.nu, &f_nu))
    }
}

impl Spectrum {
    /// Convert f_nu on a frequency grid to f_lambda, sorted by wavelength
    ///
    /// ```rust
    /// # use artistools_spectra::Spectrum;
    /// let nu = [2e15, 1e15];
    /// let spectrum = Spectrum::from_f_nu(&nu, &[1.0, 1.0]);
    /// assert!(spectrum.lambda_angstroms[0] < spectrum.lambda_angstroms[1]);
    /// ```
    pub fn from_f_nu(nu: &[f64], f_nu: &[f64]) -> Self {
        let mut lambda_angstroms = nu.iter().map(|n| C_ANGSTROM_PER_S / n).collect::<Vec<f64>>();
        let mut f_lambda = nu
            .iter()
            .zip(f_nu)
            .zip(&lambda_angstroms)
            .map(|((n, flux), lambda)| flux * n / lambda)
            .collect::<Vec<f64>>();

        let mut order = lambda_angstroms.argsort();
        f_lambda.sort_by_index(&mut order.clone());
        lambda_angstroms.sort_by_index(&mut order);

        Self {
            lambda_angstroms,
            f_lambda,
        }
    }

    /// Number of wavelength points
    pub fn len(&self) -> usize {
        self.lambda_angstroms.len()
    }

    /// True if there are no wavelength points
    pub fn is_empty(&self) -> bool {
        self.lambda_angstroms.is_empty()
    }

    /// Points with `xmin <= lambda <= xmax`
    pub fn within(&self, xmin: f64, xmax: f64) -> Self {
        let (lambda_angstroms, f_lambda) = self
            .lambda_angstroms
            .iter()
            .zip(&self.f_lambda)
            .filter(|(lambda, _)| xmin <= **lambda && **lambda <= xmax)
            .map(|(lambda, flux)| (*lambda, *flux))
            .unzip();

        Self {
            lambda_angstroms,
            f_lambda,
        }
    }

    /// Flux integrated over wavelength in erg/s/cm^2
    pub fn integrated_flux(&self) -> Result<f64> {
        Ok(self.f_lambda.trapz(&self.lambda_angstroms)?)
    }
}

/// Parse the contents of a `spec.out` file
pub fn parse_specdata<R: BufRead>(reader: R) -> Result<SpecData> {
    let mut lines = reader.lines();

    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(Error::EmptyFile("spectrum file".to_string())),
        }
    };

    let mut specdata = SpecData {
        times: floats(&header)?.into_iter().skip(1).collect(),
        ..Default::default()
    };

    for line in lines {
        let values = floats(&line?)?;
        if values.is_empty() {
            continue;
        }

        if values.len() != specdata.times.len() + 1 {
            return Err(Error::WrongNumberOfValues {
                what: f!("spectrum row {}", specdata.nu.len() + 1),
                expected: specdata.times.len() + 1,
                found: values.len(),
            });
        }

        specdata.nu.push(values[0]);
        specdata.f_nu.push(values[1..].to_vec());
    }

    Ok(specdata)
}

/// Read `spec.out[.xz|.gz]` from a model folder
pub fn read_specdata<P: AsRef<Path>>(modelpath: P) -> Result<SpecData> {
    let path = get_spec_path(modelpath)?;
    info!("Reading {}", path.display());
    parse_specdata(zopen(&path)?)
}

/// Mean spectrum over an inclusive range of timesteps
pub fn get_spectrum<P: AsRef<Path>>(modelpath: P, tsmin: usize, tsmax: usize) -> Result<Spectrum> {
    let modelpath = modelpath.as_ref();
    let specdata = read_specdata(modelpath)?;
    let times = TimestepTimes::read(modelpath)?;
    specdata.spectrum(tsmin, tsmax, &times.twidths)
}

/// Spectrum of the timestep containing a time in days
pub fn get_spectrum_at_time<P: AsRef<Path>>(modelpath: P, timedays: f64) -> Result<Spectrum> {
    let modelpath = modelpath.as_ref();
    let timestep = TimestepTimes::read(modelpath)?.timestep_of_timedays(timedays)?;
    info!("Using timestep {timestep} for the spectrum at {timedays} days");
    read_specdata(modelpath)?.timestep_spectrum(timestep)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "0 10.0 12.0\n2e15 1.0 3.0\n1e15 2.0 4.0\n";

    #[test]
    fn header_and_rows() {
        let specdata = parse_specdata(SPEC.as_bytes()).unwrap();
        assert_eq!(specdata.times, vec![10.0, 12.0]);
        assert_eq!(specdata.nu, vec![2e15, 1e15]);
        assert_eq!(specdata.f_nu[1], vec![2.0, 4.0]);
    }

    #[test]
    fn short_rows_are_errors() {
        let result = parse_specdata("0 10.0 12.0\n2e15 1.0\n".as_bytes());
        assert!(matches!(result, Err(Error::WrongNumberOfValues { found: 2, .. })));
    }

    #[test]
    fn weighted_by_timestep_width() {
        let specdata = parse_specdata(SPEC.as_bytes()).unwrap();
        let spectrum = specdata.spectrum(0, 1, &[1.0, 3.0]).unwrap();

        // the longer wavelength comes from the lower frequency row
        let nu = 1e15;
        let lambda = C_ANGSTROM_PER_S / nu;
        let f_nu = (2.0 * 1.0 + 4.0 * 3.0) / 4.0;
        assert_eq!(spectrum.lambda_angstroms[1], lambda);
        assert!((spectrum.f_lambda[1] / (f_nu * nu / lambda) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn timesteps_must_exist() {
        let specdata = parse_specdata(SPEC.as_bytes()).unwrap();
        assert!(matches!(
            specdata.timestep_spectrum(2),
            Err(Error::TimestepOutOfRange { timestep: 2, .. })
        ));
        assert!(matches!(
            specdata.spectrum(1, 0, &[1.0, 1.0]),
            Err(Error::BadTimestepRange { .. })
        ));
    }
}
