//! Broad-band and bolometric absolute magnitudes from synthetic spectra

// standard library
use std::f64::consts::PI;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{floats, linspace};
use crate::specdata::{read_specdata, Spectrum};

// external crates
use artistools_utils::constants::{LSUN_ERG_S, MBOL_SUN, MPC_CM};
use artistools_utils::{f, Config, SliceExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Name of the pseudo-filter for bolometric magnitudes
pub const BOLOMETRIC: &str = "bol";

/// Transmission curve of a photometric filter
///
/// Filter files start with the zero point energy flux in erg/cm^2/s, then
/// three lines of metadata, then `wavelength transmission` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterData {
    pub zeropointenergyflux: f64,
    pub wavelengths: Vec<f64>,
    pub transmission: Vec<f64>,
    pub wavefilter_min: f64,
    /// Truncated to a whole Angstrom for a sharper cut-off
    pub wavefilter_max: f64,
}

/// Absolute magnitudes of one filter through time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMagnitudes {
    pub filter: String,
    /// `(time in days, magnitude)` pairs
    pub points: Vec<(f64, f64)>,
}

/// Read `<filterdir>/<filter_name>.txt`
pub fn get_filter_data<P: AsRef<Path>>(filterdir: P, filter_name: &str) -> Result<FilterData> {
    let path = filterdir.as_ref().join(f!("{filter_name}.txt"));
    debug!("Reading {}", path.display());

    let text = std::fs::read_to_string(&path)?;
    let lines = text.lines().collect::<Vec<&str>>();

    let zeropointenergyflux = lines
        .first()
        .ok_or_else(|| Error::EmptyFile(path.display().to_string()))?
        .trim()
        .parse::<f64>()?;

    let mut wavelengths = Vec::new();
    let mut transmission = Vec::new();
    for line in lines.iter().skip(4) {
        match floats(line)?.as_slice() {
            [] => continue,
            [wave, trans, ..] => {
                wavelengths.push(*wave);
                transmission.push(*trans);
            }
            values => {
                return Err(Error::WrongNumberOfValues {
                    what: f!("{filter_name} filter row"),
                    expected: 2,
                    found: values.len(),
                })
            }
        }
    }

    let wavefilter_min = wavelengths.try_min()?;
    let wavefilter_max = wavelengths.try_max()?.trunc();

    Ok(FilterData {
        zeropointenergyflux,
        wavelengths,
        transmission,
        wavefilter_min,
        wavefilter_max,
    })
}

/// Parts of a spectrum inside the wavelength range of a filter
pub fn get_spectrum_in_filter_range(spectrum: &Spectrum, filter: &FilterData) -> Spectrum {
    spectrum.within(filter.wavefilter_min, filter.wavefilter_max)
}

/// Magnitude of a flux through a filter relative to the zero point
///
/// A spectrum with no flux in the band gives zero rather than infinity.
///
/// ```rust
/// # use artistools_spectra::evaluate_magnitudes;
/// let wavelengths = [4000.0, 5000.0];
/// let mag = evaluate_magnitudes(&[1e-3, 1e-3], &[1.0, 1.0], &wavelengths, 10.0).unwrap();
/// assert!((mag - 2.5).abs() < 1e-12);
/// ```
pub fn evaluate_magnitudes(
    flux: &[f64],
    transmission: &[f64],
    wavelengths: &[f64],
    zeropointenergyflux: f64,
) -> Result<f64> {
    let cf = flux
        .iter()
        .zip(transmission)
        .map(|(f, t)| f * t)
        .collect::<Vec<f64>>();

    let flux_obs = cf.trapz(wavelengths)?.abs();
    Ok(match flux_obs == 0.0 {
        true => 0.0,
        false => -2.5 * (flux_obs / zeropointenergyflux).log10(),
    })
}

/// Absolute magnitude of a spectrum at 1 Mpc through a filter
///
/// Whichever of the spectrum and the filter is sampled more coarsely is
/// interpolated onto an even grid with as many points as the other.
pub fn filter_magnitude(spectrum: &Spectrum, filter: &FilterData) -> Result<f64> {
    let band = get_spectrum_in_filter_range(spectrum, filter);

    let phot_filtobs_sn = if band.len() > filter.wavelengths.len() {
        let wavelength_min = band.lambda_angstroms.try_min()?;
        let wavelength_max = band.lambda_angstroms.try_max()?.trunc();
        let transmission = linspace(wavelength_min, wavelength_max, band.len())
            .into_iter()
            .map(|x| filter.wavelengths.interp(x, &filter.transmission, 0.0))
            .collect::<Vec<f64>>();

        evaluate_magnitudes(
            &band.f_lambda,
            &transmission,
            &band.lambda_angstroms,
            filter.zeropointenergyflux,
        )?
    } else {
        let wavelengths = linspace(
            filter.wavefilter_min,
            filter.wavefilter_max,
            filter.wavelengths.len(),
        );
        let flux = wavelengths
            .iter()
            .map(|&x| band.lambda_angstroms.interp(x, &band.f_lambda, 0.0))
            .collect::<Vec<f64>>();

        evaluate_magnitudes(
            &flux,
            &filter.transmission,
            &wavelengths,
            filter.zeropointenergyflux,
        )?
    };

    // the spectra are at 1 Mpc, 25 mag brighter than at 10 pc
    Ok(phot_filtobs_sn - 25.0)
}

/// Absolute bolometric magnitude of a spectrum at 1 Mpc
pub fn bolometric_magnitude(spectrum: &Spectrum) -> Result<f64> {
    let integrated_luminosity = spectrum.integrated_flux()? * 4.0 * PI * MPC_CM.powi(2);
    Ok(MBOL_SUN - 2.5 * (integrated_luminosity / LSUN_ERG_S).log10())
}

/// Magnitudes in each filter for every timestep with `timemin < t < timemax`
///
/// Filters other than [BOLOMETRIC] are read from
/// [Config::filter_data_path]. Non-finite bolometric magnitudes, from
/// timesteps without escaping flux, are left out.
pub fn get_magnitudes<P: AsRef<Path>>(
    modelpath: P,
    filters: &[String],
    timemin: f64,
    timemax: f64,
    config: &Config,
) -> Result<Vec<FilterMagnitudes>> {
    let specdata = read_specdata(modelpath)?;

    let mut results: Vec<FilterMagnitudes> = Vec::new();
    for filter_name in filters {
        if results.iter().any(|r| &r.filter == filter_name) {
            continue;
        }

        let filter = match filter_name.as_str() {
            BOLOMETRIC => None,
            name => Some(get_filter_data(&config.filter_data_path, name)?),
        };

        let mut points = Vec::new();
        for (timestep, &time) in specdata.times.iter().enumerate() {
            if !(timemin < time && time < timemax) {
                continue;
            }

            let spectrum = specdata.timestep_spectrum(timestep)?;
            match &filter {
                None => {
                    let magnitude = bolometric_magnitude(&spectrum)?;
                    if magnitude.is_finite() {
                        points.push((time, magnitude));
                    }
                }
                Some(filter) => points.push((time, filter_magnitude(&spectrum, filter)?)),
            }
        }

        info!("{filter_name}: {} magnitudes", points.len());
        results.push(FilterMagnitudes {
            filter: filter_name.clone(),
            points,
        });
    }

    Ok(results)
}
