//! `spectrum` and `lightcurve`

// standard library
use std::path::PathBuf;

// crate modules
use crate::commands::{ModelArgs, TimeArgs};
use crate::error::{Error, Result};
use crate::output::{value, OutputArgs, Table};

// external crates
use artistools_model::is_codecomparison_path;
use artistools_spectra::{get_lightcurve, get_magnitudes, get_spectrum, lightcurve, Spectrum};
use artistools_utils::{compression_variants, f, firstexisting, Config};
use log::info;

/// Spectrum averaged over a range of timesteps
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct SpectrumArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub time: TimeArgs,

    /// Lower wavelength limit in Angstroms
    #[arg(long, default_value_t = 2500.0)]
    pub xmin: f64,

    /// Upper wavelength limit in Angstroms
    #[arg(long, default_value_t = 11000.0)]
    pub xmax: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn reference_spectrum(args: &SpectrumArgs, config: &Config) -> Result<Spectrum> {
    let timedays = match (&args.time.timedays, args.time.timemin, args.time.timemax) {
        (Some(days), _, _) => days.parse::<f64>().ok(),
        (None, Some(tmin), Some(tmax)) => Some((tmin + tmax) / 2.0),
        _ => None,
    }
    .ok_or_else(|| {
        Error::InvalidArgument("reference spectra are selected by a single --timedays".into())
    })?;

    let spectra = artistools_codecomparison::get_spectra(&args.model.modelpath, config)?;
    let (time, spectrum) = spectra.closest_spectrum(timedays)?;
    info!("Using the reference spectrum at {time} days");
    Ok(spectrum)
}

pub(crate) fn run_spectrum(args: &SpectrumArgs, config: &Config) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let spectrum = match is_codecomparison_path(modelpath) {
        true => reference_spectrum(args, config)?,
        false => {
            let (tsmin, tsmax) = args.time.range(modelpath)?;
            info!("Averaging the spectrum over timesteps {tsmin} to {tsmax}");
            get_spectrum(modelpath, tsmin, tsmax)?
        }
    };
    let spectrum = spectrum.within(args.xmin, args.xmax);

    info!(
        "Integrated flux between {} and {} Angstroms: {} erg/s/cm^2",
        args.xmin,
        args.xmax,
        value(spectrum.integrated_flux()?)
    );

    args.output.emit(&spectrum, || {
        let mut table = Table::new(&["lambda_angstroms", "f_lambda"]);
        for (lambda, flux) in spectrum.lambda_angstroms.iter().zip(&spectrum.f_lambda) {
            table.push(vec![value(*lambda), value(*flux)]);
        }
        Ok(table)
    })
}

/// Light curve in solar luminosities, or magnitudes in photometric filters
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct LightCurveArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Viewing angle bin from light_curve_res.out instead of the angle average
    #[arg(short, long)]
    pub angle: Option<usize>,

    /// Filters for absolute magnitudes, e.g. B,V,bol
    #[arg(short, long, value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Folder holding the filter transmission curves
    #[arg(long, value_name = "path")]
    pub filterdir: Option<PathBuf>,

    /// Lower time limit in days for magnitudes
    #[arg(long, default_value_t = f64::NEG_INFINITY, hide_default_value = true)]
    pub timemin: f64,

    /// Upper time limit in days for magnitudes
    #[arg(long, default_value_t = f64::INFINITY, hide_default_value = true)]
    pub timemax: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run_lightcurve(args: &LightCurveArgs, config: &Config) -> Result<()> {
    match args.filter.is_empty() {
        true => write_lightcurve(args),
        false => write_magnitudes(args, config),
    }
}

fn write_lightcurve(args: &LightCurveArgs) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let points = match args.angle {
        None => get_lightcurve(modelpath)?,
        Some(angle) => {
            let path = firstexisting(&compression_variants("light_curve_res.out"), modelpath)?;
            lightcurve::readfile_res(path)?
                .into_iter()
                .nth(angle)
                .ok_or_else(|| Error::InvalidArgument(f!("no viewing angle bin {angle}")))?
        }
    };

    args.output.emit(&points, || {
        let mut table = Table::new(&["time_days", "lum_Lsun", "lum_cmf_Lsun"]);
        for point in &points {
            table.push(vec![value(point.time), value(point.lum), value(point.lum_cmf)]);
        }
        Ok(table)
    })
}

fn write_magnitudes(args: &LightCurveArgs, config: &Config) -> Result<()> {
    let mut config = config.clone();
    if let Some(filterdir) = &args.filterdir {
        config.filter_data_path = filterdir.clone();
    }

    let magnitudes = get_magnitudes(
        &args.model.modelpath,
        &args.filter,
        args.timemin,
        args.timemax,
        &config,
    )?;

    args.output.emit(&magnitudes, || {
        let mut table = Table::new(&["filter", "time_days", "abs_mag"]);
        for filter in &magnitudes {
            for (time, mag) in &filter.points {
                table.push(vec![filter.filter.clone(), value(*time), value(*mag)]);
            }
        }
        Ok(table)
    })
}
