//! Export ARTIS results in the code comparison workshop format

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_estimators::{read_estimators, EstimatorMap};
use artistools_inputmodel::{get_modeldata, InputModel};
use artistools_model::{get_composition_data, TimestepTimes};
use artistools_spectra::read_specdata;
use artistools_utils::constants::C_ANGSTROM_PER_S;
use artistools_utils::{f, get_elsymbol, Config, ValueExt};
use log::{info, warn};

/// Name of this code in the output file names
const CODE_NAME: &str = "artisnebular";

/// Area of a sphere of 1 Mpc in cm^2, with the parsec the workshop used
const AREA_1MPC: f64 = 3.086e18 * 3.086e18 * 1e12 * 4.0 * 3.141_592_654;

/// Estimators written to their own single-quantity files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleEstimator {
    /// Electron density, `eden_*`
    ElectronDensity,
    /// Total energy deposition, `edep_*`
    Deposition,
    /// Gas temperature, `tgas_*`
    Temperature,
}

impl SingleEstimator {
    /// Key of the quantity in the estimators
    pub fn key(&self) -> &'static str {
        match self {
            Self::ElectronDensity => "nne",
            Self::Deposition => "total_dep",
            Self::Temperature => "Te",
        }
    }

    /// Output file name prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::ElectronDensity => "eden",
            Self::Deposition => "edep",
            Self::Temperature => "tgas",
        }
    }

    fn column_header(&self) -> &'static str {
        match self {
            Self::ElectronDensity => "#vel_mid[km/s] ne_t0[/cm^3] ne_t1[/cm^3] … ne_tn[/cm^3]",
            Self::Deposition => {
                "#vel_mid[km/s] Edep_t0[erg/s/cm^3] Edep_t1[erg/s/cm^3] ... Edep_tn[erg/s/cm^3]"
            }
            Self::Temperature => "#vel_mid[km/s] Tgas_t0[K] Tgas_t1[K] ... Tgas_tn[K]",
        }
    }
}

/// Everything the writers need from one ARTIS model
#[derive(Debug, Clone)]
pub struct ComparisonData {
    pub modelpath: PathBuf,
    /// Short model name used in the output file names
    pub model_id: String,
    pub model: InputModel,
    /// Timestep midpoints in days
    pub times: Vec<f64>,
    pub estimators: EstimatorMap,
    pub selected_timesteps: Vec<usize>,
    /// Cells with estimators at the first selected timestep
    pub nonempty_cells: Vec<usize>,
}

impl ComparisonData {
    /// Read the model, timesteps and estimators of an ARTIS model folder
    ///
    /// The model id is the folder name up to the first underscore.
    pub fn read<P: AsRef<Path>>(modelpath: P, selected_timesteps: &[usize], config: &Config) -> Result<Self> {
        let modelpath = modelpath.as_ref();
        let first = *selected_timesteps.first().ok_or(Error::NoTimesteps)?;

        let abspath = std::path::absolute(modelpath)?;
        let model_id = abspath
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
            .split('_')
            .next()
            .unwrap_or_default()
            .to_string();

        let model = get_modeldata(modelpath, false)?;
        let times = TimestepTimes::read(modelpath)?.tmids;
        let estimators = read_estimators(modelpath, &[], &[], config)?;

        let nonempty_cells = (0..model.cells.len())
            .filter(|mgi| {
                estimators
                    .get(&(first, *mgi))
                    .is_some_and(|cell| !cell.emptycell)
            })
            .collect();

        Ok(Self {
            modelpath: modelpath.to_path_buf(),
            model_id,
            model,
            times,
            estimators,
            selected_timesteps: selected_timesteps.to_vec(),
            nonempty_cells,
        })
    }

    fn time(&self, timestep: usize) -> Result<f64> {
        self.times
            .get(timestep)
            .copied()
            .ok_or(Error::ModelError(artistools_model::Error::TimestepOutOfRange {
                timestep,
                last: self.times.len().saturating_sub(1),
            }))
    }

    fn times_line(&self) -> Result<String> {
        let times = self
            .selected_timesteps
            .iter()
            .map(|&ts| Ok(f!("{:.2}", self.time(ts)?)))
            .collect::<Result<Vec<String>>>()?;
        Ok(times.join(" "))
    }

    fn output_path(&self, outputpath: &Path, prefix: &str) -> PathBuf {
        outputpath.join(f!("{prefix}_{}_{CODE_NAME}.txt", self.model_id))
    }

    fn v_mid(&self, modelgridindex: usize) -> f64 {
        let cell = &self.model.cells[modelgridindex];
        (cell.velocity_inner + cell.velocity_outer) / 2.0
    }

    /// Estimator value, averaged from the neighbouring timesteps when missing
    fn estimator_value(&self, timestep: usize, modelgridindex: usize, key: &str) -> Result<f64> {
        let value = |ts: usize| self.estimators.get(&(ts, modelgridindex))?.get(key);

        if let Some(value) = value(timestep) {
            return Ok(value);
        }

        let neighbours = timestep
            .checked_sub(1)
            .and_then(value)
            .zip(value(timestep + 1));
        match neighbours {
            Some((before, after)) => {
                warn!("Averaging {key} of cell {modelgridindex} at timestep {timestep} from its neighbours");
                Ok((before + after) / 2.0)
            }
            None => Err(Error::MissingEstimator {
                timestep,
                modelgridindex,
                key: key.to_string(),
            }),
        }
    }
}

/// Write one quantity of every non-empty cell at every selected time
pub fn write_single_estimator(data: &ComparisonData, estimator: SingleEstimator, outfile: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(outfile)?);
    writeln!(writer, "#NTIMES {}", data.selected_timesteps.len())?;
    writeln!(writer, "#NVEL {}", data.model.cells.len())?;
    writeln!(writer, "#TIMES[d] {}", data.times_line()?)?;
    writeln!(writer, "{}", estimator.column_header())?;

    for &modelgridindex in &data.nonempty_cells {
        write!(writer, "{:.2}", data.v_mid(modelgridindex))?;
        for &timestep in &data.selected_timesteps {
            let value = data.estimator_value(timestep, modelgridindex, estimator.key())?;
            write!(writer, " {}", value.sci(2, 2))?;
        }
        writeln!(writer)?;
    }

    info!("Saved {}", outfile.display());
    Ok(())
}

/// Write temperature, density, electron and total number density
pub fn write_phys(data: &ComparisonData, outputpath: &Path) -> Result<PathBuf> {
    let outfile = data.output_path(outputpath, "phys");
    let mut writer = BufWriter::new(File::create(&outfile)?);
    writeln!(writer, "#NTIMES {}", data.selected_timesteps.len())?;
    writeln!(writer, "#TIMES[d] {}", data.times_line()?)?;
    writeln!(writer, "#")?;

    for &timestep in &data.selected_timesteps {
        let time = data.time(timestep)?;
        writeln!(writer, "#TIME: {time:.2}")?;
        writeln!(writer, "#NVEL {}", data.model.cells.len())?;
        writeln!(writer, "#vel_mid[km/s] temp[K] rho[gcc] ne[/cm^3] natom[/cm^3]")?;

        for &modelgridindex in &data.nonempty_cells {
            let cell = &data.model.cells[modelgridindex];
            let rho = cell.rho() * (data.model.t_model_init_days / time).powi(3);
            let te = data.estimator_value(timestep, modelgridindex, "Te")?;
            let nne = data.estimator_value(timestep, modelgridindex, "nne")?;
            let nntot = data.estimator_value(timestep, modelgridindex, "populations_total")?;

            write!(writer, "{:.2}", data.v_mid(modelgridindex))?;
            for value in [te, rho, nne, nntot] {
                write!(writer, " {}", value.sci(4, 2))?;
            }
            writeln!(writer)?;
        }
    }

    info!("Saved {}", outfile.display());
    Ok(outfile)
}

/// Write the ion fractions of every element in the composition
///
/// One file per element, with a column for each ion stage included in the
/// simulation, numbered from zero.
pub fn write_ionfracts(data: &ComparisonData, outputpath: &Path) -> Result<Vec<PathBuf>> {
    let composition = get_composition_data(&data.modelpath)?;

    let mut outfiles = Vec::with_capacity(composition.len());
    for element in &composition {
        let elsymb = get_elsymbol(element.atomic_number)?.to_lowercase();
        let outfile = data.output_path(outputpath, &f!("ionfrac_{elsymb}"));
        let mut writer = BufWriter::new(File::create(&outfile)?);

        writeln!(writer, "#NTIMES {}", data.selected_timesteps.len())?;
        writeln!(writer, "#NSTAGES {}", element.nions)?;
        writeln!(writer, "#TIMES[d] {}", data.times_line()?)?;
        writeln!(writer, "#")?;

        let ioncolumns = (0..element.nions)
            .map(|ion| f!("{elsymb}{ion}"))
            .collect::<Vec<String>>()
            .join("  ");

        for &timestep in &data.selected_timesteps {
            writeln!(writer, "#TIME: {:.2}", data.time(timestep)?)?;
            writeln!(writer, "#NVEL {}", data.model.cells.len())?;
            writeln!(writer, "#vel_mid[km/s]  {ioncolumns}")?;

            for &modelgridindex in &data.nonempty_cells {
                let cell = data.estimators.get(&(timestep, modelgridindex));
                let elpop = cell
                    .and_then(|c| c.element("populations", element.atomic_number))
                    .unwrap_or(0.0);

                write!(writer, "{:.2}", data.v_mid(modelgridindex))?;
                for ion in 0..element.nions {
                    let ion_stage = ion + element.lowermost_ionstage;
                    let ionpop = cell
                        .and_then(|c| c.ion("populations", element.atomic_number, ion_stage))
                        .unwrap_or(0.0);
                    let ionfrac = match elpop > 0.0 {
                        true => ionpop / elpop,
                        false => 0.0,
                    };
                    write!(writer, " {}", ionfrac.sci(4, 2))?;
                }
                writeln!(writer)?;
            }
        }

        info!("Saved {}", outfile.display());
        outfiles.push(outfile);
    }

    Ok(outfiles)
}

/// Write spectra as luminosity per Angstrom at the selected times
pub fn write_spectra(data: &ComparisonData, outputpath: &Path) -> Result<PathBuf> {
    let specdata = read_specdata(&data.modelpath)?;
    for &timestep in &data.selected_timesteps {
        if timestep >= specdata.ntimesteps() {
            return Err(Error::SpectraError(artistools_spectra::Error::TimestepOutOfRange {
                timestep,
                ntimesteps: specdata.ntimesteps(),
            }));
        }
    }

    let outfile = data.output_path(outputpath, "spectra");
    let mut writer = BufWriter::new(File::create(&outfile)?);

    let times = data
        .selected_timesteps
        .iter()
        .map(|&ts| f!("{:.2}", specdata.times[ts]))
        .collect::<Vec<String>>();
    writeln!(writer, "#NTIMES: {}", data.selected_timesteps.len())?;
    writeln!(writer, "#NWAVE: {}", specdata.nu.len())?;
    writeln!(writer, "#TIMES[d]: {}", times.join(" "))?;
    writeln!(writer, "#wavelength[Ang] flux_t0[erg/s/Ang] flux_t1[erg/s/Ang] ... flux_tn[erg/s/Ang]")?;

    // spec.out is ordered by frequency, so reversed rows are by wavelength
    for (nu, f_nu) in specdata.nu.iter().zip(&specdata.f_nu).rev() {
        let lambda = C_ANGSTROM_PER_S / nu;
        write!(writer, "{lambda:.2}")?;
        for &timestep in &data.selected_timesteps {
            let lum_lambda = f_nu[timestep] * C_ANGSTROM_PER_S / lambda / lambda * AREA_1MPC;
            write!(writer, " {}", lum_lambda.sci(2, 2))?;
        }
        writeln!(writer)?;
    }

    info!("Saved {}", outfile.display());
    Ok(outfile)
}

/// Write every comparison file of a model into `outputpath`
///
/// Returns the paths written. Spectra are only written when asked for.
pub fn writecomparisondata<P: AsRef<Path>>(
    modelpath: P,
    selected_timesteps: &[usize],
    outputpath: &Path,
    include_spectra: bool,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(outputpath)?;
    let data = ComparisonData::read(modelpath, selected_timesteps, config)?;

    let mut outfiles = Vec::new();
    if include_spectra {
        outfiles.push(write_spectra(&data, outputpath)?);
    }

    for estimator in [
        SingleEstimator::ElectronDensity,
        SingleEstimator::Deposition,
        SingleEstimator::Temperature,
    ] {
        let outfile = data.output_path(outputpath, estimator.prefix());
        write_single_estimator(&data, estimator, &outfile)?;
        outfiles.push(outfile);
    }

    outfiles.push(write_phys(&data, outputpath)?);
    outfiles.extend(write_ionfracts(&data, outputpath)?);
    Ok(outfiles)
}
