//! Subcommand implementations and the arguments they share

// standard library
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_model::{get_time_range, get_timestep_of_timedays, TimeSelection};
use artistools_utils::{f, parse_range_list};
use log::debug;

pub(crate) mod atomic;
pub(crate) mod cache;
pub(crate) mod codecomparison;
pub(crate) mod deposition;
pub(crate) mod estimators;
pub(crate) mod inputmodel;
pub(crate) mod spectra;
pub(crate) mod stats;
pub(crate) mod timesteps;

/// Path to an ARTIS model folder
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct ModelArgs {
    /// Path to the ARTIS model folder
    #[arg(name = "modelpath", default_value = ".")]
    pub modelpath: PathBuf,
}

/// Ways of selecting a range of timesteps
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct TimeArgs {
    /// Timestep number or range (e.g. 30 or 30-40)
    #[arg(help_heading("Time selection"))]
    #[arg(short = 't', long, value_name = "range")]
    pub timestep: Option<String>,

    /// Time in days or range of times (e.g. 300 or 250-350)
    #[arg(help_heading("Time selection"))]
    #[arg(long, value_name = "range")]
    pub timedays: Option<String>,

    /// Lower time limit in days
    #[arg(help_heading("Time selection"))]
    #[arg(long, value_name = "days")]
    pub timemin: Option<f64>,

    /// Upper time limit in days
    #[arg(help_heading("Time selection"))]
    #[arg(long, value_name = "days")]
    pub timemax: Option<f64>,
}

impl TimeArgs {
    pub fn is_empty(&self) -> bool {
        self.timestep.is_none()
            && self.timedays.is_none()
            && self.timemin.is_none()
            && self.timemax.is_none()
    }

    fn selection(&self) -> TimeSelection {
        TimeSelection {
            timestep_range: self.timestep.clone(),
            timemin: self.timemin,
            timemax: self.timemax,
            timedays_range: self.timedays.clone(),
        }
    }

    /// Selected timesteps, empty when nothing was asked for
    pub fn timesteps(&self, modelpath: &Path) -> Result<Vec<usize>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let range = get_time_range(modelpath, &self.selection())?;
        match range.is_outside() {
            true => Err(Error::NoTimesteps),
            false => {
                debug!("Selected timesteps {}-{}", range.timestepmin, range.timestepmax);
                Ok(range.timesteps())
            }
        }
    }

    /// Inclusive timestep range, which must be non-empty
    pub fn range(&self, modelpath: &Path) -> Result<(usize, usize)> {
        let timesteps = self.timesteps(modelpath)?;
        match (timesteps.first(), timesteps.last()) {
            (Some(&tsmin), Some(&tsmax)) => Ok((tsmin, tsmax)),
            _ => Err(Error::InvalidArgument(
                "select times with --timestep, --timedays or --timemin/--timemax".into(),
            )),
        }
    }

    /// A single timestep, the first of a range
    pub fn single(&self, modelpath: &Path) -> Result<usize> {
        if let (Some(timedays), None) = (&self.timedays, &self.timestep) {
            if !timedays.contains('-') {
                return Ok(get_timestep_of_timedays(modelpath, timedays)?);
            }
        }
        Ok(self.range(modelpath)?.0)
    }
}

/// Parse a list of indices such as `0,3-5`
pub(crate) fn parse_indices(cells: &Option<String>) -> Result<Vec<i64>> {
    match cells {
        Some(list) => Ok(parse_range_list(list, &HashMap::new())?),
        None => Ok(Vec::new()),
    }
}

/// A non-negative cell index
pub(crate) fn cell_index(cell: i64) -> Result<usize> {
    usize::try_from(cell).map_err(|_| Error::InvalidArgument(f!("cell {cell} is negative")))
}
