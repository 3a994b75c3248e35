//! Run parameters from `input.txt` and model cell counts

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{exact, floats, index, ints, uncommented};

// external crates
use artistools_utils::constants::mev_to_hz;
use artistools_utils::readnoncommentline;
use log::debug;
use serde::{Deserialize, Serialize};

/// The leading parameters of an ARTIS `input.txt`
///
/// There are more parameters in the file that are not needed for post
/// processing, so reading stops after `n_dimensions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParams {
    /// Random number seed
    pub pre_zseed: i64,
    /// Number of timesteps
    pub ntstep: usize,
    /// First timestep to compute
    pub itstep: usize,
    /// Last timestep to compute
    pub ftstep: usize,
    /// Start of the first timestep in days
    pub tmin: f64,
    /// End of the last timestep in days
    pub tmax: f64,
    /// Lowest synthesis frequency in Hz
    pub nusyn_min: f64,
    /// Highest synthesis frequency in Hz
    pub nusyn_max: f64,
    /// Number of times for synthesis
    pub nsyn_time: usize,
    /// Start time for synthesis in days
    pub nsyn_time_start: f64,
    /// End time for synthesis in days
    pub nsyn_time_end: f64,
    /// Model dimensionality
    pub n_dimensions: usize,
}

/// Read the leading parameters of `input.txt` in a model folder
///
/// ```rust, no_run
/// # use artistools_model::get_inputparams;
/// let params = get_inputparams("/path/to/model").unwrap();
/// println!("{} timesteps from {} to {} days", params.ntstep, params.tmin, params.tmax);
/// ```
pub fn get_inputparams<P: AsRef<Path>>(modelpath: P) -> Result<InputParams> {
    let path = modelpath.as_ref().join("input.txt");
    debug!("Reading {}", path.display());
    let text = std::fs::read_to_string(&path)?;
    parse_inputparams(text.lines().map(String::from))
}

/// Parse the leading parameters from the lines of an `input.txt`
pub fn parse_inputparams<I: Iterator<Item = String>>(mut lines: I) -> Result<InputParams> {
    let mut next = || -> Result<String> {
        let line = readnoncommentline(&mut lines)
            .map_err(|_| Error::UnexpectedEndOfFile("input.txt".to_string()))?;
        Ok(uncommented(&line).to_string())
    };

    let [pre_zseed] = exact(ints(&next()?)?, "pre_zseed")?;
    let [ntstep] = exact(ints(&next()?)?, "ntstep")?;
    let [itstep, ftstep] = exact(ints(&next()?)?, "itstep ftstep")?;
    let [tmin, tmax] = exact(floats(&next()?)?, "tmin tmax")?;
    let [nusyn_min_mev, nusyn_max_mev] = exact(floats(&next()?)?, "nusyn_min nusyn_max")?;
    let [nsyn_time] = exact(ints(&next()?)?, "nsyn_time")?;
    let [nsyn_time_start, nsyn_time_end] =
        exact(floats(&next()?)?, "nsyn_time_start nsyn_time_end")?;
    let [n_dimensions] = exact(ints(&next()?)?, "n_dimensions")?;

    Ok(InputParams {
        pre_zseed,
        ntstep: index(ntstep, "ntstep")?,
        itstep: index(itstep, "itstep")?,
        ftstep: index(ftstep, "ftstep")?,
        tmin,
        tmax,
        nusyn_min: mev_to_hz(nusyn_min_mev),
        nusyn_max: mev_to_hz(nusyn_max_mev),
        nsyn_time: index(nsyn_time, "nsyn_time")?,
        nsyn_time_start,
        nsyn_time_end,
        n_dimensions: index(n_dimensions, "n_dimensions")?,
    })
}

/// Number of model cells, from the first line of `model.txt`
pub fn get_npts_model<P: AsRef<Path>>(modelpath: P) -> Result<usize> {
    let path = modelpath.as_ref().join("model.txt");
    let text = std::fs::read_to_string(&path)?;
    let first = text
        .lines()
        .next()
        .ok_or_else(|| Error::UnexpectedEndOfFile(path.display().to_string()))?;
    Ok(first.trim().parse::<usize>()?)
}

/// Number of MPI processes, from line 22 of `input.txt`
pub fn get_nprocs<P: AsRef<Path>>(modelpath: P) -> Result<usize> {
    let path = modelpath.as_ref().join("input.txt");
    let text = std::fs::read_to_string(&path)?;
    let line = text
        .split('\n')
        .nth(21)
        .ok_or_else(|| Error::UnexpectedEndOfFile(path.display().to_string()))?;
    Ok(uncommented(line).trim().parse::<usize>()?)
}
